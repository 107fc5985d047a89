use wacapture_core::CallEvent;

/// Text sent back to a caller after a call event.
pub fn call_notification(call: &CallEvent, rejected: bool) -> String {
    let direction = if call.from_me { "Outgoing" } else { "Incoming" };
    let group = if call.is_group { "group " } else { "" };
    let media = if call.is_video { "video" } else { "audio" };
    let suffix = if rejected {
        " This call was automatically rejected."
    } else {
        ""
    };
    format!(
        "[{direction}] Phone call from {from}, type {group}{media} call.{suffix}",
        from = call.from
    )
}
