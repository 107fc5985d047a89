//! Records built from a revoked message's before/after snapshots.

use wacapture_core::{MessageRecord, MessageSnapshot, RevokeMode};

/// Records to persist for one revoke event, in persistence order.
pub fn revoke_records(
    mode: RevokeMode,
    before: Option<&MessageSnapshot>,
    after: Option<&MessageSnapshot>,
) -> Vec<MessageRecord> {
    match mode {
        RevokeMode::Merged => merged_record(before, after).into_iter().collect(),
        RevokeMode::Split => {
            let before = before.map(|msg| msg.to_record(format!("BEFORE: {}", msg.body)));
            let after = after.map(|msg| msg.to_record(format!("AFTER: {}", msg.body)));
            before.into_iter().chain(after).collect()
        }
    }
}

/// One record whose fields come from `after` when present, else `before`, and
/// whose body joins the available texts before-then-after.
fn merged_record(
    before: Option<&MessageSnapshot>,
    after: Option<&MessageSnapshot>,
) -> Option<MessageRecord> {
    let source = after.or(before)?;
    let body = [before, after]
        .into_iter()
        .flatten()
        .map(|msg| msg.body.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    Some(source.to_record(body))
}

/// Text shown in the revoke log line: the before body, else the after body.
pub fn revoked_text<'a>(
    before: Option<&'a MessageSnapshot>,
    after: Option<&'a MessageSnapshot>,
) -> &'a str {
    before
        .or(after)
        .map(|msg| msg.body.as_str())
        .unwrap_or_default()
}
