use std::time::Duration;

use wacapture_channels::BridgeConfig;
use wacapture_config::WaCaptureConfig;
use wacapture_ingest::HandlerSettings;
use wacapture_media::MediaWriter;

/// Bridge connection settings from the `gateway` section.
pub fn bridge_config(config: &WaCaptureConfig) -> BridgeConfig {
    BridgeConfig {
        http_url: config.gateway.http_url.clone(),
        ws_url: config.gateway.ws_url.clone(),
        session_data_path: config.gateway.session_data_path.clone(),
        reconnect_delay: Duration::from_secs(config.gateway.reconnect_delay_secs),
    }
}

pub fn media_writer(config: &WaCaptureConfig) -> MediaWriter {
    MediaWriter::new(&config.media.root, config.media.layout)
        .with_owner_info(config.media.write_owner_info)
}

pub fn handler_settings(config: &WaCaptureConfig) -> HandlerSettings {
    HandlerSettings {
        call_policy: config.calls.policy(),
        revoke_mode: config.revoke.mode,
        skip_stickers: config.media.skip_stickers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use wacapture_core::RevokeMode;

    #[test]
    fn defaults_wire_through() {
        let config = WaCaptureConfig::default();

        let bridge = bridge_config(&config);
        assert_eq!(bridge.http_url, "http://localhost:3000");
        assert_eq!(bridge.reconnect_delay, Duration::from_secs(5));
        assert_eq!(bridge.session_data_path, "auth");

        assert_eq!(media_writer(&config).root(), Path::new("medias"));

        let settings = handler_settings(&config);
        assert!(settings.call_policy.reject_calls);
        assert!(settings.skip_stickers);
        assert_eq!(settings.revoke_mode, RevokeMode::Merged);
    }

    #[test]
    fn overrides_reach_the_handler() {
        let mut config = WaCaptureConfig::default();
        config.calls.reject = false;
        config.revoke.mode = RevokeMode::Split;
        config.media.skip_stickers = false;

        let settings = handler_settings(&config);
        assert!(!settings.call_policy.reject_calls);
        assert_eq!(settings.revoke_mode, RevokeMode::Split);
        assert!(!settings.skip_stickers);
    }
}
