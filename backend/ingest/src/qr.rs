use anyhow::Context;
use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;
use wacapture_core::CaptureError;

/// Render a pairing code as compact unicode blocks for the operator terminal.
pub fn render_qr(code: &str) -> Result<String, CaptureError> {
    let qr = QrCode::new(code.as_bytes()).context("Failed to encode pairing code")?;
    Ok(qr
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_multiline_blocks() {
        let rendered = render_qr("2@Zx9sd,KJHDkjh,1234==").unwrap();
        assert!(rendered.lines().count() > 10);
        assert!(rendered.chars().any(|c| c == '█' || c == '▀' || c == '▄'));
    }
}
