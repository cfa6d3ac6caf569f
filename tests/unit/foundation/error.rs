use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(GlassError::input("x").to_string().contains("input error:"));
    assert!(
        GlassError::no_background("x")
            .to_string()
            .contains("no background available:")
    );
    assert!(
        GlassError::resource_exhausted("x")
            .to_string()
            .contains("resource exhausted:")
    );
    assert!(
        GlassError::encoder_failed("x", None, Some(1))
            .to_string()
            .contains("encoder failure:")
    );
}

#[test]
fn timeouts_and_cancellation_are_encoder_failures() {
    assert_eq!(
        GlassError::ProcessingTimeout(30).kind(),
        ErrorKind::EncoderFailure
    );
    assert_eq!(GlassError::Cancelled.kind(), ErrorKind::EncoderFailure);
    assert_eq!(
        GlassError::encoder_failed("boom", None, Some(1)).kind(),
        ErrorKind::EncoderFailure
    );
}

#[test]
fn layout_errors_convert_to_overflow_kind() {
    let err: GlassError = LayoutError::TextTooLong {
        min_font_px: 14.0,
        required_px: 900.0,
        available_px: 300.0,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::LayoutOverflow);
    assert_eq!(err.kind().as_str(), "layout_overflow");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlassError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Internal);
}
