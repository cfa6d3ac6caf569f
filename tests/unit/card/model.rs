use super::*;

fn opts(w: Option<u32>, h: Option<u32>, hint: Option<&str>) -> RenderOptions {
    RenderOptions {
        target_width: w,
        target_height: h,
        aspect_ratio_hint: hint.map(str::to_string),
        ..RenderOptions::default()
    }
}

#[test]
fn width_with_portrait_hint_derives_height() {
    let c = opts(Some(1080), None, Some("9:16"))
        .resolve_dimensions()
        .unwrap();
    assert_eq!(c.width, 1080);
    assert_eq!(c.height, (1080.0_f64 * 16.0 / 9.0).round() as u32);
}

#[test]
fn height_with_hint_derives_width() {
    let c = opts(None, Some(1350), Some("4:5")).resolve_dimensions().unwrap();
    assert_eq!((c.width, c.height), (1080, 1350));
}

#[test]
fn explicit_dimensions_win_over_hint() {
    let c = opts(Some(800), Some(600), Some("1:1"))
        .resolve_dimensions()
        .unwrap();
    assert_eq!((c.width, c.height), (800, 600));
}

#[test]
fn nothing_given_defaults_to_square() {
    let c = opts(None, None, None).resolve_dimensions().unwrap();
    assert_eq!((c.width, c.height), (1080, 1080));
    let c = opts(None, None, Some("16:9")).resolve_dimensions().unwrap();
    assert_eq!((c.width, c.height), (1080, 608));
}

#[test]
fn derived_dimension_is_clamped() {
    let c = opts(Some(4000), None, Some("1:4")).resolve_dimensions().unwrap();
    assert_eq!(c.height, 4096);
}

#[test]
fn malformed_hint_is_ignored() {
    assert_eq!(parse_aspect_hint("16x9"), None);
    assert_eq!(parse_aspect_hint("0:9"), None);
    assert_eq!(parse_aspect_hint(" 4 : 5 "), Some((4.0, 5.0)));
    let c = opts(Some(500), None, Some("wide")).resolve_dimensions().unwrap();
    assert_eq!((c.width, c.height), (500, 500));
}

#[test]
fn options_deserialize_with_defaults() {
    let o: RenderOptions = serde_json::from_str(
        r#"{ "target_width": 1080, "quality": "ultra", "overlay_style": "glass", "animation": "zoom" }"#,
    )
    .unwrap();
    assert_eq!(o.quality, QualityTier::Ultra);
    assert_eq!(o.overlay_style, OverlayStyle::Glassmorphism);
    assert_eq!(o.animation, Animation::Zoom);
    assert_eq!(o.fps, 30);
    assert!(o.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut o = RenderOptions::default();
    o.overlay_opacity = 1.5;
    assert!(o.validate().is_err());
    let mut o = RenderOptions::default();
    o.duration_seconds = 90.0;
    assert!(o.validate().is_err());
    let mut o = RenderOptions::default();
    o.background_playback_rate = 0.0;
    assert!(o.validate().is_err());
}

#[test]
fn handle_label_and_initial() {
    let c = CardContent {
        display_name: "  ada Lovelace".to_string(),
        handle: "@@ada".to_string(),
        message_text: "hi".to_string(),
        timestamp: String::new(),
        avatar: None,
        counters: Counters::default(),
        verified: false,
        theme: Theme::Dark,
    };
    assert_eq!(c.handle_label(), "@ada");
    assert_eq!(c.initial(), 'A');
}

#[test]
fn timeout_multipliers_grow_with_tier() {
    let tiers = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Ultra,
    ];
    let m: Vec<u64> = tiers.iter().map(|t| t.timeout_multiplier()).collect();
    assert_eq!(m, vec![2, 4, 8, 12]);
}
