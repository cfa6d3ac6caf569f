use super::*;
use crate::card::model::{Counters, Theme};
use crate::foundation::error::ErrorKind;

fn content(message: &str) -> CardContent {
    CardContent {
        display_name: "Ada Lovelace".to_string(),
        handle: "ada".to_string(),
        message_text: message.to_string(),
        timestamp: "3h".to_string(),
        avatar: None,
        counters: Counters {
            replies: Some(12),
            retweets: None,
            likes: Some(1_250),
            views: Some(98_000),
        },
        verified: false,
        theme: Theme::Light,
    }
}

fn options(style: OverlayStyle) -> RenderOptions {
    RenderOptions {
        target_width: Some(1080),
        target_height: Some(1080),
        overlay_style: style,
        ..RenderOptions::default()
    }
}

fn px(img: &PremulImage, x: f64, y: f64) -> [u8; 4] {
    let i = ((y as usize) * img.width as usize + x as usize) * 4;
    [img.data[i], img.data[i + 1], img.data[i + 2], img.data[i + 3]]
}

fn render(message: &str, style: OverlayStyle) -> RenderedOverlay {
    let ctx = RenderingContext::with_fonts(None);
    OverlayRenderer::new(&ctx)
        .render(&content(message), &options(style))
        .unwrap()
}

#[test]
fn overlay_covers_the_canvas_with_transparent_margins() {
    let out = render("hello there", OverlayStyle::Glassmorphism);
    assert_eq!((out.image.width, out.image.height), (1080, 1080));
    assert_eq!(out.image.data.len(), 1080 * 1080 * 4);
    assert_eq!(out.image.alpha_at(0, 0), 0);
    assert_eq!(out.image.alpha_at(1079, 1079), 0);
    assert_eq!(out.image.alpha_at(1079, 0), 0);
}

#[test]
fn glass_panel_is_translucent() {
    let out = render("hello there", OverlayStyle::Glassmorphism);
    let a = px(&out.image, 540.0, 540.0)[3];
    assert!((100..=180).contains(&a), "alpha {a}");
}

#[test]
fn solid_panel_uses_configured_opacity() {
    let out = render("hello there", OverlayStyle::Solid);
    let a = px(&out.image, 540.0, 540.0)[3];
    assert!((205..=230).contains(&a), "alpha {a}");
}

#[test]
fn gradient_panel_darkens_towards_the_bottom() {
    let out = render("hello there", OverlayStyle::Gradient);
    let c = out.layout.container;
    let top = px(&out.image, 540.0, c.y0 + c.height() * 0.3);
    let bottom = px(&out.image, 540.0, c.y0 + c.height() * 0.7);
    assert!(top[3] > 150 && bottom[3] > 150);
    assert!(top[0] > bottom[0], "top {top:?} bottom {bottom:?}");
}

#[test]
fn missing_avatar_draws_accent_placeholder() {
    let ctx = RenderingContext::with_fonts(None);
    let mut card = content("hello");
    card.avatar = Some("/no/such/avatar.png".into());
    let out = OverlayRenderer::new(&ctx)
        .render(&card, &options(OverlayStyle::Solid))
        .unwrap();
    let centre = out.layout.anchors.avatar_center;
    let [r, g, b, a] = px(&out.image, centre.x, centre.y);
    assert_eq!(a, 255);
    assert!(b > g && g > r, "{:?}", [r, g, b, a]);
}

#[test]
fn layout_matches_the_engine() {
    let out = render("same geometry", OverlayStyle::Solid);
    let style = GlassPanelStyle::derive(Theme::Light, &options(OverlayStyle::Solid));
    let mut m = FixedAdvanceMeasure::default();
    let expected = LayoutEngine::new()
        .layout_on(
            Canvas::new(1080, 1080).unwrap(),
            &content("same geometry"),
            &style,
            &mut m,
        )
        .unwrap();
    assert_eq!(out.layout, expected);
}

#[test]
fn overflow_is_reported_as_layout_error() {
    let ctx = RenderingContext::with_fonts(None);
    let opts = RenderOptions {
        target_width: Some(100),
        target_height: Some(100),
        ..RenderOptions::default()
    };
    let err = OverlayRenderer::new(&ctx)
        .render(&content(&"overflow ".repeat(31)), &opts)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutOverflow);
}
