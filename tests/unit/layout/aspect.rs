use super::*;

fn class(w: u32, h: u32) -> AspectClass {
    AspectClass::classify(Canvas::new(w, h).unwrap())
}

#[test]
fn named_ratios_are_recognised() {
    assert_eq!(class(1080, 1080), AspectClass::Square);
    assert_eq!(class(1080, 1350), AspectClass::Portrait4x5);
    assert_eq!(class(1080, 1440), AspectClass::Portrait3x4);
    assert_eq!(class(1080, 1920), AspectClass::Story9x16);
}

#[test]
fn tolerance_admits_near_misses() {
    assert_eq!(class(1040, 1000), AspectClass::Square);
    assert_eq!(class(600, 1040), AspectClass::Story9x16);
}

#[test]
fn unnamed_ratios_fall_back_by_orientation() {
    assert_eq!(class(1000, 2500), AspectClass::Vertical);
    assert_eq!(class(1920, 1080), AspectClass::Horizontal);
    assert_eq!(class(1000, 1100), AspectClass::Horizontal);
}

#[test]
fn golden_cap_bounds_vertical_panels() {
    let canvas = Canvas::new(1080, 1920).unwrap();
    let (w, h) = AspectClass::Story9x16.profile().panel_bounds(canvas);
    assert!((w - 810.0).abs() < 1e-9);
    assert!((h - 1152.0).abs() < 1e-9);

    let tall = Canvas::new(400, 4000).unwrap();
    let (w, h) = AspectClass::Vertical.profile().panel_bounds(tall);
    assert!((h - w * GOLDEN_RATIO).abs() < 1e-9);
}

#[test]
fn story_gets_largest_boost() {
    let boosts = [
        AspectClass::Square,
        AspectClass::Portrait4x5,
        AspectClass::Portrait3x4,
        AspectClass::Vertical,
        AspectClass::Horizontal,
    ]
    .map(|c| c.profile().font_boost);
    let story = AspectClass::Story9x16.profile().font_boost;
    assert!(boosts.iter().all(|b| *b < story));
}
