use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "glasscard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_raw(w, h, rgba.repeat((w * h) as usize)).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn avatar_is_masked_to_a_circle() {
    let tmp = temp_dir("raster_avatar");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("avatar.png");
    write_png(&path, 40, 20, [200, 10, 10, 255]);

    let avatar = load_avatar(&path, 32).unwrap();
    assert_eq!((avatar.width, avatar.height), (32, 32));
    assert_eq!(avatar.alpha_at(0, 0), 0);
    assert_eq!(avatar.alpha_at(31, 31), 0);
    assert_eq!(avatar.alpha_at(16, 16), 255);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn svg_avatar_is_rasterised() {
    let tmp = temp_dir("raster_svg");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("avatar.svg");
    std::fs::write(
        &path,
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##,
    )
    .unwrap();

    let avatar = load_avatar(&path, 24).unwrap();
    assert_eq!(avatar.alpha_at(12, 12), 255);
    assert_eq!(avatar.alpha_at(0, 0), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_avatar_is_an_input_error() {
    let err = load_avatar(Path::new("/no/such/avatar.png"), 16).unwrap_err();
    assert!(matches!(err, GlassError::Input(_)));
}

#[test]
fn png_round_trip_unpremultiplies() {
    let tmp = temp_dir("raster_png");
    let mut img = PremulImage::transparent(2, 1);
    img.data = vec![100, 50, 25, 128, 0, 0, 0, 0];
    let path = tmp.join("out/overlay.png");
    img.save_png(&path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    let px = back.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 199).abs() <= 2);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn gradient_interpolates_rows() {
    let g = vertical_gradient(1, 3, Rgba8::opaque(0, 0, 0), Rgba8::opaque(200, 100, 0));
    assert_eq!(&g.data[0..4], &[0, 0, 0, 255]);
    assert_eq!(&g.data[4..8], &[100, 50, 0, 255]);
    assert_eq!(&g.data[8..12], &[200, 100, 0, 255]);
}

#[test]
fn paint_rejects_oversized_images() {
    let img = PremulImage {
        width: 70_000,
        height: 1,
        data: Vec::new(),
    };
    assert!(img.to_paint().is_err());
}
