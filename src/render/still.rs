use std::path::Path;

use crate::card::style::GlassPanelStyle;
use crate::foundation::core::Canvas;
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u16};
use crate::render::blur::gaussian_blur_premul;
use crate::render::raster::{PremulImage, load_cover, vertical_gradient};

pub type PremulRgba8 = [u8; 4];

const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "svg"];

/// Source-over for one premultiplied pixel with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u16(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), op);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> GlassResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GlassError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Whether `path` names an image the still path can decode directly.
pub fn is_still_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| STILL_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Opaque backdrop for a still card.
///
/// A decodable background image is cover-scaled, centre-cropped and blurred with
/// `blur_sigma`. Anything else (no path, a video clip, a decode failure) yields the theme
/// gradient.
pub fn backdrop(
    canvas: Canvas,
    background: Option<&Path>,
    style: &GlassPanelStyle,
    blur_sigma: f32,
) -> GlassResult<PremulImage> {
    if let Some(path) = background.filter(|p| is_still_image(p)) {
        match load_cover(path, canvas.width, canvas.height) {
            Ok(mut img) => {
                if blur_sigma > 0.0 {
                    img.data = gaussian_blur_premul(&img.data, img.width, img.height, blur_sigma)?;
                }
                flatten(&mut img);
                return Ok(img);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "still background unusable; using gradient");
            }
        }
    }
    Ok(vertical_gradient(
        canvas.width,
        canvas.height,
        style.accent_color,
        style.gradient_end_color,
    ))
}

/// Composite `overlay` over `backdrop` and force the result opaque.
pub fn compose_still(backdrop: &PremulImage, overlay: &PremulImage) -> GlassResult<PremulImage> {
    if (backdrop.width, backdrop.height) != (overlay.width, overlay.height) {
        return Err(GlassError::render(format!(
            "backdrop {}x{} does not match overlay {}x{}",
            backdrop.width, backdrop.height, overlay.width, overlay.height
        )));
    }
    let mut out = backdrop.clone();
    over_in_place(&mut out.data, &overlay.data, 1.0)?;
    flatten(&mut out);
    Ok(out)
}

/// Composite over black wherever coverage is partial.
fn flatten(img: &mut PremulImage) {
    for px in img.data.chunks_exact_mut(4) {
        px[3] = 255;
    }
}
