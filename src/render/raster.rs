use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Row-major premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PremulImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PremulImage {
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn canvas(&self) -> GlassResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Alpha of the pixel at `(x, y)`, or 0 outside the image.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y as usize * self.width as usize + x as usize) * 4 + 3]
    }

    /// Image paint for `vello_cpu`.
    pub(crate) fn to_paint(&self) -> GlassResult<vello_cpu::Image> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| GlassError::render("image width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| GlassError::render("image height exceeds u16"))?;
        if self.data.len() != self.width as usize * self.height as usize * 4 {
            return Err(GlassError::render("image byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let pixels = self
            .data
            .chunks_exact(4)
            .map(|px| {
                may_have_opacities |= px[3] != 255;
                vello_cpu::peniko::color::PremulRgba8 {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
            })
            .collect::<Vec<_>>();
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Write a straight-alpha PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> GlassResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Decode a raster image and scale it to cover `width x height`, centre-cropping the excess.
pub fn load_cover(path: &Path, width: u32, height: u32) -> GlassResult<PremulImage> {
    if is_svg(path) {
        return rasterize_svg_cover(path, width, height);
    }
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    let mut data = decoded
        .resize_to_fill(width, height, image::imageops::FilterType::Triangle)
        .to_rgba8()
        .into_raw();
    premultiply_rgba8_in_place(&mut data);
    Ok(PremulImage {
        width,
        height,
        data,
    })
}

fn rasterize_svg_cover(path: &Path, width: u32, height: u32) -> GlassResult<PremulImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
        .with_context(|| format!("parse svg '{}'", path.display()))?;
    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(GlassError::input("svg has an empty view box"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GlassError::render("failed to allocate svg pixmap"))?;
    let scale = (width as f32 / size.width()).max(height as f32 / size.height());
    let tx = (width as f32 - size.width() * scale) / 2.0;
    let ty = (height as f32 - size.height() * scale) / 2.0;
    let xform = resvg::tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    Ok(PremulImage {
        width,
        height,
        data: pixmap.data().to_vec(),
    })
}

/// Square avatar of `diameter` pixels with an anti-aliased circular mask.
pub fn load_avatar(path: &Path, diameter: u32) -> GlassResult<PremulImage> {
    let diameter = diameter.max(1);
    let mut img = load_cover(path, diameter, diameter)
        .map_err(|e| GlassError::input(format!("avatar '{}': {e}", path.display())))?;
    apply_circle_mask(&mut img);
    Ok(img)
}

/// Multiply every pixel by its coverage of the inscribed circle.
pub fn apply_circle_mask(img: &mut PremulImage) {
    let cx = f64::from(img.width) / 2.0;
    let cy = f64::from(img.height) / 2.0;
    let r = cx.min(cy);
    let w = img.width as usize;
    for (i, px) in img.data.chunks_exact_mut(4).enumerate() {
        let x = (i % w) as f64 + 0.5;
        let y = (i / w) as f64 + 0.5;
        let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
        if coverage >= 1.0 {
            continue;
        }
        for c in px.iter_mut() {
            *c = (f64::from(*c) * coverage).round() as u8;
        }
    }
}

/// Top-to-bottom two-stop gradient.
pub fn vertical_gradient(width: u32, height: u32, top: Rgba8, bottom: Rgba8) -> PremulImage {
    let mut img = PremulImage::transparent(width, height);
    let row_len = width as usize * 4;
    let denom = height.saturating_sub(1).max(1) as f32;
    for (y, row) in img.data.chunks_exact_mut(row_len.max(1)).enumerate() {
        let px = top.lerp(bottom, y as f32 / denom).to_premul();
        for dst in row.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }
    img
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
