use crate::card::format::format_count;
use crate::card::model::{CardContent, OverlayStyle, RenderOptions};
use crate::card::style::GlassPanelStyle;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{GlassError, GlassResult};
use crate::geometry::measure::{FixedAdvanceMeasure, FontWeight, TextMeasure};
use crate::geometry::shapes::{
    affine_to_cpu, bezpath_to_cpu, circle_path, rect_to_cpu, rounded_rect_path, stroke_outline,
};
use crate::layout::engine::{LayoutEngine, LayoutResult};
use crate::render::context::{IconSet, RenderingContext};
use crate::render::raster::{PremulImage, load_avatar, vertical_gradient};
use crate::render::text::TextShaper;

/// Glass fill alpha relative to the configured opacity.
const GLASS_FILL_FACTOR: f32 = 0.55;
const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

/// A rendered overlay: the full-canvas transparent layer plus the geometry it was drawn from.
#[derive(Clone, Debug)]
pub struct RenderedOverlay {
    pub layout: LayoutResult,
    pub image: PremulImage,
}

/// Paints the card onto a transparent canvas-sized surface.
#[derive(Clone, Copy, Debug)]
pub struct OverlayRenderer<'a> {
    context: &'a RenderingContext,
}

impl<'a> OverlayRenderer<'a> {
    pub fn new(context: &'a RenderingContext) -> Self {
        Self { context }
    }

    /// Resolve the canvas from `options`, lay the card out and paint it.
    pub fn render(
        &self,
        content: &CardContent,
        options: &RenderOptions,
    ) -> GlassResult<RenderedOverlay> {
        let canvas = options.resolve_dimensions()?;
        self.render_on(canvas, content, options)
    }

    pub fn render_on(
        &self,
        canvas: Canvas,
        content: &CardContent,
        options: &RenderOptions,
    ) -> GlassResult<RenderedOverlay> {
        let style = GlassPanelStyle::derive(content.theme, options);
        let mut shaper = self.context.shaper();

        let layout = {
            let mut fixed = FixedAdvanceMeasure::default();
            let measure: &mut dyn TextMeasure = match shaper.as_mut() {
                Some(s) => s,
                None => &mut fixed,
            };
            LayoutEngine::new().layout_on(canvas, content, &style, measure)?
        };

        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| GlassError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| GlassError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut painter = Painter {
            ctx: &mut ctx,
            shaper: shaper.as_mut(),
            icons: self.context.icons(),
            layout: &layout,
            style: &style,
        };
        painter.panel(options.overlay_style)?;
        painter.avatar(content)?;
        painter.header();
        painter.message();
        painter.stats(content);

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            style = ?options.overlay_style,
            lines = layout.wrapped_lines.len(),
            font_px = layout.font_size_px,
            "overlay rendered"
        );

        Ok(RenderedOverlay {
            image: PremulImage {
                width: canvas.width,
                height: canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
            },
            layout,
        })
    }
}

struct Painter<'p> {
    ctx: &'p mut vello_cpu::RenderContext,
    shaper: Option<&'p mut TextShaper>,
    icons: &'p IconSet,
    layout: &'p LayoutResult,
    style: &'p GlassPanelStyle,
}

impl Painter<'_> {
    fn fill(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn text(&mut self, text: &str, size: f32, weight: FontWeight, color: Rgba8, origin: Point) {
        if let Some(shaper) = self.shaper.as_deref_mut() {
            shaper.draw_line(self.ctx, text, size, weight, color, origin);
        }
    }

    fn panel(&mut self, kind: OverlayStyle) -> GlassResult<()> {
        let l = self.layout;
        let panel = rounded_rect_path(l.container, l.corner_radius);
        let op = self.style.opacity;

        if kind != OverlayStyle::Solid {
            self.shadow();
        }

        match kind {
            OverlayStyle::Glassmorphism => {
                let fill = self.style.background_color.with_opacity(op * GLASS_FILL_FACTOR);
                self.fill(&panel, Affine::IDENTITY, fill);
            }
            OverlayStyle::Solid => {
                self.fill(&panel, Affine::IDENTITY, self.style.background_color.with_opacity(op));
            }
            OverlayStyle::Gradient => {
                let (w, h) = (l.container.width(), l.container.height());
                let gradient = vertical_gradient(
                    w.ceil().max(1.0) as u32,
                    h.ceil().max(1.0) as u32,
                    self.style.background_color.with_opacity(op),
                    self.style.gradient_end_color.with_opacity(op),
                );
                let local = rounded_rect_path(Rect::new(0.0, 0.0, w, h), l.corner_radius);
                self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                self.ctx.set_transform(affine_to_cpu(Affine::translate((
                    l.container.x0,
                    l.container.y0,
                ))));
                self.ctx.set_paint(gradient.to_paint()?);
                self.ctx.fill_path(&bezpath_to_cpu(&local));
            }
        }

        if kind != OverlayStyle::Solid {
            let width = (1.5 * l.scale).max(1.0);
            let inset = l.container.inset(-width / 2.0);
            let border = stroke_outline(&rounded_rect_path(inset, l.corner_radius), width);
            self.fill(&border, Affine::IDENTITY, self.style.border_color);
        }
        Ok(())
    }

    /// Soft drop shadow approximated by stacked, expanding translucent panels.
    fn shadow(&mut self) {
        let l = self.layout;
        let offset = 12.0 * l.scale;
        for step in 1..=4 {
            let grow = f64::from(step) * 6.0 * l.scale;
            let rect = l.container.inflate(grow, grow) + Vec2::new(0.0, offset);
            let path = rounded_rect_path(rect, l.corner_radius + grow);
            let alpha = (self.style.opacity * 14.0 / step as f32).round() as u8;
            self.fill(&path, Affine::IDENTITY, Rgba8::new(0, 0, 0, alpha));
        }
    }

    fn avatar(&mut self, content: &CardContent) -> GlassResult<()> {
        let l = self.layout;
        let d = l.avatar_diameter;
        let center = l.anchors.avatar_center;

        let loaded = content.avatar.as_deref().and_then(|path| {
            match load_avatar(path, d.round().max(1.0) as u32) {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "avatar unavailable; drawing placeholder");
                    None
                }
            }
        });

        match loaded {
            Some(img) => {
                let origin = Affine::translate((center.x - d / 2.0, center.y - d / 2.0));
                self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                self.ctx.set_transform(affine_to_cpu(origin));
                self.ctx.set_paint(img.to_paint()?);
                self.ctx.fill_rect(&rect_to_cpu(Rect::new(
                    0.0,
                    0.0,
                    f64::from(img.width),
                    f64::from(img.height),
                )));
            }
            None => {
                self.fill(&circle_path(center, d / 2.0), Affine::IDENTITY, self.style.accent_color);
                let initial = content.initial().to_string();
                let size = (d * 0.45) as f32;
                let advance = self
                    .shaper
                    .as_deref_mut()
                    .map_or(0.0, |s| s.measure_width(&initial, size, FontWeight::Bold));
                let origin = Point::new(
                    center.x - f64::from(advance) / 2.0,
                    center.y + f64::from(size) * 0.35,
                );
                self.text(&initial, size, FontWeight::Bold, WHITE, origin);
            }
        }
        Ok(())
    }

    fn header(&mut self) {
        let l = self.layout;
        let a = l.anchors;
        self.text(&l.name_label, l.name_font_px, FontWeight::Bold, self.style.text_color, a.name_baseline);

        if let Some(offset) = l.badge_offset {
            let size = f64::from(l.name_font_px) * 0.9;
            let left = a.name_baseline.x + offset;
            let top = a.name_baseline.y - f64::from(l.name_font_px) * 0.35 - size / 2.0;
            let center = Point::new(left + size / 2.0, top + size / 2.0);
            self.fill(&circle_path(center, size / 2.0), Affine::IDENTITY, self.style.accent_color);

            let k = size / IconSet::VIEWBOX;
            let check = stroke_outline(&self.icons.check, 2.5);
            let place = Affine::translate((left, top)) * Affine::scale(k);
            self.fill(&check, place, WHITE);
        }

        self.text(
            &l.handle_label,
            l.handle_font_px,
            FontWeight::Regular,
            self.style.secondary_text_color,
            a.handle_baseline,
        );
    }

    fn message(&mut self) {
        let l = self.layout;
        let first = l.anchors.first_text_baseline;
        for (i, line) in l.wrapped_lines.iter().enumerate() {
            let origin = Point::new(first.x, first.y + i as f64 * f64::from(l.line_height_px));
            self.text(line, l.font_size_px, FontWeight::Regular, self.style.text_color, origin);
        }
    }

    fn stats(&mut self, content: &CardContent) {
        let l = self.layout;
        let base = l.anchors.stats_baseline.y;
        let icon = l.stat_icon_size;
        let k = icon / IconSet::VIEWBOX;
        let color = self.style.secondary_text_color;
        let icons = self.icons;

        for (i, count) in content.counters.in_order().into_iter().enumerate() {
            let x = l.stat_columns[i];
            let place = Affine::translate((x, base - icon * 0.8)) * Affine::scale(k);
            self.fill(&icons.stats[i], place, color);

            if let Some(n) = count {
                let origin = Point::new(x + icon + 8.0 * l.scale, base);
                self.text(&format_count(n), l.handle_font_px, FontWeight::Regular, color, origin);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
