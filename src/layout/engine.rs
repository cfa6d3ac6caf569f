use crate::card::model::{CardContent, RenderOptions};
use crate::card::style::GlassPanelStyle;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::GlassResult;
use crate::geometry::measure::{FontWeight, TextMeasure};
use crate::geometry::wrap::{ellipsize, widest_line, wrap_text};
use crate::layout::aspect::AspectClass;

/// Smallest message font the shrink loop may reach.
pub const MIN_FONT_PX: f32 = 14.0;
/// Hard cap on shrink iterations.
pub const MAX_SHRINK_ITERATIONS: u32 = 30;
/// Per-iteration font multiplier.
pub const SHRINK_FACTOR: f32 = 0.94;
/// Panel width all other sizes are calibrated against.
pub const REFERENCE_WIDTH: f64 = 900.0;
/// Message font at the reference width before boosts.
pub const BASE_FONT_PX: f64 = 32.0;
pub const LINE_HEIGHT_RATIO: f32 = 1.45;

/// Layout failures. Only raised when the message cannot fit at [`MIN_FONT_PX`].
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum LayoutError {
    #[error(
        "message needs {required_px:.0}px of height at {min_font_px}px but only {available_px:.0}px is available"
    )]
    TextTooLong {
        min_font_px: f32,
        required_px: f32,
        available_px: f32,
    },
}

/// Reference points in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Anchors {
    pub avatar_center: Point,
    pub name_baseline: Point,
    pub handle_baseline: Point,
    pub first_text_baseline: Point,
    pub stats_baseline: Point,
}

/// Resolved card geometry. Computed fresh per render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutResult {
    pub canvas: Canvas,
    pub aspect: AspectClass,
    /// Panel rectangle, centred on the canvas.
    pub container: Rect,
    pub container_width: f64,
    pub container_height: f64,
    pub overlay_max_height: f64,
    pub scale: f64,
    pub padding: f64,
    pub corner_radius: f64,
    pub avatar_diameter: f64,
    pub initial_font_size_px: f32,
    pub font_size_px: f32,
    pub name_font_px: f32,
    pub handle_font_px: f32,
    pub line_height_px: f32,
    pub wrapped_lines: Vec<String>,
    pub text_height: f32,
    pub available_text_height: f32,
    pub shrink_iterations: u32,
    /// Display name, ellipsized to the header width.
    pub name_label: String,
    /// `@handle · timestamp`, ellipsized to the header width.
    pub handle_label: String,
    /// Horizontal offset of the verified badge from the name anchor, when present.
    pub badge_offset: Option<f64>,
    pub stat_icon_size: f64,
    /// Left edge of each of the four stat columns.
    pub stat_columns: [f64; 4],
    pub anchors: Anchors,
}

/// Region sizes derived from the layout scale.
#[derive(Clone, Copy, Debug)]
struct Regions {
    padding: f64,
    avatar: f64,
    header_height: f64,
    stats_height: f64,
}

impl Regions {
    fn at_scale(scale: f64) -> Self {
        let avatar = 96.0 * scale;
        Self {
            padding: 48.0 * scale,
            avatar,
            header_height: avatar + 32.0 * scale,
            stats_height: 88.0 * scale,
        }
    }

    fn chrome_height(&self) -> f64 {
        2.0 * self.padding + self.header_height + self.stats_height
    }
}

struct Fit {
    font: f32,
    lines: Vec<String>,
    iterations: u32,
}

/// Two-pass card layout: shrink the font until the message fits the panel height, then
/// shrink-wrap the panel width and re-wrap against it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the canvas from `options` and lay the card out on it.
    pub fn compute_layout(
        &self,
        content: &CardContent,
        options: &RenderOptions,
        style: &GlassPanelStyle,
        measure: &mut dyn TextMeasure,
    ) -> GlassResult<LayoutResult> {
        let canvas = options.resolve_dimensions()?;
        Ok(self.layout_on(canvas, content, style, measure)?)
    }

    pub fn layout_on(
        &self,
        canvas: Canvas,
        content: &CardContent,
        style: &GlassPanelStyle,
        measure: &mut dyn TextMeasure,
    ) -> Result<LayoutResult, LayoutError> {
        let aspect = AspectClass::classify(canvas);
        let profile = aspect.profile();
        let (overlay_width, overlay_max_height) = profile.panel_bounds(canvas);
        let scale = overlay_width / REFERENCE_WIDTH;
        let regions = Regions::at_scale(scale);

        let initial_font = initial_font_size(scale, profile.font_boost, content.message_chars());
        let available = (overlay_max_height - regions.chrome_height()).max(0.0) as f32;
        let max_text_width = (overlay_width - 2.0 * regions.padding) as f32;

        let fit = shrink_to_fit(
            &content.message_text,
            initial_font,
            max_text_width,
            available,
            measure,
        )?;
        tracing::debug!(
            ?aspect,
            initial_font,
            font = fit.font,
            iterations = fit.iterations,
            lines = fit.lines.len(),
            "message fitted"
        );

        let font = fit.font;
        let name_font = font * 1.05;
        let handle_font = font * 0.85;
        let name_gap = 16.0 * scale;
        let badge_size = f64::from(name_font) * 0.9;
        let header_text_max =
            (overlay_width - 2.0 * regions.padding - regions.avatar - name_gap).max(0.0);

        let badge_room = if content.verified {
            badge_size + 8.0 * scale
        } else {
            0.0
        };
        let name_label = ellipsize(
            content.display_name.trim(),
            (header_text_max - badge_room).max(0.0) as f32,
            name_font,
            FontWeight::Bold,
            measure,
        );
        let handle_label = ellipsize(
            &handle_line(content),
            header_text_max as f32,
            handle_font,
            FontWeight::Regular,
            measure,
        );
        let name_w = f64::from(measure.measure_width(&name_label, name_font, FontWeight::Bold));
        let handle_w =
            f64::from(measure.measure_width(&handle_label, handle_font, FontWeight::Regular));
        let header_width = regions.avatar + name_gap + (name_w + badge_room).max(handle_w);

        // Second pass: shrink-wrap the width, then re-wrap against it.
        let widest = f64::from(widest_line(&fit.lines, font, FontWeight::Regular, measure));
        let container_width = (header_width.max(widest) + 2.0 * regions.padding)
            .max(320.0 * scale)
            .min(overlay_width);
        // Slack absorbs f32/f64 round trips on the widest line.
        let final_text_width = (container_width - 2.0 * regions.padding) as f32 + 0.01;
        let rewrapped = wrap_text(
            &content.message_text,
            final_text_width,
            font,
            FontWeight::Regular,
            measure,
        );
        let lines = if rewrapped.len() <= fit.lines.len() {
            rewrapped
        } else {
            fit.lines
        };

        let line_height = font * LINE_HEIGHT_RATIO;
        let text_height = lines.len() as f32 * line_height;
        let container_height = (regions.chrome_height() + f64::from(text_height))
            .min(overlay_max_height);

        let x0 = (f64::from(canvas.width) - container_width) / 2.0;
        let y0 = (f64::from(canvas.height) - container_height) / 2.0;
        let container = Rect::new(x0, y0, x0 + container_width, y0 + container_height);

        let inner_left = x0 + regions.padding;
        let avatar_r = regions.avatar / 2.0;
        let avatar_center = Point::new(inner_left + avatar_r, y0 + regions.padding + avatar_r);
        let text_x = inner_left + regions.avatar + name_gap;
        let text_top = y0 + regions.padding + regions.header_height;
        let anchors = Anchors {
            avatar_center,
            name_baseline: Point::new(text_x, avatar_center.y - 4.0 * scale),
            handle_baseline: Point::new(
                text_x,
                avatar_center.y + f64::from(handle_font) + 4.0 * scale,
            ),
            first_text_baseline: Point::new(inner_left, text_top + f64::from(font)),
            stats_baseline: Point::new(
                inner_left,
                y0 + container_height - regions.padding - 20.0 * scale,
            ),
        };

        let column = (container_width - 2.0 * regions.padding) / 4.0;
        let stat_columns = [0.0, 1.0, 2.0, 3.0].map(|i| inner_left + i * column);

        Ok(LayoutResult {
            canvas,
            aspect,
            container,
            container_width,
            container_height,
            overlay_max_height,
            scale,
            padding: regions.padding,
            corner_radius: style.scaled_corner_radius(scale),
            avatar_diameter: regions.avatar,
            initial_font_size_px: initial_font,
            font_size_px: font,
            name_font_px: name_font,
            handle_font_px: handle_font,
            line_height_px: line_height,
            wrapped_lines: lines,
            text_height,
            available_text_height: available,
            shrink_iterations: fit.iterations,
            name_label,
            handle_label,
            badge_offset: content.verified.then_some(name_w + 8.0 * scale),
            stat_icon_size: 28.0 * scale,
            stat_columns,
            anchors,
        })
    }
}

/// Starting message font for a panel of the given scale and boost.
pub fn initial_font_size(scale: f64, font_boost: f64, message_chars: usize) -> f32 {
    let band = if message_chars > 200 {
        0.9
    } else if message_chars > 100 {
        0.95
    } else if message_chars < 50 {
        1.1
    } else {
        1.0
    };
    ((BASE_FONT_PX * scale * font_boost * band) as f32).max(MIN_FONT_PX)
}

fn handle_line(content: &CardContent) -> String {
    let handle = content.handle_label();
    let ts = content.timestamp.trim();
    if ts.is_empty() {
        handle
    } else {
        format!("{handle} · {ts}")
    }
}

fn attempt(
    text: &str,
    font: f32,
    max_width: f32,
    measure: &mut dyn TextMeasure,
) -> (Vec<String>, f32) {
    let lines = wrap_text(text, max_width, font, FontWeight::Regular, measure);
    let height = lines.len() as f32 * font * LINE_HEIGHT_RATIO;
    (lines, height)
}

fn shrink_to_fit(
    text: &str,
    initial_font: f32,
    max_width: f32,
    available: f32,
    measure: &mut dyn TextMeasure,
) -> Result<Fit, LayoutError> {
    let too_long = |required_px: f32| LayoutError::TextTooLong {
        min_font_px: MIN_FONT_PX,
        required_px,
        available_px: available,
    };

    let mut font = initial_font;
    for iterations in 1..=MAX_SHRINK_ITERATIONS {
        let (lines, height) = attempt(text, font, max_width, measure);
        if height <= available {
            return Ok(Fit {
                font,
                lines,
                iterations,
            });
        }
        if font <= MIN_FONT_PX {
            return Err(too_long(height));
        }
        font = (font * SHRINK_FACTOR).max(MIN_FONT_PX);
    }

    // Cap exhausted before the floor was tried.
    let (lines, height) = attempt(text, MIN_FONT_PX, max_width, measure);
    if height <= available {
        Ok(Fit {
            font: MIN_FONT_PX,
            lines,
            iterations: MAX_SHRINK_ITERATIONS,
        })
    } else {
        Err(too_long(height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
