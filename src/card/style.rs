use crate::card::model::{RenderOptions, Theme};
use crate::foundation::core::Rgba8;

/// Corner radius of the panel at the 900 px reference width.
pub const BASE_CORNER_RADIUS: f64 = 24.0;

/// Colours and geometry of the glass panel. A value type derived from theme plus options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassPanelStyle {
    pub background_color: Rgba8,
    pub border_color: Rgba8,
    pub text_color: Rgba8,
    pub secondary_text_color: Rgba8,
    /// Verified badge and placeholder avatar fill.
    pub accent_color: Rgba8,
    /// Second stop of the `gradient` overlay style.
    pub gradient_end_color: Rgba8,
    pub corner_radius: f64,
    pub blur_radius: f32,
    pub opacity: f32,
}

impl GlassPanelStyle {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background_color: Rgba8::opaque(255, 255, 255),
                border_color: Rgba8::new(255, 255, 255, 128),
                text_color: Rgba8::opaque(15, 20, 25),
                secondary_text_color: Rgba8::opaque(83, 100, 113),
                accent_color: Rgba8::opaque(29, 155, 240),
                gradient_end_color: Rgba8::opaque(226, 232, 240),
                corner_radius: BASE_CORNER_RADIUS,
                blur_radius: 0.0,
                opacity: 0.85,
            },
            Theme::Dark => Self {
                background_color: Rgba8::opaque(21, 32, 43),
                border_color: Rgba8::new(255, 255, 255, 46),
                text_color: Rgba8::opaque(231, 233, 234),
                secondary_text_color: Rgba8::opaque(139, 152, 165),
                accent_color: Rgba8::opaque(29, 155, 240),
                gradient_end_color: Rgba8::opaque(8, 12, 18),
                corner_radius: BASE_CORNER_RADIUS,
                blur_radius: 0.0,
                opacity: 0.85,
            },
        }
    }

    /// Theme defaults with the per-request blur and opacity overrides applied.
    pub fn derive(theme: Theme, options: &RenderOptions) -> Self {
        Self {
            blur_radius: options.overlay_blur_radius.clamp(0.0, 20.0),
            opacity: options.overlay_opacity.clamp(0.0, 1.0),
            ..Self::for_theme(theme)
        }
    }

    /// Corner radius for a panel of the given layout scale.
    pub fn scaled_corner_radius(&self, scale: f64) -> f64 {
        (self.corner_radius * scale).max(4.0)
    }
}
