use crate::foundation::core::Canvas;

/// Ratio tolerance when matching a named aspect.
pub const RATIO_TOLERANCE: f64 = 0.05;
/// `height / width` above which an unnamed ratio counts as vertical.
pub const VERTICAL_THRESHOLD: f64 = 1.2;
/// Golden ratio cap applied to the panel height of vertical-leaning canvases.
pub const GOLDEN_RATIO: f64 = 1.618;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectClass {
    Square,
    Portrait4x5,
    Portrait3x4,
    Story9x16,
    Vertical,
    Horizontal,
}

/// Fixed calibration constants for one aspect class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectProfile {
    /// Panel width as a fraction of canvas width.
    pub overlay_width_frac: f64,
    /// Panel max height as a fraction of canvas height.
    pub max_height_frac: f64,
    /// Also cap the panel height at `overlay_width * GOLDEN_RATIO`.
    pub golden_cap: bool,
    pub font_boost: f64,
}

const NAMED: [(AspectClass, f64); 4] = [
    (AspectClass::Square, 1.0),
    (AspectClass::Portrait4x5, 0.8),
    (AspectClass::Portrait3x4, 0.75),
    (AspectClass::Story9x16, 9.0 / 16.0),
];

impl AspectClass {
    /// Classify a canvas by its `width / height` ratio.
    ///
    /// Named ratios match within [`RATIO_TOLERANCE`]; when two named ratios are both in
    /// range (4:5 and 3:4 sit 0.05 apart) the nearer one wins.
    pub fn classify(canvas: Canvas) -> Self {
        let ratio = canvas.ratio();
        let named = NAMED
            .iter()
            .map(|&(class, target)| (class, (ratio - target).abs()))
            .filter(|&(_, d)| d <= RATIO_TOLERANCE + 1e-9)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| class);

        match named {
            Some(class) => class,
            None if 1.0 / ratio > VERTICAL_THRESHOLD => Self::Vertical,
            None => Self::Horizontal,
        }
    }

    pub fn profile(self) -> AspectProfile {
        let (overlay_width_frac, max_height_frac, golden_cap, font_boost) = match self {
            Self::Square => (0.85, 0.85, false, 1.6),
            Self::Portrait4x5 => (0.8, 0.6, true, 1.6),
            Self::Portrait3x4 => (0.8, 0.6, true, 1.55),
            Self::Story9x16 => (0.75, 0.6, true, 1.7),
            Self::Vertical => (0.75, 0.6, true, 1.6),
            Self::Horizontal => (0.7, 0.8, false, 1.2),
        };
        AspectProfile {
            overlay_width_frac,
            max_height_frac,
            golden_cap,
            font_boost,
        }
    }

    pub fn is_vertical_leaning(self) -> bool {
        self.profile().golden_cap
    }
}

impl AspectProfile {
    /// `(overlay_width, overlay_max_height)` in pixels for `canvas`.
    pub fn panel_bounds(&self, canvas: Canvas) -> (f64, f64) {
        let w = f64::from(canvas.width) * self.overlay_width_frac;
        let mut h = f64::from(canvas.height) * self.max_height_frac;
        if self.golden_cap {
            h = h.min(w * GOLDEN_RATIO);
        }
        (w, h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/aspect.rs"]
mod tests;
