use std::path::PathBuf;

use crate::foundation::core::{Canvas, MAX_CANVAS_EDGE, MIN_CANVAS_EDGE};
use crate::foundation::error::{GlassError, GlassResult};

/// Longest accepted message, in Unicode scalar values.
pub const MAX_MESSAGE_CHARS: usize = 280;
/// Edge used when neither dimension is supplied.
pub const DEFAULT_EDGE: u32 = 1080;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Engagement counters. A `None` counter is drawn as a bare icon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Counters {
    pub replies: Option<u64>,
    pub retweets: Option<u64>,
    pub likes: Option<u64>,
    pub views: Option<u64>,
}

impl Counters {
    /// Counters in drawing order.
    pub fn in_order(&self) -> [Option<u64>; 4] {
        [self.replies, self.retweets, self.likes, self.views]
    }
}

/// Tweet-like content for a single card. Immutable once received.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardContent {
    pub display_name: String,
    pub handle: String,
    pub message_text: String,
    #[serde(default)]
    pub timestamp: String,
    /// Local path to a raster or SVG avatar.
    #[serde(default)]
    pub avatar: Option<PathBuf>,
    #[serde(default)]
    pub counters: Counters,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl CardContent {
    /// Handle with a single leading `@`.
    pub fn handle_label(&self) -> String {
        let h = self.handle.trim().trim_start_matches('@');
        format!("@{h}")
    }

    /// Uppercased first letter of the display name, used by the avatar placeholder.
    pub fn initial(&self) -> char {
        self.display_name
            .chars()
            .find(|c| c.is_alphanumeric())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }

    pub fn message_chars(&self) -> usize {
        self.message_text.chars().count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl QualityTier {
    /// Multiplier applied to the clip duration when bounding encoder wall-clock time.
    pub fn timeout_multiplier(self) -> u64 {
        match self {
            Self::Low => 2,
            Self::Medium => 4,
            Self::High => 8,
            Self::Ultra => 12,
        }
    }

    pub fn wants_sharpening(self) -> bool {
        matches!(self, Self::High | Self::Ultra)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    #[default]
    #[serde(alias = "glass")]
    Glassmorphism,
    Solid,
    Gradient,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    #[default]
    Fade,
    Slide,
    Zoom,
    None,
}

/// Output options, already merged with defaults at ingress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    /// `"W:H"`, used to derive a missing dimension.
    pub aspect_ratio_hint: Option<String>,
    pub quality: QualityTier,
    pub overlay_style: OverlayStyle,
    pub animation: Animation,
    /// Background blur sigma, `0..=20`.
    pub overlay_blur_radius: f32,
    /// Panel opacity, `0..=1`.
    pub overlay_opacity: f32,
    pub background_playback_rate: f64,
    /// Output length for video renders, `5..=60`.
    pub duration_seconds: f64,
    pub fps: u32,
    /// Explicit background clip or image; bypasses classification.
    pub background: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_width: None,
            target_height: None,
            aspect_ratio_hint: None,
            quality: QualityTier::default(),
            overlay_style: OverlayStyle::default(),
            animation: Animation::default(),
            overlay_blur_radius: 0.0,
            overlay_opacity: 0.85,
            background_playback_rate: 1.0,
            duration_seconds: 10.0,
            fps: 30,
            background: None,
        }
    }
}

/// Parse a `"W:H"` hint into positive components.
pub fn parse_aspect_hint(hint: &str) -> Option<(f64, f64)> {
    let (w, h) = hint.trim().split_once(':')?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w, h))
}

fn clamp_edge(v: f64) -> u32 {
    (v.round() as i64).clamp(i64::from(MIN_CANVAS_EDGE), i64::from(MAX_CANVAS_EDGE)) as u32
}

impl RenderOptions {
    /// Resolve the output canvas from explicit dimensions and the aspect hint.
    ///
    /// A single missing dimension is derived from the hint (or mirrored when there is no
    /// hint). With neither dimension the hint is applied to a 1080 px width. Results are
    /// clamped to `100..=4096`.
    pub fn resolve_dimensions(&self) -> GlassResult<Canvas> {
        let hint = self.aspect_ratio_hint.as_deref().and_then(parse_aspect_hint);
        if self.aspect_ratio_hint.is_some() && hint.is_none() {
            tracing::warn!(hint = ?self.aspect_ratio_hint, "ignoring malformed aspect ratio hint");
        }

        let (w, h) = match (self.target_width, self.target_height, hint) {
            (Some(w), Some(h), _) => (f64::from(w), f64::from(h)),
            (Some(w), None, Some((hw, hh))) => (f64::from(w), f64::from(w) * hh / hw),
            (None, Some(h), Some((hw, hh))) => (f64::from(h) * hw / hh, f64::from(h)),
            (Some(w), None, None) => (f64::from(w), f64::from(w)),
            (None, Some(h), None) => (f64::from(h), f64::from(h)),
            (None, None, Some((hw, hh))) => {
                let w = f64::from(DEFAULT_EDGE);
                (w, w * hh / hw)
            }
            (None, None, None) => (f64::from(DEFAULT_EDGE), f64::from(DEFAULT_EDGE)),
        };

        Canvas::new(clamp_edge(w), clamp_edge(h))
    }

    /// Ingress-side range checks. The composition core itself assumes validated options.
    pub fn validate(&self) -> GlassResult<()> {
        for (name, v) in [("target_width", self.target_width), ("target_height", self.target_height)] {
            if let Some(v) = v
                && !(MIN_CANVAS_EDGE..=MAX_CANVAS_EDGE).contains(&v)
            {
                return Err(GlassError::validation(format!(
                    "{name} {v} outside {MIN_CANVAS_EDGE}..={MAX_CANVAS_EDGE}"
                )));
            }
        }
        if !(0.0..=20.0).contains(&self.overlay_blur_radius) {
            return Err(GlassError::validation("overlay_blur_radius must be in 0..=20"));
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(GlassError::validation("overlay_opacity must be in 0..=1"));
        }
        if !self.background_playback_rate.is_finite() || self.background_playback_rate <= 0.0 {
            return Err(GlassError::validation("background_playback_rate must be > 0"));
        }
        if !(5.0..=60.0).contains(&self.duration_seconds) {
            return Err(GlassError::validation("duration_seconds must be in 5..=60"));
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(GlassError::validation("fps must be in 1..=120"));
        }
        Ok(())
    }
}

impl CardContent {
    pub fn validate(&self) -> GlassResult<()> {
        if self.message_chars() > MAX_MESSAGE_CHARS {
            return Err(GlassError::validation(format!(
                "message_text exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(GlassError::validation("display_name must be non-empty"));
        }
        Ok(())
    }
}

/// A validated `(CardContent, RenderOptions)` pair with its correlation id.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    pub request_id: String,
    pub content: CardContent,
    #[serde(default)]
    pub options: RenderOptions,
}

#[cfg(test)]
#[path = "../../tests/unit/card/model.rs"]
mod tests;
