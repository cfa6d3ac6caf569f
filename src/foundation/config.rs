use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{GlassError, GlassResult};

/// Runtime configuration shared by every render in a process.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root holding one sub-directory of clips per category (`tech/`, `nature/`, ...).
    pub backgrounds_dir: PathBuf,
    /// Directories searched for `.ttf`/`.otf` files at startup.
    pub font_dirs: Vec<PathBuf>,
    /// Fall back to installed system fonts when `font_dirs` holds none.
    pub system_fonts: bool,
    /// Refuse to start without a font face. When off, text is measured with a fixed advance
    /// and not drawn.
    pub require_fonts: bool,
    /// Where temporary overlay rasters are written.
    pub temp_dir: PathBuf,
    /// Where encoded outputs land before they are handed to the media store.
    pub output_dir: PathBuf,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    /// Prefer the hardware encoder. Only honoured when built with the `gpu` feature.
    pub use_gpu: bool,
    /// Upper bound on `width * height` for a single render.
    pub max_canvas_pixels: u64,
    /// Optional quota on the total size of `output_dir`.
    pub max_output_dir_bytes: Option<u64>,
    /// Fixed part of the encoder timeout, in seconds.
    pub timeout_base_secs: u64,
    /// Seed for background selection. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Probe encoded outputs with `ffprobe` (requires the `media-ffmpeg` feature).
    pub probe_outputs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir().join("glasscard");
        Self {
            backgrounds_dir: PathBuf::from("assets/backgrounds"),
            font_dirs: vec![PathBuf::from("assets/fonts"), PathBuf::from("fonts")],
            system_fonts: true,
            require_fonts: true,
            temp_dir: tmp.join("tmp"),
            output_dir: tmp.join("out"),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            use_gpu: false,
            max_canvas_pixels: 4096 * 4096,
            max_output_dir_bytes: None,
            timeout_base_secs: 30,
            rng_seed: None,
            probe_outputs: true,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_path(path: &Path) -> GlassResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Override fields from `GLASSCARD_*` environment variables.
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|k| std::env::var(k).ok());
        self
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("GLASSCARD_BACKGROUNDS_DIR") {
            self.backgrounds_dir = PathBuf::from(v);
        }
        if let Some(v) = get("GLASSCARD_FONT_DIRS") {
            self.font_dirs = std::env::split_paths(&v).collect();
        }
        if let Some(v) = get("GLASSCARD_TEMP_DIR") {
            self.temp_dir = PathBuf::from(v);
        }
        if let Some(v) = get("GLASSCARD_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("GLASSCARD_FFMPEG") {
            self.ffmpeg_bin = v;
        }
        if let Some(v) = get("GLASSCARD_FFPROBE") {
            self.ffprobe_bin = v;
        }
        if let Some(v) = get("GLASSCARD_USE_GPU") {
            self.use_gpu = truthy(&v);
        }
        if let Some(v) = get("GLASSCARD_SYSTEM_FONTS") {
            self.system_fonts = truthy(&v);
        }
        if let Some(v) = get("GLASSCARD_REQUIRE_FONTS") {
            self.require_fonts = truthy(&v);
        }
        if let Some(v) = get("GLASSCARD_TIMEOUT_BASE_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_base_secs = v;
        }
        if let Some(v) = get("GLASSCARD_RNG_SEED").and_then(|v| v.parse().ok()) {
            self.rng_seed = Some(v);
        }
        if let Some(v) = get("GLASSCARD_MAX_OUTPUT_DIR_BYTES").and_then(|v| v.parse().ok()) {
            self.max_output_dir_bytes = Some(v);
        }
    }

    pub fn validate(&self) -> GlassResult<()> {
        if self.ffmpeg_bin.trim().is_empty() {
            return Err(GlassError::validation("ffmpeg_bin must be non-empty"));
        }
        if self.ffprobe_bin.trim().is_empty() {
            return Err(GlassError::validation("ffprobe_bin must be non-empty"));
        }
        if self.max_canvas_pixels == 0 {
            return Err(GlassError::validation("max_canvas_pixels must be > 0"));
        }
        if self.timeout_base_secs == 0 {
            return Err(GlassError::validation("timeout_base_secs must be > 0"));
        }
        Ok(())
    }
}

fn truthy(v: &str) -> bool {
    matches!(v, "1" | "true" | "yes")
}
