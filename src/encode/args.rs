use crate::card::model::QualityTier;
use crate::foundation::config::PipelineConfig;
use crate::foundation::core::Canvas;

/// Pixel count the GPU bitrate ladder is calibrated for.
const REFERENCE_PIXELS: f64 = 1920.0 * 1080.0;

/// Which encoder a render uses. Exactly one is active per render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderPath {
    /// Software H.264 with constant rate factor.
    #[default]
    Libx264,
    /// NVIDIA hardware H.264 with an explicit bitrate ladder.
    Nvenc,
}

impl EncoderPath {
    /// Hardware encoding requires both the `gpu` feature and `use_gpu`.
    pub fn select(config: &PipelineConfig) -> Self {
        if cfg!(feature = "gpu") && config.use_gpu {
            Self::Nvenc
        } else {
            Self::Libx264
        }
    }
}

/// `libx264` preset for a tier.
pub fn cpu_preset(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Low => "ultrafast",
        QualityTier::Medium => "slow",
        QualityTier::High | QualityTier::Ultra => "veryslow",
    }
}

/// Constant rate factor for a tier. Lower is better quality.
pub fn cpu_crf(tier: QualityTier) -> u8 {
    match tier {
        QualityTier::Low => 25,
        QualityTier::Medium => 20,
        QualityTier::High => 16,
        QualityTier::Ultra => 12,
    }
}

/// NVENC bitrates in kbit/s: `(target, max, buffer)`.
pub fn gpu_bitrates(tier: QualityTier, canvas: Canvas) -> (u64, u64, u64) {
    let base: f64 = match tier {
        QualityTier::Low => 2_500.0,
        QualityTier::Medium => 5_000.0,
        QualityTier::High => 8_000.0,
        QualityTier::Ultra => 12_000.0,
    };
    let target = (base * canvas.pixel_count() as f64 / REFERENCE_PIXELS).round().max(1.0);
    (
        target as u64,
        (target * 1.5).round() as u64,
        (target * 2.0).round() as u64,
    )
}

fn nvenc_preset(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Low => "p2",
        QualityTier::Medium => "p4",
        QualityTier::High => "p6",
        QualityTier::Ultra => "p7",
    }
}

/// Codec, rate control and muxing arguments placed after `-map`.
pub fn encoder_args(path: EncoderPath, tier: QualityTier, canvas: Canvas, fps: u32) -> Vec<String> {
    let fps = fps.max(1);
    let mut args: Vec<String> = Vec::with_capacity(24);
    fn push(args: &mut Vec<String>, key: &str, value: impl Into<String>) {
        args.push(key.to_string());
        args.push(value.into());
    }

    match path {
        EncoderPath::Libx264 => {
            push(&mut args, "-c:v", "libx264");
            push(&mut args, "-preset", cpu_preset(tier));
            push(&mut args, "-crf", cpu_crf(tier).to_string());
        }
        EncoderPath::Nvenc => {
            let (target, max, buf) = gpu_bitrates(tier, canvas);
            push(&mut args, "-c:v", "h264_nvenc");
            push(&mut args, "-preset", nvenc_preset(tier));
            push(&mut args, "-profile:v", "high");
            push(&mut args, "-rc", "vbr");
            push(&mut args, "-b:v", format!("{target}k"));
            push(&mut args, "-maxrate", format!("{max}k"));
            push(&mut args, "-bufsize", format!("{buf}k"));
        }
    }
    push(&mut args, "-pix_fmt", "yuv420p");
    push(&mut args, "-r", fps.to_string());
    push(&mut args, "-g", (fps * 2).to_string());
    args.push("-an".to_string());
    push(&mut args, "-movflags", "+faststart");
    args
}
