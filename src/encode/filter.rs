use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::card::model::{Animation, RenderOptions};
use crate::encode::args::{EncoderPath, encoder_args};
use crate::foundation::core::Canvas;

/// Length of the fade-in from black, in seconds.
pub const FADE_IN_SECS: f64 = 0.5;

/// A labelled pad in `filter_complex` syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pad(pub String);

impl Pad {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Overlay placement over time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Centered,
    /// Slides in from the left and settles after `settle_secs`.
    SlideIn { settle_secs: f64 },
    /// Offsets collapse towards the centre over the first half second.
    ZoomIn,
}

impl Placement {
    pub fn for_animation(animation: Animation, duration_secs: f64) -> Self {
        match animation {
            Animation::Slide => Self::SlideIn {
                settle_secs: (duration_secs * 0.1).clamp(0.3, 1.0),
            },
            Animation::Zoom => Self::ZoomIn,
            Animation::Fade | Animation::None => Self::Centered,
        }
    }

    fn is_animated(self) -> bool {
        !matches!(self, Self::Centered)
    }

    fn x(self) -> String {
        match self {
            Self::Centered => "(W-w)/2".to_string(),
            Self::SlideIn { settle_secs } => {
                format!("(W-w)/2-W*max(0,1-t/{})", num(settle_secs))
            }
            Self::ZoomIn => "(W-w)/2+(1-min(t*2,1))*w/2".to_string(),
        }
    }

    fn y(self) -> String {
        match self {
            Self::ZoomIn => "(H-h)/2+(1-min(t*2,1))*h/2".to_string(),
            Self::Centered | Self::SlideIn { .. } => "(H-h)/2".to_string(),
        }
    }
}

/// One native filter with typed parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Scale; with `cover` the aspect ratio is kept and the result covers the box.
    Scale { width: u32, height: u32, cover: bool },
    /// Centre crop.
    Crop { width: u32, height: u32 },
    /// Playback-rate change via timestamp rescale.
    SetPts { rate: f64 },
    GaussianBlur { sigma: f32 },
    Format { pix_fmt: &'static str },
    SetSar,
    Overlay { placement: Placement },
    FadeIn { duration_secs: f64 },
    Unsharp,
}

impl Filter {
    /// Native filter name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scale { .. } => "scale",
            Self::Crop { .. } => "crop",
            Self::SetPts { .. } => "setpts",
            Self::GaussianBlur { .. } => "gblur",
            Self::Format { .. } => "format",
            Self::SetSar => "setsar",
            Self::Overlay { .. } => "overlay",
            Self::FadeIn { .. } => "fade",
            Self::Unsharp => "unsharp",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale {
                width,
                height,
                cover: true,
            } => write!(f, "scale={width}:{height}:force_original_aspect_ratio=increase"),
            Self::Scale { width, height, .. } => write!(f, "scale={width}:{height}"),
            Self::Crop { width, height } => write!(f, "crop={width}:{height}"),
            Self::SetPts { rate } => write!(f, "setpts=(1/{})*PTS", num(*rate)),
            Self::GaussianBlur { sigma } => write!(f, "gblur=sigma={}", num(f64::from(*sigma))),
            Self::Format { pix_fmt } => write!(f, "format={pix_fmt}"),
            Self::SetSar => f.write_str("setsar=1"),
            Self::Overlay { placement } => {
                write!(
                    f,
                    "overlay=x={}:y={}",
                    escape_expr(&placement.x()),
                    escape_expr(&placement.y())
                )?;
                if placement.is_animated() {
                    f.write_str(":eval=frame")?;
                }
                Ok(())
            }
            Self::FadeIn { duration_secs } => {
                write!(f, "fade=t=in:st=0:d={}:color=black", num(*duration_secs))
            }
            Self::Unsharp => f.write_str("unsharp=5:5:0.8:5:5:0.0"),
        }
    }
}

/// `[in...]f1,f2,...[out]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterChain {
    pub inputs: Vec<Pad>,
    pub filters: Vec<Filter>,
    pub output: Pad,
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{pad}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{filter}")?;
        }
        write!(f, "{}", self.output)
    }
}

/// Filter chains plus the complete encoder argument list that consumes them.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterGraph {
    pub chains: Vec<FilterChain>,
    pub args: Vec<String>,
}

impl FilterGraph {
    /// Each chain in native syntax, in order.
    pub fn expressions(&self) -> Vec<String> {
        self.chains.iter().map(ToString::to_string).collect()
    }

    /// Value for `-filter_complex`.
    pub fn filter_complex(&self) -> String {
        self.expressions().join(";")
    }

    /// Whether any chain contains a filter with this native name.
    pub fn has_filter(&self, name: &str) -> bool {
        self.chains
            .iter()
            .flat_map(|c| c.filters.iter())
            .any(|f| f.name() == name)
    }

    /// The argument following `flag`, if present.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Inputs to one compile.
#[derive(Clone, Debug)]
pub struct CompileInput<'a> {
    pub options: &'a RenderOptions,
    /// Output canvas; must already be even for yuv420p.
    pub canvas: Canvas,
    pub background: &'a Path,
    pub overlay: &'a Path,
    pub overlay_size: (u32, u32),
    pub output: PathBuf,
}

/// Turns render options and the overlay/background paths into a [`FilterGraph`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterGraphCompiler {
    encoder: EncoderPath,
}

impl FilterGraphCompiler {
    pub fn new(encoder: EncoderPath) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> EncoderPath {
        self.encoder
    }

    pub fn compile(&self, input: &CompileInput<'_>) -> FilterGraph {
        let opts = input.options;
        let Canvas { width, height } = input.canvas;

        let mut bg = vec![
            Filter::Scale {
                width,
                height,
                cover: true,
            },
            Filter::Crop { width, height },
        ];
        let rate = opts.background_playback_rate;
        if rate.is_finite() && rate > 0.0 && (rate - 1.0).abs() > f64::EPSILON {
            bg.push(Filter::SetPts { rate });
        }
        if opts.overlay_blur_radius > 0.0 {
            bg.push(Filter::GaussianBlur {
                sigma: opts.overlay_blur_radius.min(20.0),
            });
        }
        bg.push(Filter::SetSar);

        let mut ov = Vec::new();
        if input.overlay_size != (width, height) {
            ov.push(Filter::Scale {
                width,
                height,
                cover: false,
            });
        }
        ov.push(Filter::Format { pix_fmt: "rgba" });

        let mut out = vec![
            Filter::Overlay {
                placement: Placement::for_animation(opts.animation, opts.duration_seconds),
            },
            Filter::FadeIn {
                duration_secs: FADE_IN_SECS,
            },
        ];
        if opts.quality.wants_sharpening() {
            out.push(Filter::Unsharp);
        }

        let chains = vec![
            FilterChain {
                inputs: vec![Pad::new("0:v")],
                filters: bg,
                output: Pad::new("bg"),
            },
            FilterChain {
                inputs: vec![Pad::new("1:v")],
                filters: ov,
                output: Pad::new("ov"),
            },
            FilterChain {
                inputs: vec![Pad::new("bg"), Pad::new("ov")],
                filters: out,
                output: Pad::new("out"),
            },
        ];
        let graph = chains
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";");

        let mut args: Vec<String> = [
            "-y",
            "-v",
            "error",
            "-stream_loop",
            "-1",
            "-i",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        args.push(input.background.to_string_lossy().into_owned());
        args.extend(["-loop", "1", "-i"].map(String::from));
        args.push(input.overlay.to_string_lossy().into_owned());
        args.extend(["-filter_complex".to_string(), graph]);
        args.extend(["-map", "[out]"].map(String::from));
        args.extend(encoder_args(self.encoder, opts.quality, input.canvas, opts.fps));
        args.extend(["-t".to_string(), num(opts.duration_seconds)]);
        args.push(input.output.to_string_lossy().into_owned());

        tracing::debug!(encoder = ?self.encoder, chains = chains.len(), "filter graph compiled");
        FilterGraph { chains, args }
    }
}

/// Escape the separators `filter_complex` would otherwise split on inside an expression.
fn escape_expr(expr: &str) -> String {
    expr.replace(',', "\\,")
}

/// Shortest decimal form, without a trailing `.0`.
fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/filter.rs"]
mod tests;
