//! glasscard renders tweet-like social cards as translucent glass panels.
//!
//! A card is laid out for the requested aspect ratio, rasterised on the CPU into a transparent
//! overlay, and either composited onto a still backdrop or burned into a looping background
//! clip by the system `ffmpeg`:
//!
//! - Lay out a card with [`LayoutEngine`]
//! - Paint it with [`OverlayRenderer`]
//! - Run the full request through [`CompositionPipeline`]
#![forbid(unsafe_code)]

mod foundation;

/// Card content, options and styling.
pub mod card;
/// Background clip catalog.
pub mod catalog;
/// Message text classification.
pub mod classify;
/// Filter graphs and the encoder process.
pub mod encode;
/// Geometry helpers.
pub mod geometry;
/// Card layout.
pub mod layout;
/// Orchestration.
pub mod pipeline;
/// CPU rasterisation.
pub mod render;

pub use crate::foundation::config::PipelineConfig;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, MAX_CANVAS_EDGE, MIN_CANVAS_EDGE, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{ErrorKind, GlassError, GlassResult};

pub use crate::card::format::format_count;
pub use crate::card::model::{
    Animation, CardContent, Counters, OverlayStyle, QualityTier, RenderOptions, RenderRequest,
    Theme,
};
pub use crate::card::style::GlassPanelStyle;
pub use crate::catalog::background::{BackgroundAsset, BackgroundCatalog};
pub use crate::classify::classifier::{Category, CategoryClassifier, CategoryScore, classify};
pub use crate::encode::args::EncoderPath;
pub use crate::encode::filter::{FilterGraph, FilterGraphCompiler};
pub use crate::encode::runner::EncoderRunner;
pub use crate::geometry::measure::{FixedAdvanceMeasure, FontWeight, TextMeasure};
pub use crate::layout::aspect::AspectClass;
pub use crate::layout::engine::{LayoutEngine, LayoutError, LayoutResult};
pub use crate::pipeline::compose::{CompositionPipeline, VideoPlan};
pub use crate::pipeline::store::{ArtifactKind, LocalMediaStore, MediaStore, OutputArtifact};
pub use crate::pipeline::temp::TempArtifact;
pub use crate::render::context::RenderingContext;
pub use crate::render::overlay::{OverlayRenderer, RenderedOverlay};
pub use crate::render::raster::PremulImage;
