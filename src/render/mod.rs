//! Rasterisation: fonts and icons, the overlay painter, and still-image compositing.

/// Separable Gaussian blur for premultiplied buffers.
pub mod blur;
/// Process-wide fonts and icons.
pub mod context;
/// Card overlay painter.
pub mod overlay;
/// Image decode, masks and gradients.
pub mod raster;
/// Backdrop construction and source-over compositing for still output.
pub mod still;
/// Parley text shaping and glyph drawing.
pub mod text;
