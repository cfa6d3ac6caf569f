//! Pure geometry helpers shared by layout and rendering.

/// Text width measurement abstraction.
pub mod measure;
/// Rounded rectangles, circles and kurbo to vello_cpu conversion.
pub mod shapes;
/// Greedy word wrapping.
pub mod wrap;
