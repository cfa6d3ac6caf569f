//! Card content, render options and derived panel styling.

/// Counter formatting helpers.
pub mod format;
/// Request-side data model.
pub mod model;
/// Theme-derived glass panel colours.
pub mod style;
