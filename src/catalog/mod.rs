//! Background clip discovery and selection.

pub mod background;
