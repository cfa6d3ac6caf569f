//! Adaptive card layout.
//!
//! [`engine::LayoutEngine`] fits the header, wrapped message and stats row into a panel whose
//! width and maximum height depend on the canvas [`aspect::AspectClass`].

pub mod aspect;
pub mod engine;
