//! Request orchestration and its collaborators.

/// Background selection through encoding and publishing.
pub mod compose;
/// Output artifacts and the media store seam.
pub mod store;
/// Self-deleting temporary files.
pub mod temp;
