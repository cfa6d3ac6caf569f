//! Keyword, emoji and hashtag scoring of message text into background categories.

pub mod classifier;
pub(crate) mod keywords;
