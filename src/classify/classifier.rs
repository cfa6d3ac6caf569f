use std::str::FromStr;

use crate::classify::keywords::{
    CALM_WORDS, ENERGETIC_WORDS, LEXICONS, NEGATIVE_WORDS, POSITIVE_WORDS,
};
use crate::foundation::error::GlassError;

const KEYWORD_WEIGHT: f64 = 1.0;
const EARLY_MENTION_BONUS: f64 = 0.5;
/// Keywords first seen before this character index earn the early-mention bonus.
const EARLY_MENTION_CHARS: usize = 50;
const EMOJI_WEIGHT: f64 = 2.0;
const HASHTAG_WEIGHT: f64 = 3.0;

/// Background content theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tech,
    Nature,
    Urban,
    Business,
    Abstract,
    /// User-supplied clips. Never produced by the classifier.
    Custom,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Tech,
        Self::Nature,
        Self::Urban,
        Self::Business,
        Self::Abstract,
        Self::Custom,
    ];

    /// Name of the category, also used as its asset directory.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Nature => "nature",
            Self::Urban => "urban",
            Self::Business => "business",
            Self::Abstract => "abstract",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GlassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GlassError::validation(format!("unknown category '{s}'")))
    }
}

/// Per-category weights for one piece of text.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CategoryScore {
    /// Scored categories in evaluation order.
    pub weights: Vec<(Category, f64)>,
    /// Positive minus negative word count, used only by the zero-score fallback.
    pub sentiment: i32,
    pub calm: bool,
    pub energetic: bool,
}

impl CategoryScore {
    pub fn get(&self, category: Category) -> f64 {
        self.weights
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Arg-max category. Ties keep the earlier category; all-zero scores use the sentiment
    /// fallback.
    pub fn best(&self) -> Category {
        let mut best: Option<(Category, f64)> = None;
        for &(category, weight) in &self.weights {
            if weight > best.map_or(0.0, |(_, w)| w) {
                best = Some((category, weight));
            }
        }
        if let Some((category, _)) = best {
            return category;
        }

        if self.calm {
            Category::Nature
        } else if self.energetic {
            Category::Urban
        } else {
            Category::Abstract
        }
    }
}

/// Stateless text classifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Best-guess category for `text`. Total and pure; empty text yields `Abstract`.
    pub fn classify(&self, text: &str) -> Category {
        let score = self.score(text);
        let category = score.best();
        tracing::debug!(%category, weights = ?score.weights, "classified message");
        category
    }

    pub fn score(&self, text: &str) -> CategoryScore {
        let lower = text.to_lowercase();
        let hashtags = extract_hashtags(&lower);

        let weights = LEXICONS
            .iter()
            .map(|lex| {
                let mut w = 0.0;
                for kw in lex.keywords {
                    let (count, first) = word_occurrences(&lower, kw);
                    w += count as f64 * KEYWORD_WEIGHT;
                    if first.is_some_and(|i| i < EARLY_MENTION_CHARS) {
                        w += EARLY_MENTION_BONUS;
                    }
                }
                for e in lex.emoji {
                    w += lower.matches(e).count() as f64 * EMOJI_WEIGHT;
                }
                for tag in &hashtags {
                    if lex.hashtag_fragments.iter().any(|f| tag.contains(f)) {
                        w += HASHTAG_WEIGHT;
                    }
                }
                (lex.category, w)
            })
            .collect();

        let count_all = |words: &[&str]| -> usize {
            words.iter().map(|w| word_occurrences(&lower, w).0).sum()
        };
        CategoryScore {
            weights,
            sentiment: count_all(POSITIVE_WORDS) as i32 - count_all(NEGATIVE_WORDS) as i32,
            calm: count_all(CALM_WORDS) > 0,
            energetic: count_all(ENERGETIC_WORDS) > 0,
        }
    }
}

/// Shorthand for `CategoryClassifier::new().classify(text)`.
pub fn classify(text: &str) -> Category {
    CategoryClassifier::new().classify(text)
}

/// Whole-word occurrences of `needle` in `haystack`, with the char index of the first one.
fn word_occurrences(haystack: &str, needle: &str) -> (usize, Option<usize>) {
    let mut count = 0;
    let mut first = None;
    for (idx, _) in haystack.match_indices(needle) {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        let boundary = |c: Option<char>| c.is_none_or(|c| !c.is_alphanumeric());
        if boundary(before) && boundary(after) {
            count += 1;
            if first.is_none() {
                first = Some(haystack[..idx].chars().count());
            }
        }
    }
    (count, first)
}

/// Every `#` followed by word characters starts a tag, so `#ai,#ml` and `#ai#ml` yield two.
fn extract_hashtags(lower: &str) -> Vec<String> {
    lower
        .split('#')
        .skip(1)
        .map(|tag| {
            tag.chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/classify/classifier.rs"]
mod tests;
