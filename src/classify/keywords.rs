use crate::classify::classifier::Category;

/// Vocabulary for one scored category.
pub(crate) struct Lexicon {
    pub(crate) category: Category,
    pub(crate) keywords: &'static [&'static str],
    pub(crate) emoji: &'static [&'static str],
    /// Substrings matched inside lower-cased hashtags.
    pub(crate) hashtag_fragments: &'static [&'static str],
}

/// Scored categories in tie-break order.
pub(crate) const LEXICONS: [Lexicon; 5] = [
    Lexicon {
        category: Category::Tech,
        keywords: &[
            "ai", "artificial intelligence", "machine learning", "code", "coding", "software",
            "developer", "programming", "startup", "app", "algorithm", "data", "cloud", "api",
            "robot", "computer", "tech", "technology", "crypto", "blockchain", "gpu", "chip",
            "open source", "rust", "python", "javascript", "server", "database", "launch",
        ],
        emoji: &["💻", "🤖", "📱", "⌨️", "🖥️", "🚀", "🧠", "⚙️", "🔌"],
        hashtag_fragments: &["tech", "ai", "code", "dev", "ml", "data", "crypto", "startup"],
    },
    Lexicon {
        category: Category::Nature,
        keywords: &[
            "nature", "forest", "ocean", "sea", "beach", "mountain", "mountains", "river", "lake",
            "tree", "trees", "flower", "flowers", "sunset", "sunrise", "rain", "garden", "hike",
            "hiking", "wildlife", "earth", "sky", "outdoors", "camping", "waves", "spring",
        ],
        emoji: &["🌿", "🌲", "🌳", "🌊", "🌸", "🌺", "🌻", "🏔️", "⛰️", "🌅", "🍃", "🌍"],
        hashtag_fragments: &["nature", "outdoor", "hike", "earth", "green", "travel", "ocean"],
    },
    Lexicon {
        category: Category::Urban,
        keywords: &[
            "city", "street", "downtown", "subway", "metro", "traffic", "nightlife", "skyline",
            "building", "buildings", "urban", "neon", "concert", "party", "club", "skate",
            "graffiti", "nyc", "london", "tokyo", "commute", "rooftop",
        ],
        emoji: &["🏙️", "🌃", "🚇", "🚕", "🏢", "🌆", "🎉", "🎶", "🛹"],
        hashtag_fragments: &["city", "urban", "street", "nyc", "night", "music"],
    },
    Lexicon {
        category: Category::Business,
        keywords: &[
            "business", "market", "markets", "stock", "stocks", "invest", "investing",
            "investment", "revenue", "profit", "finance", "economy", "ceo", "founder", "company",
            "sales", "growth", "meeting", "strategy", "leadership", "career", "hiring",
            "entrepreneur", "quarter", "earnings",
        ],
        emoji: &["📈", "📉", "💼", "💰", "💵", "🏦", "📊", "🤝"],
        hashtag_fragments: &["business", "finance", "invest", "money", "career", "leader"],
    },
    Lexicon {
        category: Category::Abstract,
        keywords: &[
            "art", "design", "dream", "dreams", "imagine", "inspiration", "creative",
            "creativity", "color", "colors", "colour", "vibes", "mood", "aesthetic", "soul",
            "universe", "mind", "philosophy", "poetry", "abstract", "love",
        ],
        emoji: &["🎨", "✨", "💫", "🌈", "🔮", "💭", "🌀"],
        hashtag_fragments: &["art", "design", "creative", "vibe", "mood", "aesthetic"],
    },
];

pub(crate) const CALM_WORDS: &[&str] = &[
    "calm", "peace", "peaceful", "quiet", "relax", "relaxing", "serene", "gentle", "slow",
    "breathe", "mindful", "meditate", "rest", "cozy",
];

pub(crate) const ENERGETIC_WORDS: &[&str] = &[
    "hype", "energy", "fast", "loud", "excited", "exciting", "crazy", "wild", "insane", "epic",
    "lets go", "fire", "rush", "pumped",
];

pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "amazing", "awesome", "love", "beautiful", "wonderful", "thanks",
    "grateful", "best", "nice",
];

pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "awful", "terrible", "hate", "worst", "angry", "tired", "broken",
];
