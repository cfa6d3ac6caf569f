use super::*;

#[test]
fn empty_text_is_abstract() {
    assert_eq!(classify(""), Category::Abstract);
}

#[test]
fn classification_is_pure() {
    let text = "Shipping our new AI model to the cloud today 🚀 #devlife";
    let first = classify(text);
    for _ in 0..10 {
        assert_eq!(classify(text), first);
    }
    assert_eq!(first, Category::Tech);
}

#[test]
fn keywords_need_word_boundaries() {
    // "said" and "mail" contain "ai" but are not the keyword.
    let score = CategoryClassifier::new().score("she said the mail arrived");
    assert_eq!(score.get(Category::Tech), 0.0);
}

#[test]
fn early_mentions_earn_a_bonus() {
    let early = CategoryClassifier::new().score("forest walk");
    assert_eq!(early.get(Category::Nature), 1.5);
    let late = format!("{} forest", "x".repeat(60));
    let late = CategoryClassifier::new().score(&late);
    assert_eq!(late.get(Category::Nature), 1.0);
}

#[test]
fn emoji_and_hashtags_are_weighted() {
    let score = CategoryClassifier::new().score("🌊🌊 #OceanLife");
    assert_eq!(score.get(Category::Nature), 2.0 * 2.0 + 3.0);
    assert_eq!(classify("📈 #investing"), Category::Business);
}

#[test]
fn adjacent_hashtags_are_each_extracted() {
    assert_eq!(extract_hashtags("#ai,#ml"), vec!["ai", "ml"]);
    assert_eq!(extract_hashtags("#ai#ml"), vec!["ai", "ml"]);
    assert_eq!(extract_hashtags("launch day #ship_it! # #"), vec!["ship_it"]);
    assert!(extract_hashtags("no tags here").is_empty());

    let joined = CategoryClassifier::new().score("#oceanlife#hikeday");
    let spaced = CategoryClassifier::new().score("#oceanlife #hikeday");
    assert_eq!(joined.get(Category::Nature), spaced.get(Category::Nature));
    assert!(joined.get(Category::Nature) >= 2.0 * 3.0);
}

#[test]
fn ties_keep_the_earlier_category() {
    // One tech keyword and one nature keyword, both early.
    assert_eq!(classify("code forest"), Category::Tech);
    assert_eq!(classify("forest code"), Category::Tech);
}

#[test]
fn zero_scores_use_mood_fallback() {
    assert_eq!(classify("feeling calm tonight"), Category::Nature);
    assert_eq!(classify("so pumped and hype"), Category::Urban);
    assert_eq!(classify("what a wonderful week"), Category::Abstract);
    assert_eq!(classify("zzz"), Category::Abstract);
}

#[test]
fn custom_is_never_returned() {
    for text in ["", "custom", "#custom clips", "my custom background"] {
        assert_ne!(classify(text), Category::Custom);
    }
}

#[test]
fn category_names_round_trip() {
    for c in Category::ALL {
        assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
    }
    assert!("space".parse::<Category>().is_err());
}
