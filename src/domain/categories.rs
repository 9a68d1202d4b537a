//! Keyword-driven post categorization.
//!
//! The vocabulary is an ordered list rather than a map: matches are
//! collected in declaration order, which makes the composite label for a
//! post stable across runs regardless of how many keywords hit.

pub const GENERAL_CATEGORY: &str = "General";

/// Keyword to category pairs, scanned in order. Keywords match as
/// case-insensitive substrings of the post title or any tag name.
pub const VOCABULARY: &[(&str, &str)] = &[
    ("tecnologia", "Tech"),
    ("programação", "Programming"),
    ("c#", "Programming"),
    ("web development", "Web"),
    ("tutorial", "Educational"),
    ("performance", "Optimization"),
    ("arquitetura", "Architecture"),
    ("clean", "Best Practices"),
    ("javascript", "Programming"),
    ("node.js", "Backend"),
    ("async", "Advanced"),
    ("typescript", "Programming"),
];

/// Collects the categories whose keywords appear in the title or in any
/// tag name, deduplicated in order of first match.
pub fn categorize<S: AsRef<str>>(title: &str, tag_names: &[S]) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let tags: Vec<String> = tag_names
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    let mut matched: Vec<&'static str> = Vec::new();
    for &(keyword, category) in VOCABULARY {
        let hit = title.contains(keyword) || tags.iter().any(|tag| tag.contains(keyword));
        if hit && !matched.contains(&category) {
            matched.push(category);
        }
    }

    matched
}

/// Joins matched categories into the label stored per post. A post with
/// no keyword hits is labeled "General".
pub fn label(categories: &[&str]) -> String {
    if categories.is_empty() {
        GENERAL_CATEGORY.to_string()
    } else {
        categories.join(", ")
    }
}

pub fn label_for<S: AsRef<str>>(title: &str, tag_names: &[S]) -> String {
    label(&categorize(title, tag_names))
}
