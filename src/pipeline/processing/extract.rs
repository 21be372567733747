use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::MentionType;

static HASHTAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag pattern"));
static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("valid mention pattern"));

fn captures(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Hashtags without the `#`, in order of appearance, duplicates kept.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    captures(&HASHTAG_PATTERN, text)
}

/// `@` handles without the `@`, in order of appearance, duplicates kept.
pub fn extract_mentions(text: &str) -> Vec<String> {
    captures(&MENTION_PATTERN, text)
}

/// Classify by case-insensitive substring of the source label. Checked in
/// priority order; anything unmatched is `Other`.
pub fn classify(source: &str) -> MentionType {
    let source = source.to_lowercase();
    if source.contains("twitter") {
        MentionType::Tweet
    } else if source.contains("news") {
        MentionType::News
    } else if source.contains("review") {
        MentionType::Review
    } else {
        MentionType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hashtags_in_order_with_duplicates() {
        assert_eq!(
            extract_hashtags("#Rust and #async_io, then #Rust again #2024"),
            vec!["Rust", "async_io", "Rust", "2024"]
        );
        assert!(extract_hashtags("no tags # here").is_empty());
    }

    #[test]
    fn test_extract_mentions() {
        assert_eq!(
            extract_mentions("Check out this #awesome product! @johndoe cc @Jane_Doe."),
            vec!["johndoe", "Jane_Doe"]
        );
        // word chars stop at the dot
        assert_eq!(extract_mentions("mail me@example.com"), vec!["example"]);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(classify("twitter"), MentionType::Tweet);
        assert_eq!(classify("news article"), MentionType::News);
        assert_eq!(classify("product review"), MentionType::Review);
        assert_eq!(classify("Twitter News"), MentionType::Tweet);
        assert_eq!(classify("NEWS reviews"), MentionType::News);
        assert_eq!(classify("reddit"), MentionType::Other);
        assert_eq!(classify(""), MentionType::Other);
    }
}
