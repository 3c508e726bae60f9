use crate::catalog::{keywords, CATEGORY_PRIORITY};
use crate::models::Category;

/// Map a free-text symptom description to a catalog category. Total:
/// unmatched input falls back to the first category in the priority
/// order. When several categories' keywords occur, the earliest entry in
/// `CATEGORY_PRIORITY` wins.
pub fn classify(free_text: &str) -> Category {
    let text = free_text.to_lowercase();
    for category in CATEGORY_PRIORITY {
        if keywords(category).iter().any(|keyword| text.contains(keyword)) {
            log::debug!("classified {free_text:?} as {}", category.as_str());
            return category;
        }
    }
    CATEGORY_PRIORITY[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_category() {
        assert_eq!(classify("sharp pain in my belly"), Category::Stomach);
        assert_eq!(classify("migraine since this morning"), Category::Headache);
        assert_eq!(classify("feeling feverish and tired"), Category::Fever);
        assert_eq!(classify("dry cough at night"), Category::Cough);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("TERRIBLE MIGRAINE"), Category::Headache);
    }

    #[test]
    fn stomach_wins_tie_break() {
        // Both stomach and cough keywords occur; stomach is earlier in the
        // priority order.
        assert_eq!(classify("I have a cough and stomach pain"), Category::Stomach);
    }

    #[test]
    fn fever_beats_cough() {
        assert_eq!(classify("fever with a slight cough"), Category::Fever);
    }

    #[test]
    fn unmatched_input_falls_back_to_stomach() {
        assert_eq!(classify("sore elbow"), Category::Stomach);
        assert_eq!(classify(""), Category::Stomach);
    }

    #[test]
    fn keyword_matches_as_substring() {
        // "headache" contains "head"; "forehead" does too.
        assert_eq!(classify("pressure on my forehead"), Category::Headache);
    }
}
