//! Keyword-based condition matching.

use std::sync::Arc;

use crate::keywords::KeywordLibrary;

/// Returned alone when no condition in the library matched.
/// Not a condition name; callers must treat it as "no real match".
pub const NO_MATCH_SENTINEL: &str = "No match in library";

#[derive(Debug, Clone)]
pub struct ConditionMatcher {
    library: Arc<KeywordLibrary>,
}

impl ConditionMatcher {
    pub fn new(library: Arc<KeywordLibrary>) -> Self {
        Self { library }
    }

    /// Names of every condition with at least one keyword in `text`, in
    /// library order. Never empty: falls back to `[NO_MATCH_SENTINEL]`.
    pub fn match_conditions(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let matched: Vec<String> = self
            .library
            .entries()
            .iter()
            .filter(|entry| entry.hits(&text))
            .map(|entry| entry.name.clone())
            .collect();

        if matched.is_empty() {
            vec![NO_MATCH_SENTINEL.to_string()]
        } else {
            matched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::ConditionEntry;

    fn matcher() -> ConditionMatcher {
        ConditionMatcher::new(Arc::new(KeywordLibrary::default()))
    }

    #[test]
    fn test_flu_question_matches_flu() {
        let matched = matcher().match_conditions("I have a bad cough and fever, could this be the flu?");
        assert!(matched.contains(&"flu".to_string()));
        assert!(!matched.contains(&NO_MATCH_SENTINEL.to_string()));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matched = matcher().match_conditions("Sudden CHEST PAIN after running");
        assert_eq!(matched, vec!["heart attack", "pulmonary embolism"]);
    }

    #[test]
    fn test_results_follow_library_order() {
        // "rash" belongs to measles and lupus; "thirst" to dehydration and diabetes
        let matched = matcher().match_conditions("thirst and a rash");
        assert_eq!(matched, vec!["measles", "lupus", "dehydration", "diabetes"]);
    }

    #[test]
    fn test_no_match_returns_sentinel() {
        let matched = matcher().match_conditions("my elbow itches");
        assert_eq!(matched, vec![NO_MATCH_SENTINEL]);

        assert_eq!(matcher().match_conditions(""), vec![NO_MATCH_SENTINEL]);
    }

    #[test]
    fn test_every_keyword_matches_its_condition() {
        let library = Arc::new(KeywordLibrary::default());
        let matcher = ConditionMatcher::new(library.clone());
        for entry in library.entries() {
            for keyword in &entry.keywords {
                let text = format!("patient reports {}", keyword.to_uppercase());
                assert!(
                    matcher.match_conditions(&text).contains(&entry.name),
                    "{} should match {}",
                    keyword,
                    entry.name
                );
            }
        }
    }

    #[test]
    fn test_match_is_deterministic_and_leaves_library_untouched() {
        let library = Arc::new(KeywordLibrary::new(vec![ConditionEntry::new(
            "migraine",
            ["aura"],
        )]));
        let before = (*library).clone();
        let matcher = ConditionMatcher::new(library.clone());

        let first = matcher.match_conditions("visual aura");
        let second = matcher.match_conditions("visual aura");
        assert_eq!(first, second);
        assert_eq!(first, vec!["migraine"]);
        assert_eq!(*library, before);
    }
}
