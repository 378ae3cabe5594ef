//! Lexical confidence score: how many of the matched conditions the model's
//! reply actually talks about.

use serde::Serialize;
use std::sync::Arc;

use crate::keywords::KeywordLibrary;
use crate::matcher::NO_MATCH_SENTINEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceResult {
    pub matched_count: usize,
    pub total_conditions: usize,
    /// Always within 0..=100
    pub confidence_percent: u8,
}

impl ConfidenceResult {
    /// "<n>% confidence"
    pub fn confidence_label(&self) -> String {
        format!("{}% confidence", self.confidence_percent)
    }

    /// "<matched> of <total> matched"
    pub fn match_quality(&self) -> String {
        format!("{} of {} matched", self.matched_count, self.total_conditions)
    }
}

#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    library: Arc<KeywordLibrary>,
}

impl ConfidenceScorer {
    pub fn new(library: Arc<KeywordLibrary>) -> Self {
        Self { library }
    }

    /// Count the matched conditions whose keywords appear in `reply`.
    ///
    /// Unknown condition names count towards the total but can never match.
    /// The no-match sentinel is not a condition and is skipped entirely.
    pub fn score(&self, reply: &str, matched_conditions: &[String]) -> ConfidenceResult {
        let reply = reply.to_lowercase();
        let conditions: Vec<&String> = matched_conditions
            .iter()
            .filter(|name| name.as_str() != NO_MATCH_SENTINEL)
            .collect();

        let matched_count = conditions
            .iter()
            .filter(|name| {
                self.library
                    .keywords_for(name)
                    .unwrap_or_default()
                    .iter()
                    .any(|keyword| reply.contains(keyword.as_str()))
            })
            .count();
        let total_conditions = conditions.len();

        let confidence_percent = if total_conditions == 0 {
            0
        } else {
            (matched_count * 100 / total_conditions) as u8
        };

        ConfidenceResult {
            matched_count,
            total_conditions,
            confidence_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::ConditionEntry;

    fn scorer() -> ConfidenceScorer {
        ConfidenceScorer::new(Arc::new(KeywordLibrary::default()))
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_conditions_score_zero() {
        let result = scorer().score("anything at all", &[]);
        assert_eq!(
            result,
            ConfidenceResult {
                matched_count: 0,
                total_conditions: 0,
                confidence_percent: 0
            }
        );
        assert_eq!(result.confidence_label(), "0% confidence");
        assert_eq!(result.match_quality(), "0 of 0 matched");
    }

    #[test]
    fn test_sentinel_scores_zero() {
        let result = scorer().score("rest and fluids", &names(&[NO_MATCH_SENTINEL]));
        assert_eq!(result.total_conditions, 0);
        assert_eq!(result.confidence_percent, 0);
    }

    #[test]
    fn test_reply_covering_everything_scores_full() {
        let result = scorer().score(
            "This looks like Influenza; a Heart Attack is unlikely.",
            &names(&["flu", "heart attack"]),
        );
        assert_eq!(result.matched_count, 2);
        assert_eq!(result.confidence_percent, 100);
        assert_eq!(result.confidence_label(), "100% confidence");
    }

    #[test]
    fn test_reply_covering_nothing_scores_zero() {
        let result = scorer().score("Drink water and rest.", &names(&["flu", "gout"]));
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.total_conditions, 2);
        assert_eq!(result.confidence_percent, 0);
    }

    #[test]
    fn test_percent_is_floored() {
        let result = scorer().score(
            "Likely the flu.",
            &names(&["flu", "measles", "gout"]),
        );
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.confidence_percent, 33);
        assert_eq!(result.match_quality(), "1 of 3 matched");
    }

    #[test]
    fn test_unknown_condition_counts_but_never_matches() {
        let result = scorer().score("flu", &names(&["flu", "scurvy"]));
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.total_conditions, 2);
        assert_eq!(result.confidence_percent, 50);
    }

    #[test]
    fn test_condition_lookup_is_case_insensitive() {
        let result = scorer().score("possible deep vein thrombosis", &names(&["dvt"]));
        assert_eq!(result.confidence_percent, 100);
    }

    #[test]
    fn test_percent_stays_in_bounds() {
        let library = Arc::new(KeywordLibrary::new(vec![
            ConditionEntry::new("a", ["alpha"]),
            ConditionEntry::new("b", ["beta"]),
            ConditionEntry::new("c", ["gamma"]),
        ]));
        let scorer = ConfidenceScorer::new(library);
        let replies = ["", "alpha", "alpha beta", "alpha beta gamma", "ALPHA GAMMA"];
        let sets = [
            names(&["a"]),
            names(&["a", "b"]),
            names(&["a", "b", "c"]),
            names(&["c", "c", "x"]),
        ];
        for reply in replies {
            for set in &sets {
                let result = scorer.score(reply, set);
                assert!(result.confidence_percent <= 100);
                assert!(result.matched_count <= result.total_conditions);
            }
        }
    }
}
