//! Severity classification through the completion service.
//!
//! The model is asked for a one-word answer and the free text is normalized
//! into a [`SeverityLabel`]. Classification never fails from the caller's
//! point of view: any completion error degrades to [`SeverityLabel::Mild`].

use serde::{Deserialize, Serialize};
use std::fmt;
use symptom_core::{CompletionClientRef, CompletionOptions, CompletionResult, Message};
use tracing::{debug, warn};

const SEVERITY_SYSTEM_PROMPT: &str = "You are a medical assistant. Classify the severity of the user's symptom as one of the following: Mild, Moderate, or Emergency.";

const SEVERITY_TEMPERATURE: f32 = 0.2;
const SEVERITY_MAX_TOKENS: u32 = 10;

/// Coarse triage tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLabel {
    Mild,
    Moderate,
    Emergency,
}

impl SeverityLabel {
    /// Normalize a free-text model answer. "emergency" wins over "moderate";
    /// anything else, including an empty answer, is Mild.
    pub fn from_model_text(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.contains("emergency") {
            SeverityLabel::Emergency
        } else if text.contains("moderate") {
            SeverityLabel::Moderate
        } else {
            SeverityLabel::Mild
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLabel::Mild => "Mild",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the two-message classification prompt for `symptom_text`.
pub fn severity_prompt(symptom_text: &str) -> Vec<Message> {
    vec![
        Message::system(SEVERITY_SYSTEM_PROMPT),
        Message::user(format!("How severe is this symptom: '{}'?", symptom_text)),
    ]
}

#[derive(Clone)]
pub struct SeverityClassifier {
    client: CompletionClientRef,
}

impl SeverityClassifier {
    pub fn new(client: CompletionClientRef) -> Self {
        Self { client }
    }

    /// Ask the model and normalize its answer. Completion errors propagate.
    pub async fn try_classify(&self, symptom_text: &str) -> CompletionResult<SeverityLabel> {
        let answer = self
            .client
            .complete(
                &severity_prompt(symptom_text),
                CompletionOptions::new(SEVERITY_TEMPERATURE, SEVERITY_MAX_TOKENS),
            )
            .await?;
        let label = SeverityLabel::from_model_text(&answer);
        debug!(answer = %answer.trim(), label = %label, "Severity classified");
        Ok(label)
    }

    /// Classify, falling back to Mild on any completion failure.
    pub async fn classify_or_mild(&self, symptom_text: &str) -> SeverityLabel {
        match self.try_classify(symptom_text).await {
            Ok(label) => label,
            Err(e) => {
                warn!(error = %e, "Severity classification failed, defaulting to Mild");
                SeverityLabel::Mild
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedClient;
    use std::sync::Arc;
    use symptom_core::{CompletionError, Role};

    #[test]
    fn test_normalization_priority() {
        assert_eq!(SeverityLabel::from_model_text("Emergency"), SeverityLabel::Emergency);
        assert_eq!(SeverityLabel::from_model_text("  moderate. "), SeverityLabel::Moderate);
        assert_eq!(
            SeverityLabel::from_model_text("Moderate, possibly an EMERGENCY"),
            SeverityLabel::Emergency
        );
        assert_eq!(SeverityLabel::from_model_text("Mild"), SeverityLabel::Mild);
        assert_eq!(SeverityLabel::from_model_text("I cannot say"), SeverityLabel::Mild);
        assert_eq!(SeverityLabel::from_model_text(""), SeverityLabel::Mild);
    }

    #[test]
    fn test_label_serializes_capitalized() {
        assert_eq!(
            serde_json::to_value(SeverityLabel::Emergency).unwrap(),
            serde_json::json!("Emergency")
        );
        assert_eq!(SeverityLabel::Moderate.to_string(), "Moderate");
    }

    #[test]
    fn test_prompt_shape() {
        let prompt = severity_prompt("sharp chest pain");
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, Role::System);
        assert!(prompt[0].content.contains("Mild, Moderate, or Emergency"));
        assert_eq!(prompt[1].role, Role::User);
        assert_eq!(
            prompt[1].content,
            "How severe is this symptom: 'sharp chest pain'?"
        );
    }

    #[tokio::test]
    async fn test_classify_uses_low_temperature_and_short_cap() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("Emergency".into())]));
        let classifier = SeverityClassifier::new(client.clone());

        let label = classifier.classify_or_mild("crushing chest pain").await;
        assert_eq!(label, SeverityLabel::Emergency);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].options.temperature, 0.2);
        assert_eq!(calls[0].options.max_tokens, 10);
        assert_eq!(calls[0].messages, severity_prompt("crushing chest pain"));
    }

    #[tokio::test]
    async fn test_any_completion_failure_falls_back_to_mild() {
        let failures = vec![
            CompletionError::Timeout("deadline elapsed".into()),
            CompletionError::Unavailable("connection refused".into()),
            CompletionError::MalformedResponse("No choices in response".into()),
            CompletionError::HttpError {
                status_code: 500,
                message: "boom".into(),
            },
        ];

        for failure in failures {
            let client = Arc::new(ScriptedClient::new(vec![Err(failure)]));
            let classifier = SeverityClassifier::new(client);
            assert_eq!(
                classifier.classify_or_mild("stabbing pain").await,
                SeverityLabel::Mild
            );
        }
    }

    #[tokio::test]
    async fn test_try_classify_surfaces_error() {
        let client = Arc::new(ScriptedClient::new(vec![Err(CompletionError::Timeout(
            "deadline elapsed".into(),
        ))]));
        let classifier = SeverityClassifier::new(client);
        assert!(matches!(
            classifier.try_classify("dizzy").await,
            Err(CompletionError::Timeout(_))
        ));
    }
}
