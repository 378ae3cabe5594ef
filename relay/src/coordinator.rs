use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use symptom_core::{CompletionClientRef, CompletionOptions, Message, Role};
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use crate::confidence::ConfidenceScorer;
use crate::error::{TriageError, TriageResult};
use crate::keywords::KeywordLibrary;
use crate::matcher::ConditionMatcher;
use crate::severity::{SeverityClassifier, SeverityLabel};

const TRIAGE_SYSTEM_PROMPT: &str = "You are a helpful medical assistant. Give the user options for what they most likely are dealing with and rank them based on likelihood and treatments for these as well";

const REPLY_TEMPERATURE: f32 = 0.5;
const REPLY_MAX_TOKENS: u32 = 300;

static ANNOTATION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Severity:.*?\| Confidence:.*?\]").expect("annotation tag pattern is valid")
});

/// Reply bundle returned to the client for one `/check` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredResponse {
    pub reply: String,
    pub severity: SeverityLabel,
    /// "<n>% confidence"
    pub confidence: String,
    pub matched_conditions: Vec<String>,
    /// "<matched> of <total> matched"
    pub match_quality: String,
}

/// Remove "[Severity: ... | Confidence: ...]" tags and surrounding whitespace.
pub fn strip_annotation_tags(content: &str) -> String {
    ANNOTATION_TAG.replace_all(content, "").trim().to_string()
}

/// Copy of `messages` with annotation tags stripped from assistant turns.
pub fn sanitize_history(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .map(|m| match m.role {
            Role::Assistant => Message::assistant(strip_annotation_tags(&m.content)),
            _ => m.clone(),
        })
        .collect()
}

/// Content of the most recent user turn
pub fn last_user_input(messages: &[Message]) -> TriageResult<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .ok_or(TriageError::NoUserInput)
}

/// Orchestrates one triage request: model reply, condition match, severity
/// and confidence. Holds no per-request state.
#[derive(Clone)]
pub struct TriageCoordinator {
    client: CompletionClientRef,
    matcher: ConditionMatcher,
    classifier: SeverityClassifier,
    scorer: ConfidenceScorer,
}

impl TriageCoordinator {
    pub fn new(client: CompletionClientRef, library: Arc<KeywordLibrary>) -> Self {
        Self {
            classifier: SeverityClassifier::new(client.clone()),
            matcher: ConditionMatcher::new(library.clone()),
            scorer: ConfidenceScorer::new(library),
            client,
        }
    }

    /// Process a full conversation
    pub async fn process_conversation(
        &self,
        messages: &[Message],
    ) -> TriageResult<StructuredResponse> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("check", %request_id, turns = messages.len());
        self.process_inner(messages).instrument(span).await
    }

    async fn process_inner(&self, messages: &[Message]) -> TriageResult<StructuredResponse> {
        let symptom_text = last_user_input(messages)?;

        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(Message::system(TRIAGE_SYSTEM_PROMPT));
        prompt.extend(sanitize_history(messages));
        debug!(prompt_len = prompt.len(), "Constructed triage prompt");

        let reply = match self
            .client
            .complete(
                &prompt,
                CompletionOptions::new(REPLY_TEMPERATURE, REPLY_MAX_TOKENS),
            )
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!(error = %e, "Failed to get reply from model");
                return Err(e.into());
            }
        };

        let matched_conditions = self.matcher.match_conditions(symptom_text);
        let severity = self.classifier.classify_or_mild(symptom_text).await;
        let confidence = self.scorer.score(&reply, &matched_conditions);

        info!(
            severity = %severity,
            matched = ?matched_conditions,
            confidence = confidence.confidence_percent,
            "Triage complete"
        );

        Ok(StructuredResponse {
            reply,
            severity,
            confidence: confidence.confidence_label(),
            matched_conditions,
            match_quality: confidence.match_quality(),
        })
    }
}
