//! Test doubles shared by unit and integration tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use symptom_core::{
    CompletionClient, CompletionError, CompletionOptions, CompletionResult, Message,
};

/// A recorded `complete` call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

/// Completion client that replays canned results in order
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<CompletionResult<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<CompletionResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> CompletionResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            options,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Unavailable("script exhausted".into())))
    }

    fn model_name(&self) -> String {
        "scripted".to_string()
    }
}
