use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::llm::{Prompt, TextGenerator};

/// Deterministic generator that replays queued replies and records every prompt.
///
/// Used in place of a live client to exercise pipelines offline.
#[derive(Clone, Debug, Default)]
pub struct ScriptedGenerator {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<ScriptedReply>,
    prompts: Vec<Prompt>,
}

#[derive(Clone, Debug)]
enum ScriptedReply {
    Text(String),
    Failure(String),
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::default();
        for reply in replies {
            generator.push_reply(reply);
        }
        generator
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.state().replies.push_back(ScriptedReply::Text(text.into()));
    }

    /// Queue a reply that fails the way an API error would.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.state()
            .replies
            .push_back(ScriptedReply::Failure(message.into()));
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.state().prompts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.inner.lock().expect("scripted generator state")
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let mut state = self.state();
        state.prompts.push(prompt.clone());
        match state.replies.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure(message)) => Err(AppError::ClaudeApi(message)),
            None => Err(AppError::ClaudeApi("no scripted reply left".to_string())),
        }
    }
}
