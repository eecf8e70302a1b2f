pub mod claude;
pub mod scripted;

use async_trait::async_trait;

use crate::error::Result;

/// A rendered request for a text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            system: None,
            user: text.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the generated text as-is.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}
