use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{AppError, Result};

const API_KEY_FALLBACK_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Deserialize, Clone)]
pub struct ClaudeConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
        }
    }
}

// Manual Debug impl to avoid leaking the API key
impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Which template set the stages render their prompts from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// System persona plus a human message per stage.
    #[default]
    Structured,
    /// A single interpolated user message per stage.
    Plain,
}

/// Where the final state ends up.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Markdown report written to `output_dir`.
    #[default]
    Report,
    /// Stage outputs printed to stdout.
    Console,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_pipeline_name")]
    pub name: String,
    #[serde(default = "default_task")]
    pub task: String,
    #[serde(default)]
    pub prompt_style: PromptStyle,
    #[serde(default)]
    pub output: OutputMode,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_pipeline_name(),
            task: default_task(),
            prompt_style: PromptStyle::default(),
            output: OutputMode::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_pipeline_name() -> String {
    "sequential_workflow".to_string()
}

fn default_task() -> String {
    "Write a function that validates email addresses using regex".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("reviewchain").required(false));
        }

        // Environment variable overrides with REVIEWCHAIN_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("REVIEWCHAIN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if app.claude.api_key.is_empty() {
            app.claude.api_key = std::env::var(API_KEY_FALLBACK_VAR).unwrap_or_default();
        }

        Ok(app)
    }

    /// The API key, or a config error if none was supplied anywhere.
    pub fn claude_api_key(&self) -> Result<&str> {
        if self.claude.api_key.is_empty() {
            return Err(AppError::Config(format!(
                "no Claude API key: set claude.api_key, REVIEWCHAIN__CLAUDE__API_KEY or {API_KEY_FALLBACK_VAR}"
            )));
        }
        Ok(&self.claude.api_key)
    }
}
