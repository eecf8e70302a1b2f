use crate::config::PromptStyle;
use crate::error::{AppError, Result};
use crate::llm::Prompt;

/// A prompt with `{name}` placeholders. `{{` and `}}` render as literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system: Option<String>,
    user: String,
}

impl PromptTemplate {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<Prompt> {
        let system = match &self.system {
            Some(system) => Some(interpolate(system, vars)?),
            None => None,
        };
        Ok(Prompt {
            system,
            user: interpolate(&self.user, vars)?,
        })
    }
}

/// One template per stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub coder: PromptTemplate,
    pub reviewer: PromptTemplate,
    pub refactorer: PromptTemplate,
}

impl TemplateSet {
    pub fn for_style(style: PromptStyle) -> Self {
        match style {
            PromptStyle::Structured => Self::structured(),
            PromptStyle::Plain => Self::plain(),
        }
    }

    pub fn structured() -> Self {
        Self {
            coder: PromptTemplate::with_system(
                "You are a Senior Software Engineer. Write clean, well-structured Python code based on requirements.",
                "{input}",
            ),
            reviewer: PromptTemplate::with_system(
                "You are a Code Reviewer. Provide constructive feedback focusing on readability, efficiency, and best practices.",
                "Review this code:\n{code}",
            ),
            refactorer: PromptTemplate::with_system(
                "You are a Refactoring Expert. Implement the suggested improvements while maintaining functionality.",
                "Original code:\n{code}\n\nReview feedback:\n{review}\n\nRefactor accordingly:",
            ),
        }
    }

    pub fn plain() -> Self {
        Self {
            coder: PromptTemplate::new("Write Python code for: {input}"),
            reviewer: PromptTemplate::new("Review this code:\n{code}"),
            refactorer: PromptTemplate::new(
                "Based on suggestions, refactor this code:\n{code}\n{review}",
            ),
        }
    }
}

fn interpolate(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else {
            let end = tail
                .find('}')
                .ok_or_else(|| AppError::Template(format!("unclosed placeholder in {template:?}")))?;
            let name = &tail[1..end];
            let value = vars
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| AppError::Template(format!("no value for placeholder `{name}`")))?;
            out.push_str(value);
            rest = &tail[end + 1..];
        }
    }

    out.push_str(rest);
    Ok(out)
}
