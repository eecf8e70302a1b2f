use crate::error::{AppError, Result};
use crate::llm::{Prompt, TextGenerator};
use crate::workflow::prompt::PromptTemplate;
use crate::workflow::types::{StateUpdate, WorkflowState};

/// The three steps of the code review chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Writes code for the task description.
    Coder,
    /// Reviews the generated code.
    Reviewer,
    /// Rewrites the code according to the review.
    Refactorer,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Coder => "coder",
            StageKind::Reviewer => "reviewer",
            StageKind::Refactorer => "refactorer",
        }
    }

    /// Field this stage writes into the state.
    pub fn produces(self) -> &'static str {
        match self {
            StageKind::Coder => "code",
            StageKind::Reviewer => "review",
            StageKind::Refactorer => "refactored_code",
        }
    }
}

pub struct Stage {
    kind: StageKind,
    template: PromptTemplate,
}

impl Stage {
    pub fn new(kind: StageKind, template: PromptTemplate) -> Self {
        Self { kind, template }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Render this stage's prompt from the fields it reads.
    pub fn prompt(&self, state: &WorkflowState) -> Result<Prompt> {
        let vars = match self.kind {
            StageKind::Coder => vec![("input", state.input.as_str())],
            StageKind::Reviewer => vec![("code", self.require("code", &state.code)?)],
            StageKind::Refactorer => vec![
                ("code", self.require("code", &state.code)?),
                ("review", self.require("review", &state.review)?),
            ],
        };
        self.template.render(&vars)
    }

    /// Call the generator and return only the field this stage produces.
    pub async fn run(
        &self,
        generator: &dyn TextGenerator,
        state: &WorkflowState,
    ) -> Result<StateUpdate> {
        let prompt = self.prompt(state)?;
        let text = generator.complete(&prompt).await?;

        tracing::debug!(stage = self.name(), bytes = text.len(), "Stage output received");

        let mut update = StateUpdate::default();
        match self.kind {
            StageKind::Coder => update.code = Some(text),
            StageKind::Reviewer => update.review = Some(text),
            StageKind::Refactorer => update.refactored_code = Some(text),
        }
        Ok(update)
    }

    fn require<'a>(&self, field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
        value.as_deref().ok_or(AppError::MissingField {
            stage: self.name(),
            field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedGenerator;
    use crate::workflow::prompt::TemplateSet;

    fn reviewer() -> Stage {
        Stage::new(StageKind::Reviewer, TemplateSet::structured().reviewer)
    }

    #[tokio::test]
    async fn test_update_contains_only_produced_field() {
        let generator = ScriptedGenerator::new(["REVIEW_B"]);
        let mut state = WorkflowState::new("task");
        state.code = Some("CODE_A".to_string());

        let update = reviewer().run(&generator, &state).await.unwrap();

        assert_eq!(
            update,
            StateUpdate {
                review: Some("REVIEW_B".to_string()),
                ..StateUpdate::default()
            }
        );
        assert_eq!(generator.prompts()[0].user, "Review this code:\nCODE_A");
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_calling_service() {
        let generator = ScriptedGenerator::new(["unused"]);
        let state = WorkflowState::new("task");

        let err = reviewer().run(&generator, &state).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::MissingField {
                stage: "reviewer",
                field: "code"
            }
        ));
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_refactorer_prompt_needs_review() {
        let stage = Stage::new(StageKind::Refactorer, TemplateSet::plain().refactorer);
        let mut state = WorkflowState::new("task");
        state.code = Some("CODE_A".to_string());

        assert!(matches!(
            stage.prompt(&state),
            Err(AppError::MissingField { field: "review", .. })
        ));

        state.review = Some("REVIEW_B".to_string());
        let prompt = stage.prompt(&state).unwrap();
        assert_eq!(
            prompt.user,
            "Based on suggestions, refactor this code:\nCODE_A\nREVIEW_B"
        );
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(StageKind::Coder.produces(), "code");
        assert_eq!(StageKind::Refactorer.name(), "refactorer");
    }
}
