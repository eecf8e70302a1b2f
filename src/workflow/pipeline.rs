use std::sync::Arc;

use crate::error::Result;
use crate::llm::TextGenerator;
use crate::workflow::prompt::TemplateSet;
use crate::workflow::stage::{Stage, StageKind};
use crate::workflow::types::WorkflowState;

/// Fixed coder → reviewer → refactorer chain over one shared state.
pub struct Pipeline {
    name: String,
    stages: Vec<Stage>,
    generator: Arc<dyn TextGenerator>,
}

impl Pipeline {
    pub fn new(name: &str, generator: Arc<dyn TextGenerator>, templates: TemplateSet) -> Self {
        let stages = vec![
            Stage::new(StageKind::Coder, templates.coder),
            Stage::new(StageKind::Reviewer, templates.reviewer),
            Stage::new(StageKind::Refactorer, templates.refactorer),
        ];

        Self {
            name: name.to_string(),
            stages,
            generator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage in order. The first failing stage aborts the run.
    pub async fn run(&self, task: &str) -> Result<WorkflowState> {
        let mut state = WorkflowState::new(task);

        for (step, stage) in self.stages.iter().enumerate() {
            tracing::info!(
                pipeline = %self.name,
                stage = stage.name(),
                step = step + 1,
                "Running stage"
            );

            let update = stage.run(self.generator.as_ref(), &state).await?;
            state.apply(update);

            tracing::info!(
                pipeline = %self.name,
                stage = stage.name(),
                produced = stage.kind().produces(),
                "Stage completed"
            );
        }

        debug_assert!(state.is_complete());
        tracing::info!(
            pipeline = %self.name,
            complete = state.is_complete(),
            "Pipeline completed"
        );
        Ok(state)
    }
}
