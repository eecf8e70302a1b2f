/// State threaded through every stage of a pipeline run.
///
/// Created with only `input` set; each stage fills in one more field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub input: String,
    pub code: Option<String>,
    pub review: Option<String>,
    pub refactored_code: Option<String>,
}

impl WorkflowState {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Merge a stage's output. Fields the update leaves unset are kept.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(code) = update.code {
            self.code = Some(code);
        }
        if let Some(review) = update.review {
            self.review = Some(review);
        }
        if let Some(refactored_code) = update.refactored_code {
            self.refactored_code = Some(refactored_code);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.code.is_some() && self.review.is_some() && self.refactored_code.is_some()
    }
}

/// Partial state produced by a single stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub code: Option<String>,
    pub review: Option<String>,
    pub refactored_code: Option<String>,
}
