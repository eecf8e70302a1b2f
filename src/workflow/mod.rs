pub mod pipeline;
pub mod prompt;
pub mod stage;
pub mod types;

pub use pipeline::Pipeline;
pub use prompt::{PromptTemplate, TemplateSet};
pub use stage::{Stage, StageKind};
pub use types::{StateUpdate, WorkflowState};
