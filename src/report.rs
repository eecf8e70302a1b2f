use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::workflow::WorkflowState;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Printed before a report-mode run starts.
pub const RUNNING_BANNER: &str = "Running sequential workflow...";

/// `sequential_workflow` → `Sequential Workflow`.
///
/// Underscores become spaces one-for-one. A letter is upper-cased when the
/// character before it is not a letter, so `v2x` becomes `V2X`.
pub fn title(pipeline_name: &str) -> String {
    let mut out = String::with_capacity(pipeline_name.len());
    let mut after_letter = false;

    for c in pipeline_name.chars() {
        let c = if c == '_' { ' ' } else { c };
        let cased = c.is_lowercase() || c.is_uppercase();
        if !cased {
            out.push(c);
        } else if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = cased;
    }

    out
}

/// `sequential_workflow` → `SEQUENTIAL_WORKFLOW.md`.
pub fn file_name(pipeline_name: &str) -> String {
    format!("{}.md", pipeline_name.to_uppercase())
}

/// Markdown report of a finished run. Only `generated_at` varies between
/// renders of the same state.
pub fn render(
    state: &WorkflowState,
    task: &str,
    pipeline_name: &str,
    generated_at: &DateTime<Local>,
) -> String {
    format!(
        "# {title} Results\n\
         \n\
         **Generated:** {generated}  \n\
         **Task:** {task}\n\
         \n\
         ## Original Code\n\
         \n\
         {code}\n\
         \n\
         ## Review Feedback\n\
         \n\
         {review}\n\
         \n\
         ## Refactored Code\n\
         \n\
         {refactored}\n\
         \n\
         ---\n\
         *Generated by reviewchain sequential workflow*\n",
        title = title(pipeline_name),
        generated = generated_at.format(TIMESTAMP_FORMAT),
        code = state.code.as_deref().unwrap_or("No code generated"),
        review = state.review.as_deref().unwrap_or("No review available"),
        refactored = state
            .refactored_code
            .as_deref()
            .unwrap_or("No refactored code available"),
    )
}

/// Write the report into `output_dir`, replacing any previous report of the
/// same pipeline. Returns the written path.
pub async fn export(
    state: &WorkflowState,
    task: &str,
    pipeline_name: &str,
    output_dir: &Path,
    generated_at: &DateTime<Local>,
) -> Result<PathBuf> {
    let path = output_dir.join(file_name(pipeline_name));
    let content = render(state, task, pipeline_name, generated_at);

    tokio::fs::write(&path, content).await?;

    tracing::info!(path = %path.display(), "Report exported");
    Ok(path)
}

/// Plain-text dump of the stage outputs for terminal use.
pub fn console_summary(state: &WorkflowState) -> String {
    format!(
        "CODE: {}\nREVIEW: {}\nREFACTORED CODE: {}\n",
        state.code.as_deref().unwrap_or_default(),
        state.review.as_deref().unwrap_or_default(),
        state.refactored_code.as_deref().unwrap_or_default(),
    )
}

/// Closing lines printed once the report file is written.
pub fn completion_notice(path: &Path) -> String {
    format!(
        "Results exported to: {}\n\
         === WORKFLOW COMPLETED ===\n\
         Check the generated markdown file for detailed results.\n",
        path.display()
    )
}
