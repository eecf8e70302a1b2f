use std::sync::Arc;

use chrono::TimeZone;

use reviewchain::error::AppError;
use reviewchain::llm::scripted::ScriptedGenerator;
use reviewchain::report;
use reviewchain::workflow::{Pipeline, TemplateSet, WorkflowState};

fn scripted_pipeline(templates: TemplateSet) -> (Pipeline, ScriptedGenerator) {
    let generator = ScriptedGenerator::new(["CODE_A", "REVIEW_B", "REFACTORED_C"]);
    let pipeline = Pipeline::new("sequential_workflow", Arc::new(generator.clone()), templates);
    (pipeline, generator)
}

#[tokio::test]
async fn email_validator_scenario() {
    let (pipeline, _) = scripted_pipeline(TemplateSet::structured());

    let state = pipeline.run("email validator function").await.unwrap();

    assert_eq!(
        state,
        WorkflowState {
            input: "email validator function".to_string(),
            code: Some("CODE_A".to_string()),
            review: Some("REVIEW_B".to_string()),
            refactored_code: Some("REFACTORED_C".to_string()),
        }
    );
}

#[tokio::test]
async fn each_stage_sees_prior_outputs() {
    let (pipeline, generator) = scripted_pipeline(TemplateSet::structured());

    pipeline.run("email validator function").await.unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 3);

    assert_eq!(prompts[0].user, "email validator function");
    assert!(prompts[0].system.as_deref().unwrap().contains("Senior Software Engineer"));

    assert_eq!(prompts[1].user, "Review this code:\nCODE_A");

    assert_eq!(
        prompts[2].user,
        "Original code:\nCODE_A\n\nReview feedback:\nREVIEW_B\n\nRefactor accordingly:"
    );
}

#[tokio::test]
async fn plain_templates_interpolate_raw_strings() {
    let (pipeline, generator) = scripted_pipeline(TemplateSet::plain());

    pipeline.run("email validator function").await.unwrap();

    let users: Vec<String> = generator.prompts().into_iter().map(|p| p.user).collect();
    assert_eq!(
        users,
        vec![
            "Write Python code for: email validator function".to_string(),
            "Review this code:\nCODE_A".to_string(),
            "Based on suggestions, refactor this code:\nCODE_A\nREVIEW_B".to_string(),
        ]
    );
}

#[tokio::test]
async fn reviewer_failure_propagates() {
    let generator = ScriptedGenerator::new(["CODE_A"]);
    generator.push_failure("API returned 401 Unauthorized");
    let pipeline = Pipeline::new("p", Arc::new(generator.clone()), TemplateSet::structured());

    let err = pipeline.run("task").await.unwrap_err();

    assert!(matches!(err, AppError::ClaudeApi(msg) if msg.contains("401")));
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn run_then_export_report() {
    let (pipeline, _) = scripted_pipeline(TemplateSet::structured());
    let tmp = tempfile::tempdir().unwrap();
    let generated_at = chrono::Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    let task = "email validator function";
    let state = pipeline.run(task).await.unwrap();
    let path = report::export(&state, task, pipeline.name(), tmp.path(), &generated_at)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(path.ends_with("SEQUENTIAL_WORKFLOW.md"));
    assert!(content.starts_with("# Sequential Workflow Results\n"));
    assert!(content.contains("**Generated:** 2024-01-02 03:04:05  \n"));
    assert!(content.contains("**Task:** email validator function\n"));
    assert!(content.contains("## Original Code\n\nCODE_A\n"));
    assert!(content.contains("## Review Feedback\n\nREVIEW_B\n"));
    assert!(content.contains("## Refactored Code\n\nREFACTORED_C\n"));
}
