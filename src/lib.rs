pub mod config;
pub mod error;
pub mod llm;
pub mod report;
pub mod workflow;
