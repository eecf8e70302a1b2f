use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reviewchain::config::{AppConfig, OutputMode, PromptStyle};
use reviewchain::llm::claude::ClaudeClient;
use reviewchain::report;
use reviewchain::workflow::{Pipeline, TemplateSet};

#[derive(Parser)]
#[command(name = "reviewchain", about = "Generate, review and refactor code with Claude")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Task description handed to the coder stage
    #[arg(short, long)]
    task: Option<String>,

    /// Where to put the results
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// Template set used to build stage prompts
    #[arg(long, value_enum)]
    prompt_style: Option<PromptStyle>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so console output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(task) = cli.task {
        config.pipeline.task = task;
    }
    if let Some(output) = cli.output {
        config.pipeline.output = output;
    }
    if let Some(style) = cli.prompt_style {
        config.pipeline.prompt_style = style;
    }

    let pipeline_config = &config.pipeline;

    tracing::info!(
        pipeline = %pipeline_config.name,
        model = %config.claude.model,
        prompt_style = ?pipeline_config.prompt_style,
        output = ?pipeline_config.output,
        "Running sequential workflow"
    );

    let claude = ClaudeClient::from_config(&config.claude, config.claude_api_key()?);
    let pipeline = Pipeline::new(
        &pipeline_config.name,
        Arc::new(claude),
        TemplateSet::for_style(pipeline_config.prompt_style),
    );

    if pipeline_config.output == OutputMode::Report {
        println!("{}", report::RUNNING_BANNER);
    }

    let state = pipeline.run(&pipeline_config.task).await?;

    match pipeline_config.output {
        OutputMode::Report => {
            let path = report::export(
                &state,
                &pipeline_config.task,
                pipeline.name(),
                &pipeline_config.output_dir,
                &chrono::Local::now(),
            )
            .await?;
            print!("{}", report::completion_notice(&path));
        }
        OutputMode::Console => {
            print!("{}", report::console_summary(&state));
        }
    }

    Ok(())
}
