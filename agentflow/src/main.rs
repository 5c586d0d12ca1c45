#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};

use agentflow::completion::OpenAiClient;
use agentflow::config::Settings;
use agentflow::errors::AgentflowError;
use agentflow::events::{LoggingEventSink, Telemetry};
use agentflow::observability::init_tracing;
use agentflow::pipeline::{demo_workflow, AgentOrchestrator, WorkflowResult, DEFAULT_TOPIC};

#[derive(Parser)]
#[command(
    name = "agentflow",
    version,
    about = "Run the research, analysis, writing and review pipeline"
)]
struct Cli {
    /// Topic handed to the research stage
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,
    /// Run the demo workflow on the default topic
    #[arg(long)]
    demo: bool,
    /// Log workflow statistics after the run
    #[arg(long)]
    stats: bool,
    /// Log per-agent performance after the run (repeatable)
    #[arg(long = "agent", value_name = "NAME")]
    agents: Vec<String>,
    /// Write the result as JSON to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: loading settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&settings);

    let sink = LoggingEventSink::new(Level::INFO).with_metrics(settings.enable_metrics);
    let telemetry = Telemetry::new(Arc::new(sink));

    match run(cli, &settings, telemetry.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            telemetry.app_failed(&message);
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: &Settings, telemetry: Telemetry) -> anyhow::Result<()> {
    info!(
        project = %settings.project_name,
        model = %settings.model_name,
        "agentflow starting"
    );

    let client = OpenAiClient::from_settings(settings).context("building completion client")?;
    let orchestrator = AgentOrchestrator::from_settings(settings, Arc::new(client), telemetry);

    let result = execute(&orchestrator, &cli)
        .await
        .context("workflow failed")?;

    if cli.stats {
        let stats = orchestrator.get_workflow_statistics();
        info!("Workflow statistics:\n{}", serde_json::to_string_pretty(&stats)?);
    }

    for agent in &cli.agents {
        let perf = orchestrator.get_agent_performance(agent);
        info!("Performance for {}:\n{}", agent, serde_json::to_string_pretty(&perf)?);
    }

    match &cli.output {
        Some(path) => {
            write_json(path, &result)
                .with_context(|| format!("writing result to {}", path.display()))?;
            info!(path = %path.display(), "Result written");
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

async fn execute(
    orchestrator: &AgentOrchestrator,
    cli: &Cli,
) -> Result<WorkflowResult, AgentflowError> {
    let result = if cli.demo {
        demo_workflow(orchestrator).await?
    } else {
        orchestrator.execute_workflow(&cli.topic).await?
    };
    Ok(result)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), AgentflowError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
