// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod orchestrator;
pub mod report;
pub mod types;
pub mod watch;
pub mod workflow;

use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, StepArgs, WatchArgs, WorkflowArgs};
use crate::config::{RawConfigFile, ReportSettings, WatchSettings};
use crate::engine::{SessionOutcome, watch_workflow};
use crate::orchestrator::adapter_for;
use crate::report::{HttpStatusApi, Reporter};
use crate::watch::{KubeWatchSource, build_client};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and settings resolution
/// - orchestrator client, adapter and watch source
/// - status API client and reporter
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let file = config::load_optional(args.config.as_deref())?;

    // Ctrl-C → graceful shutdown.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    match args.command {
        Command::Watch(watch) => run_watch(&watch, &file, cancel).await,
        Command::Workflow(workflow) => report_workflow_once(&workflow, &file).await,
        Command::Step(step) => report_step(&step, &file, cancel).await,
    }
}

async fn run_watch(args: &WatchArgs, file: &RawConfigFile, cancel: CancellationToken) -> Result<()> {
    let settings = WatchSettings::resolve(args.workflow_id.as_deref(), &args.api, &args.cluster, file)?;
    info!(
        workflow_id = %settings.workflow_id,
        runtime = %settings.cluster.runtime,
        namespace = %settings.cluster.namespace,
        "starting workflow watch"
    );

    let client = build_client(&settings.cluster).await?;
    let adapter = adapter_for(settings.cluster.runtime, &settings.labels);
    let source = KubeWatchSource::new(client, &settings.cluster.namespace, &adapter.api_resource());
    let api = HttpStatusApi::new(&settings.api)?;

    match watch_workflow(adapter, source, api, &settings.workflow_id, cancel).await? {
        SessionOutcome::Finished(status) => debug!(%status, "watch session finished"),
        SessionOutcome::Cancelled => debug!("watch session cancelled"),
    }

    Ok(())
}

async fn report_workflow_once(args: &WorkflowArgs, file: &RawConfigFile) -> Result<()> {
    let settings = ReportSettings::resolve(args.workflow_id.as_deref(), &args.api, file)?;
    let reporter = Reporter::new(HttpStatusApi::new(&settings.api)?, settings.workflow_id);

    reporter
        .report_workflow(args.status, args.error.as_deref())
        .await?;
    Ok(())
}

/// Report a step once, or every `--repeat-every` seconds until Ctrl-C.
///
/// Registration happens at most once, on the first report.
async fn report_step(args: &StepArgs, file: &RawConfigFile, cancel: CancellationToken) -> Result<()> {
    let settings = ReportSettings::resolve(args.workflow_id.as_deref(), &args.api, file)?;
    let reporter = Reporter::new(HttpStatusApi::new(&settings.api)?, settings.workflow_id);

    let mut register = args.register;
    loop {
        reporter
            .report_step(&args.step, args.status, args.error.as_deref(), register)
            .await?;
        register = false;

        let Some(secs) = args.repeat_every.filter(|s| *s > 0) else {
            return Ok(());
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                info!(step = %args.step, "step reporting cancelled");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
        }
    }
}
