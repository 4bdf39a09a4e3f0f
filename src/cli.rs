// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every connection setting can also be given through the environment, so
//! the binary can run as a container sidecar without arguments.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{RuntimeKind, StepStatus, WorkflowStatus};

/// Command-line arguments for `status-reporter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "status-reporter",
    version,
    about = "Watch a CI/CD workflow and report its status to a status API.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional config file (TOML).
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "STATUS_REPORTER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STATUS_REPORTER_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Show more logs (same as `--log-level debug`).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch a workflow and report every status change until it finishes.
    Watch(WatchArgs),

    /// Report a workflow status once.
    Workflow(WorkflowArgs),

    /// Report a workflow step status once, or repeatedly.
    Step(StepArgs),
}

/// Status API connection options shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ApiArgs {
    /// Status API token.
    #[arg(long, value_name = "TOKEN", env = "CODEFRESH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Endpoint receiving workflow events.
    #[arg(long, value_name = "URL", env = "EVENT_REPORTING_URL")]
    pub event_reporting_url: Option<String>,

    /// Verify the status API TLS certificate.
    #[arg(
        long,
        value_name = "BOOL",
        env = "NODE_TLS_REJECT_UNAUTHORIZED",
        value_parser = BoolishValueParser::new()
    )]
    pub tls_reject_unauthorized: Option<bool>,
}

/// Orchestrator connection options.
#[derive(Debug, Clone, Default, Args)]
pub struct ClusterArgs {
    /// Orchestrator running the workflow.
    #[arg(long, value_name = "RUNTIME", env = "RUNTIME")]
    pub runtime: Option<RuntimeKind>,

    /// Namespace the workflow runs in.
    #[arg(long, value_name = "NAMESPACE", env = "CLUSTER_NAMESPACE")]
    pub cluster_namespace: Option<String>,

    /// Use the in-cluster service account instead of a kubeconfig.
    #[arg(
        long,
        value_name = "BOOL",
        env = "IN_CLUSTER",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub in_cluster: Option<bool>,

    /// Kubeconfig path.
    #[arg(long, value_name = "PATH", env = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Kubeconfig context.
    #[arg(long, value_name = "NAME", env = "CONTEXT_NAME")]
    pub context_name: Option<String>,

    /// Skip orchestrator API certificate verification.
    #[arg(long)]
    pub insecure_skip_tls_verify: bool,
}

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// Workflow identifier.
    #[arg(long = "workflow", value_name = "ID", env = "WORKFLOW_ID")]
    pub workflow_id: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub cluster: ClusterArgs,
}

#[derive(Debug, Clone, Args)]
pub struct WorkflowArgs {
    /// Workflow identifier.
    #[arg(long = "workflow", value_name = "ID", env = "WORKFLOW_ID")]
    pub workflow_id: Option<String>,

    /// Status to report.
    #[arg(long, value_name = "STATUS", default_value = "error")]
    pub status: WorkflowStatus,

    /// Error text attached to a failed workflow.
    #[arg(long, value_name = "TEXT")]
    pub error: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Clone, Args)]
pub struct StepArgs {
    /// Workflow identifier.
    #[arg(long = "workflow", value_name = "ID", env = "WORKFLOW_ID")]
    pub workflow_id: Option<String>,

    /// Step name.
    #[arg(long, value_name = "NAME", env = "STEP")]
    pub step: String,

    /// Status to report.
    #[arg(long, value_name = "STATUS", default_value = "running")]
    pub status: StepStatus,

    /// Error text attached to a failed step.
    #[arg(long, value_name = "TEXT")]
    pub error: Option<String>,

    /// Register the step before reporting its status.
    #[arg(long)]
    pub register: bool,

    /// Repeat the report every N seconds until interrupted.
    #[arg(long, value_name = "SECONDS")]
    pub repeat_every: Option<u64>,

    #[command(flatten)]
    pub api: ApiArgs,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
