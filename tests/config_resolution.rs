// tests/config_resolution.rs

mod common;
use crate::common::TestResult;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tempfile::NamedTempFile;

use status_reporter::cli::{ApiArgs, CliArgs, ClusterArgs, Command};
use status_reporter::config::validate::resolve_workflow_id;
use status_reporter::config::{
    LabelSettings, RawConfigFile, ReportSettings, WatchSettings, load_from_path, load_optional,
};
use status_reporter::errors::ReporterError;
use status_reporter::types::{RuntimeKind, WorkflowStatus};

fn api_args() -> ApiArgs {
    ApiArgs {
        token: Some("token".to_string()),
        event_reporting_url: Some("https://status.example.com/api/events".to_string()),
        tls_reject_unauthorized: None,
    }
}

fn cluster_args() -> ClusterArgs {
    ClusterArgs {
        cluster_namespace: Some("pipelines".to_string()),
        ..ClusterArgs::default()
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn assert_config_error<T: std::fmt::Debug>(result: Result<T, ReporterError>, needle: &str) {
    match result {
        Err(ReporterError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "'{msg}' does not mention '{needle}'")
        }
        other => panic!("expected config error mentioning '{needle}', got {other:?}"),
    }
}

#[test]
fn loads_full_config_file() -> TestResult {
    let file = write_config(
        r#"
[api]
event_reporting_url = "https://file.example.com/events"
tls_reject_unauthorized = false
timeout_secs = 15

[cluster]
runtime = "tekton"
namespace = "ci"
in_cluster = true
context_name = "build"

[labels]
tekton = "example.com/run-id"
"#,
    );

    let raw = load_from_path(file.path())?;

    assert_eq!(raw.api.timeout_secs, Some(15));
    assert_eq!(raw.cluster.runtime, Some(RuntimeKind::Tekton));
    assert_eq!(raw.labels.tekton.as_deref(), Some("example.com/run-id"));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() {
    let file = write_config("[api]\nurl = \"https://x\"\n");

    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, ReporterError::TomlError(_)), "got {err:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_path("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ReporterError::IoError(_)));
}

#[test]
fn no_config_path_means_empty_config() -> TestResult {
    let raw = load_optional(None)?;
    assert!(raw.api.event_reporting_url.is_none());
    Ok(())
}

#[test]
fn cli_values_win_over_file_values() -> TestResult {
    let file = write_config(
        r#"
[api]
event_reporting_url = "https://file.example.com/events"
tls_reject_unauthorized = false

[cluster]
namespace = "from-file"
runtime = "tekton"
"#,
    );
    let raw = load_from_path(file.path())?;

    let mut api = api_args();
    api.tls_reject_unauthorized = Some(true);
    let mut cluster = cluster_args();
    cluster.runtime = Some(RuntimeKind::Argo);

    let settings = WatchSettings::resolve(Some("wf-1"), &api, &cluster, &raw)?;

    assert_eq!(settings.api.url.as_str(), "https://status.example.com/api/events");
    assert!(settings.api.tls_reject_unauthorized);
    assert_eq!(settings.cluster.namespace, "pipelines");
    assert_eq!(settings.cluster.runtime, RuntimeKind::Argo);
    Ok(())
}

#[test]
fn file_values_fill_gaps_and_defaults_fill_the_rest() -> TestResult {
    let file = write_config(
        r#"
[api]
event_reporting_url = "https://file.example.com/events"
timeout_secs = 20

[cluster]
namespace = "from-file"
config_path = "/etc/kube/config"
"#,
    );
    let raw = load_from_path(file.path())?;

    let api = ApiArgs {
        event_reporting_url: None,
        ..api_args()
    };
    let settings = WatchSettings::resolve(Some("wf-1"), &api, &ClusterArgs::default(), &raw)?;

    assert_eq!(settings.api.url.as_str(), "https://file.example.com/events");
    assert_eq!(settings.api.timeout, Some(Duration::from_secs(20)));
    assert!(settings.api.tls_reject_unauthorized);
    assert_eq!(settings.cluster.namespace, "from-file");
    assert_eq!(settings.cluster.runtime, RuntimeKind::Argo);
    assert_eq!(
        settings.cluster.config_path,
        Some(PathBuf::from("/etc/kube/config"))
    );
    assert!(!settings.cluster.in_cluster);
    assert_eq!(settings.labels, LabelSettings::default());
    Ok(())
}

#[test]
fn missing_or_blank_token_is_rejected() {
    let raw = RawConfigFile::default();

    let api = ApiArgs {
        token: None,
        ..api_args()
    };
    assert_config_error(ReportSettings::resolve(Some("wf"), &api, &raw), "token");

    let api = ApiArgs {
        token: Some("   ".to_string()),
        ..api_args()
    };
    assert_config_error(ReportSettings::resolve(Some("wf"), &api, &raw), "token");
}

#[test]
fn missing_url_and_bad_url_are_rejected() {
    let raw = RawConfigFile::default();

    let api = ApiArgs {
        event_reporting_url: None,
        ..api_args()
    };
    assert_config_error(ReportSettings::resolve(Some("wf"), &api, &raw), "URL");

    let api = ApiArgs {
        event_reporting_url: Some("not a url".to_string()),
        ..api_args()
    };
    assert_config_error(ReportSettings::resolve(Some("wf"), &api, &raw), "invalid");
}

#[test]
fn zero_timeout_is_rejected() -> TestResult {
    let file = write_config("[api]\ntimeout_secs = 0\n");
    let raw = load_from_path(file.path())?;

    assert_config_error(ReportSettings::resolve(Some("wf"), &api_args(), &raw), "timeout_secs");
    Ok(())
}

#[test]
fn missing_namespace_is_rejected_for_watch() {
    let raw = RawConfigFile::default();

    assert_config_error(
        WatchSettings::resolve(Some("wf"), &api_args(), &ClusterArgs::default(), &raw),
        "namespace",
    );
}

#[test]
fn workflow_id_must_be_a_label_value() {
    assert_config_error(resolve_workflow_id(None), "required");
    assert_config_error(resolve_workflow_id(Some("")), "required");
    assert_config_error(resolve_workflow_id(Some("has spaces")), "label value");
    assert_config_error(resolve_workflow_id(Some("-leading-dash")), "label value");
    assert_config_error(resolve_workflow_id(Some(&"a".repeat(64))), "label value");

    assert_eq!(resolve_workflow_id(Some("6512f0c1e8a4b2d9")).unwrap(), "6512f0c1e8a4b2d9");
    assert_eq!(resolve_workflow_id(Some(" build.42_x ")).unwrap(), "build.42_x");
}

#[test]
fn invalid_label_key_is_rejected() -> TestResult {
    let file = write_config("[labels]\nargo = \"not a key!\"\n");
    let raw = load_from_path(file.path())?;

    assert_config_error(
        WatchSettings::resolve(Some("wf"), &api_args(), &cluster_args(), &raw),
        "label key",
    );
    Ok(())
}

#[test]
fn unknown_runtime_in_file_is_rejected() {
    let file = write_config("[cluster]\nruntime = \"jenkins\"\n");

    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, ReporterError::TomlError(_)));
}

#[test]
fn cli_parses_watch_command() {
    let args = CliArgs::try_parse_from([
        "status-reporter",
        "watch",
        "--workflow",
        "wf-1",
        "--token",
        "t",
        "--event-reporting-url",
        "https://status.example.com/events",
        "--runtime",
        "tekton",
        "--cluster-namespace",
        "ci",
        "--in-cluster",
        "--tls-reject-unauthorized",
        "0",
        "--verbose",
    ])
    .unwrap();

    assert!(args.verbose);
    let Command::Watch(watch) = args.command else {
        panic!("expected watch command");
    };
    assert_eq!(watch.workflow_id.as_deref(), Some("wf-1"));
    assert_eq!(watch.cluster.runtime, Some(RuntimeKind::Tekton));
    assert_eq!(watch.cluster.in_cluster, Some(true));
    assert_eq!(watch.api.tls_reject_unauthorized, Some(false));
}

#[test]
fn cli_workflow_command_defaults_to_error() {
    let args = CliArgs::try_parse_from(["status-reporter", "workflow", "--workflow", "wf"]).unwrap();

    let Command::Workflow(workflow) = args.command else {
        panic!("expected workflow command");
    };
    assert_eq!(workflow.status, WorkflowStatus::Failed);
}

#[test]
fn cli_rejects_unknown_runtime() {
    let result = CliArgs::try_parse_from(["status-reporter", "watch", "--runtime", "jenkins"]);
    assert!(result.is_err());
}

#[test]
fn connection_flags_read_their_environment_variables() {
    let command = CliArgs::command();

    for sub in ["watch", "workflow", "step"] {
        let sub = command
            .find_subcommand(sub)
            .unwrap_or_else(|| panic!("missing subcommand {sub}"));
        let env_of = |id: &str| {
            sub.get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|env| env.to_str())
                .map(str::to_string)
        };

        assert_eq!(env_of("token").as_deref(), Some("CODEFRESH_TOKEN"));
        assert_eq!(env_of("event_reporting_url").as_deref(), Some("EVENT_REPORTING_URL"));
        assert_eq!(env_of("workflow_id").as_deref(), Some("WORKFLOW_ID"));
    }
}
