// src/watch/client.rs

//! Orchestrator API client construction.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::info;

use crate::config::ClusterSettings;
use crate::errors::{ReporterError, Result};

/// Build a Kubernetes client from the cluster settings.
///
/// An explicit kubeconfig is tried first; if it cannot be loaded the
/// in-cluster configuration is used instead.
pub async fn build_client(settings: &ClusterSettings) -> Result<Client> {
    let mut config = if settings.in_cluster {
        in_cluster_config()?
    } else {
        match kubeconfig(settings).await {
            Ok(config) => config,
            Err(err) => {
                info!(error = %err, "failed to load kubeconfig, trying in-cluster config");
                in_cluster_config()?
            }
        }
    };

    if settings.insecure_skip_tls_verify {
        info!("orchestrator TLS verification disabled");
        config.accept_invalid_certs = true;
    }

    Ok(Client::try_from(config)?)
}

fn in_cluster_config() -> Result<Config> {
    Config::incluster().map_err(|err| ReporterError::KubeConfigError(err.to_string()))
}

async fn kubeconfig(settings: &ClusterSettings) -> Result<Config> {
    let options = KubeConfigOptions {
        context: settings.context_name.clone(),
        ..KubeConfigOptions::default()
    };

    let config = match &settings.config_path {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .map_err(|err| ReporterError::KubeConfigError(err.to_string()))?;
            Config::from_custom_kubeconfig(kubeconfig, &options).await
        }
        None => Config::from_kubeconfig(&options).await,
    };

    config.map_err(|err| ReporterError::KubeConfigError(err.to_string()))
}
