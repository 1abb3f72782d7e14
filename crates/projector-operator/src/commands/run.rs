use std::env;

use anyhow::{Context, Result};
use projector_operator::config::loader::{DEFAULT_CONFIG_PATH, load_config};
use projector_operator::{controller, observability};

use crate::cli::RunArgs;

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From PROJECTOR_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (projector.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (PROJECTOR_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

pub async fn run(args: &RunArgs) -> Result<()> {
    let (config_path, source) = resolve_config_path(args);

    let mut cfg = load_config(Some(config_path.as_str()))
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    if let Some(ns) = &args.namespace {
        cfg.controller.namespace = Some(ns.clone());
    }

    observability::apply_logging_level(&cfg.logging.level);
    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    let client = kube::Client::try_default()
        .await
        .context("failed to connect to the cluster")?;

    controller::run(client, &cfg).await;
    Ok(())
}

fn resolve_config_path(args: &RunArgs) -> (String, ConfigSource) {
    // 1. Check CLI: --config <path>
    if let Some(path) = &args.config {
        return (path.clone(), ConfigSource::CliArgument);
    }

    // 2. Check environment variable
    if let Ok(path) = env::var("PROJECTOR_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    // 3. Default to projector.toml
    (DEFAULT_CONFIG_PATH.to_string(), ConfigSource::Default)
}
