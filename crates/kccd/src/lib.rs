//! kccd - Config Connector migration assistant daemon.
//!
//! Library components for the daemon process: the HTTP control plane and
//! the external collaborators (git, mapper generation).

pub mod git;
pub mod mapper;
pub mod server;

use kcc_core::config::Config;
use tracing::info;

/// Daemon configuration, assembled from CLI flags in `main`.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// HTTP server port (default: 7800).
    pub port: u16,
    /// Auth token for the HTTP API (optional).
    pub auth_token: Option<String>,
    /// Path to the JSON config file.
    pub config_path: std::path::PathBuf,
}

/// Load configuration and serve the HTTP API until shutdown.
///
/// Author identity falls back to `git config` when neither the environment
/// nor the config file provides one.
pub async fn run(daemon_config: DaemonConfig) -> eyre::Result<()> {
    let author_fallback = git::read_git_author();
    let config = Config::load(&daemon_config.config_path, Some(author_fallback))
        .map_err(|e| eyre::eyre!("{e}"))?;

    info!("repository: {}", config.repo_root.display());
    info!(
        "author: {} <{}>",
        config.author.author_name, config.author.author_email
    );
    if daemon_config.auth_token.is_some() {
        info!("auth token: enabled");
    }

    server::start_server(config, daemon_config.port, daemon_config.auth_token)
        .await
        .map_err(|e| eyre::eyre!("{e}"))
}
