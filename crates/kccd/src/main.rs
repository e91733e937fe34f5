//! kccd - Config Connector migration assistant daemon.
//!
//! Main entry point for the daemon binary.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::Parser;
use kccd::DaemonConfig;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kccd", about = "Config Connector migration assistant daemon", version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "7800")]
    port: u16,

    /// Auth token for the HTTP API
    #[arg(long, env = "KCCD_TOKEN")]
    token: Option<String>,

    /// Path to the JSON config file
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DaemonConfig {
        port: cli.port,
        auth_token: cli.token,
        config_path: cli
            .config
            .unwrap_or_else(kcc_core::Config::default_file_path),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    runtime.block_on(async {
        if let Err(e) = kccd::run(config).await {
            error!("daemon error: {e}");
            std::process::exit(1);
        }
    });
}
