mod config;
mod logging;
mod statsd;

use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigError};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(about = "Aggregates product listings from the company APIs")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the catalog HTTP API.
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// YAML config file. Every setting has a default, so this is optional.
    #[arg(long)]
    config_file: Option<PathBuf>,
}

fn load_config(args: &ServeArgs) -> Result<Config, ConfigError> {
    let mut config = match &args.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let port = std::env::var("PORT").ok();
    config.catalog = config.catalog.with_port_override(port.as_deref())?;

    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        CliCommand::Serve(args) => {
            let config = match load_config(args) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load config: {e}");
                    process::exit(1);
                }
            };

            let _sentry = match logging::init(&config.common.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            };

            if let Err(e) = statsd::init(config.common.metrics.as_ref()) {
                tracing::error!(error = %e, "failed to initialize metrics");
                process::exit(1);
            }

            // Upstream calls for one request are concurrent tasks on a single thread.
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to build runtime");
                    process::exit(1);
                }
            };

            tracing::info!("starting catalog");
            let result = rt.block_on(catalog::serve(config.catalog, shutdown_signal()));

            if let Err(e) = result {
                tracing::error!(error = %e, "catalog exited with error");
                process::exit(1);
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Never resolve: keep serving rather than shutting down immediately.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
