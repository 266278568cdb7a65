use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use watches::SystemClock;

mod client;
mod config;
mod monitoring;
#[cfg(test)]
mod test_support;

use client::HttpRegistryClient;
use config::Config;
use monitoring::{HttpChecker, MonitoringExecutor, MonitoringScheduler};

/// Uptick poller: checks due watches and reports results to the registry
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/uptick/service.toml
    #[arg(short, long, env = "UPTICK_SERVICE_CONFIG")]
    config: Option<PathBuf>,

    /// Registry base url, overrides the config file
    #[arg(long, env = "UPTICK_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Run a single polling cycle and exit
    #[arg(long)]
    once: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logger::init_tracing();

    let args = Args::parse();
    let mut config = Config::from_config(args.config.as_deref()).context("loading config")?;
    if let Some(registry_url) = args.registry_url {
        config.registry.base_url = registry_url;
    }
    config.validate()?;

    if args.print_config {
        println!("{config}");
        return Ok(());
    }

    let registry = HttpRegistryClient::new(&config.registry.base_url, config.registry.request_timeout())
        .context("building registry client")?;
    let checker = HttpChecker::new(config.poller.check_timeout()).context("building http checker")?;
    let scheduler = MonitoringScheduler::new(
        Arc::new(registry),
        MonitoringExecutor::new(Arc::new(checker)),
        Arc::new(SystemClock),
        config.poller.settings(),
    );

    if args.once {
        let report = scheduler.run_cycle().await.context("listing watches")?;
        info!(
            "Cycle done: {} listed, {} checked, {} not reported",
            report.listed,
            report.checked(),
            report.report_failures()
        );
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested, finishing the current cycle");
                shutdown_tx.send(true).ok();
            }
            Err(e) => {
                warn!("Cannot listen for Ctrl-C, running until killed: {e}");
                // Dropping the sender would read as a shutdown
                std::future::pending::<()>().await;
            }
        }
    });

    scheduler.run(shutdown_rx).await;
    Ok(())
}
