//! hostfacts
//!
//! Collects installed package and host identity facts and writes them as JSON

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr;
use hostfacts_exec::LocalRunner;
use hostfacts_inventory::host::UNKNOWN;
use hostfacts_inventory::{HostInfo, HostMetricsScraper, SystemHostInfo};
use hostfacts_pkg::PackageScraper;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

mod config;
mod emit;
mod logging;

use config::Config;
use emit::Report;
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "hostfacts")]
#[command(about = "Host identity and installed package collector", long_about = None)]
struct Cli {
    /// Config file (defaults to $HOSTFACTS_CONFIG or the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Collect host facts and installed packages
    Report,
    /// Collect host facts only
    Host,
    /// Collect installed packages only
    Packages,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::locate);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    logging::init(&config.agent.log_level, cli.log_format)?;
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => warn!("no config file found, using defaults"),
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling scrape");
            on_signal.cancel();
        }
    });

    let command = cli.command.unwrap_or(Commands::Report);
    let report = collect(command, &config, &cancel).await?;
    emit::write_report(&report, cli.output.as_deref())?;

    Ok(())
}

async fn collect(command: Commands, config: &Config, cancel: &CancellationToken) -> Result<Report> {
    let host_info: Arc<dyn HostInfo> = Arc::new(SystemHostInfo::new(&config.agent.deployment));
    let mut report = Report::default();

    if command != Commands::Packages {
        let scraper = HostMetricsScraper::new(&config.agent.identity_file, Arc::clone(&host_info));
        let record = scraper
            .scrape_host_metrics()
            .wrap_err("host metrics scrape failed")?;
        report.host = Some(record);
    }

    if command != Commands::Host {
        let os = host_info.os().unwrap_or_else(|e| {
            warn!(error = %e, "can't determine OS");
            UNKNOWN.to_string()
        });
        let scraper = PackageScraper::new(Arc::new(LocalRunner::new()), config.packages.clone(), os)
            .with_timeout(config.agent.command_timeout());
        report.packages = Some(scraper.scrape_installed_packages(cancel).await);
    }

    info!(
        host = report.host.is_some(),
        packages = report.packages.as_ref().map_or(0, Vec::len),
        "collection finished"
    );
    Ok(report)
}
