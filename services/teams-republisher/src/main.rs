//! Teams republisher CLI
//!
//! Called by an Icinga2 NotificationCommand with the notification macros as flags.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use teams_republisher::io::ReqwestHttpClient;
use teams_republisher::params::RawParams;
use teams_republisher::{load_config, run, Settings};
use tracing::Level;

#[derive(Parser)]
#[command(name = "teams-republisher")]
#[command(about = "Republishes Icinga2 notifications to a Microsoft Teams webhook")]
#[command(version)]
struct Args {
    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long = "verbosity", action = ArgAction::Count)]
    verbosity: u8,

    /// Path to a JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    params: RawParams,
}

fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbosity))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, verbosity={}",
        args.config,
        args.verbosity
    );

    let settings = match &args.config {
        Some(config_path) => {
            tracing::debug!("Loading settings from {:?}", config_path);
            load_config(config_path)
        }
        None => Ok(Settings::default()),
    };

    let result = match settings {
        Ok(settings) => run(&args.params, &settings, Arc::new(ReqwestHttpClient::new())).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
