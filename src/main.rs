//! `Congregate` - church management from the command line.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use congregate::config::Config;
use congregate::storage::FileStorage;

mod cli;

use cli::Cli;

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "congregate=debug" } else { "congregate=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    tracing::debug!("{} {} using {}", config.app_name(), config.app_version(), config.data_dir.display());

    let storage = FileStorage::new(&config.data_dir);
    cli::run(cli.command, &storage, &config)
}
