//! Citizen-science catalog CLI
//!
//! Converts the project list between its CSV, YAML record and README forms.

use std::path::PathBuf;

use catalog::{
    error::Result,
    models::Config,
    pipeline,
    services::LinkChecker,
    storage::LocalStorage,
};
use clap::Parser;

/// Keep the citizen-science project list in sync
#[derive(Parser, Debug)]
#[command(
    name = "catalog",
    version,
    about = "Citizen-science project list synchronizer"
)]
struct Cli {
    /// Read the CSV and convert each project to YAML
    #[arg(long = "csv-to-yaml")]
    csv_to_yaml: bool,

    /// Read all the YAML files and convert them to CSV and README
    #[arg(long = "yaml-to-csv-to-readme")]
    yaml_to_csv_to_readme: bool,

    /// Dataset root directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to config file (default: {root}/catalog.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.csv_to_yaml && !cli.yaml_to_csv_to_readme {
        log::info!("Nothing to do. Pass --csv-to-yaml and/or --yaml-to-csv-to-readme.");
        return Ok(());
    }

    let config_path = cli.config.unwrap_or_else(|| cli.root.join("catalog.toml"));
    let config = if config_path.exists() {
        log::info!("Loaded configuration from {}", config_path.display());
        Config::load_or_default(&config_path)
    } else {
        Config::default()
    };

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let storage = LocalStorage::with_style(config.records_path(&cli.root), config.records);

    if cli.csv_to_yaml {
        pipeline::run_import(&config, &cli.root, &storage).await?;
    }

    if cli.yaml_to_csv_to_readme {
        let checker = LinkChecker::new(&config.checker)?;
        pipeline::run_publish(&config, &cli.root, &storage, &checker).await?;
    }

    log::info!("Done!");

    Ok(())
}
