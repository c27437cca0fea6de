use anyhow::{Context, Result};
use clap::Parser;
use dorank::cli::app::App;
use dorank::cli::{self, Cli, Commands};
use dorank::config::{default_config_path, Config};
use log::info;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();
    dorank::search::log_panics();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load_from(&config_path).context("Failed to load configuration")?;

    info!("Configuration loaded successfully");
    info!("Store backend: {:?}", config.store.backend);

    let app = App::new(config, cli.catalog.as_deref())?;

    // Dispatch commands
    match &cli.command {
        Commands::Search(cmd) => cli::search::handle(cmd, &app)?,
        Commands::Select(cmd) => cli::report::handle_select(cmd, &app)?,
        Commands::Reject(cmd) => cli::report::handle_reject(cmd, &app)?,
        Commands::Items(cmd) => cli::items::handle(cmd, &app)?,
        Commands::Status(cmd) => cli::status::handle(cmd, &app)?,
        Commands::Cleanup(cmd) => cli::cleanup::handle(cmd, &app)?,
    }

    Ok(())
}
