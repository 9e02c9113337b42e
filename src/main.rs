use anyhow::Result;
use arkrcon::cli::{handle_config, App, Cli, Commands};
use arkrcon::Config;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge file, environment and command-line settings
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(address) = &cli.address {
        config.address = address.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    debug!(config = ?config, "Resolved configuration");
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Config { command } => handle_config(command, cli.config.as_deref(), &config),
        command => {
            let app = App::connect(&config, cli.json).await?;
            let result = app.run(command).await;
            if let Err(e) = app.close().await {
                debug!("Error while disconnecting: {:#}", e);
            }
            result
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
