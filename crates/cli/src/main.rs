//! BIG-IP CLI - Main Entry Point
//!
//! Drives the folder resource lifecycle against a BIG-IP device.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use bigip_cli::commands::folder;
use bigip_cli::output::{self, print_error};
use bigip_common::ProviderConfig;
use bigip_provider::BigIpClient;

/// BIG-IP CLI - folder management over iControl REST
#[derive(Parser)]
#[command(name = "bigip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to ~/.bigip/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device address
    #[arg(long, env = "BIGIP_HOST", global = true)]
    address: Option<String>,

    /// Login user
    #[arg(long, env = "BIGIP_USER", global = true)]
    username: Option<String>,

    /// Login password
    #[arg(long, env = "BIGIP_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage folders
    #[command(subcommand)]
    Folder(folder::FolderCommands),

    /// Show version information
    Version,
}

impl Cli {
    /// File settings, then environment, then flags
    fn provider_config(&self) -> anyhow::Result<ProviderConfig> {
        let path = self.config.clone().unwrap_or_else(bigip_common::default_config_path);
        let mut config = ProviderConfig::load(&path)?;
        config.apply_env()?;

        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(username) = &self.username {
            config.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }

        debug!("Using config from {}", path.display());
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Folder(ref cmd) => {
            let config = cli.provider_config()?;
            let client = BigIpClient::connect(&config).await?;
            if let Err(e) = folder::execute(cmd.clone(), &client, cli.format).await {
                print_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("BIG-IP CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
