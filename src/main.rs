//! Command-line interface for volt-connect
//!
//! # Usage Examples
//!
//! ```bash
//! # Validate a connector properties file and print the resolved configuration
//! volt-connect check --properties sink.properties
//!
//! # Same, as JSON for tooling
//! volt-connect check --properties sink.properties --json
//!
//! # List every recognized configuration option
//! volt-connect options
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use volt_connect::properties::load_properties;
use volt_connect::{SinkConnector, CONNECTOR_VERSION};

#[derive(Parser)]
#[command(name = "volt-connect")]
#[command(about = "Configuration tooling for the volt-connect sink connector")]
#[command(version = CONNECTOR_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a connector properties file and print the resolved configuration
    Check {
        /// Path to a java-style .properties file
        #[arg(long, value_name = "PATH")]
        properties: std::path::PathBuf,

        /// Print the resolved configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every recognized configuration option
    Options,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { properties, json } => {
            let props = load_properties(&properties)?;
            let connector = SinkConnector::start(props)
                .with_context(|| format!("invalid connector configuration in {properties:?}"))?;
            let config = connector.config()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("configuration is valid");
                println!("  name               = {}", config.name);
                println!("  connector class    = {}", config.connector_class);
                println!("  tasks.max          = {}", config.tasks_max);
                println!("  servers            = {}", config.servers.join(","));
                println!("  procedure          = {}", config.procedure);
                println!(
                    "  formatter          = {} ({})",
                    config.formatter_factory, config.formatter_type
                );
                println!("  converter          = {}", config.converter);
                println!("  auto reconnect     = {}", config.auto_reconnect);
                println!("  flush retry max    = {}", config.flush_retry_max);
                println!("  response timeout   = {} ms", config.response_timeout_ms);
                println!("  procedure timeout  = {} ms", config.procedure_timeout_ms);
                if let Some(kerberos) = &config.kerberos {
                    println!("  kerberos module    = {kerberos}");
                }
            }
        }
        Commands::Options => {
            for (key, doc) in sink_core::config::recognized_options() {
                println!("{key}");
                println!("    {doc}");
            }
        }
    }

    Ok(())
}
