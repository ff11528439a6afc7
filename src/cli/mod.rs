use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod address;
pub mod config;
pub mod derive_id;
pub mod init_config;
pub mod run;
pub mod version;

#[derive(Parser)]
#[command(name = "voting-registry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the role-gated voting registry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a registry and play a scenario file against it
    Run {
        /// Scenario file (TOML list of [[step]] entries)
        #[arg(long)]
        scenario: String,

        /// Path to config file (default: ~/.local/share/voting-registry/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the proposal id derived from a proposal name
    DeriveId {
        /// Proposal name (at most 32 bytes)
        name: String,
    },

    /// Print the address derived from a key or label
    Address {
        /// Key material or label
        label: String,
    },

    /// Write a default config file
    InitConfig {
        /// Deploying identity (0x address or label)
        #[arg(long)]
        deployer: String,

        /// Where to write the config (default: ~/.local/share/voting-registry/config.toml)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            scenario,
            config,
            json,
        } => run::execute(scenario, config, json).await,
        Commands::DeriveId { name } => derive_id::execute(&name),
        Commands::Address { label } => {
            address::execute(&label);
            Ok(())
        }
        Commands::InitConfig {
            deployer,
            path,
            force,
        } => init_config::execute(deployer, path, force),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Ignore "already set" when called twice in one process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
