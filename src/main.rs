//! Math Tutor - Main Server
//!
//! Query gateway, generation engine and knowledge-graph loader.

use anyhow::Result;
use clap::{Parser, Subcommand};
use math_tutor::{knowledge::RefreshMode, AppState, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "math-tutor")]
#[command(about = "Math Tutor services")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the query gateway
    Gateway {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Solution engine endpoint (overrides config)
        #[arg(long)]
        engine_url: Option<String>,
    },

    /// Start the generation engine
    Engine {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load a dataset into the knowledge graph
    Load {
        /// Directory holding concepts.yaml, problems.yaml and solutions.yaml.
        /// Repeat to merge several datasets into one load.
        #[arg(short, long = "data-dir")]
        data_dir: Vec<PathBuf>,

        /// Clear the whole graph before loading
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,math_tutor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(Some(&cli.config))?;

    match cli.command {
        Commands::Gateway { port, engine_url } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(url) = engine_url {
                config.engine_url = url;
            }
            math_tutor::start_gateway(config).await
        }
        Commands::Engine { port } => {
            if let Some(port) = port {
                config.engine_port = port;
            }
            math_tutor::start_engine(config).await
        }
        Commands::Load { data_dir, replace } => {
            let data_dirs = if data_dir.is_empty() {
                vec![config.data_dir.clone()]
            } else {
                data_dir
            };
            let mode = if replace {
                RefreshMode::Replace
            } else {
                RefreshMode::Merge
            };
            run_load(config, data_dirs, mode).await
        }
    }
}

async fn run_load(config: Config, data_dirs: Vec<PathBuf>, mode: RefreshMode) -> Result<()> {
    if mode == RefreshMode::Replace {
        tracing::warn!("--replace given: every node in the graph will be deleted first");
    }

    let state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j");

    let report = math_tutor::load_knowledge(&state, &data_dirs, mode).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
