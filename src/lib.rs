//! Math Tutor
//!
//! A tutoring backend with:
//! - Neo4j knowledge graph of concepts, problems and worked solutions
//! - A loader that ingests YAML datasets with deferred prerequisite edges
//! - A query gateway returning stored solutions or generating new ones
//! - A generation engine over any OpenAI-compatible model endpoint
//! - A terminal chat front end with structured-output and follow-up panes

pub mod api;
pub mod chat;
pub mod engine;
pub mod gateway;
pub mod knowledge;
pub mod llm;
pub mod neo4j;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub engine: EngineYamlConfig,
    pub llm: LlmSettings,
    pub loader: LoaderYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    /// Query gateway port
    pub port: u16,
    /// Generation engine port
    pub engine_port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            engine_port: 8000,
        }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
        }
    }
}

/// Generation engine section, as seen from the gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineYamlConfig {
    /// Full URL of the engine's solve endpoint
    pub url: String,
}

impl Default for EngineYamlConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/solve".into(),
        }
    }
}

/// Hosted model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible base URL; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".into(),
            model: "mav23/Qwen2.5-Math-7B-Instruct-GGUF".into(),
            api_key: None,
            max_tokens: 1500,
        }
    }
}

/// Loader section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderYamlConfig {
    /// Directory holding concepts.yaml, problems.yaml and solutions.yaml
    pub data_dir: String,
}

impl Default for LoaderYamlConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/knowledge_graph".into(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_port: u16,
    pub engine_port: u16,
    pub engine_url: String,
    pub llm: LlmSettings,
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .or(yaml.llm.api_key)
            .filter(|k| !k.is_empty());

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_port: env_parsed("SERVER_PORT").unwrap_or(yaml.server.port),
            engine_port: env_parsed("ENGINE_PORT").unwrap_or(yaml.server.engine_port),
            engine_url: std::env::var("SOLUTION_ENGINE_URL").unwrap_or(yaml.engine.url),
            llm: LlmSettings {
                base_url: std::env::var("HF_BASE_URL").unwrap_or(yaml.llm.base_url),
                model: std::env::var("MODEL_NAME").unwrap_or(yaml.llm.model),
                api_key,
                max_tokens: env_parsed("LLM_MAX_TOKENS").unwrap_or(yaml.llm.max_tokens),
            },
            data_dir: std::env::var("KG_DATA_DIR")
                .unwrap_or(yaml.loader.data_dir)
                .into(),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

// ============================================================================
// Application state and servers
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub neo4j: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j and declare the schema
    pub async fn new(config: Config) -> Result<Self> {
        let neo4j = Arc::new(
            neo4j::client::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        Ok(Self {
            neo4j,
            config: Arc::new(config),
        })
    }
}

/// Read the dataset under `data_dir` and load it into the graph
pub async fn load_knowledge(
    state: &AppState,
    data_dirs: &[PathBuf],
    mode: knowledge::RefreshMode,
) -> Result<knowledge::LoadReport> {
    let mut dataset = knowledge::Dataset::default();
    for dir in data_dirs {
        tracing::info!("Reading dataset from {}", dir.display());
        dataset.extend(knowledge::Dataset::from_dir(dir)?);
    }

    knowledge::KnowledgeLoader::new(state.neo4j.clone())
        .load(&dataset, mode)
        .await
}

/// Serve the query gateway until Ctrl+C / SIGTERM
pub async fn start_gateway(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j at {}", state.config.neo4j_uri);

    let engine = Arc::new(gateway::HttpEngineClient::new(&state.config.engine_url)?);
    tracing::info!("Solution engine at {}", engine.url());

    let router = api::create_router(Arc::new(api::handlers::GatewayServerState {
        gateway: gateway::SolveGateway::new(state.neo4j.clone(), engine),
    }));

    serve(router, port, "Query gateway").await?;

    drop(state);
    tracing::info!("Neo4j connection released");
    Ok(())
}

/// Serve the generation engine until Ctrl+C / SIGTERM
pub async fn start_engine(config: Config) -> Result<()> {
    let llm = Arc::new(llm::HttpLlmClient::from_settings(&config.llm));
    tracing::info!(
        "Using model {} at {}",
        config.llm.model,
        config.llm.base_url
    );

    let router = api::create_engine_router(Arc::new(api::engine_handlers::EngineServerState {
        engine: engine::SolutionEngine::new(llm),
    }));

    serve(router, config.engine_port, "Solution engine").await
}

async fn serve(router: axum::Router, port: u16, name: &str) -> Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("{} listening on {}", name, addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("{} stopped", name);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
