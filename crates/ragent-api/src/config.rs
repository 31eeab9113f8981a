use config::{Config as ConfigLoader, ConfigError, File, FileFormat};
use ragent_graph::{AgentLlmConfig, GraphConfig, RetrievalSettings};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variables mapped onto configuration keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("SERVER_ASSISTANT_ID", "server.assistant_id"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_ORCHESTRATOR_MODEL", "llm.orchestrator.model"),
    ("LLM_PUBLIC_AGENT_MODEL", "llm.public_agent.model"),
    ("LLM_PRIVATE_AGENT_MODEL", "llm.private_agent.model"),
    ("RETRIEVAL_BASE_URL", "retrieval.base_url"),
    ("RETRIEVAL_TIMEOUT_SECS", "retrieval.timeout_secs"),
    ("RETRIEVAL_SCORE_THRESHOLD", "retrieval.score_threshold"),
    ("RUNS_JOIN_TIMEOUT_SECS", "runs.join_timeout_secs"),
    ("RUNS_RESULT_TTL_SECS", "runs.result_ttl_secs"),
    ("MONGODB_DATABASE", "mongodb.database"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub runs: RunsConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: String,
    #[serde(skip)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Expected `assistant_id` of run requests; mismatches are only logged
    pub assistant_id: String,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2024,
            request_timeout_secs: 300,
            assistant_id: "rag_generation".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint; the public API when unset
    pub base_url: Option<String>,
    pub orchestrator: AgentLlmConfig,
    pub public_agent: AgentLlmConfig,
    pub private_agent: AgentLlmConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            orchestrator: AgentLlmConfig::orchestrator(),
            public_agent: AgentLlmConfig::public_agent(),
            private_agent: AgentLlmConfig::private_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub public_k: usize,
    pub private_k: usize,
    pub score_threshold: f64,
    pub max_merged: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        let settings = RetrievalSettings::default();
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: 10,
            public_k: settings.public_k,
            private_k: settings.private_k,
            score_threshold: settings.score_threshold,
            max_merged: settings.max_merged,
        }
    }
}

impl RetrievalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settings(&self) -> RetrievalSettings {
        RetrievalSettings {
            public_k: self.public_k,
            private_k: self.private_k,
            score_threshold: self.score_threshold,
            max_merged: self.max_merged,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunsConfig {
    pub join_timeout_secs: u64,
    /// Finished runs nobody joined are dropped after this long
    pub result_ttl_secs: u64,
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            join_timeout_secs: 120,
            result_ttl_secs: 600,
        }
    }
}

impl RunsConfig {
    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }

    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoDbConfig {
    pub database: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "ragent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_, RETRIEVAL_, RUNS_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        cfg.mongodb_uri = std::env::var("MONGODB_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            orchestrator: self.llm.orchestrator.clone(),
            public_agent: self.llm.public_agent.clone(),
            private_agent: self.llm.private_agent.clone(),
            retrieval: self.retrieval.settings(),
            ..GraphConfig::default()
        }
    }
}
