use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ragent_api::{build_router, config::Config, state::AppState};
use ragent_graph::GraphBuilder;
use ragent_llm::{ClientFactory, ProviderConfig};
use ragent_memory::{CheckpointStore, InMemoryCheckpointStore, InMemoryLongTermStore, LongTermStore};
use ragent_rag::HttpRetriever;

/// Long-term and checkpoint stores plus the name reported by `/info`
type MemoryBackend = (Arc<dyn LongTermStore>, Arc<dyn CheckpointStore>, &'static str);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Ragent API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let llm_client = ClientFactory::create_chat_client(ProviderConfig::openai_with_base_url(
        config.openai_api_key.clone(),
        config.llm.base_url.clone(),
    ))?;

    tracing::info!(url = %config.retrieval.base_url, "Using retrieval service");
    let retriever = Arc::new(HttpRetriever::new(
        config.retrieval.base_url.clone(),
        config.retrieval.timeout(),
    )?);

    let (long_term, checkpoints, persistence) = memory_backend(&config).await?;
    tracing::info!(persistence, "Memory backend ready");

    let graph = GraphBuilder::new()
        .llm_client(llm_client)
        .retriever(retriever)
        .long_term_store(long_term)
        .checkpoint_store(checkpoints)
        .config(config.graph_config())
        .build()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, graph, persistence);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/ok", addr);
    tracing::info!("API docs: http://{}/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "mongodb")]
async fn memory_backend(config: &Config) -> anyhow::Result<MemoryBackend> {
    use ragent_memory::mongo::{connect, MongoCheckpointStore, MongoLongTermStore};

    let Some(uri) = config.mongodb_uri.as_deref() else {
        tracing::warn!("MONGODB_URI not set, memory is kept in process");
        return Ok(in_memory_backend());
    };

    tracing::info!("Connecting to MongoDB");
    let database = connect(uri, &config.mongodb.database).await?;

    let long_term = MongoLongTermStore::new(&database);
    long_term.ensure_indexes().await?;
    let checkpoints = MongoCheckpointStore::new(&database);
    checkpoints.ensure_indexes().await?;
    tracing::info!(database = %config.mongodb.database, "MongoDB connected");

    Ok((Arc::new(long_term), Arc::new(checkpoints), "mongodb"))
}

#[cfg(not(feature = "mongodb"))]
async fn memory_backend(config: &Config) -> anyhow::Result<MemoryBackend> {
    if config.mongodb_uri.is_some() {
        tracing::warn!("MONGODB_URI is set but the mongodb feature is disabled, memory is kept in process");
    }
    Ok(in_memory_backend())
}

fn in_memory_backend() -> MemoryBackend {
    (
        Arc::new(InMemoryLongTermStore::new()),
        Arc::new(InMemoryCheckpointStore::new()),
        "memory",
    )
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
