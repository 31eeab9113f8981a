use anyhow::{anyhow, Result};
use ragent_llm::ChatClient;
use ragent_memory::{
    CheckpointStore, InMemoryCheckpointStore, InMemoryLongTermStore, LongTermMemory, LongTermStore,
};
use ragent_rag::{QueryRewriter, Retriever, RewriterConfig};
use std::sync::Arc;

use crate::config::GraphConfig;
use crate::graph::Graph;
use crate::nodes::{AgentNode, OrchestratorNode, PrivateRetrieval, PublicRetrieval};
use crate::router::AgentRouter;

/// Builder for constructing a Graph with optional components
///
/// Memory ports default to process-local stores.
pub struct GraphBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    retriever: Option<Arc<dyn Retriever>>,
    long_term: Option<Arc<dyn LongTermStore>>,
    checkpoints: Option<Arc<dyn CheckpointStore>>,
    rewriter_config: Option<RewriterConfig>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            retriever: None,
            long_term: None,
            checkpoints: None,
            rewriter_config: None,
            config: GraphConfig::default(),
        }
    }

    /// Completion client shared by the classifier, the rewriter and both agents
    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn long_term_store(mut self, store: Arc<dyn LongTermStore>) -> Self {
        self.long_term = Some(store);
        self
    }

    pub fn checkpoint_store(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(store);
        self
    }

    /// Defaults to the orchestrator model with the stock limits
    pub fn rewriter_config(mut self, config: RewriterConfig) -> Self {
        self.rewriter_config = Some(config);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Graph> {
        let client = self
            .llm_client
            .ok_or_else(|| anyhow!("LLM client is required"))?;
        let retriever = self
            .retriever
            .ok_or_else(|| anyhow!("Retriever is required"))?;
        let long_term = self
            .long_term
            .unwrap_or_else(|| Arc::new(InMemoryLongTermStore::new()));
        let checkpoints = self
            .checkpoints
            .unwrap_or_else(|| Arc::new(InMemoryCheckpointStore::new()));

        let config = self.config;
        let memory = LongTermMemory::new(long_term);
        let rewriter_config = self.rewriter_config.unwrap_or_else(|| RewriterConfig {
            model: config.orchestrator.model.clone(),
            ..RewriterConfig::default()
        });
        let rewriter = QueryRewriter::new(Arc::clone(&client), rewriter_config);

        let orchestrator = OrchestratorNode::new(
            Arc::clone(&client),
            config.orchestrator.clone(),
            memory.clone(),
            config.memory_search_limit,
        );
        let public_agent = AgentNode::new(
            PublicRetrieval::new(Arc::clone(&retriever), config.retrieval.clone()),
            Arc::clone(&client),
            config.public_agent.clone(),
            rewriter.clone(),
            memory.clone(),
        );
        let private_agent = AgentNode::new(
            PrivateRetrieval::new(retriever, config.retrieval.clone()),
            client,
            config.private_agent.clone(),
            rewriter,
            memory,
        );

        Ok(Graph::new(
            Arc::new(orchestrator),
            Arc::new(public_agent),
            Arc::new(private_agent),
            Arc::new(AgentRouter),
            checkpoints,
        ))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
