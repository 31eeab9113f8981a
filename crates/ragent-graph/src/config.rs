use ragent_llm::ChatOptions;
use ragent_rag::MAX_MERGED_RESULTS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model settings of one graph role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl AgentLlmConfig {
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            model: model.into(),
            temperature,
            max_tokens,
            timeout_secs,
        }
    }

    /// Lightweight deterministic classifier
    pub fn orchestrator() -> Self {
        Self::new("gpt-4o-mini", 0.0, 256, 15)
    }

    pub fn public_agent() -> Self {
        Self::new("gpt-4o", 0.3, 1024, 30)
    }

    pub fn private_agent() -> Self {
        Self::new("gpt-4o", 0.1, 1024, 30)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions::new()
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .timeout(self.timeout())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Documents requested by the public agent
    pub public_k: usize,
    /// Documents requested per domain by the private agent
    pub private_k: usize,
    pub score_threshold: f64,
    pub max_merged: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            public_k: 8,
            private_k: 5,
            score_threshold: 0.5,
            max_merged: MAX_MERGED_RESULTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub orchestrator: AgentLlmConfig,
    pub public_agent: AgentLlmConfig,
    pub private_agent: AgentLlmConfig,
    pub retrieval: RetrievalSettings,
    /// Long-term memories loaded by the orchestrator
    pub memory_search_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            orchestrator: AgentLlmConfig::orchestrator(),
            public_agent: AgentLlmConfig::public_agent(),
            private_agent: AgentLlmConfig::private_agent(),
            retrieval: RetrievalSettings::default(),
            memory_search_limit: 5,
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalSettings) -> Self {
        self.retrieval = retrieval;
        self
    }
}
