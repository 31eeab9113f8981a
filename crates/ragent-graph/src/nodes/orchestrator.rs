use anyhow::Result;
use async_trait::async_trait;
use ragent_llm::{ChatClient, ChatRequest, Message};
use ragent_memory::{format_memory_context, LongTermMemory};
use ragent_types::{AgentId, MemoryNamespace, NodeId, RunContext, RunState, UserRole};
use serde_json::Value;
use std::sync::Arc;

use crate::config::AgentLlmConfig;
use crate::delta::NodeDelta;
use crate::node::{EventSender, Node};
use crate::prompts::{classifier_query, CLASSIFIER_SYSTEM_PROMPT};

/// Route from a raw classifier reply
///
/// Only a first token starting with `private`/`privado` selects the private
/// agent; everything else, the empty reply included, stays public.
pub fn parse_classification(reply: &str) -> AgentId {
    let normalized = reply.trim().to_lowercase();
    match normalized.split_whitespace().next() {
        Some(token) if token.starts_with("private") || token.starts_with("privado") => {
            AgentId::PrivateAgent
        }
        _ => AgentId::PublicAgent,
    }
}

/// Loads long-term memory and picks the agent; never answers itself
pub struct OrchestratorNode {
    client: Arc<dyn ChatClient>,
    llm: AgentLlmConfig,
    memory: LongTermMemory,
    memory_limit: usize,
}

impl OrchestratorNode {
    pub fn new(
        client: Arc<dyn ChatClient>,
        llm: AgentLlmConfig,
        memory: LongTermMemory,
        memory_limit: usize,
    ) -> Self {
        Self {
            client,
            llm,
            memory,
            memory_limit,
        }
    }

    async fn classify(&self, message: &str) -> AgentId {
        let request = ChatRequest::new(
            self.llm.model.clone(),
            vec![
                Message::system(CLASSIFIER_SYSTEM_PROMPT),
                Message::human(classifier_query(message)),
            ],
        )
        .with_options(self.llm.chat_options());

        match tokio::time::timeout(self.llm.timeout(), self.client.chat(request)).await {
            Ok(Ok(response)) => parse_classification(response.trimmed_content()),
            Ok(Err(e)) => {
                tracing::warn!("Classification failed, routing public: {}", e);
                AgentId::PublicAgent
            }
            Err(_) => {
                tracing::warn!("Classification timed out, routing public");
                AgentId::PublicAgent
            }
        }
    }
}

#[async_trait]
impl Node for OrchestratorNode {
    async fn execute(
        &self,
        state: &RunState,
        ctx: &RunContext,
        _events: &EventSender,
    ) -> Result<NodeDelta> {
        let message = state.current_message();

        let memories = match &message {
            Some(query) if !ctx.is_anonymous() => {
                let namespace = MemoryNamespace::facts(ctx.user_id());
                self.memory.search(&namespace, query, self.memory_limit).await
            }
            _ => Vec::new(),
        };
        let memory_context = format_memory_context(&memories);

        let target = match (state.user_role, &message) {
            (UserRole::Private, Some(query)) => self.classify(query).await,
            _ => AgentId::PublicAgent,
        };

        tracing::info!(
            run_id = %ctx.run_id,
            user_role = state.user_role.as_str(),
            target = %target,
            memories = memories.len(),
            "Routing decision"
        );

        let mut metadata = state.metadata.clone();
        metadata.insert("routing_decision".into(), Value::from(target.as_str()));
        metadata.insert("user_role".into(), Value::from(state.user_role.as_str()));
        metadata.insert("user_id".into(), Value::from(ctx.user_id()));
        metadata.insert("memories_loaded".into(), Value::from(memories.len()));

        Ok(NodeDelta {
            current_agent: Some(target),
            user_memories: Some(memories),
            memory_context: Some(memory_context),
            metadata: Some(metadata),
            ..Default::default()
        })
    }

    fn id(&self) -> NodeId {
        NodeId::Orchestrator
    }
}
