use async_trait::async_trait;
use ragent_rag::{merge_documents, Domain, Retriever, SearchRequest};
use ragent_types::{AgentId, RetrievedDocument};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::agent::{search_or_empty, RetrievalStrategy};
use crate::config::RetrievalSettings;
use crate::prompts::PUBLIC_AGENT_SYSTEM_PROMPT;

/// Single search over the public domain
pub struct PublicRetrieval {
    retriever: Arc<dyn Retriever>,
    settings: RetrievalSettings,
}

impl PublicRetrieval {
    pub fn new(retriever: Arc<dyn Retriever>, settings: RetrievalSettings) -> Self {
        Self { retriever, settings }
    }
}

#[async_trait]
impl RetrievalStrategy for PublicRetrieval {
    fn agent(&self) -> AgentId {
        AgentId::PublicAgent
    }

    fn system_prompt(&self) -> &'static str {
        PUBLIC_AGENT_SYSTEM_PROMPT
    }

    fn source_label(&self) -> &'static str {
        "la base de datos"
    }

    async fn retrieve(
        &self,
        query: &str,
        _message: &str,
        _metadata: &mut Map<String, Value>,
    ) -> Vec<RetrievedDocument> {
        let request = SearchRequest::new(
            query,
            Domain::Public,
            self.settings.public_k,
            self.settings.score_threshold,
        );
        let documents = search_or_empty(self.retriever.as_ref(), &request).await;
        merge_documents(documents, Vec::new(), self.settings.max_merged)
    }
}
