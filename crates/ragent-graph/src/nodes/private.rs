use async_trait::async_trait;
use ragent_rag::{detect_department, merge_documents, Domain, Retriever, SearchRequest};
use ragent_types::{AgentId, RetrievedDocument};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::agent::{search_or_empty, RetrievalStrategy};
use crate::config::RetrievalSettings;
use crate::prompts::PRIVATE_AGENT_SYSTEM_PROMPT;

/// Private search (narrowed by department) and public search, run concurrently and merged
pub struct PrivateRetrieval {
    retriever: Arc<dyn Retriever>,
    settings: RetrievalSettings,
}

impl PrivateRetrieval {
    pub fn new(retriever: Arc<dyn Retriever>, settings: RetrievalSettings) -> Self {
        Self { retriever, settings }
    }
}

#[async_trait]
impl RetrievalStrategy for PrivateRetrieval {
    fn agent(&self) -> AgentId {
        AgentId::PrivateAgent
    }

    fn system_prompt(&self) -> &'static str {
        PRIVATE_AGENT_SYSTEM_PROMPT
    }

    fn source_label(&self) -> &'static str {
        "la base de datos interna"
    }

    fn tags_department(&self) -> bool {
        true
    }

    async fn retrieve(
        &self,
        query: &str,
        message: &str,
        metadata: &mut Map<String, Value>,
    ) -> Vec<RetrievedDocument> {
        // detected on the raw message, not the rewritten query
        let department = detect_department(message);
        metadata.insert(
            "detected_department".into(),
            department.map_or(Value::Null, |d| Value::from(d.as_str())),
        );

        let settings = &self.settings;
        let private_request =
            SearchRequest::new(query, Domain::Private, settings.private_k, settings.score_threshold)
                .with_department(department.map(|d| d.as_str().to_string()));
        let public_request =
            SearchRequest::new(query, Domain::Public, settings.private_k, settings.score_threshold);

        let (private_docs, public_docs) = tokio::join!(
            search_or_empty(self.retriever.as_ref(), &private_request),
            search_or_empty(self.retriever.as_ref(), &public_request),
        );

        merge_documents(private_docs, public_docs, settings.max_merged)
    }
}
