// Canned retriever for tests and offline runs

use anyhow::Result;
use async_trait::async_trait;
use ragent_types::RetrievedDocument;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::retriever::{Domain, Retriever, SearchRequest};

/// Returns fixed documents per domain and records every request
#[derive(Default)]
pub struct StaticRetriever {
    documents: HashMap<Domain, Vec<RetrievedDocument>>,
    failing: Vec<Domain>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, domain: Domain, documents: Vec<RetrievedDocument>) -> Self {
        self.documents.insert(domain, documents);
        self
    }

    /// Make searches against `domain` fail
    pub fn failing(mut self, domain: Domain) -> Self {
        self.failing.push(domain);
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn calls_for(&self, domain: Domain) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.domain == domain)
            .count()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if self.failing.contains(&request.domain) {
            anyhow::bail!("Search service unavailable for {} documents", request.domain.as_str());
        }

        Ok(self
            .documents
            .get(&request.domain)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.relevance_score >= request.score_threshold)
                    .take(request.k)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
