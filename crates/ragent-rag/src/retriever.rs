use anyhow::Result;
use async_trait::async_trait;
use ragent_types::RetrievedDocument;
use serde::{Deserialize, Serialize};

/// Document domain filter of the similarity index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Public,
    Private,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub domain: Domain,
    pub k: usize,
    pub score_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, domain: Domain, k: usize, score_threshold: f64) -> Self {
        Self {
            query: query.into(),
            domain,
            k,
            score_threshold,
            department: None,
        }
    }

    pub fn with_department(mut self, department: Option<String>) -> Self {
        self.department = department;
        self
    }
}

/// Similarity-search port
///
/// Returns at most `k` documents scoring at or above the threshold, best first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>>;
}
