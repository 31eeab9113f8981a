// HTTP client for the external similarity-search service

use anyhow::{Context, Result};
use async_trait::async_trait;
use ragent_types::RetrievedDocument;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::retriever::{Retriever, SearchRequest};

const UNTITLED: &str = "Sin título";

/// Retriever backed by `POST {base_url}/search`
///
/// The service returns raw similarity rows; titles and chunk ids are derived
/// from row metadata and the score threshold is re-applied locally.
pub struct HttpRetriever {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpRetriever {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchRow>,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    id: Value,
    content: String,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    similarity: f64,
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn title_from(metadata: &Map<String, Value>) -> String {
    let field = |key: &str| {
        metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    field("filename")
        .or_else(|| field("title"))
        .or_else(|| field("source").and_then(|s| s.rsplit('/').next()).filter(|s| !s.is_empty()))
        .unwrap_or(UNTITLED)
        .to_string()
}

impl SearchRow {
    fn into_document(self) -> RetrievedDocument {
        let metadata = self.metadata.unwrap_or_default();
        let document_id = id_string(&self.id);
        let chunk_id = metadata
            .get("chunk_id")
            .map(id_string)
            .unwrap_or_else(|| document_id.clone());

        RetrievedDocument {
            document_id,
            chunk_id,
            title: title_from(&metadata),
            content: self.content,
            relevance_score: self.similarity,
            metadata,
        }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>> {
        let payload = serde_json::json!({
            "query": request.query,
            "document_type": request.domain.as_str(),
            "k": request.k,
            "score_threshold": request.score_threshold,
            "department": request.department,
        });

        let response = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Search service error ({}): {}", status, error_text);
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        let documents: Vec<RetrievedDocument> = body
            .results
            .into_iter()
            .filter(|row| row.similarity >= request.score_threshold)
            .take(request.k)
            .map(SearchRow::into_document)
            .collect();

        tracing::debug!(
            domain = request.domain.as_str(),
            count = documents.len(),
            "Retrieved documents"
        );

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_title_precedence() {
        assert_eq!(title_from(&meta(&[("filename", "a.pdf"), ("title", "T")])), "a.pdf");
        assert_eq!(title_from(&meta(&[("title", "Manual")])), "Manual");
        assert_eq!(title_from(&meta(&[("source", "docs/motores/diesel.docx")])), "diesel.docx");
        assert_eq!(title_from(&Map::new()), UNTITLED);
    }

    #[test]
    fn test_row_ids() {
        let row = SearchRow {
            id: Value::from(17),
            content: "c".to_string(),
            metadata: Some(meta(&[("chunk_id", "17-3")])),
            similarity: 0.7,
        };
        let doc = row.into_document();
        assert_eq!(doc.document_id, "17");
        assert_eq!(doc.chunk_id, "17-3");
    }
}
