use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum snippet length (in characters) carried by a citation
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Ranked chunk returned by the similarity-search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub document_id: String,
    #[serde(default)]
    pub chunk_id: String,
    pub content: String,
    #[serde(default)]
    pub title: String,
    /// Similarity in `[0, 1]`
    pub relevance_score: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievedDocument {
    pub fn new(
        document_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        relevance_score: f64,
    ) -> Self {
        let document_id = document_id.into();
        Self {
            chunk_id: document_id.clone(),
            document_id,
            content: content.into(),
            title: title.into(),
            relevance_score,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Department/category tag, if the index carries one
    pub fn department(&self) -> Option<&str> {
        self.metadata.get("department").and_then(Value::as_str)
    }
}

/// Compact reference to a document used in an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: String,
    pub chunk_id: String,
    pub title: String,
    pub relevance_score: f64,
    pub snippet: String,
}

impl Citation {
    pub fn from_document(doc: &RetrievedDocument) -> Self {
        Self {
            document_id: doc.document_id.clone(),
            chunk_id: doc.chunk_id.clone(),
            title: doc.title.clone(),
            relevance_score: doc.relevance_score,
            snippet: snippet(&doc.content),
        }
    }
}

fn snippet(content: &str) -> String {
    match content.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
