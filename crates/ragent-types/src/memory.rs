use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Memory type used for self-disclosed user facts
pub const MEMORY_TYPE_FACTS: &str = "facts";

/// Owner of a set of long-term memories
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryNamespace {
    pub user_id: String,
    pub memory_type: String,
}

impl MemoryNamespace {
    pub fn new(user_id: impl Into<String>, memory_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            memory_type: memory_type.into(),
        }
    }

    pub fn facts(user_id: impl Into<String>) -> Self {
        Self::new(user_id, MEMORY_TYPE_FACTS)
    }
}

/// One immutable long-term fact about a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub namespace: MemoryNamespace,
    pub data: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl MemoryRecord {
    /// New record with a freshly generated id
    pub fn new(namespace: MemoryNamespace, data: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            namespace,
            data: data.into(),
            created_at: Utc::now(),
            metadata,
        }
    }
}
