use async_trait::async_trait;
use ragent_types::{MemoryNamespace, MemoryRecord, ANONYMOUS_USER};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::Result;

/// Upper bound on the number of records a single search may return
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Long-term fact store
///
/// Records are immutable: `put` always inserts, there is no update or delete.
/// Ranking is entirely up to the implementation.
#[async_trait]
pub trait LongTermStore: Send + Sync {
    async fn search(
        &self,
        namespace: &MemoryNamespace,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>>;

    async fn put(&self, record: MemoryRecord) -> Result<()>;
}

fn is_anonymous(user_id: &str) -> bool {
    let user_id = user_id.trim();
    user_id.is_empty() || user_id == ANONYMOUS_USER
}

/// Facade used by the graph nodes
///
/// Never fails: anonymous users are a no-op and store errors are logged and
/// degraded to "no memories" / "nothing saved".
#[derive(Clone)]
pub struct LongTermMemory {
    store: Arc<dyn LongTermStore>,
}

impl LongTermMemory {
    pub fn new(store: Arc<dyn LongTermStore>) -> Self {
        Self { store }
    }

    pub async fn search(
        &self,
        namespace: &MemoryNamespace,
        query: &str,
        limit: usize,
    ) -> Vec<MemoryRecord> {
        if is_anonymous(&namespace.user_id) {
            return Vec::new();
        }

        let limit = limit.min(MAX_SEARCH_LIMIT);
        match self.store.search(namespace, query, limit).await {
            Ok(mut records) => {
                records.truncate(limit);
                records
            }
            Err(e) => {
                tracing::warn!(user_id = %namespace.user_id, "Memory search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Store a new fact, returning its id
    pub async fn save(
        &self,
        namespace: MemoryNamespace,
        data: &str,
        metadata: Map<String, Value>,
    ) -> Option<String> {
        if is_anonymous(&namespace.user_id) || data.trim().is_empty() {
            return None;
        }

        let user_id = namespace.user_id.clone();
        let record = MemoryRecord::new(namespace, data, metadata);
        let id = record.id.clone();

        match self.store.put(record).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, memory_id = %id, "Memory saved");
                Some(id)
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, "Failed to save memory: {}", e);
                None
            }
        }
    }
}
