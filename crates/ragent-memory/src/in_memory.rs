use async_trait::async_trait;
use ragent_llm::Message;
use ragent_types::{MemoryNamespace, MemoryRecord};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::checkpoint::CheckpointStore;
use crate::error::{MemoryError, Result};
use crate::long_term::LongTermStore;

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Process-local long-term store
///
/// Ranks by query term overlap, newest first on ties. Counts every call so
/// tests can assert on port usage.
#[derive(Default)]
pub struct InMemoryLongTermStore {
    records: RwLock<HashMap<MemoryNamespace, Vec<MemoryRecord>>>,
    search_calls: AtomicUsize,
    put_calls: AtomicUsize,
    fail: bool,
}

impl InMemoryLongTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every operation errors
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    pub async fn records(&self, namespace: &MemoryNamespace) -> Vec<MemoryRecord> {
        self.records
            .read()
            .await
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LongTermStore for InMemoryLongTermStore {
    async fn search(
        &self,
        namespace: &MemoryNamespace,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MemoryError::Unavailable("in-memory store set to fail".to_string()));
        }

        let query_terms = terms(query);
        let records = self.records.read().await;
        let mut ranked: Vec<(usize, &MemoryRecord)> = records
            .get(namespace)
            .map(|rs| {
                rs.iter()
                    .map(|r| (terms(&r.data).intersection(&query_terms).count(), r))
                    .collect()
            })
            .unwrap_or_default();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.created_at.cmp(&a.1.created_at)));

        Ok(ranked.into_iter().take(limit).map(|(_, r)| r.clone()).collect())
    }

    async fn put(&self, record: MemoryRecord) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MemoryError::Unavailable("in-memory store set to fail".to_string()));
        }

        self.records
            .write()
            .await
            .entry(record.namespace.clone())
            .or_default()
            .push(record);
        Ok(())
    }
}

/// Process-local checkpoint store
#[derive(Default)]
pub struct InMemoryCheckpointStore {
    threads: RwLock<HashMap<String, Vec<Message>>>,
    load_calls: AtomicUsize,
    append_calls: AtomicUsize,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<()> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        self.threads
            .write()
            .await
            .entry(thread_id.to_string())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let store = InMemoryLongTermStore::new();
        let ns = MemoryNamespace::facts("u1");
        store.put(MemoryRecord::new(ns.clone(), "vivo en Madrid", Map::new())).await.unwrap();
        store.put(MemoryRecord::new(ns.clone(), "me gusta la paella valenciana", Map::new())).await.unwrap();
        store.put(MemoryRecord::new(MemoryNamespace::facts("u2"), "paella", Map::new())).await.unwrap();

        let found = store.search(&ns, "receta de paella", 5).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].data, "me gusta la paella valenciana");
    }

    #[tokio::test]
    async fn test_checkpoint_append_only() {
        let store = InMemoryCheckpointStore::new();
        assert!(store.load("t1").await.unwrap().is_empty());

        store.append("t1", &[Message::human("hola"), Message::ai("buenas")]).await.unwrap();
        store.append("t1", &[Message::human("otra")]).await.unwrap();

        let history = store.load("t1").await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].content, "otra");
        assert_eq!(store.append_calls(), 2);
    }
}
