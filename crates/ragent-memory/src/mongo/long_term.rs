use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database, IndexModel};
use ragent_types::{MemoryNamespace, MemoryRecord};

use super::models::MongoMemory;
use crate::error::Result;
use crate::long_term::LongTermStore;

/// Long-term store backed by a `memories` collection
///
/// Ranking uses a MongoDB text index over `data`, ordered by text score.
#[derive(Clone)]
pub struct MongoLongTermStore {
    collection: Collection<MongoMemory>,
}

impl MongoLongTermStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("memories"),
        }
    }

    /// Create the text and namespace indexes (idempotent)
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "data": "text" }).build())
            .await?;
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "memory_type": 1, "created_at": -1 })
                    .build(),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LongTermStore for MongoLongTermStore {
    async fn search(
        &self,
        namespace: &MemoryNamespace,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let records: Vec<MongoMemory> = if query.trim().is_empty() {
            self.collection
                .find(doc! {
                    "user_id": &namespace.user_id,
                    "memory_type": &namespace.memory_type,
                })
                .sort(doc! { "created_at": -1 })
                .limit(limit)
                .await?
                .try_collect()
                .await?
        } else {
            self.collection
                .find(doc! {
                    "user_id": &namespace.user_id,
                    "memory_type": &namespace.memory_type,
                    "$text": { "$search": query },
                })
                .projection(doc! { "score": { "$meta": "textScore" } })
                .sort(doc! { "score": { "$meta": "textScore" } })
                .limit(limit)
                .await?
                .try_collect()
                .await?
        };

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn put(&self, record: MemoryRecord) -> Result<()> {
        let doc: MongoMemory = record.into();
        self.collection.insert_one(&doc).await?;
        Ok(())
    }
}
