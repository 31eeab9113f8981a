use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database, IndexModel};
use ragent_llm::Message;

use super::models::MongoCheckpointMessage;
use crate::checkpoint::CheckpointStore;
use crate::error::Result;

/// Checkpoint store backed by a `checkpoints` collection, one document per turn
#[derive(Clone)]
pub struct MongoCheckpointStore {
    collection: Collection<MongoCheckpointMessage>,
}

impl MongoCheckpointStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("checkpoints"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "thread_id": 1, "created_at": 1, "_id": 1 })
                    .build(),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for MongoCheckpointStore {
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>> {
        let docs: Vec<MongoCheckpointMessage> = self
            .collection
            .find(doc! { "thread_id": thread_id })
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        let docs: Vec<MongoCheckpointMessage> = messages
            .iter()
            .map(|m| MongoCheckpointMessage::new(thread_id, m))
            .collect();
        self.collection.insert_many(docs).await?;
        Ok(())
    }
}
