use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use ragent_llm::{Message, Role};
use ragent_types::{MemoryNamespace, MemoryRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MongoDB document for one long-term fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMemory {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub memory_type: String,
    pub data: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl From<MemoryRecord> for MongoMemory {
    fn from(record: MemoryRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.namespace.user_id,
            memory_type: record.namespace.memory_type,
            data: record.data,
            created_at: record.created_at,
            metadata: record.metadata,
        }
    }
}

impl From<MongoMemory> for MemoryRecord {
    fn from(doc: MongoMemory) -> Self {
        Self {
            id: doc.id,
            namespace: MemoryNamespace::new(doc.user_id, doc.memory_type),
            data: doc.data,
            created_at: doc.created_at,
            metadata: doc.metadata,
        }
    }
}

/// MongoDB document for one checkpointed conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoCheckpointMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MongoCheckpointMessage {
    pub fn new(thread_id: &str, message: &Message) -> Self {
        Self {
            id: ObjectId::new(),
            thread_id: thread_id.to_string(),
            role: message.role,
            content: message.content.clone(),
            created_at: Utc::now(),
        }
    }
}

impl From<MongoCheckpointMessage> for Message {
    fn from(doc: MongoCheckpointMessage) -> Self {
        Message {
            role: doc.role,
            content: doc.content,
        }
    }
}
