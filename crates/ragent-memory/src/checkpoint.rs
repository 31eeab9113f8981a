use async_trait::async_trait;
use ragent_llm::Message;

use crate::error::Result;

/// Short-term conversation history keyed by thread id
///
/// Append-only: callers only ever add the turns of the run that just
/// finished. Concurrent runs on one thread may interleave their appends.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Full ordered history of a thread (empty for unknown threads)
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>>;

    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<()>;
}
