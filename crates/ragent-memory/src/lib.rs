pub mod checkpoint;
pub mod error;
pub mod in_memory;
pub mod long_term;
pub mod recall;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use checkpoint::CheckpointStore;
pub use error::{MemoryError, Result};
pub use in_memory::{InMemoryCheckpointStore, InMemoryLongTermStore};
pub use long_term::{LongTermMemory, LongTermStore, MAX_SEARCH_LIMIT};
pub use recall::{extract_memorable, format_memory_context, should_remember, MEMORY_CONTEXT_HEADER};

#[cfg(feature = "mongodb")]
pub use mongo::{MongoCheckpointStore, MongoLongTermStore};
