pub mod config;
pub mod document;
pub mod events;
pub mod memory;
pub mod state;

pub use config::{Configurable, RunConfig, RunContext, ANONYMOUS_USER};
pub use document::{Citation, RetrievedDocument, SNIPPET_MAX_CHARS};
pub use events::{ExecutionEvent, NodeId};
pub use memory::{MemoryNamespace, MemoryRecord, MEMORY_TYPE_FACTS};
pub use state::{AgentId, RunInput, RunState, UserRole};
