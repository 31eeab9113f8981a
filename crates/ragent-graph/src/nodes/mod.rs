mod agent;
mod orchestrator;
mod private;
mod public;

pub use agent::{format_context, AgentNode, RetrievalStrategy};
pub use orchestrator::{parse_classification, OrchestratorNode};
pub use private::PrivateRetrieval;
pub use public::PublicRetrieval;

pub type PublicAgentNode = AgentNode<PublicRetrieval>;
pub type PrivateAgentNode = AgentNode<PrivateRetrieval>;
