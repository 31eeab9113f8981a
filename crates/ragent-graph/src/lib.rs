pub mod builder;
pub mod config;
pub mod delta;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod prompts;
pub mod router;

pub use builder::GraphBuilder;
pub use config::{AgentLlmConfig, GraphConfig, RetrievalSettings};
pub use delta::NodeDelta;
pub use graph::Graph;
pub use node::{EventSender, Node};
pub use nodes::{
    AgentNode, OrchestratorNode, PrivateAgentNode, PrivateRetrieval, PublicAgentNode,
    PublicRetrieval, RetrievalStrategy,
};
pub use router::{route_to_agent, AgentRouter, NextNode, Router};

// Re-export key types from ragent-types
pub use ragent_types::{
    AgentId, Citation, ExecutionEvent, NodeId, RetrievedDocument, RunContext, RunInput, RunState,
    UserRole,
};
