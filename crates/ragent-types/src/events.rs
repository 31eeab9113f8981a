use crate::state::{AgentId, RunState};
use serde::{Deserialize, Serialize};

/// Node of the run graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Orchestrator,
    PublicAgent,
    PrivateAgent,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::PublicAgent => "public_agent",
            Self::PrivateAgent => "private_agent",
        }
    }
}

impl From<AgentId> for NodeId {
    fn from(agent: AgentId) -> Self {
        match agent {
            AgentId::PublicAgent => Self::PublicAgent,
            AgentId::PrivateAgent => Self::PrivateAgent,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal execution event emitted while a run progresses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionEvent {
    NodeStart {
        node: NodeId,
    },

    /// Answer token produced by an agent node
    Token {
        node: NodeId,
        content: String,
    },

    NodeEnd {
        node: NodeId,
        output: serde_json::Value,
    },

    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        node: Option<NodeId>,
    },

    /// Run finished; carries the final merged state
    End {
        state: Box<RunState>,
    },
}
