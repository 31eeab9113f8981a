use ragent_types::{AgentId, NodeId, RunState};

/// Decides which node to execute next based on current state
pub trait Router: Send + Sync {
    fn next(&self, state: &RunState, current: NodeId) -> NextNode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextNode {
    Node(NodeId),
    End,
}

/// Agent selected by the orchestrator, public when unset
pub fn route_to_agent(state: &RunState) -> AgentId {
    state.current_agent.unwrap_or(AgentId::PublicAgent)
}

/// orchestrator -> public_agent | private_agent -> END
pub struct AgentRouter;

impl Router for AgentRouter {
    fn next(&self, state: &RunState, current: NodeId) -> NextNode {
        match current {
            NodeId::Orchestrator => NextNode::Node(route_to_agent(state).into()),
            NodeId::PublicAgent | NodeId::PrivateAgent => NextNode::End,
        }
    }
}
