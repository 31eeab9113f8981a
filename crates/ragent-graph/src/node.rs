use anyhow::Result;
use async_trait::async_trait;
use ragent_types::{ExecutionEvent, NodeId, RunContext, RunState};
use tokio::sync::mpsc;

use crate::delta::NodeDelta;

/// Outlet for execution events
///
/// Runs without a listener use a detached sender; a listener that went away
/// never fails the run.
#[derive(Debug, Clone, Default)]
pub struct EventSender {
    tx: Option<mpsc::Sender<ExecutionEvent>>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<ExecutionEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub async fn send(&self, event: ExecutionEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).await.is_err() {
                tracing::debug!("Event listener dropped");
            }
        }
    }
}

/// Core abstraction for a unit of computation in the graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the node against a snapshot of the state and return what changed
    async fn execute(
        &self,
        state: &RunState,
        ctx: &RunContext,
        events: &EventSender,
    ) -> Result<NodeDelta>;

    fn id(&self) -> NodeId;
}
