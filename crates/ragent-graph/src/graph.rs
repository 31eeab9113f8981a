use anyhow::{anyhow, Result};
use ragent_memory::CheckpointStore;
use ragent_types::{ExecutionEvent, NodeId, RunContext, RunState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::node::{EventSender, Node};
use crate::router::{NextNode, Router};

/// orchestrator plus one agent
const MAX_STEPS: usize = 3;

struct StepFailure {
    node: NodeId,
    error: anyhow::Error,
}

/// Static orchestrator -> agent state machine
#[derive(Clone)]
pub struct Graph {
    orchestrator: Arc<dyn Node>,
    public_agent: Arc<dyn Node>,
    private_agent: Arc<dyn Node>,
    router: Arc<dyn Router>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl Graph {
    pub(crate) fn new(
        orchestrator: Arc<dyn Node>,
        public_agent: Arc<dyn Node>,
        private_agent: Arc<dyn Node>,
        router: Arc<dyn Router>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            orchestrator,
            public_agent,
            private_agent,
            router,
            checkpoints,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::GraphBuilder {
        crate::builder::GraphBuilder::new()
    }

    fn node(&self, id: NodeId) -> &Arc<dyn Node> {
        match id {
            NodeId::Orchestrator => &self.orchestrator,
            NodeId::PublicAgent => &self.public_agent,
            NodeId::PrivateAgent => &self.private_agent,
        }
    }

    /// Run to completion without an event listener
    pub async fn invoke(&self, state: RunState, ctx: &RunContext) -> Result<RunState> {
        self.invoke_with_events(state, ctx, &EventSender::detached())
            .await
    }

    pub async fn invoke_with_events(
        &self,
        mut state: RunState,
        ctx: &RunContext,
        events: &EventSender,
    ) -> Result<RunState> {
        let loaded = self.prepare(&mut state, ctx).await;

        self.run_steps(&mut state, ctx, events)
            .await
            .map_err(|f| f.error.context(format!("Node {} failed", f.node)))?;

        self.persist_turns(&state, ctx, loaded).await;
        Ok(state)
    }

    /// Spawn execution in background, return event receiver
    ///
    /// The receiver always ends with exactly one `End` event, preceded by an
    /// `Error` event when the run failed.
    pub fn spawn_run(&self, state: RunState, ctx: RunContext) -> mpsc::Receiver<ExecutionEvent> {
        let (tx, rx) = mpsc::channel(1000);
        let graph = self.clone();

        tokio::spawn(async move {
            let events = EventSender::new(tx);
            let mut state = state;
            let loaded = graph.prepare(&mut state, &ctx).await;

            match graph.run_steps(&mut state, &ctx, &events).await {
                Ok(()) => graph.persist_turns(&state, &ctx, loaded).await,
                Err(failure) => {
                    tracing::error!(
                        run_id = %ctx.run_id,
                        node = %failure.node,
                        "Run failed: {:#}",
                        failure.error
                    );
                    events
                        .send(ExecutionEvent::Error {
                            message: format!("{:#}", failure.error),
                            node: Some(failure.node),
                        })
                        .await;
                }
            }

            events
                .send(ExecutionEvent::End {
                    state: Box::new(state),
                })
                .await;
        });

        rx
    }

    /// Pin the effective role and prepend the stored history; returns the
    /// number of stored turns
    async fn prepare(&self, state: &mut RunState, ctx: &RunContext) -> usize {
        state.user_role = ctx.user_role;

        match self.checkpoints.load(&ctx.thread_id).await {
            Ok(mut history) => {
                let loaded = history.len();
                history.append(&mut state.messages);
                state.messages = history;
                loaded
            }
            Err(e) => {
                tracing::warn!(thread_id = %ctx.thread_id, "Failed to load history: {}", e);
                0
            }
        }
    }

    async fn run_steps(
        &self,
        state: &mut RunState,
        ctx: &RunContext,
        events: &EventSender,
    ) -> std::result::Result<(), StepFailure> {
        let mut current = NodeId::Orchestrator;

        for _ in 0..MAX_STEPS {
            let node_start = Instant::now();
            events.send(ExecutionEvent::NodeStart { node: current }).await;

            let delta = self
                .node(current)
                .execute(state, ctx, events)
                .await
                .map_err(|error| StepFailure { node: current, error })?;

            let output = serde_json::to_value(&delta).unwrap_or(Value::Null);
            delta.apply(state);

            tracing::debug!(
                run_id = %ctx.run_id,
                node = %current,
                duration_ms = node_start.elapsed().as_millis() as u64,
                "Node finished"
            );
            events
                .send(ExecutionEvent::NodeEnd {
                    node: current,
                    output,
                })
                .await;

            match self.router.next(state, current) {
                NextNode::End => return Ok(()),
                NextNode::Node(next) => current = next,
            }
        }

        Err(StepFailure {
            node: current,
            error: anyhow!("Max steps ({}) reached", MAX_STEPS),
        })
    }

    /// Append this run's turns after the stored history
    async fn persist_turns(&self, state: &RunState, ctx: &RunContext, loaded: usize) {
        let new_turns = state.messages.get(loaded..).unwrap_or_default();
        if new_turns.is_empty() {
            return;
        }

        if let Err(e) = self.checkpoints.append(&ctx.thread_id, new_turns).await {
            tracing::warn!(thread_id = %ctx.thread_id, "Failed to save history: {}", e);
        }
    }
}
