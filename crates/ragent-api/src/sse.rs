// Execution events -> gateway-compatible SSE frames

use axum::response::sse::Event;
use futures::Stream;
use ragent_types::{ExecutionEvent, NodeId};
use serde_json::{json, Value};
use std::convert::Infallible;
use tokio::sync::mpsc;

/// Name of the root run in every frame
pub const ROOT_RUN_NAME: &str = "rag_generation";

pub const DEFAULT_STREAM_MODE: &str = "events";

/// Builds the JSON body of each frame of one run
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    run_id: String,
}

impl FrameBuilder {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self { run_id: run_id.into() }
    }

    fn frame(&self, event: &str, name: &str, data: Value, node: Option<NodeId>) -> Value {
        let (metadata, parent_ids) = match node {
            Some(node) => (json!({ "langgraph_node": node.as_str() }), json!([self.run_id])),
            None => (json!({}), json!([])),
        };

        json!({
            "event": event,
            "name": name,
            "run_id": self.run_id,
            "data": data,
            "metadata": metadata,
            "parent_ids": parent_ids,
        })
    }

    pub fn root_start(&self, input: Value) -> Value {
        self.frame("on_chain_start", ROOT_RUN_NAME, json!({ "input": input }), None)
    }

    pub fn error(&self, message: &str) -> Value {
        self.frame("error", ROOT_RUN_NAME, json!({ "error": message }), None)
    }

    /// The single closing frame of the root run
    pub fn terminal(&self, output: Value) -> Value {
        self.frame("on_chain_end", ROOT_RUN_NAME, json!({ "output": output }), None)
    }

    pub fn translate(&self, event: &ExecutionEvent) -> Value {
        match event {
            ExecutionEvent::NodeStart { node } => {
                self.frame("on_chain_start", node.as_str(), json!({}), Some(*node))
            }
            ExecutionEvent::Token { node, content } => self.frame(
                "on_chat_model_stream",
                node.as_str(),
                json!({ "chunk": { "content": content } }),
                Some(*node),
            ),
            ExecutionEvent::NodeEnd { node, output } => self.frame(
                "on_chain_end",
                node.as_str(),
                json!({ "output": output }),
                Some(*node),
            ),
            ExecutionEvent::Error { message, .. } => self.error(message),
            ExecutionEvent::End { state } => {
                self.terminal(serde_json::to_value(state.as_ref()).unwrap_or_else(|_| json!({})))
            }
        }
    }
}

/// Frames of one streamed run
///
/// Opens with the root start frame and always closes with exactly one
/// terminal frame; a run that vanishes without finishing gets an error frame
/// first.
pub fn run_event_stream(
    mut events: mpsc::Receiver<ExecutionEvent>,
    frames: FrameBuilder,
    stream_mode: String,
    input: Value,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let sse = move |frame: Value| -> Result<Event, Infallible> {
        Ok(Event::default().event(stream_mode.as_str()).data(frame.to_string()))
    };

    async_stream::stream! {
        yield sse(frames.root_start(input));

        let mut terminated = false;
        while let Some(event) = events.recv().await {
            let is_end = matches!(event, ExecutionEvent::End { .. });
            yield sse(frames.translate(&event));
            if is_end {
                terminated = true;
                break;
            }
        }

        if !terminated {
            tracing::error!("Run stream closed before the run finished");
            yield sse(frames.error("Run ended unexpectedly"));
            yield sse(frames.terminal(json!({})));
        }
    }
}
