mod common;

use common::*;
use ragent_llm::{MockChatClient, MockReply};
use ragent_rag::{Domain, StaticRetriever};
use ragent_types::{ExecutionEvent, NodeId, RunContext, RunInput, RunState};
use tokio::sync::mpsc;

async fn drain(mut rx: mpsc::Receiver<ExecutionEvent>) -> Vec<ExecutionEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn run(h: &Harness, message: &str) -> mpsc::Receiver<ExecutionEvent> {
    let ctx = RunContext::new("run-1", "thread-1");
    let state = RunState::from_input(RunInput::new(message), &ctx.thread_id, ctx.user_role);
    h.graph.spawn_run(state, ctx)
}

#[tokio::test]
async fn test_tokens_are_forwarded_in_order() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(PUBLIC_AGENT, MockReply::chunks(["Hola", " mundo", "!"]));
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let events = drain(run(&h, "paella valenciana tradicional con pollo")).await;

    let tokens: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::Token { node, content } => {
                assert_eq!(*node, NodeId::PublicAgent);
                Some(content.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(tokens, vec!["Hola", " mundo", "!"]);

    let ends: Vec<&ExecutionEvent> = events
        .iter()
        .filter(|e| matches!(e, ExecutionEvent::End { .. }))
        .collect();
    assert_eq!(ends.len(), 1);
    match events.last() {
        Some(ExecutionEvent::End { state }) => assert_eq!(state.response, "Hola mundo!"),
        other => panic!("expected End last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_node_lifecycle_order() {
    let h = harness(
        MockChatClient::new(MockReply::text("ok")),
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let events = drain(run(&h, "paella valenciana tradicional con pollo")).await;
    let lifecycle: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::NodeStart { node } => Some(format!("start:{}", node)),
            ExecutionEvent::NodeEnd { node, .. } => Some(format!("end:{}", node)),
            ExecutionEvent::End { .. } => Some("end".to_string()),
            _ => None,
        })
        .collect();

    assert_eq!(
        lifecycle,
        vec![
            "start:orchestrator",
            "end:orchestrator",
            "start:public_agent",
            "end:public_agent",
            "end",
        ]
    );

    let orchestrator_output = events
        .iter()
        .find_map(|e| match e {
            ExecutionEvent::NodeEnd { node: NodeId::Orchestrator, output } => Some(output),
            _ => None,
        })
        .unwrap();
    assert_eq!(orchestrator_output["current_agent"], "public_agent");
}

#[tokio::test]
async fn test_failure_mid_stream_emits_error_then_end() {
    let llm = MockChatClient::new(MockReply::text("")).when(
        PUBLIC_AGENT,
        MockReply::FailAfter(vec!["Hola".to_string()], "connection reset".to_string()),
    );
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let events = drain(run(&h, "paella valenciana tradicional con pollo")).await;
    let n = events.len();
    assert!(n >= 2);

    match &events[n - 2] {
        ExecutionEvent::Error { message, node } => {
            assert!(message.contains("connection reset"));
            assert_eq!(*node, Some(NodeId::PublicAgent));
        }
        other => panic!("expected Error, got {:?}", other),
    }
    assert!(matches!(events[n - 1], ExecutionEvent::End { .. }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ExecutionEvent::End { .. }))
            .count(),
        1
    );
}
