use ragent_llm::{Message, MockChatClient, MockReply};
use ragent_rag::{QueryRewriter, RewriterConfig};
use std::sync::Arc;

const KEYWORDS: &str = "KEYWORDS DE BÚSQUEDA";
const CONTEXTUALIZE: &str = "CONSULTA REFORMULADA";

fn rewriter(client: Arc<MockChatClient>) -> QueryRewriter {
    QueryRewriter::new(client, RewriterConfig::default())
}

#[tokio::test]
async fn test_short_query_always_extracts_keywords() {
    let client = Arc::new(
        MockChatClient::new(MockReply::text("unused"))
            .when(KEYWORDS, MockReply::text("tacos comida mexicana recetas")),
    );

    let rewritten = rewriter(client.clone()).extract_keywords("tacos").await;

    assert_eq!(rewritten, "tacos comida mexicana recetas");
    assert_eq!(client.calls_matching(KEYWORDS), 1);
}

#[tokio::test]
async fn test_long_keyword_query_bypasses() {
    let client = Arc::new(MockChatClient::new(MockReply::text("should not be used")));

    let rewritten = rewriter(client.clone())
        .extract_keywords("  motor diesel mantenimiento preventivo filtros?  ")
        .await;

    assert_eq!(rewritten, "motor diesel mantenimiento preventivo filtros");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_failures_fall_back_to_input() {
    let client = Arc::new(MockChatClient::new(MockReply::Fail("timeout".to_string())));
    let rewriter = rewriter(client.clone());

    assert_eq!(rewriter.extract_keywords("paella?").await, "paella");

    let history = vec![Message::human("quiero hacer tacos"), Message::ai("¿Qué necesitás?")];
    assert_eq!(
        rewriter.contextualize("dime la receta", &history, "").await,
        "dime la receta"
    );
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_empty_completion_falls_back() {
    let client = Arc::new(MockChatClient::new(MockReply::text("   ")));
    assert_eq!(rewriter(client).extract_keywords("rag").await, "rag");
}

#[tokio::test]
async fn test_contextualize_skipped_without_history_or_memory() {
    let client = Arc::new(MockChatClient::new(MockReply::text("x")));
    let out = rewriter(client.clone()).contextualize("dime la receta", &[], "").await;

    assert_eq!(out, "dime la receta");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_rewrite_runs_both_stages() {
    let client = Arc::new(
        MockChatClient::new(MockReply::text("unused"))
            .when(CONTEXTUALIZE, MockReply::text("dime la receta de tacos"))
            .when(KEYWORDS, MockReply::text("tacos receta ingredientes preparación")),
    );
    let history = vec![Message::human("quiero hacer tacos")];

    let out = rewriter(client.clone())
        .rewrite("dime la receta", &history, "")
        .await;

    assert_eq!(out, "tacos receta ingredientes preparación");
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].messages[0].content.contains("dime la receta de tacos"));
}

#[tokio::test]
async fn test_memory_alone_triggers_contextualize() {
    let client = Arc::new(
        MockChatClient::new(MockReply::text("unused"))
            .when(CONTEXTUALIZE, MockReply::text("recetas de tacos")),
    );

    let out = rewriter(client.clone())
        .contextualize("dame recetas", &[], "- le gusta cocinar tacos")
        .await;

    assert_eq!(out, "recetas de tacos");
    assert!(client.calls()[0].messages[0]
        .content
        .contains("[Memoria del usuario]: - le gusta cocinar tacos"));
}
