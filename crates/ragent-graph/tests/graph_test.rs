mod common;

use common::*;
use ragent_graph::prompts::{INVALID_INPUT_RESPONSE, NO_DOCUMENTS_RESPONSE};
use ragent_llm::{Message, MockChatClient, MockReply, Role};
use ragent_memory::{CheckpointStore, InMemoryLongTermStore, LongTermStore, MEMORY_CONTEXT_HEADER};
use ragent_rag::{Domain, StaticRetriever};
use ragent_types::{
    AgentId, MemoryNamespace, MemoryRecord, RunContext, RunInput, RunState, UserRole,
};
use serde_json::{json, Map};

fn public_ctx() -> RunContext {
    RunContext::new("run-1", "thread-1").with_user("u1")
}

fn private_ctx() -> RunContext {
    public_ctx().with_role(UserRole::Private)
}

fn state_for(message: &str, ctx: &RunContext) -> RunState {
    RunState::from_input(RunInput::new(message), &ctx.thread_id, ctx.user_role)
}

#[tokio::test]
async fn test_public_paella_question() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(KEYWORDS, MockReply::text("paella receta arroz"))
        .when(
            PUBLIC_AGENT,
            MockReply::chunks(["La paella ", "se hace con arroz y azafrán."]),
        );
    let retriever = StaticRetriever::new().with_documents(Domain::Public, paella_docs());
    let h = harness(llm, retriever);

    let ctx = public_ctx();
    let state = h
        .graph
        .invoke(state_for("¿Cómo se hace la paella?", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.current_agent, Some(AgentId::PublicAgent));
    assert!(state.response.contains("paella"));
    assert_eq!(state.sources.len(), 2);
    assert_eq!(state.sources[0].document_id, "paella-1");
    assert_eq!(state.metadata["search_query"], json!("paella receta arroz"));
    assert_eq!(state.metadata["no_results"], json!(false));
    assert_eq!(state.metadata["routing_decision"], json!("public_agent"));

    // public role never consults the classifier
    assert_eq!(h.llm.calls_matching(CLASSIFIER), 0);
    assert_eq!(h.retriever.calls_for(Domain::Public), 1);
    assert_eq!(h.retriever.calls_for(Domain::Private), 0);

    // the rewritten query is what gets searched
    assert_eq!(h.retriever.requests()[0].query, "paella receta arroz");
    assert_eq!(h.retriever.requests()[0].k, 8);

    // user + assistant turns appended
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0], Message::human("¿Cómo se hace la paella?"));
    assert_eq!(state.messages[1].role, Role::AI);
}

#[tokio::test]
async fn test_private_classified_query_searches_both_domains() {
    let private_docs = (0..5)
        .map(|i| doc(&format!("p{}", i), "Motor", "mantenimiento", 0.9 - i as f64 * 0.05))
        .collect();
    let mut public_docs: Vec<_> = (0..4)
        .map(|i| doc(&format!("q{}", i), "Receta", "cocina", 0.7 - i as f64 * 0.05))
        .collect();
    // same document seen from both domains
    public_docs.push(doc("p0", "Motor", "mantenimiento", 0.6));

    let llm = MockChatClient::new(MockReply::text(""))
        .when(CLASSIFIER, MockReply::text("PRIVATE"))
        .when(KEYWORDS, MockReply::text("motor diesel mantenimiento"))
        .when(PRIVATE_AGENT, MockReply::text("Revisá el filtro de aceite."));
    let retriever = StaticRetriever::new()
        .with_documents(Domain::Private, private_docs)
        .with_documents(Domain::Public, public_docs);
    let h = harness(llm, retriever);

    let ctx = private_ctx();
    let state = h
        .graph
        .invoke(state_for("motor diesel mantenimiento", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.current_agent, Some(AgentId::PrivateAgent));
    assert_eq!(h.retriever.calls_for(Domain::Private), 1);
    assert_eq!(h.retriever.calls_for(Domain::Public), 1);
    assert_eq!(state.sources.len(), 8);
    assert_eq!(
        state.sources.iter().filter(|s| s.document_id == "p0").count(),
        1
    );
    assert!(state
        .sources
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));
    assert_eq!(state.metadata["detected_department"], json!(null));
    assert_eq!(state.response, "Revisá el filtro de aceite.");
}

#[tokio::test]
async fn test_private_department_narrows_private_search() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(CLASSIFIER, MockReply::text("Private."))
        .when(PRIVATE_AGENT, MockReply::text("Consultá a RRHH."));
    let retriever = StaticRetriever::new().with_documents(
        Domain::Private,
        vec![doc("hr-1", "Vacaciones", "14 días hábiles", 0.8).with_metadata("department", "hr")],
    );
    let h = harness(llm, retriever);

    let ctx = private_ctx();
    let state = h
        .graph
        .invoke(state_for("política de vacaciones del empleado", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.metadata["detected_department"], json!("hr"));
    let private_request = h
        .retriever
        .requests()
        .into_iter()
        .find(|r| r.domain == Domain::Private)
        .unwrap();
    assert_eq!(private_request.department.as_deref(), Some("hr"));
    assert_eq!(private_request.k, 5);

    let agent_call = h
        .llm
        .calls()
        .into_iter()
        .find(|c| c.messages[0].content.contains(PRIVATE_AGENT))
        .unwrap();
    let last = agent_call.messages.last().unwrap();
    assert!(last.content.contains("[Documento 1] [HR] Vacaciones"));
}

#[tokio::test]
async fn test_empty_message_returns_invalid_input() {
    let h = harness(
        MockChatClient::new(MockReply::text("PRIVATE")),
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let ctx = private_ctx();
    let state = h.graph.invoke(state_for("   ", &ctx), &ctx).await.unwrap();

    assert_eq!(state.response, INVALID_INPUT_RESPONSE);
    assert!(state.sources.is_empty());
    assert!(state.messages.is_empty());
    assert_eq!(h.retriever.call_count(), 0);
    assert_eq!(h.memory.search_calls(), 0);
    assert_eq!(h.memory.put_calls(), 0);
    assert_eq!(h.llm.call_count(), 0);
}

#[tokio::test]
async fn test_anonymous_user_never_touches_memory() {
    let llm = MockChatClient::new(MockReply::text("Anotado."))
        .when(KEYWORDS, MockReply::text("paella"));
    let retriever = StaticRetriever::new().with_documents(Domain::Public, paella_docs());
    let h = harness(llm, retriever);

    let ctx = RunContext::new("run-1", "thread-1");
    let state = h
        .graph
        .invoke(state_for("Me llamo Ana y prefiero la paella", &ctx), &ctx)
        .await
        .unwrap();

    // give a stray background save the chance to run
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(state.metadata["user_id"], json!("anonymous"));
    assert_eq!(h.memory.search_calls(), 0);
    assert_eq!(h.memory.put_calls(), 0);
}

#[tokio::test]
async fn test_memorable_message_is_saved_in_background() {
    let llm = MockChatClient::new(MockReply::text("¡Hola Lucía!"));
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let ctx = public_ctx();
    h.graph
        .invoke(state_for("Me llamo Lucía y soy vegetariana", &ctx), &ctx)
        .await
        .unwrap();

    let memory = h.memory.clone();
    assert!(eventually(|| memory.put_calls() == 1).await);

    let records = h.memory.records(&MemoryNamespace::facts("u1")).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, "Me llamo Lucía y soy vegetariana");
}

#[tokio::test]
async fn test_recalled_memories_reach_agent_prompt() {
    let store = InMemoryLongTermStore::new();
    store
        .put(MemoryRecord::new(
            MemoryNamespace::facts("u1"),
            "Soy vegetariana",
            Map::new(),
        ))
        .await
        .unwrap();

    let llm = MockChatClient::new(MockReply::text(""))
        .when(CONTEXTUALIZE, MockReply::text("paella vegetariana"))
        .when(KEYWORDS, MockReply::text("paella vegetariana verduras"))
        .when(PUBLIC_AGENT, MockReply::text("Una paella de verduras."));
    let h = harness_with_memory(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
        store,
    );

    let ctx = public_ctx();
    let state = h
        .graph
        .invoke(state_for("¿y una paella para mí?", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.user_memories.len(), 1);
    assert!(state.memory_context.starts_with(MEMORY_CONTEXT_HEADER));
    assert_eq!(state.metadata["memories_loaded"], json!(1));

    let agent_call = h
        .llm
        .calls()
        .into_iter()
        .find(|c| c.messages[0].content.contains(PUBLIC_AGENT))
        .unwrap();
    assert!(agent_call.messages[0].content.ends_with("- Soy vegetariana"));
    // memory context triggers contextualization
    assert_eq!(h.llm.calls_matching(CONTEXTUALIZE), 1);
}

#[tokio::test]
async fn test_public_role_ignores_classifier() {
    let llm = MockChatClient::new(MockReply::text("respuesta"))
        .when(CLASSIFIER, MockReply::text("PRIVATE"));
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let ctx = public_ctx();
    let state = h
        .graph
        .invoke(state_for("motor diesel mantenimiento preventivo filtros", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.current_agent, Some(AgentId::PublicAgent));
    assert_eq!(h.llm.calls_matching(CLASSIFIER), 0);
    assert_eq!(h.retriever.calls_for(Domain::Private), 0);
}

#[tokio::test]
async fn test_faulty_classifier_routes_public() {
    for reply in [
        MockReply::Fail("upstream down".to_string()),
        MockReply::text(""),
        MockReply::text("???"),
        MockReply::text("Es PRIVATE"),
    ] {
        let llm = MockChatClient::new(MockReply::text("respuesta")).when(CLASSIFIER, reply);
        let h = harness(
            llm,
            StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
        );

        let ctx = private_ctx();
        let state = h
            .graph
            .invoke(state_for("motor diesel mantenimiento preventivo filtros", &ctx), &ctx)
            .await
            .unwrap();

        assert_eq!(state.current_agent, Some(AgentId::PublicAgent));
        assert_eq!(h.llm.calls_matching(CLASSIFIER), 1);
    }
}

#[tokio::test]
async fn test_retrieval_failure_declines_without_generation() {
    let llm = MockChatClient::new(MockReply::text("no debería usarse"))
        .when(KEYWORDS, MockReply::text("paella"));
    let h = harness(llm, StaticRetriever::new().failing(Domain::Public));

    let ctx = public_ctx();
    let state = h
        .graph
        .invoke(state_for("¿Cómo se hace la paella?", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.response, NO_DOCUMENTS_RESPONSE);
    assert!(state.sources.is_empty());
    assert_eq!(state.metadata["no_results"], json!(true));
    assert_eq!(h.llm.calls_matching(PUBLIC_AGENT), 0);
    assert_eq!(state.messages.len(), 2);
}

#[tokio::test]
async fn test_no_documents_with_history_answers_from_history() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(PUBLIC_AGENT, MockReply::text("Dijimos que lleva azafrán."));
    let h = harness(llm, StaticRetriever::new());
    h.checkpoints
        .append(
            "thread-1",
            &[
                Message::human("¿Qué lleva la paella?"),
                Message::ai("Arroz y azafrán."),
            ],
        )
        .await
        .unwrap();

    let ctx = public_ctx();
    let state = h
        .graph
        .invoke(state_for("¿y qué especia dijiste?", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.response, "Dijimos que lleva azafrán.");
    assert_eq!(state.metadata["answered_from_history"], json!(true));
    assert_eq!(state.metadata["no_results"], json!(true));

    let agent_call = h
        .llm
        .calls()
        .into_iter()
        .find(|c| c.messages[0].content.contains(PUBLIC_AGENT))
        .unwrap();
    // system + two stored turns + conversational turn
    assert_eq!(agent_call.messages.len(), 4);
    assert!(agent_call.messages[3]
        .content
        .contains("No encontré documentos relevantes en la base de datos"));
}

#[tokio::test]
async fn test_turns_are_checkpointed_between_runs() {
    let llm = MockChatClient::new(MockReply::text("respuesta"));
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );
    let ctx = public_ctx();

    h.graph
        .invoke(state_for("primera pregunta sobre paella", &ctx), &ctx)
        .await
        .unwrap();
    assert_eq!(h.checkpoints.load("thread-1").await.unwrap().len(), 2);

    let second = h
        .graph
        .invoke(state_for("segunda pregunta sobre paella", &ctx), &ctx)
        .await
        .unwrap();
    assert_eq!(second.messages.len(), 4);
    assert_eq!(second.messages[0].content, "primera pregunta sobre paella");
    assert_eq!(h.checkpoints.load("thread-1").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_generation_failure_fails_the_run() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(PUBLIC_AGENT, MockReply::Fail("model overloaded".to_string()));
    let h = harness(
        llm,
        StaticRetriever::new().with_documents(Domain::Public, paella_docs()),
    );

    let ctx = public_ctx();
    let err = h
        .graph
        .invoke(state_for("paella valenciana tradicional con pollo", &ctx), &ctx)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("model overloaded"));
    assert!(h.checkpoints.load("thread-1").await.unwrap().is_empty());
}

/// Answers only once both domains are searching at the same time
struct RendezvousRetriever {
    barrier: tokio::sync::Barrier,
}

#[async_trait::async_trait]
impl ragent_rag::Retriever for RendezvousRetriever {
    async fn search(
        &self,
        request: &ragent_rag::SearchRequest,
    ) -> anyhow::Result<Vec<ragent_types::RetrievedDocument>> {
        let wait = self.barrier.wait();
        if tokio::time::timeout(std::time::Duration::from_millis(500), wait)
            .await
            .is_err()
        {
            anyhow::bail!("{} search ran alone", request.domain.as_str());
        }

        let id = format!("{}-1", request.domain.as_str());
        Ok(vec![doc(&id, "Motor diésel", "Cambiar el filtro cada 10.000 km.", 0.8)])
    }
}

#[tokio::test]
async fn test_private_searches_run_concurrently() {
    let llm = MockChatClient::new(MockReply::text(""))
        .when(CLASSIFIER, MockReply::text("PRIVATE"))
        .when(PRIVATE_AGENT, MockReply::text("Revisa el filtro."));
    let graph = ragent_graph::GraphBuilder::new()
        .llm_client(std::sync::Arc::new(llm))
        .retriever(std::sync::Arc::new(RendezvousRetriever {
            barrier: tokio::sync::Barrier::new(2),
        }))
        .build()
        .unwrap();

    let ctx = private_ctx();
    let state = graph
        .invoke(state_for("motor diesel mantenimiento", &ctx), &ctx)
        .await
        .unwrap();

    assert_eq!(state.current_agent, Some(AgentId::PrivateAgent));
    let ids: Vec<&str> = state.sources.iter().map(|c| c.document_id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"private-1"));
    assert!(ids.contains(&"public-1"));
}
