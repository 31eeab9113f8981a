#![allow(dead_code)]

use ragent_graph::{Graph, GraphBuilder};
use ragent_llm::MockChatClient;
use ragent_memory::{InMemoryCheckpointStore, InMemoryLongTermStore};
use ragent_rag::StaticRetriever;
use ragent_types::RetrievedDocument;
use std::sync::Arc;
use std::time::Duration;

// Stable fragments of each prompt, used to route mock replies
pub const CLASSIFIER: &str = "clasificador de consultas";
pub const KEYWORDS: &str = "KEYWORDS DE BÚSQUEDA";
pub const CONTEXTUALIZE: &str = "CONSULTA REFORMULADA";
pub const PUBLIC_AGENT: &str = "información pública relacionada con cocina";
pub const PRIVATE_AGENT: &str = "asistente experto";

pub struct Harness {
    pub llm: Arc<MockChatClient>,
    pub retriever: Arc<StaticRetriever>,
    pub memory: Arc<InMemoryLongTermStore>,
    pub checkpoints: Arc<InMemoryCheckpointStore>,
    pub graph: Graph,
}

pub fn harness(llm: MockChatClient, retriever: StaticRetriever) -> Harness {
    harness_with_memory(llm, retriever, InMemoryLongTermStore::new())
}

pub fn harness_with_memory(
    llm: MockChatClient,
    retriever: StaticRetriever,
    memory: InMemoryLongTermStore,
) -> Harness {
    let llm = Arc::new(llm);
    let retriever = Arc::new(retriever);
    let memory = Arc::new(memory);
    let checkpoints = Arc::new(InMemoryCheckpointStore::new());

    let graph = GraphBuilder::new()
        .llm_client(llm.clone())
        .retriever(retriever.clone())
        .long_term_store(memory.clone())
        .checkpoint_store(checkpoints.clone())
        .build()
        .unwrap();

    Harness {
        llm,
        retriever,
        memory,
        checkpoints,
        graph,
    }
}

pub fn doc(id: &str, title: &str, content: &str, score: f64) -> RetrievedDocument {
    RetrievedDocument::new(id, title, content, score)
}

pub fn paella_docs() -> Vec<RetrievedDocument> {
    vec![
        doc("paella-1", "Paella valenciana", "La paella lleva arroz, azafrán y pollo.", 0.92),
        doc("paella-2", "Historia de la paella", "La paella nació en Valencia.", 0.81),
    ]
}

/// Poll until `check` holds or about a second passes
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
