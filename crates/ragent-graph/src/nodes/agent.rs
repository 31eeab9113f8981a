use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use ragent_llm::{ChatClient, ChatRequest, Message, StreamEvent};
use ragent_memory::{extract_memorable, LongTermMemory};
use ragent_rag::{citations, QueryRewriter, Retriever, SearchRequest};
use ragent_types::{
    AgentId, ExecutionEvent, MemoryNamespace, NodeId, RetrievedDocument, RunContext, RunState,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::AgentLlmConfig;
use crate::delta::NodeDelta;
use crate::node::{EventSender, Node};
use crate::prompts::{
    augmented_prompt, conversational_prompt, with_memory, INVALID_INPUT_RESPONSE,
    NO_DOCUMENTS_RESPONSE,
};

/// What differs between the public and the private agent
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn agent(&self) -> AgentId;

    fn system_prompt(&self) -> &'static str;

    /// How the searched base is named in the no-documents prompt
    fn source_label(&self) -> &'static str;

    /// Render `[DEPT]` tags in the document context
    fn tags_department(&self) -> bool {
        false
    }

    /// Candidates for `query`, best first; failures degrade to an empty list
    async fn retrieve(&self, query: &str, message: &str, metadata: &mut Map<String, Value>)
        -> Vec<RetrievedDocument>;
}

/// One search that never fails the run
pub(crate) async fn search_or_empty(
    retriever: &dyn Retriever,
    request: &SearchRequest,
) -> Vec<RetrievedDocument> {
    match retriever.search(request).await {
        Ok(documents) => {
            tracing::debug!(
                domain = request.domain.as_str(),
                query = %request.query,
                count = documents.len(),
                "Retrieved documents"
            );
            documents
        }
        Err(e) => {
            tracing::warn!(domain = request.domain.as_str(), "Retrieval failed: {:#}", e);
            Vec::new()
        }
    }
}

/// Document block of the augmented prompt
pub fn format_context(documents: &[RetrievedDocument], tag_department: bool) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            if tag_department {
                let department = doc.department().unwrap_or("general").to_uppercase();
                format!("[Documento {}] [{}] {}\n{}", i + 1, department, doc.title, doc.content)
            } else {
                format!("[Documento {}] {}\n{}", i + 1, doc.title, doc.content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Retrieval-augmented answering agent
pub struct AgentNode<S> {
    strategy: S,
    client: Arc<dyn ChatClient>,
    llm: AgentLlmConfig,
    rewriter: QueryRewriter,
    memory: LongTermMemory,
}

impl<S: RetrievalStrategy> AgentNode<S> {
    pub fn new(
        strategy: S,
        client: Arc<dyn ChatClient>,
        llm: AgentLlmConfig,
        rewriter: QueryRewriter,
        memory: LongTermMemory,
    ) -> Self {
        Self {
            strategy,
            client,
            llm,
            rewriter,
            memory,
        }
    }

    fn node_id(&self) -> NodeId {
        self.strategy.agent().into()
    }

    /// Stream the answer, forwarding every chunk as a token event
    async fn generate(&self, messages: Vec<Message>, events: &EventSender) -> Result<String> {
        let node = self.node_id();
        let request =
            ChatRequest::new(self.llm.model.clone(), messages).with_options(self.llm.chat_options());

        let mut stream = self
            .client
            .chat_stream(request)
            .await
            .with_context(|| format!("{} failed to start generation", node))?;

        let mut answer = String::new();
        while let Some(event) = stream.next().await {
            match event.with_context(|| format!("{} generation stream failed", node))? {
                StreamEvent::Message { content } => {
                    answer.push_str(&content);
                    events.send(ExecutionEvent::Token { node, content }).await;
                }
                StreamEvent::Done { .. } => break,
            }
        }

        Ok(answer)
    }

    /// Store the raw message when it looks like a personal fact; never awaited
    fn remember(&self, ctx: &RunContext, message: &str) {
        if ctx.is_anonymous() {
            return;
        }
        let Some(data) = extract_memorable(message) else {
            return;
        };

        let memory = self.memory.clone();
        let namespace = MemoryNamespace::facts(ctx.user_id());
        let mut metadata = Map::new();
        metadata.insert("agent".into(), Value::from(self.strategy.agent().as_str()));
        metadata.insert("thread_id".into(), Value::from(ctx.thread_id.as_str()));

        tokio::spawn(async move {
            memory.save(namespace, &data, metadata).await;
        });
    }

    fn prompt_messages(&self, state: &RunState, system_prompt: String, turn: String) -> Vec<Message> {
        let mut messages = Vec::with_capacity(state.messages.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(state.messages.iter().cloned());
        messages.push(Message::human(turn));
        messages
    }
}

#[async_trait]
impl<S: RetrievalStrategy> Node for AgentNode<S> {
    async fn execute(
        &self,
        state: &RunState,
        ctx: &RunContext,
        events: &EventSender,
    ) -> Result<NodeDelta> {
        let agent = self.strategy.agent();

        let Some(message) = state.current_message() else {
            tracing::warn!(run_id = %ctx.run_id, agent = %agent, "No message to answer");
            return Ok(NodeDelta::new()
                .with_agent(agent)
                .with_response(INVALID_INPUT_RESPONSE)
                .with_documents(Vec::new(), Vec::new()));
        };

        let search_query = self
            .rewriter
            .rewrite(&message, &state.messages, &state.memory_context)
            .await;

        let mut metadata = state.metadata.clone();
        metadata.insert("search_query".into(), Value::from(search_query.as_str()));

        let documents = self
            .strategy
            .retrieve(&search_query, &message, &mut metadata)
            .await;
        let system_prompt = with_memory(self.strategy.system_prompt(), &state.memory_context);

        let response = if documents.is_empty() {
            metadata.insert("no_results".into(), Value::Bool(true));

            if state.has_history() || !state.memory_context.is_empty() {
                metadata.insert("answered_from_history".into(), Value::Bool(true));
                let turn = conversational_prompt(&message, self.strategy.source_label());
                self.generate(self.prompt_messages(state, system_prompt, turn), events)
                    .await?
            } else {
                NO_DOCUMENTS_RESPONSE.to_string()
            }
        } else {
            metadata.insert("no_results".into(), Value::Bool(false));
            let context = format_context(&documents, self.strategy.tags_department());
            let turn = augmented_prompt(&context, &message);
            self.generate(self.prompt_messages(state, system_prompt, turn), events)
                .await?
        };

        self.remember(ctx, &message);

        tracing::info!(
            run_id = %ctx.run_id,
            agent = %agent,
            documents = documents.len(),
            "Answer generated"
        );

        let sources = citations(&documents);
        Ok(NodeDelta::new()
            .with_agent(agent)
            .with_turn(message, response.clone())
            .with_response(response)
            .with_documents(documents, sources)
            .with_metadata(metadata))
    }

    fn id(&self) -> NodeId {
        self.node_id()
    }
}
