use ragent_llm::Message;
use ragent_types::{AgentId, Citation, MemoryRecord, RetrievedDocument, RunState};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fields a node changed
///
/// `messages` are appended to the history; every other field that is set
/// replaces the state's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeDelta {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<Vec<RetrievedDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_agent: Option<AgentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_memories: Option<Vec<MemoryRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl NodeDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent: AgentId) -> Self {
        self.current_agent = Some(agent);
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_documents(mut self, documents: Vec<RetrievedDocument>, sources: Vec<Citation>) -> Self {
        self.retrieved_context = Some(documents);
        self.sources = Some(sources);
        self
    }

    pub fn with_turn(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.messages.push(Message::human(question));
        self.messages.push(Message::ai(answer));
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Merge into `state`
    pub fn apply(self, state: &mut RunState) {
        state.messages.extend(self.messages);

        if let Some(documents) = self.retrieved_context {
            state.retrieved_context = documents;
        }
        if let Some(agent) = self.current_agent {
            state.current_agent = Some(agent);
        }
        if let Some(response) = self.response {
            state.response = response;
        }
        if let Some(sources) = self.sources {
            state.sources = sources;
        }
        if let Some(memories) = self.user_memories {
            state.user_memories = memories;
        }
        if let Some(context) = self.memory_context {
            state.memory_context = context;
        }
        if let Some(metadata) = self.metadata {
            state.metadata = metadata;
        }
    }
}
