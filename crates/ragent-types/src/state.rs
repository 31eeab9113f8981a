use crate::document::{Citation, RetrievedDocument};
use crate::memory::MemoryRecord;
use ragent_llm::{Message, Role};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Access level of the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Public,
    Private,
}

impl UserRole {
    /// Anything other than a (trimmed, case-insensitive) `"private"` is public
    pub fn normalize(value: Option<&str>) -> Self {
        match value {
            Some(role) if role.trim().eq_ignore_ascii_case("private") => Self::Private,
            _ => Self::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Terminal generation agent selected by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    PublicAgent,
    PrivateAgent,
}

impl AgentId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicAgent => "public_agent",
            Self::PrivateAgent => "private_agent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public_agent" => Some(Self::PublicAgent),
            "private_agent" => Some(Self::PrivateAgent),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown agent names become `None` so routing can fall back instead of failing the run.
fn lenient_agent<'de, D>(deserializer: D) -> Result<Option<AgentId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(AgentId::parse))
}

/// Input block of a run request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInput {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    /// Optional prior turns supplied by the caller
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl RunInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }
}

/// Mutable record threaded through one run
///
/// Owned by a single run. Nodes never mutate it directly; they return
/// deltas that the executor merges field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_role: UserRole,
    #[serde(default)]
    pub message: String,
    /// Conversation history, append-only
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub retrieved_context: Vec<RetrievedDocument>,
    #[serde(default, deserialize_with = "lenient_agent")]
    pub current_agent: Option<AgentId>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Citation>,
    #[serde(default)]
    pub user_memories: Vec<MemoryRecord>,
    #[serde(default)]
    pub memory_context: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RunState {
    pub fn new(session_id: impl Into<String>, user_role: UserRole, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_role,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Build the initial state of a run
    ///
    /// `role` is the already-resolved effective role; the session falls back
    /// to the thread id when the input does not name one.
    pub fn from_input(input: RunInput, thread_id: &str, role: UserRole) -> Self {
        let session_id = input
            .session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| thread_id.to_string());

        Self {
            session_id,
            user_role: role,
            message: input.message,
            messages: input.messages,
            ..Default::default()
        }
    }

    /// Message to answer: the trimmed `message` field, else the last
    /// non-blank human turn of the history
    pub fn current_message(&self) -> Option<String> {
        let direct = self.message.trim();
        if !direct.is_empty() {
            return Some(direct.to_string());
        }

        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::Human)
            .map(|m| m.content.trim())
            .find(|content| !content.is_empty())
            .map(str::to_string)
    }

    pub fn has_history(&self) -> bool {
        !self.messages.is_empty()
    }
}
