use serde::{Deserialize, Serialize};

/// Conversation role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[serde(rename = "user", alias = "human")]
    Human,
    #[serde(rename = "assistant", alias = "ai")]
    AI,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Human => "user",
            Self::AI => "assistant",
        }
    }
}

/// Provider-agnostic chat message
///
/// Serializes as `{"role": "...", "content": "..."}`, which is both the
/// OpenAI wire shape and the shape persisted in conversation checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create human message
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    /// Create AI message
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::AI,
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    pub fn is_human(&self) -> bool {
        self.role == Role::Human
    }

    pub fn is_ai(&self) -> bool {
        self.role == Role::AI
    }
}
