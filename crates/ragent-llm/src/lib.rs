pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod openai;
pub mod config;
pub mod mock;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage, TokenStream,
    collect_text,
};

pub use streaming::StreamEvent;
pub use buffer_utils::CircularLineBuffer;
pub use openai::OpenAIClient;
pub use config::{ClientFactory, OpenAIConfig, ProviderConfig};
pub use types::{Message, Role};
pub use mock::{MockChatClient, MockReply};
