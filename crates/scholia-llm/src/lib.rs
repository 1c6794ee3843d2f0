pub mod types;
pub mod traits;
pub mod config;
pub mod gemini;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use traits::{
    ChatChannel,
    GenerativeModel,
    ModelReply, GenerationOptions,
    TokenUsage,
};

pub use config::{ClientFactory, GeminiConfig};
pub use gemini::{GeminiChannel, GeminiClient};
pub use types::{push_exchange, Attachment, HistoryEntry, Role, FIRST_EXCHANGE_LEN};
