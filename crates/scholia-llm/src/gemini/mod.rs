pub mod channel;
pub mod client;
mod wire;

pub use channel::GeminiChannel;
pub use client::{GeminiClient, GeminiClientBuilder, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
