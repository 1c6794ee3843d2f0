//! Conversation session cache
//!
//! Reuses one chat channel per conversation and keeps a bounded history
//! window (first exchange + latest exchange) so a channel that has to be
//! reopened never replays an unbounded transcript.

pub mod key;
pub mod store;
mod turn;

pub use key::ConversationKey;
pub use store::SessionStore;
pub use turn::TurnLock;
