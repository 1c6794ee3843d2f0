pub mod attachment;
pub mod message;

pub use attachment::Attachment;
pub use message::{push_exchange, HistoryEntry, Role, FIRST_EXCHANGE_LEN};
