use crate::gemini::client::GeminiClient;
use crate::gemini::wire::Content;
use crate::traits::{ChatChannel, ModelReply};
use crate::types::{push_exchange, HistoryEntry};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Multi-turn chat over the stateless generateContent endpoint
///
/// The history is replayed on every send and kept to the first exchange plus
/// the newest one, so a long-lived channel sends at most five contents. It
/// only changes on success: a failed send leaves the history untouched.
pub struct GeminiChannel {
    client: GeminiClient,
    history: Mutex<Vec<HistoryEntry>>,
}

impl GeminiChannel {
    pub fn new(client: GeminiClient, history: Vec<HistoryEntry>) -> Self {
        Self {
            client,
            history: Mutex::new(history),
        }
    }

    /// Snapshot of the channel's own history
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.clone()
    }
}

#[async_trait]
impl ChatChannel for GeminiChannel {
    async fn send(&self, text: &str) -> Result<ModelReply> {
        // Held across the request so sends on one channel stay ordered
        let mut history = self.history.lock().await;

        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::user_text(text));

        tracing::debug!(
            model = %self.client.model(),
            turns = contents.len(),
            "Gemini channel send"
        );

        let reply = self.client.generate_content(contents).await?;

        push_exchange(&mut history, text, &reply.text);

        Ok(reply)
    }
}
