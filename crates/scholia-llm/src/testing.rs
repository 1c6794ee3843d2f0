//! Scripted in-memory model for tests
//!
//! Replies are consumed in FIFO order by channel sends and single-shot calls
//! alike. Counters and the recorded prompts let tests assert how the model was
//! driven (channels opened, sends, seeded histories).

use crate::traits::{ChatChannel, GenerativeModel, ModelReply};
use crate::types::{Attachment, HistoryEntry};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Default)]
struct Shared {
    replies: Mutex<VecDeque<Scripted>>,
    fallback_reply: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    prompts: Mutex<Vec<String>>,
    seeded_histories: Mutex<Vec<Vec<HistoryEntry>>>,
    attachments: Mutex<Vec<Option<Attachment>>>,
    channels_created: AtomicUsize,
    sends: AtomicUsize,
    generate_calls: AtomicUsize,
}

impl Shared {
    async fn next_reply(&self, prompt: &str) -> Result<ModelReply> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            Some(Scripted::Reply(text)) => Ok(ModelReply::text(text)),
            Some(Scripted::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => match self.fallback_reply.lock().unwrap().clone() {
                Some(text) => Ok(ModelReply::text(text)),
                None => Err(anyhow::anyhow!("no scripted reply left")),
            },
        }
    }
}

/// Model double driven by a queue of scripted replies
#[derive(Clone, Default)]
pub struct ScriptedModel {
    shared: Arc<Shared>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push_reply(text);
        self
    }

    /// Queue a provider failure
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push_failure(message);
        self
    }

    /// Reply used once the queue is exhausted
    pub fn always(self, text: impl Into<String>) -> Self {
        *self.shared.fallback_reply.lock().unwrap() = Some(text.into());
        self
    }

    /// Delay every reply (timeouts, concurrency)
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.shared.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.shared
            .replies
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(text.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.shared
            .replies
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.into()));
    }

    pub fn channels_created(&self) -> usize {
        self.shared.channels_created.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> usize {
        self.shared.sends.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.shared.generate_calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, channel sends and single-shot calls, in order
    pub fn prompts(&self) -> Vec<String> {
        self.shared.prompts.lock().unwrap().clone()
    }

    /// History each channel was seeded with, in creation order
    pub fn seeded_histories(&self) -> Vec<Vec<HistoryEntry>> {
        self.shared.seeded_histories.lock().unwrap().clone()
    }

    /// Attachment passed to each single-shot call
    pub fn attachments(&self) -> Vec<Option<Attachment>> {
        self.shared.attachments.lock().unwrap().clone()
    }
}

struct ScriptedChannel {
    shared: Arc<Shared>,
}

#[async_trait]
impl ChatChannel for ScriptedChannel {
    async fn send(&self, text: &str) -> Result<ModelReply> {
        self.shared.sends.fetch_add(1, Ordering::SeqCst);
        self.shared.next_reply(text).await
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn create_channel(&self, history: Vec<HistoryEntry>) -> Arc<dyn ChatChannel> {
        self.shared.channels_created.fetch_add(1, Ordering::SeqCst);
        self.shared.seeded_histories.lock().unwrap().push(history);
        Arc::new(ScriptedChannel {
            shared: Arc::clone(&self.shared),
        })
    }

    async fn generate(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<ModelReply> {
        self.shared.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.shared
            .attachments
            .lock()
            .unwrap()
            .push(attachment.cloned());
        self.shared.next_reply(prompt).await
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
