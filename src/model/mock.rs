use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::ModelInvoker;
use super::error::{ModelError, ModelResult};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Scripted model for tests.
///
/// Replies are matched by substring against the prompt; the first matching
/// rule wins, and unmatched prompts get the default reply.
pub struct MockModelInvoker {
    rules: RwLock<Vec<(String, MockReply)>>,
    default_reply: RwLock<MockReply>,
    delay: RwLock<Option<(String, Duration)>>,
    calls: AtomicUsize,
    prompts: RwLock<Vec<String>>,
}

impl Default for MockModelInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelInvoker {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            default_reply: RwLock::new(MockReply::Text(
                r#"{"score": 50, "findings": [], "recommendations": []}"#.to_string(),
            )),
            delay: RwLock::new(None),
            calls: AtomicUsize::new(0),
            prompts: RwLock::new(Vec::new()),
        }
    }

    /// Replies with `text` to prompts containing `needle`.
    pub fn respond_when(self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules
            .write()
            .push((needle.into(), MockReply::Text(text.into())));
        self
    }

    /// Fails prompts containing `needle` with a transport error.
    pub fn fail_when(self, needle: impl Into<String>, reason: impl Into<String>) -> Self {
        self.rules
            .write()
            .push((needle.into(), MockReply::Fail(reason.into())));
        self
    }

    pub fn with_default_response(self, text: impl Into<String>) -> Self {
        *self.default_reply.write() = MockReply::Text(text.into());
        self
    }

    /// Sleeps for `delay` before answering prompts containing `needle`.
    pub fn delay_when(self, needle: impl Into<String>, delay: Duration) -> Self {
        *self.delay.write() = Some((needle.into(), delay));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().clone()
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        self.rules
            .read()
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.read().clone())
    }
}

#[async_trait]
impl ModelInvoker for MockModelInvoker {
    async fn invoke(&self, prompt: &str) -> ModelResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.write().push(prompt.to_string());

        let delay = self
            .delay
            .read()
            .as_ref()
            .filter(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(reason) => Err(ModelError::Transport(reason)),
        }
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}
