//! A scripted completion model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use docqa_core::{CompletionModel, DocqaError, Message, Result};

/// A [`CompletionModel`] that replays scripted replies in order and records
/// every message sequence it receives.
///
/// Push replies with [`push_reply`](MockLlm::push_reply) (or failures with
/// [`push_error`](MockLlm::push_error)); inspect what the orchestrator sent
/// with [`calls`](MockLlm::calls). An exhausted script fails the call, which
/// makes missing expectations loud in tests.
#[derive(Debug, Default)]
pub struct MockLlm {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Err(message.into()));
    }

    /// Every message sequence received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => {
                Err(DocqaError::Model { provider: "mock".to_string(), message })
            }
            None => Err(DocqaError::Model {
                provider: "mock".to_string(),
                message: "no scripted reply left".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_and_records_calls() {
        let mock = MockLlm::new();
        mock.push_reply("first");
        mock.push_reply("second");

        assert_eq!(mock.complete(&[Message::user("a")]).await.unwrap(), "first");
        assert_eq!(mock.complete(&[Message::user("b")]).await.unwrap(), "second");
        assert!(mock.complete(&[Message::user("c")]).await.is_err());

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1][0], Message::user("b"));
    }
}
