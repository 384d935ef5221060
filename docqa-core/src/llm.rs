//! The completion port implemented by model backends.

use async_trait::async_trait;

use crate::content::Message;
use crate::error::Result;

/// A chat-completion backend: one ordered message sequence in, one reply
/// string out.
///
/// The exchange is a single synchronous round trip — no streaming, no tool
/// calls. Implementations own their transport and credentials and surface
/// failures as [`DocqaError::Model`](crate::DocqaError::Model).
///
/// # Example
///
/// ```rust,ignore
/// let reply = model.complete(&[Message::system("Say hi")]).await?;
/// ```
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// A short identifier for the backing model (used in logs).
    fn name(&self) -> &str;

    /// Run one completion over the given message sequence.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
