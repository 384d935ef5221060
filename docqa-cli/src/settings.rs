//! Environment-driven process settings.

use docqa_core::Result;
use docqa_model::OpenAIChatConfig;
use docqa_rag::OpenAIEmbedder;

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Settings resolved from the environment once at startup.
///
/// A missing `OPENAI_API_KEY` is a fatal configuration error — the process
/// must not start without a credential. `OPENAI_MODEL` and
/// `OPENAI_EMBEDDING_MODEL` fall back to defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Chat-completion configuration (key, model, temperature).
    pub chat: OpenAIChatConfig,
    /// Embedding model name.
    pub embedding_model: String,
}

impl Settings {
    /// Resolve settings from the environment.
    pub fn from_env() -> Result<Self> {
        let chat = OpenAIChatConfig::from_env()?;
        let embedding_model = std::env::var("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());
        Ok(Self { chat, embedding_model })
    }

    /// Build the embedding provider these settings describe.
    pub fn embedder(&self) -> docqa_rag::Result<OpenAIEmbedder> {
        Ok(OpenAIEmbedder::new(self.chat.api_key.clone())?
            .with_model(self.embedding_model.clone()))
    }
}
