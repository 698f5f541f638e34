use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("embedding provider not configured: {0}")]
    NotConfigured(String),
}

/// How the embedded text will be used. Retrieval models represent a search
/// query differently from the passage it should match, so index build and
/// query time must not share a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedTask {
    /// A user question at retrieval time.
    Query,
    /// A corpus entry at index build time.
    Document,
}

/// Trait for embedding backends (Gemini, OpenAI, Ollama, ...).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str], task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
