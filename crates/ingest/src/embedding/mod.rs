pub mod cache;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use pakar_core::Config;

pub use cache::{CachedEmbedder, EmbeddingCache};
pub use gemini::GeminiEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{EmbedTask, Embedder, EmbeddingError};

/// Create the configured embedding backend, wrapped in a query cache when
/// `retrieval.query_cache_size` is non-zero.
pub fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let timeout = config.timeouts.request();
    let embedding = &config.embedding;

    let backend: Arc<dyn Embedder> = match embedding.provider.as_str() {
        "gemini" | "google" => {
            let api_key = config
                .gemini
                .api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Arc::new(GeminiEmbedder::new(api_key.clone(), embedding.model.clone(), timeout))
        }
        "openai" => {
            let api_key = config
                .llm
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                embedding.model.clone(),
                config.llm.openai_base_url.clone(),
                timeout,
            ))
        }
        "ollama" => Arc::new(
            OllamaEmbedder::new(config.ollama.url.clone(), embedding.model.clone(), timeout)
                .with_task_prefixes(embedding.query_prefix.clone(), embedding.document_prefix.clone()),
        ),
        other => {
            return Err(EmbeddingError::NotConfigured(format!(
                "unknown embedding provider: '{other}'"
            )))
        }
    };

    tracing::info!(provider = %embedding.provider, model = %backend.model(), "embedding backend ready");

    let cache_size = config.retrieval.query_cache_size;
    if cache_size == 0 {
        Ok(backend)
    } else {
        Ok(Arc::new(CachedEmbedder::new(backend, cache_size)))
    }
}
