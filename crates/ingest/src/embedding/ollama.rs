use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{EmbedTask, Embedder, EmbeddingError};

/// Embedder backed by a local Ollama instance.
///
/// Ollama has no task parameter; models such as `nomic-embed-text` expect the
/// task as a text prefix instead.
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    query_prefix: String,
    document_prefix: String,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
            model,
            query_prefix: String::new(),
            document_prefix: String::new(),
        }
    }

    pub fn with_task_prefixes(mut self, query: impl Into<String>, document: impl Into<String>) -> Self {
        self.query_prefix = query.into();
        self.document_prefix = document.into();
        self
    }

    fn prefixed(&self, texts: &[&str], task: EmbedTask) -> Vec<String> {
        let prefix = match task {
            EmbedTask::Query => &self.query_prefix,
            EmbedTask::Document => &self.document_prefix,
        };
        texts.iter().map(|t| format!("{prefix}{t}")).collect()
    }
}

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str], task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = OllamaEmbedRequest {
            model: self.model.clone(),
            input: self.prefixed(texts, task),
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let parsed: OllamaEmbedResponse = response.json().await?;

        Ok(parsed.embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
