use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{EmbedTask, Embedder, EmbeddingError};

/// `batchEmbedContents` accepts at most this many requests per call.
const MAX_BATCH: usize = 100;

/// Google Gemini embedding backend with native retrieval task types.
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model: model.trim_start_matches("models/").to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request<'a>(&self, texts: &[&'a str], task: EmbedTask) -> BatchEmbedRequest<'a> {
        let model = format!("models/{}", self.model);
        BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: model.clone(),
                    content: Content {
                        parts: vec![Part { text }],
                    },
                    task_type: task_type(task),
                })
                .collect(),
        }
    }
}

fn task_type(task: EmbedTask) -> &'static str {
    match task {
        EmbedTask::Query => "RETRIEVAL_QUERY",
        EmbedTask::Document => "RETRIEVAL_DOCUMENT",
    }
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed_batch(&self, texts: &[&str], task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url, self.model
        );
        let mut vectors = Vec::with_capacity(texts.len());

        // The API caps request size; callers still see a single batch.
        for part in texts.chunks(MAX_BATCH) {
            debug!(model = %self.model, batch = part.len(), "Gemini embed request");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&self.build_request(part, task))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api(format!("{status}: {body}")));
            }

            let parsed: BatchEmbedResponse = response.json().await?;
            if parsed.embeddings.len() != part.len() {
                return Err(EmbeddingError::Parse(format!(
                    "expected {} embeddings, got {}",
                    part.len(),
                    parsed.embeddings.len()
                )));
            }
            vectors.extend(parsed.embeddings.into_iter().map(|e| e.values));
        }

        Ok(vectors)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
