//! Deterministic embedder for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pakar_ingest::{EmbedTask, Embedder, EmbeddingError};

pub const DIM: usize = 256;

/// Bag-of-words embedding: each lowercase token bumps one FNV-hashed bucket,
/// and the result is scaled to unit length.
pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hash: u64 = 0xcbf29ce484222325;
        for b in token.to_lowercase().bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        v[(hash % DIM as u64) as usize] += 1.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

#[derive(Default)]
pub struct HashEmbedder {
    pub calls: AtomicUsize,
    pub tasks: Mutex<Vec<EmbedTask>>,
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str], task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tasks.lock().unwrap().push(task);
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }

    fn model(&self) -> &str {
        "bag-of-words"
    }
}

/// Returns a fixed list of vectors regardless of input.
pub struct FixedEmbedder(pub Vec<Vec<f32>>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed_batch(&self, _texts: &[&str], _task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(self.0.clone())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

/// Always fails, like an unreachable embedding service.
pub struct DownEmbedder;

#[async_trait]
impl Embedder for DownEmbedder {
    async fn embed_batch(&self, _texts: &[&str], _task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Api("503 Service Unavailable".into()))
    }

    fn model(&self) -> &str {
        "down"
    }
}
