use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;

use super::traits::{EmbedTask, Embedder, EmbeddingError};

/// LRU cache mapping text to embedding vector.
pub struct EmbeddingCache {
    cache: LruCache<String, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a cached embedding by text.
    pub fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        if let Some(vec) = self.cache.get(text) {
            self.hits += 1;
            Some(vec.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    /// Store an embedding for a text.
    pub fn put(&mut self, text: &str, embedding: Vec<f32>) {
        self.cache.put(text.to_string(), embedding);
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Wraps an embedder and memoizes `Query` embeddings.
///
/// The context merger retrieves from two indices per question; with this
/// wrapper the question reaches the embedding service once. `Document`
/// batches pass straight through.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: Mutex<EmbeddingCache>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(EmbeddingCache::new(capacity)),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, EmbeddingCache> {
        // Poisoning is ignored: entries are independent of each other.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    async fn embed_batch(&self, texts: &[&str], task: EmbedTask) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if task == EmbedTask::Document {
            return self.inner.embed_batch(texts, task).await;
        }

        let mut found: Vec<Option<Vec<f32>>> = {
            let mut cache = self.cache();
            let found = texts.iter().map(|t| cache.get(t)).collect();
            tracing::debug!(
                hits = cache.hits(),
                misses = cache.misses(),
                entries = cache.len(),
                "query embedding cache"
            );
            found
        };
        let missing: Vec<&str> = texts
            .iter()
            .zip(&found)
            .filter(|(_, hit)| hit.is_none())
            .map(|(t, _)| *t)
            .collect();

        if !missing.is_empty() {
            let fresh = self.inner.embed_batch(&missing, task).await?;
            if fresh.len() != missing.len() {
                return Err(EmbeddingError::Parse(format!(
                    "expected {} embeddings, got {}",
                    missing.len(),
                    fresh.len()
                )));
            }
            let mut cache = self.cache();
            let mut fresh = fresh.into_iter();
            for (text, slot) in texts.iter().zip(found.iter_mut()) {
                if slot.is_none() {
                    if let Some(vector) = fresh.next() {
                        cache.put(text, vector.clone());
                        *slot = Some(vector);
                    }
                }
            }
        }

        Ok(found.into_iter().flatten().collect())
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
