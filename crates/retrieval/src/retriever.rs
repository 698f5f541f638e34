//! Query-time lookup: embed a query, search an index, map positions back to
//! the records the index was built from.

use thiserror::Error;
use tracing::debug;

use pakar_core::Indexable;
use pakar_ingest::{EmbedTask, Embedder, EmbeddingError};

use crate::index::{FlatL2Index, IndexBuildError, SearchError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("index not ready: {0}")]
    IndexNotReady(String),

    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("embedder returned no vector for the query")]
    EmptyQueryEmbedding,
}

/// A retrieved record together with its squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRecord<'a, R> {
    pub record: &'a R,
    pub distance: f32,
}

/// Nearest records to `query`, closest first, with distances.
///
/// `records[i]` must be the record whose vector sits at position `i` of
/// `index`. An empty index or a length mismatch is reported as
/// [`RetrievalError::IndexNotReady`] before the embedder is called.
pub async fn retrieve_scored<'a, R: Sync>(
    embedder: &dyn Embedder,
    query: &str,
    index: &FlatL2Index,
    records: &'a [R],
    k: usize,
) -> Result<Vec<ScoredRecord<'a, R>>, RetrievalError> {
    if index.is_empty() || records.is_empty() {
        return Err(RetrievalError::IndexNotReady("index is empty".to_string()));
    }
    if index.len() != records.len() {
        return Err(RetrievalError::IndexNotReady(format!(
            "index holds {} vectors but {} records",
            index.len(),
            records.len()
        )));
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let vector = embedder
        .embed_batch(&[query], EmbedTask::Query)
        .await?
        .into_iter()
        .next()
        .ok_or(RetrievalError::EmptyQueryEmbedding)?;

    let hits = index.search(&vector, k)?;
    debug!(k, hits = hits.len(), "retrieved neighbours");

    Ok(hits
        .into_iter()
        .filter_map(|n| {
            records.get(n.position).map(|record| ScoredRecord {
                record,
                distance: n.distance,
            })
        })
        .collect())
}

/// Nearest records to `query`, closest first.
pub async fn retrieve<'a, R: Sync>(
    embedder: &dyn Embedder,
    query: &str,
    index: &FlatL2Index,
    records: &'a [R],
    k: usize,
) -> Result<Vec<&'a R>, RetrievalError> {
    Ok(retrieve_scored(embedder, query, index, records, k)
        .await?
        .into_iter()
        .map(|s| s.record)
        .collect())
}

/// An index paired with the records it was built from, in position order.
#[derive(Debug, Clone)]
pub struct Corpus<R> {
    index: FlatL2Index,
    records: Vec<R>,
}

impl<R> Corpus<R> {
    /// Pair an existing index with its records. Counts must match.
    pub fn from_parts(index: FlatL2Index, records: Vec<R>) -> Result<Self, IndexBuildError> {
        if index.len() != records.len() {
            return Err(IndexBuildError::CountMismatch {
                expected: records.len(),
                actual: index.len(),
            });
        }
        Ok(Self { index, records })
    }

    pub fn empty() -> Self {
        Self {
            index: FlatL2Index::default(),
            records: Vec::new(),
        }
    }

    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Indexable> Corpus<R> {
    /// Embed every record's [`Indexable::embedding_text`] and index it.
    pub async fn build(embedder: &dyn Embedder, records: Vec<R>) -> Result<Self, IndexBuildError> {
        let texts: Vec<&str> = records.iter().map(Indexable::embedding_text).collect();
        let index = FlatL2Index::build(embedder, &texts).await?;
        Self::from_parts(index, records)
    }
}

impl<R: Sync> Corpus<R> {
    pub async fn retrieve(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: usize,
    ) -> Result<Vec<&R>, RetrievalError> {
        retrieve(embedder, query, &self.index, &self.records, k).await
    }

    pub async fn retrieve_scored(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredRecord<'_, R>>, RetrievalError> {
        retrieve_scored(embedder, query, &self.index, &self.records, k).await
    }
}
