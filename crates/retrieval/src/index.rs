//! Exact (brute-force) L2 index.
//!
//! Vectors are stored row-major in one contiguous buffer. A search scores
//! every row, so results are exact; the corpora this serves are small enough
//! that no approximate structure is needed.

use thiserror::Error;
use tracing::info;

use pakar_ingest::{EmbedTask, Embedder, EmbeddingError};

#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("embedder returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("vector {position} has dimension {actual}, index dimension is {expected}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error("vector {position} is empty")]
    EmptyVector { position: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("query has dimension {actual}, index dimension is {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// One search hit: a position in the index and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FlatL2Index {
    dimension: usize,
    len: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Embed `texts` in one `Document` batch and index the vectors.
    /// Position `i` of the index corresponds to `texts[i]`.
    pub async fn build(embedder: &dyn Embedder, texts: &[&str]) -> Result<Self, IndexBuildError> {
        if texts.is_empty() {
            return Ok(Self::default());
        }

        let vectors = embedder.embed_batch(texts, EmbedTask::Document).await?;
        if vectors.len() != texts.len() {
            return Err(IndexBuildError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let index = Self::from_vectors(vectors)?;
        info!(
            model = %embedder.model(),
            vectors = index.len(),
            dimension = index.dimension(),
            "built flat L2 index"
        );
        Ok(index)
    }

    /// Index pre-computed vectors. All must share one non-zero dimension.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self, IndexBuildError> {
        let Some(first) = vectors.first() else {
            return Ok(Self::default());
        };
        let dimension = first.len();

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for (position, vector) in vectors.iter().enumerate() {
            if vector.is_empty() {
                return Err(IndexBuildError::EmptyVector { position });
            }
            if vector.len() != dimension {
                return Err(IndexBuildError::DimensionMismatch {
                    position,
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self {
            dimension,
            len: vectors.len(),
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vector dimension (0 for an empty index).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The `k` nearest rows by ascending squared L2 distance, ties broken by
    /// position. Asking for more rows than exist returns all of them.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, SearchError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2(row, query),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
