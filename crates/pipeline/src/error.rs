use std::time::Duration;

use thiserror::Error;

use pakar_ingest::{CorpusError, EmbeddingError};
use pakar_llm::LlmError;
use pakar_retrieval::{IndexBuildError, RetrievalError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// No document produced a single chunk.
    #[error("no document corpus could be built from the source directory")]
    NoCorpusData,

    #[error("corpus loading failed: {0}")]
    Corpus(CorpusError),

    #[error("index build failed: {0}")]
    IndexBuild(IndexBuildError),

    #[error("embedding service error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval failed: {0}")]
    Retrieval(RetrievalError),

    #[error("generation service error: {0}")]
    Generation(#[from] LlmError),

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },

    /// An earlier build failed; the pipeline stays unusable until restart.
    #[error("pipeline build failed earlier: {0}")]
    BuildFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<CorpusError> for PipelineError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::NoCorpusData => PipelineError::NoCorpusData,
            other => PipelineError::Corpus(other),
        }
    }
}

/// Embedding failures surface as `Embedding` whichever stage hit them.
impl From<IndexBuildError> for PipelineError {
    fn from(err: IndexBuildError) -> Self {
        match err {
            IndexBuildError::Embedding(e) => PipelineError::Embedding(e),
            other => PipelineError::IndexBuild(other),
        }
    }
}

impl From<RetrievalError> for PipelineError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Embedding(e) => PipelineError::Embedding(e),
            other => PipelineError::Retrieval(other),
        }
    }
}

impl From<pakar_core::PakarError> for PipelineError {
    fn from(err: pakar_core::PakarError) -> Self {
        PipelineError::Config(err.to_string())
    }
}
