//! Exact nearest-neighbour retrieval over two embedding indices and the
//! policy that merges their results into one grounding context.

pub mod context;
pub mod index;
pub mod retriever;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{ContextMerger, MergedContext};
pub use index::{FlatL2Index, IndexBuildError, Neighbor, SearchError};
pub use retriever::{retrieve, retrieve_scored, Corpus, RetrievalError, ScoredRecord};
