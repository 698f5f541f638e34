//! Retrieval-augmented answering over a document corpus and a curated Q&A set.
//!
//! [`Pipeline`] owns both embedding indices for the life of the process. The
//! first call to [`Pipeline::build`] or [`Pipeline::answer`] builds them; a
//! failed build is final.

pub mod error;
pub mod pipeline;
pub mod settings;

pub use error::PipelineError;
pub use pipeline::{CorpusStats, Pipeline, PipelineState};
pub use settings::{PipelineSettings, SourceSettings};
