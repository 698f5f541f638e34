//! Corpus ingestion: text extraction, chunking, corpus building and the
//! embedding backends used to index the result.

pub mod corpus;
pub mod document;
pub mod embedding;

pub use corpus::{
    build_document_corpus, build_qa_corpus, list_source_files, load_qa_items, CorpusError,
    DocumentCorpus, QaCorpus, SkippedQaItem, SkippedSource, SourceSkip,
};
pub use document::chunker::{chunk_text, split, Chunk, ChunkConfig, ChunkError};
pub use document::{ExtractionError, FileExtractor, TextExtractor};
pub use embedding::{create_embedder, EmbedTask, Embedder, EmbeddingError};
