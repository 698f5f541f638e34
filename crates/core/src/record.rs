use serde::{Deserialize, Serialize};

/// A bounded excerpt of one source document, the unit of document search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// File name the chunk was cut from.
    pub source_id: String,
    /// Contiguous substring of the file's extracted text.
    pub content: String,
}

/// A curated question/answer pair. Only the question is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

/// Something that can be placed in an embedding index.
pub trait Indexable {
    /// The text handed to the embedder at build time.
    fn embedding_text(&self) -> &str;
}

impl Indexable for ChunkRecord {
    fn embedding_text(&self) -> &str {
        &self.content
    }
}

impl Indexable for QaRecord {
    fn embedding_text(&self) -> &str {
        &self.question
    }
}
