//! Chunk configuration and output types.

use thiserror::Error;

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the sliding-window splitter. Units are characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 2000).
    pub chunk_size: usize,
    /// Target characters shared by consecutive chunks (default: 400).
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 400,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// `chunk_size` must be positive and strictly larger than `chunk_overlap`.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(ChunkError::InvalidConfig {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("invalid chunk config: size={size}, overlap={overlap} (need size > overlap >= 0)")]
    InvalidConfig { size: usize, overlap: usize },
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A window of text with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    /// The chunk text content.
    pub content: String,
    /// Character (not byte) offset of the first character in the original text.
    pub char_offset: usize,
}

impl Chunk {
    /// Character offset one past the last character of this chunk.
    pub fn char_end(&self) -> usize {
        self.char_offset + self.content.chars().count()
    }
}
