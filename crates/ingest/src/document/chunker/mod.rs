//! Sliding-window text chunker.
//!
//! Splits extracted document text into overlapping windows of at most
//! `chunk_size` characters. Windows close on the best semantic boundary in
//! their second half (paragraph, line, sentence, word) and fall back to a hard
//! character cut. Every chunk is a contiguous substring of the input, so the
//! original text can be rebuilt from `char_offset`s.

mod helpers;
mod types;

use helpers::{next_start, window_end};
pub use types::{Chunk, ChunkConfig, ChunkError};

/// Split `text` into windows of at most `size` characters overlapping by
/// roughly `overlap` characters.
pub fn split(text: &str, size: usize, overlap: usize) -> Result<Vec<String>, ChunkError> {
    let chunks = chunk_text(text, &ChunkConfig::new(size, overlap))?;
    Ok(chunks.into_iter().map(|c| c.content).collect())
}

/// Chunk `text`, keeping each window's index and character offset.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Result<Vec<Chunk>, ChunkError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let size = config.chunk_size;
    let mut chunks = Vec::with_capacity(total / size + 1);
    let mut start = 0usize;

    loop {
        let hard_end = (start + size).min(total);
        let end = if hard_end == total {
            total
        } else {
            window_end(&chars, start + size / 2, hard_end)
        };

        chunks.push(Chunk {
            index: chunks.len(),
            content: chars[start..end].iter().collect(),
            char_offset: start,
        });

        if end == total {
            break;
        }
        start = next_start(&chars, start, end, config.chunk_overlap);
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests;
