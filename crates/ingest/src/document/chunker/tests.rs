//! Tests for the chunking engine.

use super::helpers::{is_word_start, next_start, window_end};
use super::types::{Chunk, ChunkConfig, ChunkError};
use super::{chunk_text, split};

fn words(n: usize) -> String {
    (0..n).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
}

/// Rebuild the source text by dropping each chunk's overlap with its predecessor.
fn reconstruct(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    let mut covered = 0usize;
    for c in chunks {
        let skip = covered.saturating_sub(c.char_offset);
        out.extend(c.content.chars().skip(skip));
        covered = c.char_end();
    }
    out
}

// ── Short input ─────────────────────────────────────────────────────

#[test]
fn short_text_is_a_single_chunk() {
    let text = "Overstay fines are set at one million rupiah per day.";
    let chunks = split(text, 2000, 400).unwrap();
    assert_eq!(chunks, vec![text.to_string()]);
}

#[test]
fn text_of_exactly_size_is_a_single_chunk() {
    let text = "x".repeat(2000);
    assert_eq!(split(&text, 2000, 400).unwrap().len(), 1);
}

#[test]
fn empty_text_produces_no_chunks() {
    assert!(split("", 2000, 400).unwrap().is_empty());
}

// ── Bounds and overlap ──────────────────────────────────────────────

#[test]
fn chunks_respect_size_limit() {
    let text = words(3000);
    let chunks = chunk_text(&text, &ChunkConfig::default()).unwrap();
    assert!(chunks.len() > 1);
    for c in &chunks {
        assert!(c.content.chars().count() <= 2000, "chunk {} too long", c.index);
    }
}

#[test]
fn consecutive_chunks_overlap_by_at_least_half_the_target() {
    let text = words(3000);
    let chunks = chunk_text(&text, &ChunkConfig::default()).unwrap();
    for pair in chunks.windows(2) {
        let shared = pair[0].char_end() - pair[1].char_offset;
        assert!(shared >= 200, "overlap {shared} below 200");
        assert!(shared <= 400, "overlap {shared} above 400");
    }
}

#[test]
fn overlap_removal_reconstructs_input() {
    let text = format!("{}\n\n{}\nTail line. {}", words(700), words(500), words(900));
    let chunks = chunk_text(&text, &ChunkConfig::default()).unwrap();
    assert_eq!(reconstruct(&chunks), text);
}

#[test]
fn chunk_indices_and_offsets_are_sequential() {
    let chunks = chunk_text(&words(2500), &ChunkConfig::default()).unwrap();
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.index, i);
    }
    for pair in chunks.windows(2) {
        assert!(pair[1].char_offset > pair[0].char_offset);
    }
    assert_eq!(chunks[0].char_offset, 0);
}

#[test]
fn overlapping_chunks_start_on_a_word() {
    let chunks = chunk_text(&words(2500), &ChunkConfig::default()).unwrap();
    for c in chunks.iter().skip(1) {
        assert!(c.content.starts_with("word"), "chunk {} starts mid-word", c.index);
    }
}

// ── Boundaries ──────────────────────────────────────────────────────

#[test]
fn prefers_paragraph_break_over_word_break() {
    let para = "alpha ".repeat(250); // 1500 chars
    let text = format!("{}\n\n{}", para.trim_end(), para.trim_end());
    let chunks = split(&text, 2000, 400).unwrap();
    assert!(chunks[0].ends_with("\n\n"), "first chunk should close on the paragraph break");
}

#[test]
fn hard_cut_without_any_separator() {
    let text = "x".repeat(5000);
    let chunks = chunk_text(&text, &ChunkConfig::default()).unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].content.len(), 2000);
    assert_eq!(chunks[1].char_offset, 1600);
    assert_eq!(chunks[2].char_offset, 3200);
    assert_eq!(reconstruct(&chunks), text);
}

#[test]
fn multibyte_text_is_split_on_characters() {
    let text = "é".repeat(4500);
    let chunks = chunk_text(&text, &ChunkConfig::default()).unwrap();
    for c in &chunks {
        assert!(c.content.chars().count() <= 2000);
    }
    assert_eq!(reconstruct(&chunks), text);
}

#[test]
fn zero_overlap_chunks_are_disjoint() {
    let text = words(1500);
    let chunks = chunk_text(&text, &ChunkConfig::new(1000, 0)).unwrap();
    for pair in chunks.windows(2) {
        assert_eq!(pair[0].char_end(), pair[1].char_offset);
    }
    assert_eq!(chunks.iter().map(|c| c.content.as_str()).collect::<String>(), text);
}

// ── Determinism and config ──────────────────────────────────────────

#[test]
fn splitting_is_deterministic() {
    let text = format!("{}\n{}", words(1200), words(1300));
    assert_eq!(split(&text, 2000, 400).unwrap(), split(&text, 2000, 400).unwrap());
}

#[test]
fn overlap_not_smaller_than_size_is_rejected() {
    assert_eq!(
        split("abc", 100, 100).unwrap_err(),
        ChunkError::InvalidConfig { size: 100, overlap: 100 }
    );
    assert!(split("abc", 0, 0).is_err());
}

// ── Helpers ─────────────────────────────────────────────────────────

#[test]
fn window_end_picks_highest_priority_separator() {
    let chars: Vec<char> = "one two.\nthree four".chars().collect();
    // The newline outranks the later space.
    assert_eq!(window_end(&chars, 0, chars.len()), 9);
}

#[test]
fn window_end_hard_cuts_without_separator() {
    let chars: Vec<char> = "abcdef".chars().collect();
    assert_eq!(window_end(&chars, 0, 4), 4);
}

#[test]
fn word_start_detection() {
    let chars: Vec<char> = "ab cd".chars().collect();
    assert!(is_word_start(&chars, 0));
    assert!(!is_word_start(&chars, 1));
    assert!(!is_word_start(&chars, 2));
    assert!(is_word_start(&chars, 3));
    assert!(!is_word_start(&chars, 5));
}

#[test]
fn next_start_always_advances() {
    let chars: Vec<char> = "x".repeat(10).chars().collect();
    assert_eq!(next_start(&chars, 4, 5, 4), 5);
}
