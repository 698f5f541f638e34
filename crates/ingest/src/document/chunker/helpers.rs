//! Boundary search used by the sliding-window splitter.

/// Separators tried, in priority order, when closing a window:
/// paragraph, line, sentence, word.
const SEPARATORS: &[&[char]] = &[
    &['\n', '\n'],
    &['\n'],
    &['.', ' '],
    &['?', ' '],
    &['!', ' '],
    &[' '],
];

/// Position just past the last separator found in `chars[lo..hi]`.
/// Falls back to `hi` (a hard cut) when the range holds no separator.
pub(crate) fn window_end(chars: &[char], lo: usize, hi: usize) -> usize {
    let window = &chars[lo..hi];
    for sep in SEPARATORS {
        if let Some(pos) = window.windows(sep.len()).rposition(|w| w == *sep) {
            return lo + pos + sep.len();
        }
    }
    hi
}

/// True when `chars[i]` begins a word.
pub(crate) fn is_word_start(chars: &[char], i: usize) -> bool {
    i < chars.len() && !chars[i].is_whitespace() && (i == 0 || chars[i - 1].is_whitespace())
}

/// Start of the window following `[prev_start, end)`.
///
/// Backs up `overlap` characters from `end`, then moves forward to the first
/// word start, never giving up more than half of the overlap.
pub(crate) fn next_start(chars: &[char], prev_start: usize, end: usize, overlap: usize) -> usize {
    let earliest = end.saturating_sub(overlap).max(prev_start + 1);
    let latest = end.saturating_sub(overlap / 2).max(earliest);
    (earliest..=latest)
        .find(|&i| is_word_start(chars, i))
        .unwrap_or(earliest)
}
