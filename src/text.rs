//! Text layout helpers shared by labels and inputs
//!
//! All measurement walks Unicode scalar values (`char`s), never bytes, and
//! sums per-glyph advances from a [`FontFace`].

use crate::font::FontFace;
use unicode_normalization::UnicodeNormalization;

/// Canonical composition (NFC) so "e" + combining acute and "é" compare equal
pub fn normalize(text: &str) -> String {
    text.nfc().collect()
}

/// Pixel width of `text` on one line; glyphs the face lacks contribute nothing
pub fn measure_width(text: &str, font: &dyn FontFace) -> i32 {
    text.chars().filter_map(|ch| font.advance(ch)).sum()
}

/// Greedily break `text` into lines no wider than `max_width`
///
/// Words are split on whitespace and rejoined with single spaces. A word that
/// is wider than `max_width` on its own gets a line to itself and is never
/// split. A non-positive width disables wrapping.
pub fn wrap_lines(text: &str, max_width: i32, font: &dyn FontFace) -> Vec<String> {
    if max_width <= 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_width = measure_width(&current, font)
            + measure_width(" ", font)
            + measure_width(word, font);
        if candidate_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Pixel offset of the caret placed before `chars[index]`
pub fn caret_offset(chars: &[char], index: usize, advance: impl Fn(char) -> i32) -> i32 {
    chars.iter().take(index).map(|&ch| advance(ch)).sum()
}

/// Caret index nearest to a horizontal pixel offset from the text origin
///
/// Walks the glyphs accumulating advances and stops at the first glyph whose
/// midpoint lies past `offset`. Offsets at or before the origin map to 0,
/// offsets past the end map to `chars.len()`.
pub fn caret_index_at(chars: &[char], offset: i32, advance: impl Fn(char) -> i32) -> usize {
    if offset <= 0 {
        return 0;
    }

    let mut width = 0;
    for (index, &ch) in chars.iter().enumerate() {
        let glyph = advance(ch);
        if width + glyph / 2 > offset {
            return index;
        }
        width += glyph;
    }
    chars.len()
}
