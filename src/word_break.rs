//! Word breaker (§6 "consumed" contract), discharged by
//! `unicode_segmentation`'s UAX #29 word-boundary iterator, coarsened per
//! `LineBreakWordStyle` the same way a `line_breaking::character_classification`
//! module classifies characters for coarser breaking modes.

use unicode_segmentation::UnicodeSegmentation;

use crate::text::{Range, U16StringPiece};

/// Line-break word style: how aggressively word boundaries are coarsened
/// before being offered to the line breakers (§4.9's phrase-based retry,
/// §4.3's `variant`-adjacent `family_variant` is unrelated to this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreakWordStyle {
    /// Every UAX #29 word boundary is a candidate.
    #[default]
    None,
    /// Resolve to `Phrase` only when the heuristic in §4.9 kicks in
    /// (fewer than `LBW_AUTO_HEURISTICS_LINE_COUNT` lines on first pass).
    Auto,
    /// Coarser "phrase" boundaries: only break at boundaries that are also
    /// whitespace-adjacent, matching CJK phrase-based wrapping practice.
    Phrase,
}

/// A single UTF-16 codeunit boundary offered by the word breaker, tagged
/// with whether it sits inside a heuristically-detected email/URL span
/// (spec §4.9's `breakBadness`/orphan-avoidance logic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBoundary {
    pub offset: usize,
    pub in_email_or_url: bool,
}

/// Decode `piece` to a `String` plus a codeunit offset per char, the same
/// byte<->codeunit bridging pattern used throughout this crate wherever a
/// `str`-based utility crate is driven from UTF-16 input.
fn decode(piece: U16StringPiece<'_>) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(piece.len());
    let mut byte_to_codeunit = Vec::with_capacity(piece.len() + 1);
    for (range, ch) in piece.char_indices() {
        byte_to_codeunit.push(range.start - piece.range().start);
        text.push(ch);
    }
    byte_to_codeunit.push(piece.len());
    (text, byte_to_codeunit)
}

fn byte_to_cu(byte_to_codeunit: &[usize], byte_offset: usize) -> usize {
    match byte_to_codeunit.binary_search(&byte_offset) {
        Ok(i) => i,
        Err(i) => i,
    }
}

/// Crude email/URL span detector: a contiguous non-whitespace run
/// containing `@` (email) or `://` (URL). Used only to bias which word
/// boundary the greedy breaker keeps around an orphaned break (§4.9, §9's
/// flagged bitwise-OR expression).
fn email_or_url_spans(text: &str) -> Vec<std::ops::Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push(s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }
    spans
        .into_iter()
        .filter(|r| {
            let token = &text[r.clone()];
            token.contains('@') || token.contains("://")
        })
        .collect()
}

/// Word boundaries for `piece` under `style`, relative to the full buffer
/// (absolute codeunit offsets, matching `piece.range()`'s coordinate
/// space), always including `piece.range().end`.
pub fn word_boundaries(piece: U16StringPiece<'_>, style: LineBreakWordStyle) -> Vec<WordBoundary> {
    if piece.is_empty() {
        return vec![WordBoundary {
            offset: piece.range().end,
            in_email_or_url: false,
        }];
    }

    let (text, byte_to_codeunit) = decode(piece);
    let spans = email_or_url_spans(&text);
    let in_span = |byte_offset: usize| spans.iter().any(|s| s.start < byte_offset && byte_offset < s.end);

    let mut boundaries: Vec<(usize, bool)> = text
        .split_word_bound_indices()
        .map(|(byte_offset, _)| (byte_offset, false))
        .filter(|&(b, _)| b != 0)
        .map(|(b, _)| (b, in_span(b)))
        .collect();
    boundaries.push((text.len(), false));

    if style == LineBreakWordStyle::Phrase {
        // Coarsen to boundaries adjacent to whitespace only, i.e. collapse
        // runs of word-internal boundaries down to phrase-level breaks.
        boundaries = boundaries
            .into_iter()
            .filter(|&(b, _)| {
                b == text.len()
                    || text[..b].chars().next_back().map(|c| c.is_whitespace()).unwrap_or(false)
                    || text[b..].chars().next().map(|c| c.is_whitespace()).unwrap_or(false)
            })
            .collect();
        if boundaries.last().map(|&(b, _)| b) != Some(text.len()) {
            boundaries.push((text.len(), false));
        }
    }

    boundaries
        .into_iter()
        .map(|(byte_offset, in_url)| WordBoundary {
            offset: piece.range().start + byte_to_cu(&byte_to_codeunit, byte_offset),
            in_email_or_url: in_url,
        })
        .collect()
}

/// The word containing codeunit `offset` (absolute coordinates), per §6's
/// `wordRange()` contract.
pub fn word_range(piece: U16StringPiece<'_>, offset: usize) -> Range {
    let boundaries = word_boundaries(piece, LineBreakWordStyle::None);
    let mut start = piece.range().start;
    for b in &boundaries {
        if b.offset > offset {
            return Range::new(start, b.offset);
        }
        start = b.offset;
    }
    Range::new(start, piece.range().end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_word_boundaries() {
        let text: Vec<u16> = "This is an example".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let boundaries = word_boundaries(piece, LineBreakWordStyle::None);
        // "This"|" "|"is"|" "|"an"|" "|"example" -> 7 boundaries incl. end.
        assert!(boundaries.len() >= 6);
        assert_eq!(boundaries.last().unwrap().offset, text.len());
    }

    #[test]
    fn detects_email_span() {
        let text: Vec<u16> = "mail me at a@b.com please".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let boundaries = word_boundaries(piece, LineBreakWordStyle::None);
        assert!(boundaries.iter().any(|b| b.in_email_or_url));
    }

    #[test]
    fn phrase_style_coarsens_boundaries() {
        let text: Vec<u16> = "This is an example".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let none = word_boundaries(piece, LineBreakWordStyle::None);
        let phrase = word_boundaries(piece, LineBreakWordStyle::Phrase);
        assert!(phrase.len() <= none.len());
    }
}
