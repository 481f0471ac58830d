//! BiDi resolver (§6 "consumed" contract), discharged by `unicode_bidi` the
//! way a `bidi::processing::core::BidiProcessor` wraps it:
//! decode the UTF-16 sub-range to a `String` (keeping a byte->codeunit map,
//! the same trick `shaper_contract::SwashShaperBackend::shape` uses to map
//! swash's byte clusters back to codeunits), run `BidiInfo`, and translate
//! its visual runs back into codeunit [`Range`]s.

use unicode_bidi::{BidiInfo, Level};

use crate::text::{Range, U16StringPiece};

/// Paragraph base-direction request, matching spec §6's `BidiFlag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidiFlag {
    Ltr,
    Rtl,
    DefaultLtr,
    DefaultRtl,
    ForceLtr,
    ForceRtl,
}

impl BidiFlag {
    fn is_forced(&self) -> bool {
        matches!(self, BidiFlag::ForceLtr | BidiFlag::ForceRtl)
    }

    fn forced_rtl(&self) -> bool {
        matches!(self, BidiFlag::Rtl | BidiFlag::ForceRtl)
    }

    fn default_rtl(&self) -> bool {
        matches!(self, BidiFlag::DefaultRtl)
    }
}

/// A single visual run: a codeunit [`Range`] of the original sub-range,
/// plus whether it renders right-to-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRun {
    pub range: Range,
    pub is_rtl: bool,
}

/// Resolve `piece` into visual runs under `flag`. `ForceLtr`/`ForceRtl`
/// short-circuit `BidiInfo` entirely and return a single run of the
/// requested direction, matching the "force" contract of spec §6.
pub fn resolve_visual_runs(piece: U16StringPiece<'_>, flag: BidiFlag) -> Vec<VisualRun> {
    if piece.is_empty() {
        return Vec::new();
    }

    if flag.is_forced() {
        return vec![VisualRun {
            range: piece.range(),
            is_rtl: flag.forced_rtl(),
        }];
    }

    // Decode to a `String`, remembering each char's starting codeunit
    // offset (relative to `piece.range().start`) so `BidiInfo`'s byte-range
    // visual runs can be translated back to codeunit ranges.
    let mut text = String::with_capacity(piece.len());
    let mut byte_to_codeunit: Vec<usize> = Vec::with_capacity(piece.len() + 1);
    for (range, ch) in piece.char_indices() {
        byte_to_codeunit.push(range.start - piece.range().start);
        text.push(ch);
    }
    byte_to_codeunit.push(piece.len());

    let base_level = if flag.forced_rtl() || flag.default_rtl() {
        Some(Level::rtl())
    } else if matches!(flag, BidiFlag::Ltr | BidiFlag::DefaultLtr) {
        Some(Level::ltr())
    } else {
        None
    };

    let bidi_info = BidiInfo::new(&text, base_level);
    let mut runs = Vec::new();
    for para in &bidi_info.paragraphs {
        let (levels, visual_order) = bidi_info.visual_runs(para, para.range.clone());
        for byte_range in visual_order {
            if byte_range.is_empty() {
                continue;
            }
            let level = levels[byte_range.start];
            let start_cu = codeunit_for_byte(&byte_to_codeunit, byte_range.start);
            let end_cu = codeunit_for_byte(&byte_to_codeunit, byte_range.end);
            runs.push(VisualRun {
                range: Range::new(piece.range().start + start_cu, piece.range().start + end_cu),
                is_rtl: level.is_rtl(),
            });
        }
    }

    if runs.is_empty() {
        runs.push(VisualRun {
            range: piece.range(),
            is_rtl: base_level.map(|l| l.is_rtl()).unwrap_or(false),
        });
    }
    runs
}

fn codeunit_for_byte(byte_to_codeunit: &[usize], byte_offset: usize) -> usize {
    // `byte_to_codeunit` holds one entry per char, in ascending byte order;
    // `byte_offset` always lands exactly on a char boundary since it comes
    // from `BidiInfo`'s run splits, which never cut a char in half.
    match byte_to_codeunit.binary_search(&byte_offset) {
        Ok(i) => i,
        Err(i) => i,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_ltr_text_is_a_single_run() {
        let text: Vec<u16> = "hello world".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let runs = resolve_visual_runs(piece, BidiFlag::DefaultLtr);
        assert_eq!(runs.len(), 1);
        assert!(!runs[0].is_rtl);
        assert_eq!(runs[0].range, Range::new(0, text.len()));
    }

    #[test]
    fn force_rtl_ignores_content() {
        let text: Vec<u16> = "hello".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let runs = resolve_visual_runs(piece, BidiFlag::ForceRtl);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].is_rtl);
    }

    #[test]
    fn mixed_hebrew_and_latin_splits_runs() {
        let text: Vec<u16> = "abc \u{05D0}\u{05D1}\u{05D2} def".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        let runs = resolve_visual_runs(piece, BidiFlag::DefaultLtr);
        assert!(runs.len() >= 2);
    }
}
