//! Line breaking (C12-C13): the two strategies `spec.md` §4.9/§4.10 describe,
//! sharing the line-geometry and result types below.
//!
//! None of `LineWidth`, `TabStops`, `LineBreakResult`, `BreakStrategy`, or
//! `HyphenationFrequency` have a surviving header in
//! `examples/original_source/` (`LineBreaker.h`/`LineBreakerUtil.h` are not
//! part of the retrieved pack — see `examples/original_source/_INDEX.md`).
//! Their shapes here are reconstructed from how `GreedyLineBreaker.cpp` and
//! `OptimalLineBreaker.cpp` use them (and, for the line-width test helper,
//! from `OptimalLineBreakerTest.cpp`'s `RectangleLineWidth`), not ported
//! from a source file; see DESIGN.md for the explicit note.

pub mod greedy;
pub mod optimal;

use unicode_segmentation::UnicodeSegmentation;

use crate::measured_text::MeasuredText;
use crate::text::{Range, U16StringPiece};
use crate::types::{EndHyphenEdit, StartHyphenEdit};

/// Threshold below which an `Auto` word style's first pass is considered
/// too cramped and retried forcing `Phrase`. Not present in the retrieved
/// pack (`LineBreaker.h` is absent, see DESIGN.md); chosen as a
/// conservative small-paragraph cutoff in the spirit of the original's
/// `LBW_AUTO_HEURISTICS_LINE_COUNT`, shared by both breakers' phrase-retry
/// heuristic.
pub(crate) const LBW_AUTO_HEURISTICS_LINE_COUNT: usize = 5;

/// Per-line maximum width, indexed by (zero-based) line number. Most callers
/// want every line the same width; indentation/hanging-punctuation callers
/// can supply a per-line table with a tail value for lines past the table's
/// end.
#[derive(Debug, Clone)]
pub enum LineWidth {
    Constant(f32),
    Table { widths: Vec<f32>, tail: f32 },
}

impl LineWidth {
    pub fn constant(width: f32) -> Self {
        LineWidth::Constant(width)
    }

    pub fn table(widths: Vec<f32>, tail: f32) -> Self {
        LineWidth::Table { widths, tail }
    }

    pub fn get_at(&self, line_number: usize) -> f32 {
        match self {
            LineWidth::Constant(w) => *w,
            LineWidth::Table { widths, tail } => widths.get(line_number).copied().unwrap_or(*tail),
        }
    }

    /// The narrowest width any line can have, used by the optimal breaker
    /// to decide whether a word needs a desperate (grapheme-level) break
    /// candidate at all.
    pub fn get_min(&self) -> f32 {
        match self {
            LineWidth::Constant(w) => *w,
            LineWidth::Table { widths, tail } => {
                widths.iter().copied().fold(*tail, f32::min)
            }
        }
    }
}

/// Horizontal tab stops: either an explicit ascending list or (past the
/// last explicit stop, or when the list is empty) a repeating interval.
#[derive(Debug, Clone)]
pub struct TabStops {
    stops: Vec<f32>,
    default_interval: f32,
}

impl TabStops {
    pub fn new(stops: Vec<f32>, default_interval: f32) -> Self {
        Self { stops, default_interval }
    }

    /// No tab stops at all: a tab advances to `sum` unchanged (a no-op
    /// snap), matching the degenerate case of an interval of zero.
    pub fn none() -> Self {
        Self { stops: Vec::new(), default_interval: 0.0 }
    }

    /// The next tab stop position strictly greater than `sum`.
    pub fn next_tab(&self, sum: f32) -> f32 {
        for &stop in &self.stops {
            if stop > sum {
                return stop;
            }
        }
        if self.default_interval <= 0.0 {
            return sum;
        }
        let mut next = 0.0f32;
        while next <= sum {
            next += self.default_interval;
        }
        next
    }
}

impl Default for TabStops {
    fn default() -> Self {
        Self::none()
    }
}

/// `BreakStrategy` (§4.10): which breaker runs, and — for the optimal
/// breaker — how aggressively it avoids a ragged last line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStrategy {
    /// Dispatches to [`greedy::break_greedy`].
    Greedy,
    /// Dispatches to [`optimal::break_optimal`], minimizing total penalty
    /// without a line-count bound.
    HighQuality,
    /// Dispatches to [`optimal::break_optimal`], discouraging a lone short
    /// last line (`atEnd` lines don't get the free `widthScore = 0` pass).
    Balanced,
}

/// `HyphenationFrequency` (§4.9/§4.10): how eagerly a breaker reaches for a
/// hyphenation candidate over a coarser break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyphenationFrequency {
    /// Never consult hyphenation candidates.
    None,
    /// Hyphenate, but only when nothing else fits
    /// (`hyphenPenalty` multiplied by 4 relative to `Full`).
    Normal,
    /// Hyphenate eagerly (no extra deterrent multiplier).
    Full,
}

/// Bit set in a line's `flags` word when any tab character was laid out on
/// that line, matching the `1 << 29` constant `spec.md` §4.9 names
/// verbatim.
pub const TAB_BIT: u32 = 1 << 29;

/// One committed line's hyphen edits: the end-of-this-line edit (e.g.
/// "insert a hyphen here") and the start-of-next-line edit (e.g. "this
/// line begins with a repeated hyphen", for Polish/Slovenian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineHyphenEdit {
    pub end_of_this_line: Option<EndHyphenEdit>,
    pub start_of_next_line: Option<StartHyphenEdit>,
}

/// The result of breaking a text range into lines: one entry per line in
/// every parallel vector. Modeled as a struct-of-vectors rather than
/// `Vec<Line>` to match the original's column-oriented `LineBreakResult`,
/// which batches ascent/descent/width queries per line.
#[derive(Debug, Clone, Default)]
pub struct LineBreakResult {
    /// Codeunit offset (exclusive) each line ends at; line `k`'s range is
    /// `[break_points[k-1] (or the input range's start), break_points[k])`.
    pub break_points: Vec<usize>,
    pub widths: Vec<f32>,
    pub ascents: Vec<f32>,
    pub descents: Vec<f32>,
    /// Bit flags per line: `TAB_BIT` plus whatever else a caller layers on.
    pub flags: Vec<u32>,
    pub hyphen_edits: Vec<LineHyphenEdit>,
}

impl LineBreakResult {
    pub fn line_count(&self) -> usize {
        self.break_points.len()
    }
}

/// Breakable, trimmed-from-line-end-width whitespace (§4.9's "non-line-end
/// spaces also update the line width", implying line-end spaces don't,
/// until a following non-space character proves they weren't trailing).
/// Restricted to Unicode space separators that are not fixed/non-breaking
/// widths (U+00A0 NBSP, U+2007 FIGURE SPACE, U+202F NARROW NBSP excluded).
pub(crate) fn is_line_end_space(c: u16) -> bool {
    matches!(
        c,
        0x0020 | 0x1680 | 0x2000..=0x2006 | 0x2008..=0x200A | 0x205F | 0x3000
    )
}

pub(crate) const CHAR_TAB: u16 = 0x0009;

/// Walk `range`'s codeunits from a fresh `(line_width, sum_of_char_widths)`
/// state, folding in tab snapping and line-end-space deferral
/// (`updateLineWidth`): tabs always extend `line_width`; a run of trailing
/// line-end spaces only extends `sum_of_char_widths` until a following
/// non-space character proves the run wasn't trailing, at which point
/// `line_width` catches up. Returns `(line_width, sum_of_char_widths,
/// had_tab)`.
pub(crate) fn measure_range(
    text: U16StringPiece<'_>,
    measured: &MeasuredText,
    tab_stops: &TabStops,
    range: Range,
) -> (f32, f32, bool) {
    let mut line_width = 0.0f32;
    let mut sum = 0.0f32;
    let mut had_tab = false;
    for j in range.start..range.end {
        let c = text.full_buffer()[j];
        let w = measured.widths[j];
        if c == CHAR_TAB {
            had_tab = true;
            let new_sum = tab_stops.next_tab(sum);
            line_width += new_sum - sum;
            sum = new_sum;
        } else if is_line_end_space(c) {
            sum += w;
        } else {
            sum += w;
            line_width = sum;
        }
    }
    (line_width, sum, had_tab)
}

/// The largest offset `<= end` at or before which trailing line-end spaces
/// starting from `start` have been trimmed off — i.e. `[start, result)` is
/// `[start, end)` with any trailing breakable whitespace removed.
pub(crate) fn trim_trailing_line_end_spaces(text: U16StringPiece<'_>, start: usize, end: usize) -> usize {
    let mut e = end;
    while e > start && is_line_end_space(text.full_buffer()[e - 1]) {
        e -= 1;
    }
    e
}

/// Grapheme-cluster boundary codeunit offsets within `piece` (absolute
/// coordinates), excluding the piece's own start but including its end.
pub(crate) fn grapheme_boundaries(piece: U16StringPiece<'_>) -> Vec<usize> {
    let mut text = String::with_capacity(piece.len());
    let mut byte_to_codeunit: Vec<usize> = Vec::with_capacity(piece.len() + 1);
    for (range, ch) in piece.char_indices() {
        byte_to_codeunit.push(range.start - piece.range().start);
        text.push(ch);
    }
    byte_to_codeunit.push(piece.len());

    text.grapheme_indices(true)
        .map(|(byte_offset, _)| {
            let cu = match byte_to_codeunit.binary_search(&byte_offset) {
                Ok(i) => i,
                Err(i) => i,
            };
            piece.range().start + cu
        })
        .filter(|&o| o != piece.range().start)
        .chain(std::iter::once(piece.range().end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_line_width_ignores_line_number() {
        let w = LineWidth::constant(100.0);
        assert_eq!(w.get_at(0), 100.0);
        assert_eq!(w.get_at(5), 100.0);
        assert_eq!(w.get_min(), 100.0);
    }

    #[test]
    fn table_line_width_falls_back_to_tail() {
        let w = LineWidth::table(vec![50.0, 80.0], 100.0);
        assert_eq!(w.get_at(0), 50.0);
        assert_eq!(w.get_at(1), 80.0);
        assert_eq!(w.get_at(2), 100.0);
        assert_eq!(w.get_min(), 50.0);
    }

    #[test]
    fn tab_stops_snap_to_next_explicit_stop() {
        let tabs = TabStops::new(vec![40.0, 80.0], 20.0);
        assert_eq!(tabs.next_tab(10.0), 40.0);
        assert_eq!(tabs.next_tab(40.0), 80.0);
        // past the explicit stops, falls back to the repeating interval
        assert_eq!(tabs.next_tab(85.0), 100.0);
    }

    #[test]
    fn no_tab_stops_is_a_no_op() {
        let tabs = TabStops::none();
        assert_eq!(tabs.next_tab(42.0), 42.0);
    }

    #[test]
    fn line_end_space_excludes_nbsp() {
        assert!(is_line_end_space(0x0020));
        assert!(is_line_end_space(0x3000));
        assert!(!is_line_end_space(0x00A0));
        assert!(!is_line_end_space(0x2007));
    }
}
