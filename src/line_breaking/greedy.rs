//! `GreedyLineBreaker` (C12): single-pass breaking with the word → hyphen →
//! style-fallback → grapheme cascade (`spec.md` §4.9), grounded on
//! `examples/original_source/libs/minikin/GreedyLineBreaker.cpp`.
//!
//! Differs from the original in one respect, recorded as an Open Question
//! resolution in DESIGN.md: hyphenation trial widths are read from
//! [`crate::measured_text::MeasuredText::hyphen_breaks`] (already computed
//! by [`crate::measured_text::MeasuredTextBuilder::build`]) rather than
//! re-shaped on demand via a `measureHyphenPiece`-style call, since this
//! crate's `Run` trait has no such method and the precomputed widths use
//! the exact same word-boundary grouping this breaker walks.

use crate::measured_text::{HyphenBreak, MeasuredText};
use crate::text::{Range, U16StringPiece};
use crate::types::{edit_for_next_line, edit_for_this_line};
use crate::word_break::{word_boundaries, LineBreakWordStyle};

use super::{
    grapheme_boundaries, is_line_end_space, trim_trailing_line_end_spaces, HyphenationFrequency, LineBreakResult,
    LineHyphenEdit, LineWidth, TabStops, CHAR_TAB, LBW_AUTO_HEURISTICS_LINE_COUNT,
};

#[derive(Clone, Copy)]
struct Candidate {
    offset: usize,
    line_width: f32,
    /// Tracked alongside `line_width` to mirror the original's candidate
    /// bookkeeping; not currently consulted when a candidate is committed
    /// (the committed width is always the trimmed `line_width`).
    #[allow(dead_code)]
    sum_of_char_widths: f32,
    in_email_or_url: bool,
}

struct Boundary {
    offset: usize,
    in_email_or_url: bool,
    can_break: bool,
}

/// Top-level entry point (`breakLineGreedy`): breaks `range` once, then, if
/// any overlapping run resolves `LineBreakWordStyle::Auto` and the first
/// pass produced fewer than [`LBW_AUTO_HEURISTICS_LINE_COUNT`] lines,
/// retries forcing `Phrase` and keeps that result if it clears the same
/// threshold (§4.9's "phrase-based retry").
pub fn break_greedy(
    text: U16StringPiece<'_>,
    range: Range,
    measured: &MeasuredText,
    line_width_limits: &LineWidth,
    tab_stops: &TabStops,
    hyphenation_frequency: HyphenationFrequency,
) -> LineBreakResult {
    let first = break_greedy_once(text, range, measured, line_width_limits, tab_stops, hyphenation_frequency, None);

    let any_auto = measured
        .runs_iter()
        .any(|r| r.range().overlaps(range) && r.line_break_word_style() == LineBreakWordStyle::Auto);
    if !any_auto || first.line_count() >= LBW_AUTO_HEURISTICS_LINE_COUNT {
        return first;
    }

    let retried = break_greedy_once(
        text,
        range,
        measured,
        line_width_limits,
        tab_stops,
        hyphenation_frequency,
        Some(LineBreakWordStyle::Phrase),
    );
    if retried.line_count() < LBW_AUTO_HEURISTICS_LINE_COUNT {
        retried
    } else {
        first
    }
}

fn resolve_style(native: LineBreakWordStyle, force_auto_to: Option<LineBreakWordStyle>) -> LineBreakWordStyle {
    if native == LineBreakWordStyle::Auto {
        force_auto_to.unwrap_or(LineBreakWordStyle::None)
    } else {
        native
    }
}

fn collect_boundaries(
    text: U16StringPiece<'_>,
    range: Range,
    measured: &MeasuredText,
    force_auto_to: Option<LineBreakWordStyle>,
) -> Vec<Boundary> {
    let mut out = Vec::new();
    for run in measured.runs_iter() {
        let run_range = run.range().intersection(range);
        if run_range.is_empty() {
            continue;
        }
        let style = resolve_style(run.line_break_word_style(), force_auto_to);
        let piece = text.substring(run_range);
        for b in word_boundaries(piece, style) {
            let can_break = run.can_break() || b.offset == run_range.end;
            out.push(Boundary { offset: b.offset, in_email_or_url: b.in_email_or_url, can_break });
        }
    }
    out
}

/// One pass of the greedy algorithm: the actual `GreedyLineBreaker` body
/// (word-boundary-granularity reimplementation of `process`/
/// `processLineBreak`/`getResult`).
fn break_greedy_once(
    text: U16StringPiece<'_>,
    range: Range,
    measured: &MeasuredText,
    line_width_limits: &LineWidth,
    tab_stops: &TabStops,
    hyphenation_frequency: HyphenationFrequency,
    force_auto_to: Option<LineBreakWordStyle>,
) -> LineBreakResult {
    let mut result = LineBreakResult::default();
    if range.is_empty() {
        return result;
    }

    let boundaries = collect_boundaries(text, range, measured, force_auto_to);

    let mut line_start = range.start;
    let mut line_width = 0.0f32;
    let mut sum = 0.0f32;
    let mut had_tab = false;
    let mut line_start_letter_spacing = letter_spacing_at(measured, range.start);
    let mut current_letter_spacing = line_start_letter_spacing;
    let mut prev_candidate: Option<Candidate> = None;
    let mut prev_in_email_or_url = false;

    let mut word_start = range.start;

    for b in &boundaries {
        let mut cur_word_start = word_start;
        let mut width_before_word = line_width;

        let seg = Range::new(cur_word_start, b.offset);
        if !seg.is_empty() {
            let (lw, sm, ht) = accumulate_segment(text, measured, tab_stops, seg, line_width, sum, had_tab);
            line_width = lw;
            sum = sm;
            had_tab = ht;
            current_letter_spacing = letter_spacing_at(measured, seg.end - 1);
        }

        if b.can_break {
            loop {
                let limit = line_width_limits.get_at(result.line_count());
                let avg_letter_spacing = (line_start_letter_spacing + current_letter_spacing) * 0.5;
                if !is_width_exceeded(line_width, limit, avg_letter_spacing) {
                    break;
                }

                if let Some(cand) = prev_candidate.take() {
                    commit(&mut result, text, measured, line_start, cand.offset, cand.line_width, had_tab, LineHyphenEdit::default());
                    line_start = cand.offset;
                    cur_word_start = cand.offset;
                    width_before_word = 0.0;
                    let (lw, sm, ht) = accumulate_segment(text, measured, tab_stops, Range::new(line_start, b.offset), 0.0, 0.0, false);
                    line_width = lw;
                    sum = sm;
                    had_tab = ht;
                    line_start_letter_spacing = letter_spacing_at(measured, line_start);
                    continue;
                }

                let avg = avg_letter_spacing;
                if let Some((offset, edit, width)) =
                    try_hyphenation(measured, hyphenation_frequency, cur_word_start, b.offset, width_before_word, limit, avg)
                {
                    commit(&mut result, text, measured, line_start, offset, width, had_tab, edit);
                    line_start = offset;
                    cur_word_start = offset;
                    width_before_word = 0.0;
                    let (lw, sm, ht) = accumulate_segment(text, measured, tab_stops, Range::new(line_start, b.offset), 0.0, 0.0, false);
                    line_width = lw;
                    sum = sm;
                    had_tab = ht;
                    line_start_letter_spacing = letter_spacing_at(measured, line_start);
                    continue;
                }

                if let Some((offset, width)) = try_fallback(text, measured, cur_word_start, b.offset, width_before_word, limit, avg) {
                    commit(&mut result, text, measured, line_start, offset, width, had_tab, LineHyphenEdit::default());
                    line_start = offset;
                    cur_word_start = offset;
                    width_before_word = 0.0;
                    let (lw, sm, ht) = accumulate_segment(text, measured, tab_stops, Range::new(line_start, b.offset), 0.0, 0.0, false);
                    line_width = lw;
                    sum = sm;
                    had_tab = ht;
                    line_start_letter_spacing = letter_spacing_at(measured, line_start);
                    continue;
                }

                let (offset, width) = grapheme_fallback(text, measured, cur_word_start, b.offset, width_before_word, limit, avg);
                commit(&mut result, text, measured, line_start, offset, width, had_tab, LineHyphenEdit::default());
                line_start = offset;
                cur_word_start = offset;
                width_before_word = 0.0;
                let (lw, sm, ht) = accumulate_segment(text, measured, tab_stops, Range::new(line_start, b.offset), 0.0, 0.0, false);
                line_width = lw;
                sum = sm;
                had_tab = ht;
                line_start_letter_spacing = letter_spacing_at(measured, line_start);
            }

            // Flagged in spec.md §9: `mIsPrevWordBreakIsInEmailOrUrl |
            // !isInEmailOrUrl` uses bitwise OR where logical OR looks
            // intended. Preserved verbatim (non-short-circuiting `|` on
            // `bool`) rather than silently corrected; see DESIGN.md.
            let keep_old_flag = prev_in_email_or_url | !b.in_email_or_url;
            if !prev_in_email_or_url || !b.in_email_or_url {
                prev_candidate = Some(Candidate {
                    offset: b.offset,
                    line_width,
                    sum_of_char_widths: sum,
                    in_email_or_url: b.in_email_or_url,
                });
            }
            prev_in_email_or_url = keep_old_flag;
        }

        word_start = b.offset;
    }

    if line_start < range.end {
        commit(&mut result, text, measured, line_start, range.end, line_width, had_tab, LineHyphenEdit::default());
    }

    result
}

fn letter_spacing_at(measured: &MeasuredText, offset: usize) -> f32 {
    measured.run_at(offset).map(|r| r.letter_spacing_in_px()).unwrap_or(0.0)
}

fn is_width_exceeded(line_width: f32, limit: f32, avg_letter_spacing: f32) -> bool {
    line_width + avg_letter_spacing > limit
}

/// Walk `seg`'s codeunits, folding tab snapping and line-end-space
/// deferral into `(line_width, sum_of_char_widths)` (`updateLineWidth`):
/// tabs always extend `line_width`; a run of trailing line-end spaces only
/// extends `sum_of_char_widths` until a following non-space character
/// proves the run wasn't trailing, at which point `line_width` catches up.
fn accumulate_segment(
    text: U16StringPiece<'_>,
    measured: &MeasuredText,
    tab_stops: &TabStops,
    seg: Range,
    mut line_width: f32,
    mut sum: f32,
    mut had_tab: bool,
) -> (f32, f32, bool) {
    for j in seg.start..seg.end {
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

#[allow(clippy::too_many_arguments)]
fn commit(
    result: &mut LineBreakResult,
    text: U16StringPiece<'_>,
    measured: &MeasuredText,
    start: usize,
    end: usize,
    width: f32,
    had_tab: bool,
    hyphen_edit: LineHyphenEdit,
) {
    let trimmed_end = trim_trailing_line_end_spaces(text, start, end).max(start);
    let extent = measured.get_extent(Range::new(start, trimmed_end));
    result.break_points.push(end);
    result.widths.push(width);
    result.ascents.push(extent.ascent);
    result.descents.push(extent.descent);
    result.flags.push(if had_tab { super::TAB_BIT } else { 0 });
    result.hyphen_edits.push(hyphen_edit);
}

/// `tryLineBreakWithHyphenation`: the last hyphenation point within
/// `[word_start, word_end)` whose trial width (pre-word width plus the
/// point's precomputed `first_part_width`) still fits `limit`.
fn try_hyphenation(
    measured: &MeasuredText,
    frequency: HyphenationFrequency,
    word_start: usize,
    word_end: usize,
    width_before_word: f32,
    limit: f32,
    avg_letter_spacing: f32,
) -> Option<(usize, LineHyphenEdit, f32)> {
    if frequency == HyphenationFrequency::None {
        return None;
    }
    let run = measured.run_at(word_start)?;
    if !run.can_hyphenate() {
        return None;
    }

    let mut best: Option<&HyphenBreak> = None;
    for hb in &measured.hyphen_breaks {
        if hb.offset <= word_start || hb.offset >= word_end {
            continue;
        }
        let trial = width_before_word + hb.first_part_width;
        if trial + avg_letter_spacing <= limit {
            best = Some(hb);
        }
    }

    best.map(|hb| {
        let edit = LineHyphenEdit {
            end_of_this_line: Some(edit_for_this_line(hb.ty)),
            start_of_next_line: Some(edit_for_next_line(hb.ty)),
        };
        (hb.offset, edit, width_before_word + hb.first_part_width)
    })
}

/// `doLineBreakWithFallback`: re-run the word breaker in `None` style over
/// `[word_start, word_end)` to find finer candidates than the run's own
/// (coarser) style offered, keeping the last that fits.
fn try_fallback(
    text: U16StringPiece<'_>,
    measured: &MeasuredText,
    word_start: usize,
    word_end: usize,
    width_before_word: f32,
    limit: f32,
    avg_letter_spacing: f32,
) -> Option<(usize, f32)> {
    let run = measured.run_at(word_start)?;
    if run.line_break_word_style() == LineBreakWordStyle::None {
        return None;
    }

    let piece = text.substring(Range::new(word_start, word_end));
    let boundaries = word_boundaries(piece, LineBreakWordStyle::None);

    let mut best: Option<(usize, f32)> = None;
    let mut cum = width_before_word;
    let mut prev = word_start;
    for b in &boundaries {
        if b.offset <= word_start || b.offset >= word_end {
            continue;
        }
        let seg_width: f32 = (prev..b.offset).map(|i| measured.widths[i]).sum();
        let trial = cum + seg_width;
        if trial + avg_letter_spacing <= limit {
            cum = trial;
            prev = b.offset;
            best = Some((b.offset, cum));
        } else {
            break;
        }
    }
    best
}

/// `doLineBreakWithGraphemeBounds`: break at the largest grapheme-cluster
/// offset within `[word_start, word_end)` whose width fits, always
/// advancing by at least one grapheme even if it alone overflows.
fn grapheme_fallback(
    text: U16StringPiece<'_>,
    measured: &MeasuredText,
    word_start: usize,
    word_end: usize,
    width_before_word: f32,
    limit: f32,
    avg_letter_spacing: f32,
) -> (usize, f32) {
    let offsets = grapheme_boundaries(text.substring(Range::new(word_start, word_end)));

    let mut cum = width_before_word;
    let mut prev = word_start;
    let mut result = (word_start, width_before_word);
    let mut any = false;

    for offset in offsets {
        if offset <= word_start {
            continue;
        }
        let seg_width: f32 = (prev..offset).map(|i| measured.widths[i]).sum();
        let trial = cum + seg_width;
        if trial + avg_letter_spacing <= limit || !any {
            cum = trial;
            prev = offset;
            result = (offset, cum);
            any = true;
            if trial + avg_letter_spacing <= limit {
                continue;
            }
        }
        break;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measured_text::{MeasuredTextBuilder, ReplacementRun};

    /// One `ReplacementRun` per codeunit, so each gets an independently
    /// controlled width without needing a real, parseable font (building a
    /// `MinikinPaint`-backed `StyleRun` needs a `FontCollection` over real
    /// font bytes — exercised in `tests/end_to_end.rs` instead, same
    /// deferral `measured_text.rs`'s own unit tests make). This sacrifices
    /// real word-boundary granularity (every codeunit becomes its own
    /// breakable "run"), so these tests exercise the width/tab/line-end-
    /// space accounting, not the hyphenation/fallback/grapheme cascade.
    fn build_measured_with_widths(units: &[u16], widths: &[f32]) -> MeasuredText {
        let mut builder = MeasuredTextBuilder::new();
        for (i, &w) in widths.iter().enumerate() {
            builder = builder.add_replacement_run(ReplacementRun {
                range: Range::new(i, i + 1),
                width: w,
                is_rtl: false,
                ascent: -8.0,
                descent: 2.0,
            });
        }
        let cache = crate::shaping::cache::LayoutCache::default();
        let shaper = crate::shaper_contract::fake::FakeShaperBackend;
        builder.build(U16StringPiece::new(units), false, &cache, &shaper)
    }

    #[test]
    fn breaks_every_two_chars_when_limit_allows_exactly_two() {
        let units: Vec<u16> = "xxxxxxxxxx".encode_utf16().collect();
        let widths = vec![10.0f32; units.len()];
        let measured = build_measured_with_widths(&units, &widths);
        let text = U16StringPiece::new(&units);
        let width = LineWidth::constant(25.0);
        let tabs = TabStops::none();
        let result = break_greedy(text, text.range(), &measured, &width, &tabs, HyphenationFrequency::None);
        assert_eq!(result.break_points, vec![2, 4, 6, 8, 10]);
        assert!(result.widths.iter().all(|&w| (w - 20.0).abs() < 1e-6));
    }

    #[test]
    fn tab_extends_line_width_and_sets_tab_bit() {
        let units: Vec<u16> = vec![CHAR_TAB, 'X' as u16];
        let widths = vec![0.0f32, 10.0f32];
        let measured = build_measured_with_widths(&units, &widths);
        let text = U16StringPiece::new(&units);
        let width = LineWidth::constant(100.0);
        let tabs = TabStops::new(vec![50.0], 20.0);
        let result = break_greedy(text, text.range(), &measured, &width, &tabs, HyphenationFrequency::None);
        assert_eq!(result.break_points, vec![2]);
        assert_eq!(result.widths[0], 60.0);
        assert_ne!(result.flags[0] & super::super::TAB_BIT, 0);
    }

    #[test]
    fn trims_trailing_line_end_space_from_extent_but_not_width() {
        let units: Vec<u16> = "ab ".encode_utf16().collect();
        let widths = vec![10.0f32, 10.0f32, 5.0f32];
        let measured = build_measured_with_widths(&units, &widths);
        let text = U16StringPiece::new(&units);
        let result = commit_whole_line(text, &measured);
        // sum_of_char_widths includes the trailing space; line_width lags
        // behind it since nothing followed to prove it wasn't trailing.
        assert_eq!(result.widths[0], 20.0);
    }

    fn commit_whole_line(text: U16StringPiece<'_>, measured: &MeasuredText) -> LineBreakResult {
        let width = LineWidth::constant(1000.0);
        let tabs = TabStops::none();
        break_greedy(text, text.range(), measured, &width, &tabs, HyphenationFrequency::None)
    }

    #[test]
    fn grapheme_boundaries_split_by_cluster() {
        let units: Vec<u16> = "abc".encode_utf16().collect();
        let piece = U16StringPiece::new(&units);
        let offsets = grapheme_boundaries(piece);
        assert_eq!(offsets, vec![1, 2, 3]);
    }
}
