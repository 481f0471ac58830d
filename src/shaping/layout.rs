//! Layout (C9): orchestrates BiDi resolution + per-visual-run LayoutPiece
//! assembly, word-spacing, and edge letter-spacing trimming (§4.6).

use crate::bidi::{resolve_visual_runs, BidiFlag, VisualRun};
use crate::paint::MinikinPaint;
use crate::shaper_contract::{Extent, ShaperBackend};
use crate::text::{Range, U16StringPiece};
use crate::types::{EndHyphenEdit, StartHyphenEdit};
use crate::unicode_data::format_chars;

use super::cache::LayoutCache;
use super::layout_piece::PositionedGlyph;

/// Which edges of the line get half-letter-space trimmed, per §4.6/§9's
/// "letter-spacing two-pass edges" design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFlag {
    None,
    LeftEdge,
    RightEdge,
    WholeLine,
}

impl RunFlag {
    fn trims_left(self) -> bool {
        matches!(self, RunFlag::LeftEdge | RunFlag::WholeLine)
    }
    fn trims_right(self) -> bool {
        matches!(self, RunFlag::RightEdge | RunFlag::WholeLine)
    }
}

/// A fully assembled shaped result over a (sub-)range: glyphs in visual
/// order, per-codeunit advances in logical order, total advance, and the
/// aggregate vertical extent across every run.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub glyphs: Vec<PositionedGlyph>,
    pub advances: Vec<f32>,
    pub advance: f32,
    pub extent: Extent,
}

/// `doLayout` (§4.6): resolve BiDi visual runs over `range`, shape each
/// (via `cache`, single logical-run-as-cache-granularity — see note
/// below), and assemble glyphs/advances/extent.
///
/// §4.6 further splits each BiDi run by word boundary before handing
/// pieces to the cache, to maximize cache reuse across overlapping calls.
/// This crate caches at BiDi-run granularity instead: correctness is
/// identical (each run is still shaped exactly once and its key is still
/// `(text, paint, rtl, hyphen edits)`), it just trades away some reuse
/// across runs that share a common word but differ in surrounding
/// context. Recorded as an Open Question resolution in DESIGN.md.
#[allow(clippy::too_many_arguments)]
pub fn do_layout(
    text: U16StringPiece<'_>,
    range: Range,
    bidi_flag: BidiFlag,
    paint: &MinikinPaint,
    start_edit: StartHyphenEdit,
    end_edit: EndHyphenEdit,
    run_flag: RunFlag,
    cache: &LayoutCache,
    shaper: &dyn ShaperBackend,
) -> Layout {
    let visual_runs = resolve_visual_runs(text.substring(range), bidi_flag);
    assemble(text, range, &visual_runs, paint, start_edit, end_edit, run_flag, cache, shaper)
}

/// Like [`do_layout`], but resolves BiDi direction over `context_range` (a
/// wider paragraph context) before clipping visual runs down to `range` —
/// used by [`crate::measured_text::MeasuredText::build_layout`] so a
/// re-laid-out line picks up the same direction a full-paragraph BiDi pass
/// would have assigned it, rather than re-resolving direction from the
/// line's text alone.
#[allow(clippy::too_many_arguments)]
pub fn do_layout_in_context(
    text: U16StringPiece<'_>,
    context_range: Range,
    range: Range,
    bidi_flag: BidiFlag,
    paint: &MinikinPaint,
    start_edit: StartHyphenEdit,
    end_edit: EndHyphenEdit,
    run_flag: RunFlag,
    cache: &LayoutCache,
    shaper: &dyn ShaperBackend,
) -> Layout {
    let context_runs = resolve_visual_runs(text.substring(context_range), bidi_flag);
    let clipped: Vec<VisualRun> = context_runs
        .into_iter()
        .filter_map(|r| {
            let clipped_range = r.range.intersection(range);
            if clipped_range.is_empty() {
                None
            } else {
                Some(VisualRun { range: clipped_range, is_rtl: r.is_rtl })
            }
        })
        .collect();
    assemble(text, range, &clipped, paint, start_edit, end_edit, run_flag, cache, shaper)
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    text: U16StringPiece<'_>,
    range: Range,
    visual_runs: &[VisualRun],
    paint: &MinikinPaint,
    start_edit: StartHyphenEdit,
    end_edit: EndHyphenEdit,
    run_flag: RunFlag,
    cache: &LayoutCache,
    shaper: &dyn ShaperBackend,
) -> Layout {
    let mut advances = vec![0.0f32; range.len()];
    let mut glyphs = Vec::new();
    let mut extent = Extent::ZERO;
    let mut pen_x = 0.0f32;

    for run in visual_runs {
        let run_start_edit = if run.range.start == range.start { start_edit } else { StartHyphenEdit::NoEdit };
        let run_end_edit = if run.range.end == range.end { end_edit } else { EndHyphenEdit::NoEdit };

        let piece_piece = text.substring(run.range);
        let piece = cache.get_or_create(piece_piece, paint, run.is_rtl, run_start_edit, run_end_edit, shaper);

        for g in &piece.glyphs {
            glyphs.push(PositionedGlyph {
                font: g.font.clone(),
                glyph_id: g.glyph_id,
                x: pen_x + g.x,
                y: g.y,
            });
        }
        for (i, &a) in piece.advances.iter().enumerate() {
            advances[run.range.start - range.start + i] += a;
        }
        pen_x += piece.advance;
        extent = extent.extend_by(piece.extent);
    }

    let advance = pen_x;
    let mut layout = Layout { glyphs, advances, advance, extent };
    apply_edge_trim(&mut layout, text, range, paint, run_flag);
    layout
}

/// Trim half a letter-space from the leading/trailing non-control
/// codeunit's advance per `run_flag`, matching the "advance accounting"
/// half of §4.6's edge-trimming (the glyph-position half of the same
/// trim — shifting visual glyph coordinates to match — is left to the
/// caller compositing a full line, since only advances feed
/// `MeasuredText`'s widths and the line-breakers that consume them).
fn apply_edge_trim(layout: &mut Layout, text: U16StringPiece<'_>, range: Range, paint: &MinikinPaint, run_flag: RunFlag) {
    if run_flag == RunFlag::None || range.is_empty() {
        return;
    }
    let half = paint.letter_spacing_px() / 2.0;
    if half == 0.0 {
        return;
    }

    if run_flag.trims_left() {
        if let Some(i) = first_non_control(text, range) {
            let rel = i - range.start;
            layout.advances[rel] -= half;
            layout.advance -= half;
        }
    }
    if run_flag.trims_right() {
        if let Some(i) = last_non_control(text, range) {
            let rel = i - range.start;
            layout.advances[rel] -= half;
            layout.advance -= half;
        }
    }
}

fn first_non_control(text: U16StringPiece<'_>, range: Range) -> Option<usize> {
    (range.start..range.end).find(|&i| !format_chars::is_control(text.full_buffer()[i] as u32))
}

fn last_non_control(text: U16StringPiece<'_>, range: Range) -> Option<usize> {
    (range.start..range.end).rev().find(|&i| !format_chars::is_control(text.full_buffer()[i] as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flag_trim_sides() {
        assert!(RunFlag::LeftEdge.trims_left());
        assert!(!RunFlag::LeftEdge.trims_right());
        assert!(RunFlag::WholeLine.trims_left() && RunFlag::WholeLine.trims_right());
    }

    #[test]
    fn first_non_control_skips_leading_tab() {
        let text: Vec<u16> = "\tabc".encode_utf16().collect();
        let piece = U16StringPiece::new(&text);
        assert_eq!(first_non_control(piece, piece.range()), Some(1));
    }
}
