//! The shaper contract spec §6 lists as "consumed" from a host. This crate
//! ships standalone, so the contract is a narrow trait (`ShaperBackend`)
//! discharged in production by `swash` and, for deterministic tests, by the
//! fake backend in [`fake`] built around the test-font convention spec §8
//! assumes throughout its scenarios (1em per ASCII glyph, `ASCENT=-80,
//! DESCENT=20`).
//!
//! Keeping the shaper behind a trait (rather than calling `swash` directly
//! from [`crate::shaping::layout_piece`]) is what lets those scenarios run
//! without a real font file on disk.

use unicode_script::Script;

use crate::font::FakedFont;

/// One shaped glyph. `cluster` is a codeunit offset *relative to the start
/// of the buffer passed to [`ShaperBackend::shape`]*, matching the
/// `clusterOffset`-adjusted indexing spec §4.5 describes.
#[derive(Debug, Clone, Copy)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    pub cluster: usize,
    pub x_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ShapeOutput {
    pub glyphs: Vec<ShapedGlyph>,
}

/// Vertical font extent: `ascent` is negative-up, `descent` positive-down,
/// matching spec §8's test-font convention (`ASCENT=-80, DESCENT=20`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub ascent: f32,
    pub descent: f32,
}

impl Extent {
    pub const ZERO: Extent = Extent { ascent: 0.0, descent: 0.0 };

    /// `extendBy` from spec §4.3: widen to cover both extents (max
    /// magnitude of ascent, max magnitude of descent).
    pub fn extend_by(&self, other: Extent) -> Extent {
        Extent {
            ascent: self.ascent.min(other.ascent),
            descent: self.descent.max(other.descent),
        }
    }
}

/// The shaping engine this crate drives per font/script sub-run (§4.5, C8).
pub trait ShaperBackend: Send + Sync {
    /// Shape `units` (already itemized to a single script/font run) against
    /// `font`, at the given point size/scale/skew, producing glyphs whose
    /// `cluster` is relative to `units[0]`.
    fn shape(
        &self,
        font: &FakedFont,
        size: f32,
        scale_x: f32,
        skew_x: f32,
        script: Script,
        is_rtl: bool,
        units: &[u16],
    ) -> ShapeOutput;

    /// Vertical extent of `font` at `size`, computed over `units` excluding
    /// line-feed/carriage-return per §4.5 step 2.
    fn extent(&self, font: &FakedFont, size: f32, units: &[u16]) -> Extent;

    /// Glyph count `shape(...)` would produce for `units`, used by
    /// `FontCollection::get_best_font`'s tag-sequence-fallback penalty
    /// (§4.3) without materializing full glyph positions.
    fn glyph_count(&self, font: &FakedFont, size: f32, script: Script, units: &[u16]) -> usize {
        self.shape(font, size, 1.0, 0.0, script, false, units).glyphs.len()
    }
}

/// Production backend: `swash::shape::ShapeContext` behind a mutex, since
/// `ShapeContext` is a reusable scratch buffer that needs `&mut self` and
/// multiple Layout callers may shape concurrently (§5's "parallel threads
/// may concurrently call measureText ... on distinct instances" still means
/// a *shared* shaper resource needs its own serialization, same pattern as
/// `Font`'s axis-override cache mutex).
pub struct SwashShaperBackend {
    context: parking_lot::Mutex<swash::shape::ShapeContext>,
}

impl SwashShaperBackend {
    pub fn new() -> Self {
        Self {
            context: parking_lot::Mutex::new(swash::shape::ShapeContext::new()),
        }
    }
}

impl Default for SwashShaperBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn to_swash_direction(is_rtl: bool) -> swash::text::Direction {
    if is_rtl {
        swash::text::Direction::RightToLeft
    } else {
        swash::text::Direction::LeftToRight
    }
}

impl ShaperBackend for SwashShaperBackend {
    fn shape(
        &self,
        font: &FakedFont,
        size: f32,
        scale_x: f32,
        skew_x: f32,
        script: Script,
        is_rtl: bool,
        units: &[u16],
    ) -> ShapeOutput {
        let _ = skew_x; // swash has no synthetic-skew shaping knob; applied post-shape by the caller.
        let native = font.native();
        let Some(font_ref) = native.font_ref(font.font.asset()) else {
            return ShapeOutput::default();
        };

        // Decode the UTF-16 buffer to UTF-8, remembering each char's
        // starting codeunit offset so swash's byte-offset clusters can be
        // mapped back to codeunit indices after shaping.
        let mut text = String::with_capacity(units.len());
        let mut byte_to_codeunit: Vec<usize> = Vec::with_capacity(units.len() + 1);
        let piece = crate::text::U16StringPiece::new(units);
        for (range, ch) in piece.char_indices() {
            byte_to_codeunit.push(range.start);
            text.push(ch);
        }
        byte_to_codeunit.push(units.len());

        let mut context = self.context.lock();
        let mut shaper = context
            .builder(font_ref)
            .script(to_swash_script(script))
            .direction(to_swash_direction(is_rtl))
            .size(size * scale_x)
            .build();
        shaper.add_str(&text);

        let mut glyphs = Vec::new();
        shaper.shape_with(|cluster| {
            let codeunit = *byte_to_codeunit
                .iter()
                .rev()
                .find(|&&b| b <= cluster.source.start as usize)
                .unwrap_or(&0);
            for glyph in cluster.glyphs {
                glyphs.push(ShapedGlyph {
                    glyph_id: glyph.id as u32,
                    cluster: codeunit,
                    x_advance: glyph.advance,
                    x_offset: glyph.x,
                    y_offset: glyph.y,
                });
            }
        });

        ShapeOutput { glyphs }
    }

    fn extent(&self, font: &FakedFont, size: f32, units: &[u16]) -> Extent {
        let native = font.native();
        let Some(font_ref) = native.font_ref(font.font.asset()) else {
            return Extent::ZERO;
        };
        let metrics = font_ref.metrics(&[]).linear_scale(size);
        let _ = units;
        Extent {
            ascent: -metrics.ascent,
            descent: metrics.descent,
        }
    }
}

fn to_swash_script(script: Script) -> swash::text::Script {
    use swash::text::Script as S;
    match script {
        Script::Latin => S::Latin,
        Script::Cyrillic => S::Cyrillic,
        Script::Greek => S::Greek,
        Script::Arabic => S::Arabic,
        Script::Hebrew => S::Hebrew,
        Script::Devanagari => S::Devanagari,
        Script::Han => S::Han,
        Script::Hiragana => S::Hiragana,
        Script::Katakana => S::Katakana,
        Script::Hangul => S::Hangul,
        Script::Thai => S::Thai,
        Script::Armenian => S::Armenian,
        Script::Georgian => S::Georgian,
        _ => S::Unknown,
    }
}

pub mod fake {
    //! A deterministic shaper used by this crate's own tests (both the
    //! colocated `#[cfg(test)]` unit tests and `tests/end_to_end.rs`): one
    //! glyph per codeunit, one em of advance per ASCII codeunit, matching
    //! the test-font convention spec §8 states explicitly
    //! (`ASCENT=-80, DESCENT=20` at `size=10`). Not behind `#[cfg(test)]`
    //! because `tests/end_to_end.rs` is a separate crate that can only see
    //! the library's public API; this module's docs make clear it exists
    //! for exactly that purpose and is not meant for production use.
    use super::*;

    #[derive(Debug, Clone, Copy)]
    pub struct FakeShaperBackend;

    impl ShaperBackend for FakeShaperBackend {
        fn shape(
            &self,
            _font: &FakedFont,
            size: f32,
            scale_x: f32,
            _skew_x: f32,
            _script: Script,
            is_rtl: bool,
            units: &[u16],
        ) -> ShapeOutput {
            let em = size * scale_x;
            let mut glyphs: Vec<ShapedGlyph> = units
                .iter()
                .enumerate()
                .map(|(i, &unit)| ShapedGlyph {
                    glyph_id: unit as u32,
                    cluster: i,
                    x_advance: if unit == 0x09 { 0.0 } else { em },
                    x_offset: 0.0,
                    y_offset: 0.0,
                })
                .collect();
            if is_rtl {
                glyphs.reverse();
            }
            ShapeOutput { glyphs }
        }

        fn extent(&self, _font: &FakedFont, size: f32, _units: &[u16]) -> Extent {
            Extent {
                ascent: -8.0 * (size / 10.0),
                descent: 2.0 * (size / 10.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_by_widens_to_cover_both() {
        let a = Extent { ascent: -8.0, descent: 2.0 };
        let b = Extent { ascent: -10.0, descent: 1.0 };
        let joined = a.extend_by(b);
        assert_eq!(joined.ascent, -10.0);
        assert_eq!(joined.descent, 2.0);
    }
}
