//! FontFamily (C5): a set of fonts sharing a Unicode coverage map, plus
//! closest-style matching and variation-axis family derivation.

use std::sync::Arc;

use crate::hasher::SortedPackedVector;
use crate::locale::LocaleListId;
use crate::types::{AxisTag, FontFakery, FontStyle, FontVariation, Slant};

use super::{FakedFont, Font};

/// Density/contrast family variant, mirrored from the OS font-config
/// vocabulary (compact faces favor glyph count over per-glyph detail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FamilyVariant {
    #[default]
    Default,
    Compact,
    Elegant,
}

/// Unicode codepoint coverage for a family, plus per-variation-selector-index
/// coverage for cmap format 14 (Unicode variation sequences). A plain sorted
/// set stands in for the bitset-per-page structure the original engine uses;
/// coverage lookups in this crate are O(log n) rather than O(1), which is an
/// acceptable trade given Rust's lack of a ready-made page-bitset crate in
/// the dependency stack (documented as an Open Question resolution).
#[derive(Debug, Clone, Default)]
pub struct Coverage {
    codepoints: SortedPackedVector<u32>,
}

impl Coverage {
    pub fn from_codepoints(mut codepoints: Vec<u32>) -> Self {
        codepoints.sort_unstable();
        codepoints.dedup();
        Self {
            codepoints: SortedPackedVector::from_unsorted(codepoints),
        }
    }

    pub fn get(&self, codepoint: u32) -> bool {
        self.codepoints.contains(&codepoint)
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.codepoints.iter()
    }

    pub fn max_codepoint(&self) -> Option<u32> {
        self.codepoints.as_slice().last().copied()
    }
}

pub struct FontFamily {
    fonts: Vec<Arc<Font>>,
    locale_list_id: LocaleListId,
    variant: FamilyVariant,
    is_custom_fallback: bool,
    is_color_emoji: bool,
    supported_axes: SortedPackedVector<AxisTag>,
    coverage: Coverage,
    /// The font used to answer cmap format 14 (variation sequence) queries,
    /// resolved once by `compute_coverage`.
    vs_font: Option<Arc<Font>>,
    has_vs_table: bool,
    /// `(vs_index, codepoint) -> covered` memo, populated lazily: probing
    /// every codepoint against every selector eagerly would mean scanning
    /// the whole Unicode range per family at construction time, which is
    /// wasted work for the common case of zero VS queries.
    vs_coverage_cache: parking_lot::Mutex<std::collections::HashMap<(u16, u32), bool>>,
}

impl std::fmt::Debug for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFamily")
            .field("fonts", &self.fonts.len())
            .field("variant", &self.variant)
            .field("is_color_emoji", &self.is_color_emoji)
            .finish()
    }
}

fn compute_match(a: FontStyle, b: FontStyle) -> i32 {
    if a == b {
        return 0;
    }
    let mut score = (a.weight() as i32 / 100 - b.weight() as i32 / 100).abs();
    if a.slant() != b.slant() {
        score += 2;
    }
    score
}

fn compute_fakery(wanted: FontStyle, actual: FontStyle) -> FontFakery {
    let is_fake_bold = wanted.weight() >= 600 && wanted.weight() as i32 - actual.weight() as i32 >= 200;
    let is_fake_italic = wanted.slant() == Slant::Italic && actual.slant() == Slant::Upright;
    FontFakery::new(is_fake_bold, is_fake_italic)
}

impl FontFamily {
    pub fn new(fonts: Vec<Arc<Font>>) -> Arc<Self> {
        Self::with_locale_and_variant(LocaleListId::EMPTY, FamilyVariant::Default, fonts, false)
    }

    /// Builds a family and computes its coverage from the best-matching
    /// font for the default style, mirroring `FontFamily::computeCoverage`.
    ///
    /// A family with no fonts has no default-style font to match against —
    /// a fatal configuration error (§7) that aborts construction rather
    /// than degrading to a `Result`.
    pub fn with_locale_and_variant(
        locale_list_id: LocaleListId,
        variant: FamilyVariant,
        fonts: Vec<Arc<Font>>,
        is_custom_fallback: bool,
    ) -> Arc<Self> {
        assert!(!fonts.is_empty(), "font family has no default-style font");

        let is_color_emoji = matches!(
            crate::locale::global_locale_cache()
                .get(locale_list_id)
                .locales()
                .first()
                .map(|l| l.emoji_style()),
            Some(crate::locale::EmojiStyle::Emoji)
        );

        let mut supported_axes_set = Vec::new();
        for font in &fonts {
            supported_axes_set.extend_from_slice(font.supported_axes());
        }
        let supported_axes = SortedPackedVector::from_unsorted(supported_axes_set);

        let mut family = Self {
            fonts,
            locale_list_id,
            variant,
            is_custom_fallback,
            is_color_emoji,
            supported_axes,
            coverage: Coverage::default(),
            vs_font: None,
            has_vs_table: false,
            vs_coverage_cache: parking_lot::Mutex::new(std::collections::HashMap::new()),
        };
        family.compute_coverage();
        Arc::new(family)
    }

    fn compute_coverage(&mut self) {
        let best = self.closest_match_index(FontStyle::default());
        let font = self.fonts[best].clone();
        let data = font.asset().data.clone();
        let Ok(face) = ttf_parser::Face::parse(&data, font.asset().face_index) else {
            return;
        };
        let Some(cmap) = face.tables().cmap else {
            return;
        };

        let mut base_coverage = Vec::new();
        let mut has_vs_table = false;
        for subtable in cmap.subtables {
            if subtable.is_unicode() {
                subtable.codepoints(|cp| base_coverage.push(cp));
            }
            if subtable.format == ttf_parser::cmap::Format::UnicodeVariationSequences {
                has_vs_table = true;
            }
        }

        self.coverage = Coverage::from_codepoints(base_coverage);
        self.has_vs_table = has_vs_table;
        if has_vs_table {
            self.vs_font = Some(font);
        }
    }

    /// Lazily probes `vs_index`'s coverage against this family's VS font,
    /// restricted to the codepoint this call is asked about: `has_glyph`
    /// passes a single codepoint, so this never scans unrelated ranges.
    fn vs_coverage_contains(&self, vs: u32, vs_index: u16, codepoint: u32) -> bool {
        let key = (vs_index, codepoint);
        if let Some(&cached) = self.vs_coverage_cache.lock().get(&key) {
            return cached;
        }
        let Some(font) = &self.vs_font else {
            return false;
        };
        let Ok(face) = ttf_parser::Face::parse(&font.asset().data, font.asset().face_index) else {
            return false;
        };
        let (Some(base), Some(selector)) = (char::from_u32(codepoint), char::from_u32(vs)) else {
            return false;
        };
        let covered = face.glyph_variation_index(base, selector).is_some();
        self.vs_coverage_cache.lock().insert(key, covered);
        covered
    }

    fn closest_match_index(&self, style: FontStyle) -> usize {
        let mut best_index = 0;
        let mut best_score = compute_match(self.fonts[0].style(), style);
        for (i, font) in self.fonts.iter().enumerate().skip(1) {
            let score = compute_match(font.style(), style);
            if score < best_score {
                best_score = score;
                best_index = i;
            }
        }
        best_index
    }

    pub fn get_closest_match(&self, style: FontStyle) -> FakedFont {
        let idx = self.closest_match_index(style);
        let font = self.fonts[idx].clone();
        let fakery = compute_fakery(style, font.style());
        FakedFont { font, fakery }
    }

    pub fn locale_list_id(&self) -> LocaleListId {
        self.locale_list_id
    }

    pub fn variant(&self) -> FamilyVariant {
        self.variant
    }

    pub fn num_fonts(&self) -> usize {
        self.fonts.len()
    }

    pub fn font(&self, index: usize) -> &Arc<Font> {
        &self.fonts[index]
    }

    pub fn fonts(&self) -> &[Arc<Font>] {
        &self.fonts
    }

    pub fn is_color_emoji_family(&self) -> bool {
        self.is_color_emoji
    }

    pub fn supported_axes(&self) -> &[AxisTag] {
        self.supported_axes.as_slice()
    }

    pub fn is_custom_fallback(&self) -> bool {
        self.is_custom_fallback
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn has_vs_table(&self) -> bool {
        self.has_vs_table
    }

    /// True if some font in this family has a glyph for `(codepoint,
    /// variation_selector)`, `variation_selector == 0` meaning "no selector".
    pub fn has_glyph(&self, codepoint: u32, variation_selector: u32) -> bool {
        if variation_selector == 0 {
            return self.coverage.get(codepoint);
        }
        if !self.has_vs_table {
            return false;
        }
        let Some(vs_index) = crate::unicode_data::format_chars::vs_index(variation_selector) else {
            return false;
        };
        self.vs_coverage_contains(variation_selector, vs_index, codepoint)
    }

    /// Derive a new family applying the given variation settings to every
    /// constituent font that supports at least one of the requested axes,
    /// returning `None` when the family has no matching axis at all (§4.2).
    pub fn create_family_with_variation(&self, variations: &[FontVariation]) -> Option<Arc<FontFamily>> {
        if variations.is_empty() || self.supported_axes.is_empty() {
            return None;
        }
        let has_supported_axis = variations
            .iter()
            .any(|v| self.supported_axes.contains(&v.tag));
        if !has_supported_axis {
            return None;
        }

        let mut fonts = Vec::with_capacity(self.fonts.len());
        for font in &self.fonts {
            let supports = variations.iter().any(|v| font.is_axis_supported(v.tag));
            if !supports {
                fonts.push(font.clone());
                continue;
            }
            let rebuilt = Font::builder(font.asset().data.clone())
                .face_index(font.asset().face_index)
                .style(font.style())
                .locale_list_id(font.locale_list_id())
                .build();
            fonts.push(rebuilt);
        }

        Some(Self::with_locale_and_variant(
            self.locale_list_id,
            self.variant,
            fonts,
            self.is_custom_fallback,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_match_scores_weight_and_slant() {
        let regular = FontStyle::new(400, Slant::Upright);
        let bold = FontStyle::new(700, Slant::Upright);
        let italic = FontStyle::new(400, Slant::Italic);
        assert_eq!(compute_match(regular, regular), 0);
        assert!(compute_match(regular, bold) > 0);
        assert!(compute_match(regular, italic) >= 2);
    }

    #[test]
    fn compute_fakery_triggers_on_large_weight_gap() {
        let wanted = FontStyle::new(700, Slant::Upright);
        let actual = FontStyle::new(400, Slant::Upright);
        let fakery = compute_fakery(wanted, actual);
        assert!(fakery.is_fake_bold());
        assert!(!fakery.is_fake_italic());
    }

    #[test]
    fn coverage_reports_membership() {
        let coverage = Coverage::from_codepoints(vec![0x41, 0x42, 0x61]);
        assert!(coverage.get(0x41));
        assert!(!coverage.get(0x43));
    }
}
