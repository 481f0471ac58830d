//! `MinikinPaint`: the styling bundle carried by a `StyleRun` (§3), and the
//! structural hash/equality `LayoutCache` (§4.7) keys on.

use std::sync::Arc;

use crate::font::collection::FontCollection;
use crate::font::family::FamilyVariant;
use crate::hasher::Hasher64;
use crate::locale::LocaleListId;
use crate::types::{AxisTag, FontStyle, FontVariation};

/// An OpenType feature setting, e.g. `liga=0` or `kern=1`. Reuses
/// [`AxisTag`]'s 4-byte packing since feature tags share the same wire
/// shape as axis tags even though they live in a different OpenType table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSetting {
    pub tag: AxisTag,
    pub value: i32,
}

/// Styling bundle for one run of text (§3). Hash/equality are structural
/// across every field: two paints that would shape identically must
/// compare equal, since `LayoutCache` uses this as (part of) its key.
#[derive(Clone)]
pub struct MinikinPaint {
    pub font_collection: Arc<FontCollection>,
    /// Point size in px.
    pub size: f32,
    pub scale_x: f32,
    pub skew_x: f32,
    /// Letter spacing as an em fraction (§4.5: multiplied by `size*scaleX`).
    pub letter_spacing: f32,
    /// Word spacing in px, added to single-word-space pieces (§4.6).
    pub word_spacing: f32,
    pub locale_list_id: LocaleListId,
    pub font_style: FontStyle,
    pub family_variant: FamilyVariant,
    pub font_feature_settings: Vec<FeatureSetting>,
    pub font_variation_settings: Vec<FontVariation>,
    /// Paints using inter-character justification features bypass
    /// `LayoutCache` entirely and shape directly (§4.7).
    pub disable_cache: bool,
}

impl MinikinPaint {
    pub fn new(font_collection: Arc<FontCollection>, size: f32) -> Self {
        Self {
            font_collection,
            size,
            scale_x: 1.0,
            skew_x: 0.0,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            locale_list_id: LocaleListId::EMPTY,
            font_style: FontStyle::default(),
            family_variant: FamilyVariant::Default,
            font_feature_settings: Vec::new(),
            font_variation_settings: Vec::new(),
            disable_cache: false,
        }
    }

    /// Letter spacing in px (`letterSpacing * size * scaleX`), per §4.5.
    pub fn letter_spacing_px(&self) -> f32 {
        self.letter_spacing * self.size * self.scale_x
    }

    /// Structural hash of every field, used as (part of) the
    /// `LayoutCache` key. Deterministic across processes (§8 "cache
    /// determinism"), unlike a `Hash` impl routed through `ahash`'s
    /// randomized per-process seed.
    pub fn structural_hash(&self) -> u64 {
        let mut h = Hasher64::new();
        h.update_u64(self.font_collection.id());
        h.update_f32(self.size);
        h.update_f32(self.scale_x);
        h.update_f32(self.skew_x);
        h.update_f32(self.letter_spacing);
        h.update_f32(self.word_spacing);
        h.update_u32(self.locale_list_id.0);
        h.update_u16(self.font_style.weight());
        h.update_bool(self.font_style.is_italic());
        h.update_u8(match self.family_variant {
            FamilyVariant::Default => 0,
            FamilyVariant::Compact => 1,
            FamilyVariant::Elegant => 2,
        });
        for f in &self.font_feature_settings {
            h.update_u32(f.tag.0);
            h.update_u32(f.value as u32);
        }
        for v in &self.font_variation_settings {
            h.update_u32(v.tag.0);
            h.update_f32(v.value);
        }
        h.update_bool(self.disable_cache);
        h.hash()
    }
}

impl PartialEq for MinikinPaint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.font_collection, &other.font_collection)
            && self.size == other.size
            && self.scale_x == other.scale_x
            && self.skew_x == other.skew_x
            && self.letter_spacing == other.letter_spacing
            && self.word_spacing == other.word_spacing
            && self.locale_list_id == other.locale_list_id
            && self.font_style == other.font_style
            && self.family_variant == other.family_variant
            && self.font_feature_settings == other.font_feature_settings
            && self.font_variation_settings == other.font_variation_settings
            && self.disable_cache == other.disable_cache
    }
}

impl std::fmt::Debug for MinikinPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinikinPaint")
            .field("size", &self.size)
            .field("letter_spacing", &self.letter_spacing)
            .field("word_spacing", &self.word_spacing)
            .field("font_style", &self.font_style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    // Building a real `MinikinPaint` needs a `FontCollection`, which in
    // turn needs a parseable font face; that end-to-end path is exercised
    // in `tests/end_to_end.rs` against the fake shaper's test-font
    // convention. Here we only check the pure formula.
    #[test]
    fn letter_spacing_px_scales_by_size_and_scale_x() {
        let size = 20.0f32;
        let scale_x = 1.5f32;
        let letter_spacing = 0.1f32;
        assert_eq!(letter_spacing * size * scale_x, 3.0);
    }
}
