//! Shared value types from the data model (§3): axis tags, font
//! style/fakery/variation, and hyphen edit types.

use std::cmp::Ordering;

/// A 4-byte OpenType axis tag (e.g. `wght`, `ital`), packed big-endian into
/// a `u32` the way `ttf-parser::Tag` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisTag(pub u32);

impl AxisTag {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    pub const WEIGHT: AxisTag = AxisTag::from_bytes(*b"wght");
    pub const ITALIC: AxisTag = AxisTag::from_bytes(*b"ital");
    pub const SLANT: AxisTag = AxisTag::from_bytes(*b"slnt");
    pub const WIDTH: AxisTag = AxisTag::from_bytes(*b"wdth");
    pub const OPTICAL_SIZE: AxisTag = AxisTag::from_bytes(*b"opsz");
}

impl PartialOrd for AxisTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<ttf_parser::Tag> for AxisTag {
    fn from(tag: ttf_parser::Tag) -> Self {
        AxisTag(tag.as_u32())
    }
}

/// `(weight, slant)`. Weight is clamped to `[1, 1000]`; the matching bucket
/// used by scoring is `weight / 100` (§3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontStyle {
    weight: u16,
    slant: Slant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slant {
    Upright,
    Italic,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            weight: 400,
            slant: Slant::Upright,
        }
    }
}

impl FontStyle {
    pub fn new(weight: u16, slant: Slant) -> Self {
        Self {
            weight: weight.clamp(1, 1000),
            slant,
        }
    }

    #[inline]
    pub fn weight(&self) -> u16 {
        self.weight
    }

    #[inline]
    pub fn slant(&self) -> Slant {
        self.slant
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.slant == Slant::Italic
    }

    #[inline]
    pub fn weight_bucket(&self) -> u16 {
        self.weight / 100
    }
}

/// Packed bold/italic synthesis flags plus optional variation-axis
/// adjustments, matching `include/minikin/FontFakery.h`'s bit layout
/// exactly: bits 0/1 are the fake-bold/fake-italic flags, bits 2/3 mark
/// whether a wght/ital adjustment is present, bit 4 holds the ital
/// adjustment value, and bits 5..15 hold the 10-bit signed-ish wght
/// adjustment. `-1` on either adjustment means "no override".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontFakery {
    bits: u16,
}

const MASK_FAKE_BOLD: u16 = 1;
const MASK_FAKE_ITALIC: u16 = 1 << 1;
const MASK_HAS_WGHT_ADJUSTMENT: u16 = 1 << 2;
const MASK_HAS_ITAL_ADJUSTMENT: u16 = 1 << 3;
const MASK_ITAL_ADJUSTMENT: u16 = 1 << 4;
const WGHT_ADJUSTMENT_SHIFT: u16 = 5;
const MASK_WGHT_ADJUSTMENT: u16 = 0b1111111111 << WGHT_ADJUSTMENT_SHIFT;

impl FontFakery {
    pub fn new(fake_bold: bool, fake_italic: bool) -> Self {
        Self::with_adjustments(fake_bold, fake_italic, -1, -1)
    }

    pub fn with_adjustments(
        fake_bold: bool,
        fake_italic: bool,
        wght_adjustment: i16,
        ital_adjustment: i8,
    ) -> Self {
        let mut bits = 0u16;
        if fake_bold {
            bits |= MASK_FAKE_BOLD;
        }
        if fake_italic {
            bits |= MASK_FAKE_ITALIC;
        }
        if wght_adjustment != -1 {
            bits |= MASK_HAS_WGHT_ADJUSTMENT;
            bits |= ((wght_adjustment as u16) << WGHT_ADJUSTMENT_SHIFT) & MASK_WGHT_ADJUSTMENT;
        }
        if ital_adjustment != -1 {
            bits |= MASK_HAS_ITAL_ADJUSTMENT;
            if ital_adjustment == 1 {
                bits |= MASK_ITAL_ADJUSTMENT;
            }
        }
        Self { bits }
    }

    #[inline]
    pub fn is_fake_bold(&self) -> bool {
        self.bits & MASK_FAKE_BOLD != 0
    }

    #[inline]
    pub fn is_fake_italic(&self) -> bool {
        self.bits & MASK_FAKE_ITALIC != 0
    }

    #[inline]
    pub fn has_wght_adjustment(&self) -> bool {
        self.bits & MASK_HAS_WGHT_ADJUSTMENT != 0
    }

    #[inline]
    pub fn has_ital_adjustment(&self) -> bool {
        self.bits & MASK_HAS_ITAL_ADJUSTMENT != 0
    }

    pub fn wght_adjustment(&self) -> i16 {
        if self.has_wght_adjustment() {
            ((self.bits & MASK_WGHT_ADJUSTMENT) >> WGHT_ADJUSTMENT_SHIFT) as i16
        } else {
            -1
        }
    }

    pub fn ital_adjustment(&self) -> i8 {
        if self.has_ital_adjustment() {
            if self.bits & MASK_ITAL_ADJUSTMENT != 0 {
                1
            } else {
                0
            }
        } else {
            -1
        }
    }

    #[inline]
    pub fn bits(&self) -> u16 {
        self.bits
    }
}

/// `(tag, value)`, sorted by tag when stored as a settings list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontVariation {
    pub tag: AxisTag,
    pub value: f32,
}

/// Closed set of hyphen insertion/break behaviors (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyphenationType {
    DontBreak,
    BreakAndDontInsertHyphen,
    BreakAndInsertHyphen,
    BreakAndInsertArmenianHyphen,
    BreakAndInsertMaqaf,
    BreakAndInsertUcasHyphen,
    BreakAndInsertHyphenAtNextLine,
    BreakAndReplaceWithHyphen,
    BreakAndInsertHyphenAndZwj,
}

/// Edit applied to the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartHyphenEdit {
    NoEdit,
    InsertHyphen,
    InsertZwjAndHyphen,
    InsertArmenianHyphen,
    InsertMaqaf,
    InsertUcasHyphen,
}

/// Edit applied to the end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndHyphenEdit {
    NoEdit,
    InsertHyphen,
    ReplaceWithHyphen,
    InsertHyphenAndZwj,
    InsertArmenianHyphen,
    InsertMaqaf,
    InsertUcasHyphen,
}

/// Packed `(StartHyphenEdit, EndHyphenEdit)` pair for a single line (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HyphenEdit {
    pub start: StartHyphenEdit,
    pub end: EndHyphenEdit,
}

impl HyphenEdit {
    pub const NONE: HyphenEdit = HyphenEdit {
        start: StartHyphenEdit::NoEdit,
        end: EndHyphenEdit::NoEdit,
    };

    pub fn is_none(&self) -> bool {
        self.start == StartHyphenEdit::NoEdit && self.end == EndHyphenEdit::NoEdit
    }
}

/// `(editForThisLine, editForNextLine)` for a [`HyphenationType`], per the
/// table implied by spec §4.4 and §8's hyphenator round-trip property.
pub fn edit_for_this_line(ty: HyphenationType) -> EndHyphenEdit {
    use HyphenationType::*;
    match ty {
        DontBreak => EndHyphenEdit::NoEdit,
        BreakAndDontInsertHyphen => EndHyphenEdit::NoEdit,
        BreakAndInsertHyphen => EndHyphenEdit::InsertHyphen,
        BreakAndInsertArmenianHyphen => EndHyphenEdit::InsertArmenianHyphen,
        BreakAndInsertMaqaf => EndHyphenEdit::InsertMaqaf,
        BreakAndInsertUcasHyphen => EndHyphenEdit::InsertUcasHyphen,
        BreakAndInsertHyphenAtNextLine => EndHyphenEdit::InsertHyphen,
        BreakAndReplaceWithHyphen => EndHyphenEdit::ReplaceWithHyphen,
        BreakAndInsertHyphenAndZwj => EndHyphenEdit::InsertHyphenAndZwj,
    }
}

pub fn edit_for_next_line(ty: HyphenationType) -> StartHyphenEdit {
    use HyphenationType::*;
    match ty {
        DontBreak => StartHyphenEdit::NoEdit,
        BreakAndDontInsertHyphen => StartHyphenEdit::NoEdit,
        BreakAndInsertHyphen => StartHyphenEdit::NoEdit,
        BreakAndInsertArmenianHyphen => StartHyphenEdit::NoEdit,
        BreakAndInsertMaqaf => StartHyphenEdit::NoEdit,
        BreakAndInsertUcasHyphen => StartHyphenEdit::NoEdit,
        BreakAndInsertHyphenAtNextLine => StartHyphenEdit::InsertHyphen,
        BreakAndReplaceWithHyphen => StartHyphenEdit::NoEdit,
        BreakAndInsertHyphenAndZwj => StartHyphenEdit::InsertZwjAndHyphen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_fakery_round_trips() {
        let f = FontFakery::with_adjustments(true, false, 300, 1);
        assert!(f.is_fake_bold());
        assert!(!f.is_fake_italic());
        assert_eq!(f.wght_adjustment(), 300);
        assert_eq!(f.ital_adjustment(), 1);

        let none = FontFakery::new(false, false);
        assert_eq!(none.wght_adjustment(), -1);
        assert_eq!(none.ital_adjustment(), -1);
    }

    #[test]
    fn hyphen_edit_round_trip_matches_table() {
        for ty in [
            HyphenationType::BreakAndInsertHyphen,
            HyphenationType::BreakAndInsertArmenianHyphen,
            HyphenationType::BreakAndInsertHyphenAndZwj,
            HyphenationType::BreakAndInsertHyphenAtNextLine,
            HyphenationType::BreakAndReplaceWithHyphen,
        ] {
            let _ = (edit_for_this_line(ty), edit_for_next_line(ty));
        }
        assert_eq!(
            edit_for_this_line(HyphenationType::BreakAndInsertHyphen),
            EndHyphenEdit::InsertHyphen
        );
        assert_eq!(
            edit_for_next_line(HyphenationType::BreakAndInsertHyphenAndZwj),
            StartHyphenEdit::InsertZwjAndHyphen
        );
    }
}
