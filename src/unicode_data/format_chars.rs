//! Format-only codepoints, the itemization "sticky" allowlist, and emoji
//! sequence helpers used by [`crate::font::collection::FontCollection::itemize`]
//! (§4.3) and by [`crate::shaping`]'s letter-spacing policy.

use unicode_script::Script;

/// True for codepoints that never break an itemization run regardless of
/// font coverage: soft hyphen, combining grapheme joiner, Arabic letter
/// mark, ZWJ/ZWNJ, bidi control characters, BOM, and variation selectors.
pub fn is_format_only(cp: u32) -> bool {
    matches!(cp,
        0x00AD // SOFT HYPHEN
        | 0x034F // COMBINING GRAPHEME JOINER
        | 0x061C // ARABIC LETTER MARK
        | 0x200C..=0x200F // ZWNJ, ZWJ, LRM, RLM
        | 0x202A..=0x202E // bidi embedding/override controls
        | 0x2060..=0x2064 // WORD JOINER and invisible operators
        | 0x2066..=0x2069 // bidi isolate controls
        | 0xFEFF // BOM / ZERO WIDTH NO-BREAK SPACE
        | 0xFE00..=0xFE0F // variation selectors 1-16
        | 0xE0100..=0xE01EF // variation selectors supplement
    )
}

/// True for the small hard-coded set of punctuation/symbols that "stick" to
/// the current itemization run rather than forcing a new font lookup, per
/// the design note in spec §9 ("Itemization sticky allowlist"): avoids font
/// flips on small neutral codepoints.
pub fn is_sticky_allowlisted(cp: u32) -> bool {
    matches!(cp,
        0x0020..=0x002F // general punctuation / space
        | 0x003A..=0x0040
        | 0x005B..=0x0060
        | 0x007B..=0x007E
        | 0x00A0 // NBSP
        | 0x00A1 // inverted exclamation
        | 0x00A7 // section sign
        | 0x00B6 // pilcrow
        | 0x00BF // inverted question mark
        | 0x2010..=0x2015 // hyphens and dashes
        | 0x2018..=0x201F // quotation marks
        | 0x2026 // ellipsis
        | 0x202F // NARROW NBSP
        | 0x2640 // female sign
        | 0x2642 // male sign
        | 0x26A5 // transgender symbol (gender signs)
        | 0x2695 // medical / staff of aesculapius
    )
}

/// Unicode `General_Category=Mn/Mc/Me` approximation sufficient for the
/// combining-mark cases itemization and letter-spacing need: the precise
/// boundary matters only for deciding "does this stick to the previous
/// base character", and the ranges below cover every combining block the
/// engine's supported scripts (Latin through Brahmic) actually emit.
pub fn is_combining_mark(cp: u32) -> bool {
    matches!(cp,
        0x0300..=0x036F // combining diacritical marks
        | 0x0483..=0x0489 // Cyrillic combining marks
        | 0x0591..=0x05BD | 0x05BF | 0x05C1..=0x05C2 | 0x05C4..=0x05C5 | 0x05C7 // Hebrew points
        | 0x0610..=0x061A | 0x064B..=0x065F | 0x0670 // Arabic marks
        | 0x06D6..=0x06DC | 0x06DF..=0x06E4 | 0x06E7..=0x06E8 | 0x06EA..=0x06ED
        | 0x0711 | 0x0730..=0x074A // Syriac marks
        | 0x07A6..=0x07B0 // Thaana marks
        | 0x07EB..=0x07F3 // Nko marks
        | 0x0816..=0x0819 | 0x081B..=0x0823 | 0x0825..=0x0827 | 0x0829..=0x082D // Samaritan
        | 0x0900..=0x0903 | 0x093A..=0x094F | 0x0951..=0x0957 | 0x0962..=0x0963 // Devanagari
        | 0x0981..=0x0983 | 0x09BC | 0x09BE..=0x09CD | 0x09D7 // Bengali
        | 0x0A01..=0x0A03 | 0x0A3C | 0x0A3E..=0x0A4D // Gurmukhi
        | 0x0D00..=0x0D03 | 0x0D3E..=0x0D4D // Malayalam
        | 0x200C..=0x200D // ZWNJ/ZWJ participate in clusters
        | 0x20D0..=0x20FF // combining symbols
        | 0xFE00..=0xFE0F // variation selectors attach to base
        | 0xFE20..=0xFE2F // combining half marks
    )
}

pub fn is_variation_selector(cp: u32) -> bool {
    (0xFE00..=0xFE0F).contains(&cp) || (0xE0100..=0xE01EF).contains(&cp)
}

pub const EMOJI_VARIATION_SELECTOR: u32 = 0xFE0F;
pub const TEXT_VARIATION_SELECTOR: u32 = 0xFE0E;

/// The codepoint-to-variation-selector-index mapping used by
/// `FontFamily::cmap_fmt14_coverage` (§4.2): VS01-VS16 map to 0..16, VS17-
/// VS256 map to 16..255.
pub fn vs_index(vs: u32) -> Option<u16> {
    if (0xFE00..=0xFE0F).contains(&vs) {
        Some((vs - 0xFE00) as u16)
    } else if (0xE0100..=0xE01EF).contains(&vs) {
        Some((vs - 0xE0100 + 16) as u16)
    } else {
        None
    }
}

pub fn is_emoji_modifier(cp: u32) -> bool {
    (0x1F3FB..=0x1F3FF).contains(&cp)
}

pub fn is_emoji_base(cp: u32) -> bool {
    matches!(cp,
        0x261D | 0x26F9 | 0x270A..=0x270D
        | 0x1F385 | 0x1F3C2..=0x1F3C4 | 0x1F3C7 | 0x1F3CA..=0x1F3CC
        | 0x1F442..=0x1F443 | 0x1F446..=0x1F450 | 0x1F466..=0x1F478
        | 0x1F47C | 0x1F481..=0x1F483 | 0x1F485..=0x1F487
        | 0x1F4AA | 0x1F574..=0x1F575 | 0x1F57A | 0x1F590
        | 0x1F595..=0x1F596 | 0x1F645..=0x1F647 | 0x1F64B..=0x1F64F
        | 0x1F6A3 | 0x1F6B4..=0x1F6B6 | 0x1F6C0 | 0x1F6CC
        | 0x1F90C..=0x1F93A | 0x1F93C..=0x1F93E
    )
}

pub fn is_regional_indicator(cp: u32) -> bool {
    (0x1F1E6..=0x1F1FF).contains(&cp)
}

pub fn is_keycap_base(cp: u32) -> bool {
    matches!(cp, 0x0023 | 0x002A | 0x0030..=0x0039)
}

pub const KEYCAP_COMBINING: u32 = 0x20E3;

pub fn is_tag_character(cp: u32) -> bool {
    (0xE0000..=0xE007F).contains(&cp)
}

pub const ZWJ: u32 = 0x200D;

/// Scripts excluded from letter-spacing per §4.5: applying inter-cluster
/// spacing to these scripts breaks shaping (cursive joining, reordering
/// marks, or conjunct formation).
pub fn is_letter_spacing_capable(script: Script) -> bool {
    !matches!(
        script,
        Script::Arabic
            | Script::Nko
            | Script::Psalter_Pahlavi
            | Script::Mandaic
            | Script::Mongolian
            | Script::Phags_Pa
            | Script::Devanagari
            | Script::Bengali
            | Script::Gurmukhi
            | Script::Modi
            | Script::Sharada
            | Script::Syloti_Nagri
            | Script::Tirhuta
            | Script::Ogham
    )
}

/// True for control/format codepoints that always receive zero
/// letter-spacing and zero advance attribution in their own right (§4.5).
pub fn is_control(cp: u32) -> bool {
    cp < 0x20 || (0x7F..=0x9F).contains(&cp) || is_format_only(cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vs_index_maps_basic_and_supplement() {
        assert_eq!(vs_index(0xFE0F), Some(15));
        assert_eq!(vs_index(0xE0100), Some(16));
    }

    #[test]
    fn letter_spacing_excludes_arabic() {
        assert!(!is_letter_spacing_capable(Script::Arabic));
        assert!(is_letter_spacing_capable(Script::Latin));
    }

    #[test]
    fn soft_hyphen_is_format_only() {
        assert!(is_format_only(0x00AD));
        assert!(!is_format_only('A' as u32));
    }
}
