//! Hyphenator (C7): per-locale word hyphenation, combining Liang
//! pattern-matching with script-specific manual break rules.
//!
//! Grounded on `examples/yaap-frameworks_minikin/rust/hyphenator.rs`, a
//! direct Rust port of Android's `Hyphenator`. That file's binary
//! pattern-file decoder is out of scope (spec §6); its *algorithm* — parse
//! each pattern into letters + interleaved digit levels, pointwise-max the
//! levels of every matching pattern over the word, odd level = break point
//! — is reimplemented here against the small embedded dictionaries in
//! [`patterns`], and its script dispatch (`hyphenationTypeBasedOnScript`,
//! `getHyphTypeForArabic`) is reproduced in [`Hyphenator::for_locale`] and
//! [`Hyphenator::script_break_type`].

pub mod patterns;

use unicode_script::Script;

use crate::locale::Locale;
use crate::types::HyphenationType;
use crate::unicode_data::joining_type::{joining_type, JoiningType};

const SOFT_HYPHEN: u16 = 0x00AD;
const HYPHEN_MINUS: u16 = 0x002D;
const HYPHEN: u16 = 0x2010;
const MIDDLE_DOT: u16 = 0x00B7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptClass {
    Latin(&'static patterns::PatternSet),
    /// Hyphen-repeats-at-next-line-start locales (Polish, Slovenian): same
    /// pattern engine, but an existing hyphen-minus break requires the
    /// continuation line to start with a repeated hyphen.
    LatinRepeating(&'static patterns::PatternSet),
    Armenian,
    Hebrew,
    CanadianAboriginal,
    Arabic,
    Unsupported,
}

/// A word hyphenator bound to one locale's script/pattern behavior.
pub struct Hyphenator {
    class: ScriptClass,
}

impl Hyphenator {
    /// Select the hyphenation strategy for `locale`, per
    /// `hyphenationTypeBasedOnScript`: language first (catches the
    /// hyphen-repeating and Catalan-digraph special cases the bare script
    /// wouldn't distinguish), then resolved script as fallback.
    pub fn for_locale(locale: &Locale) -> Self {
        let class = match locale.language() {
            "pl" => ScriptClass::LatinRepeating(&patterns::POLISH),
            "sl" => ScriptClass::LatinRepeating(&patterns::SLOVENIAN),
            "ca" => ScriptClass::Latin(&patterns::CATALAN),
            "hy" => ScriptClass::Armenian,
            "he" | "yi" => ScriptClass::Hebrew,
            "iu" | "cr" => ScriptClass::CanadianAboriginal,
            _ => match locale.resolved_script() {
                Some(Script::Latin) | Some(Script::Cyrillic) | Some(Script::Greek) => {
                    ScriptClass::Latin(&patterns::ENGLISH)
                }
                Some(Script::Armenian) => ScriptClass::Armenian,
                Some(Script::Hebrew) => ScriptClass::Hebrew,
                Some(Script::Canadian_Aboriginal) => ScriptClass::CanadianAboriginal,
                Some(Script::Arabic) | Some(Script::Nko) | Some(Script::Syriac) | Some(Script::Mandaic) => {
                    ScriptClass::Arabic
                }
                _ => ScriptClass::Unsupported,
            },
        };
        Self { class }
    }

    /// The `HyphenationType` a manual (non-pattern) break at this locale's
    /// script would use, mirroring `getHyphTypeForArabic`'s disambiguation
    /// between a plain hyphen and one that needs an accompanying ZWJ to
    /// keep cursive joining intact across the line break.
    fn script_break_type(&self, word: &[u16], break_index: usize) -> HyphenationType {
        match self.class {
            ScriptClass::Armenian => HyphenationType::BreakAndInsertArmenianHyphen,
            ScriptClass::Hebrew => HyphenationType::BreakAndInsertMaqaf,
            ScriptClass::CanadianAboriginal => HyphenationType::BreakAndInsertUcasHyphen,
            ScriptClass::Arabic => {
                if needs_zwj(word, break_index) {
                    HyphenationType::BreakAndInsertHyphenAndZwj
                } else {
                    HyphenationType::BreakAndInsertHyphen
                }
            }
            _ => HyphenationType::BreakAndInsertHyphen,
        }
    }

    /// Hyphenate `word` (a single word's codeunits, no surrounding
    /// whitespace), returning one [`HyphenationType`] per codeunit gap —
    /// index `i` is the opportunity between codeunit `i-1` and `i`, so the
    /// result always has `word.len() + 1` entries and the first/last are
    /// always `DontBreak` (never break before the first or after the last
    /// codeunit of a word).
    pub fn hyphenate(&self, word: &[u16]) -> Vec<HyphenationType> {
        let mut result = vec![HyphenationType::DontBreak; word.len() + 1];
        if word.is_empty() {
            return result;
        }

        apply_manual_breaks(self, word, &mut result);

        if let ScriptClass::Latin(set) | ScriptClass::LatinRepeating(set) = self.class {
            if std::ptr::eq(set, &patterns::CATALAN) {
                apply_catalan_middle_dot(word, set, &mut result);
            }
            apply_pattern_breaks(word, set, &mut result);
        }

        result[0] = HyphenationType::DontBreak;
        let last = result.len() - 1;
        result[last] = HyphenationType::DontBreak;
        result
    }

    /// True when a hyphen-minus break in this locale must repeat the
    /// hyphen at the start of the continuation line (Polish, Slovenian).
    pub fn repeats_hyphen_at_next_line(&self) -> bool {
        matches!(self.class, ScriptClass::LatinRepeating(_))
    }

    /// Render `word` with `-` at every break point this hyphenator finds,
    /// for tests and debugging.
    pub fn debug_hyphenate_to_string(&self, word: &str) -> String {
        let units: Vec<u16> = word.encode_utf16().collect();
        let breaks = self.hyphenate(&units);
        let chars: Vec<char> = word.chars().collect();
        let mut out = String::new();
        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && breaks.get(i).map(|b| *b != HyphenationType::DontBreak).unwrap_or(false) {
                out.push('-');
            }
            out.push(c);
        }
        out
    }
}

/// True if breaking immediately before `word[break_index]` would separate
/// two letters that are cursively joined, i.e. the previous letter is
/// join-causing/dual/left-joining *and* the next letter expects a
/// preceding join (dual/right-joining) — in which case the inserted
/// hyphen must carry a ZWJ to keep them visually connected.
fn needs_zwj(word: &[u16], break_index: usize) -> bool {
    if break_index == 0 || break_index >= word.len() {
        return false;
    }
    let prev = joining_type(word[break_index - 1] as u32);
    let next = joining_type(word[break_index] as u32);
    let prev_joins_forward = matches!(prev, JoiningType::DualJoining | JoiningType::LeftJoining | JoiningType::JoinCausing);
    let next_joins_backward = matches!(next, JoiningType::DualJoining | JoiningType::RightJoining);
    prev_joins_forward && next_joins_backward
}

/// Soft hyphen, hyphen-minus, and the Unicode HYPHEN character are
/// pre-existing break opportunities regardless of pattern coverage: a
/// soft hyphen breaks without inserting a visible hyphen (it already is
/// one), while a hard hyphen-minus/HYPHEN breaks without re-inserting a
/// second hyphen glyph unless the locale repeats it on the next line.
fn apply_manual_breaks(hyphenator: &Hyphenator, word: &[u16], result: &mut [HyphenationType]) {
    for (i, &unit) in word.iter().enumerate() {
        match unit {
            SOFT_HYPHEN => {
                result[i] = HyphenationType::BreakAndDontInsertHyphen;
            }
            HYPHEN_MINUS | HYPHEN => {
                let at_next_line = if hyphenator.repeats_hyphen_at_next_line() {
                    HyphenationType::BreakAndInsertHyphenAtNextLine
                } else {
                    HyphenationType::BreakAndDontInsertHyphen
                };
                result[i + 1] = at_next_line;
            }
            _ => {}
        }
    }
}

/// Middle dot (U+00B7) surrounded by `l`/`L` on both sides is the Catalan
/// `l·l` geminate-L digraph (§3): breaking it replaces the dot with a
/// hyphen immediately after its position, gated by the same min-prefix/
/// min-suffix length check pattern breaks use — unlike an author-typed
/// hyphen-minus (`apply_manual_breaks`), which always breaks regardless of
/// surrounding length since the author already chose that spot.
fn apply_catalan_middle_dot(word: &[u16], set: &patterns::PatternSet, result: &mut [HyphenationType]) {
    let is_l = |u: u16| u == 'l' as u16 || u == 'L' as u16;
    for (i, &unit) in word.iter().enumerate() {
        if unit != MIDDLE_DOT || i == 0 || i + 1 >= word.len() {
            continue;
        }
        if !is_l(word[i - 1]) || !is_l(word[i + 1]) {
            continue;
        }
        let break_index = i + 1;
        if break_index <= set.min_prefix || word.len() - break_index < set.min_suffix {
            continue;
        }
        result[break_index] = HyphenationType::BreakAndReplaceWithHyphen;
    }
}

/// Run every pattern in `set` against `.word.` (lowercased, boundary-anchored)
/// and pointwise-max the resulting levels, writing odd-level gaps as
/// script-appropriate hyphenation breaks.
fn apply_pattern_breaks(word: &[u16], set: &patterns::PatternSet, result: &mut [HyphenationType]) {
    let lowered: Vec<char> = char::decode_utf16(word.iter().copied())
        .map(|r| r.unwrap_or('\u{FFFD}').to_ascii_lowercase())
        .collect();
    if lowered.iter().any(|c| !c.is_ascii_alphabetic() && *c != MIDDLE_DOT as u8 as char) {
        // Non-alphabetic content (digits, punctuation) isn't meaningfully
        // covered by a letter-pattern dictionary; manual breaks already
        // applied above still stand.
        return;
    }

    let mut extended = Vec::with_capacity(lowered.len() + 2);
    extended.push('.');
    extended.extend_from_slice(&lowered);
    extended.push('.');

    let mut levels = vec![0u8; extended.len() + 1];
    for pattern in set.patterns {
        let (letters, pattern_levels) = parse_pattern(pattern);
        if letters.len() > extended.len() {
            continue;
        }
        for start in 0..=(extended.len() - letters.len()) {
            if extended[start..start + letters.len()] == letters[..] {
                for (k, &level) in pattern_levels.iter().enumerate() {
                    levels[start + k] = levels[start + k].max(level);
                }
            }
        }
    }

    // `levels[i]` is the level of the gap before `extended[i]`; `extended`
    // is `.` + word + `.`, so gap `i` in `levels` (for `i` in
    // `1..=word.len()`) corresponds to codeunit gap `i - 1` in `result`.
    for i in (set.min_prefix + 1)..=(lowered.len().saturating_sub(set.min_suffix)) {
        if levels[i] % 2 == 1 {
            let gap = i - 1;
            if gap > 0 && gap < result.len() - 1 && result[gap] == HyphenationType::DontBreak {
                result[gap] = HyphenationType::BreakAndInsertHyphen;
            }
        }
    }
}

/// Parse a Liang pattern string (e.g. `"hy3ph"`, `".ach4"`, `"4ing."`) into
/// its letters and the digit level interleaved before/after each one.
/// Absent digits default to level 0, matching the textbook algorithm.
fn parse_pattern(pattern: &str) -> (Vec<char>, Vec<u8>) {
    let mut letters = Vec::new();
    let mut levels = vec![0u8];
    for c in pattern.chars() {
        if let Some(d) = c.to_digit(10) {
            *levels.last_mut().unwrap() = d as u8;
        } else {
            letters.push(c);
            levels.push(0);
        }
    }
    (letters, levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn english() -> Hyphenator {
        Hyphenator::for_locale(&Locale::parse("en-US"))
    }

    #[test]
    fn hyphenates_hyphenation_itself() {
        let h = english();
        let rendered = h.debug_hyphenate_to_string("hyphenation");
        assert!(rendered.contains('-'), "expected a break in {rendered:?}");
    }

    #[test]
    fn short_word_stays_whole() {
        let h = english();
        let breaks = h.hyphenate(&"an".encode_utf16().collect::<Vec<_>>());
        assert!(breaks.iter().all(|b| *b == HyphenationType::DontBreak));
    }

    #[test]
    fn soft_hyphen_is_a_break_without_insertion() {
        let h = english();
        let word: Vec<u16> = "soft\u{00AD}hyphen".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert_eq!(breaks[4], HyphenationType::BreakAndDontInsertHyphen);
    }

    #[test]
    fn polish_repeats_hyphen_at_next_line() {
        let h = Hyphenator::for_locale(&Locale::parse("pl-PL"));
        let word: Vec<u16> = "ab-cd".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert_eq!(breaks[3], HyphenationType::BreakAndInsertHyphenAtNextLine);
    }

    #[test]
    fn arabic_dual_joining_break_gets_zwj() {
        let h = Hyphenator::for_locale(&Locale::parse("ar"));
        // BEH (dual) + BEH (dual): breaking between them needs a ZWJ.
        let word: Vec<u16> = vec![0x0628, 0x0628];
        assert!(needs_zwj(&word, 1));
        let _ = h;
    }

    #[test]
    fn catalan_middle_dot_breaks_and_replaces_with_hyphen() {
        let h = Hyphenator::for_locale(&Locale::parse("ca-ES"));
        let word: Vec<u16> = "ll\u{00B7}ll".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert_eq!(breaks[3], HyphenationType::BreakAndReplaceWithHyphen);
    }

    #[test]
    fn catalan_middle_dot_below_minimum_length_stays_whole() {
        let h = Hyphenator::for_locale(&Locale::parse("ca-ES"));
        let word: Vec<u16> = "l\u{00B7}l".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert!(breaks.iter().all(|b| *b == HyphenationType::DontBreak));
    }

    #[test]
    fn catalan_middle_dot_break_index_equal_to_min_prefix_stays_whole() {
        // "l·ll": break_index (2) equals min_prefix (2), which the
        // ground-truth prefix guard (`min_prefix < break_index`) rejects —
        // the prefix would be no longer than the minimum required, not
        // strictly longer.
        let h = Hyphenator::for_locale(&Locale::parse("ca-ES"));
        let word: Vec<u16> = "l\u{00B7}ll".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert!(breaks.iter().all(|b| *b == HyphenationType::DontBreak));
    }

    #[test]
    fn unsupported_script_only_honors_manual_breaks() {
        let h = Hyphenator::for_locale(&Locale::parse("zh"));
        let word: Vec<u16> = "abcdefgh".encode_utf16().collect();
        let breaks = h.hyphenate(&word);
        assert!(breaks.iter().all(|b| *b == HyphenationType::DontBreak));
    }
}
