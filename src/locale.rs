//! Parsed BCP-47 locales with script/emoji-style/linebreak subtags, and a
//! process-wide id-interning cache (C3).

use parking_lot::Mutex;
use std::sync::Arc;
use unicode_script::Script;

/// `-u-em-` emoji presentation style subtag (`default`, `emoji`, `text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiStyle {
    Default,
    Emoji,
    Text,
}

/// `-u-lb-` line-break strictness subtag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakSubtag {
    Normal,
    Loose,
    Strict,
}

/// A single parsed locale: language, optional script, optional region, and
/// the Unicode extension subtags this engine cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
    emoji_style: EmojiStyleRepr,
    linebreak: LineBreakSubtagRepr,
}

// Stored as small repr so `Locale` stays `Eq`-able without floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmojiStyleRepr(u8);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineBreakSubtagRepr(u8);

impl Locale {
    /// Parse a BCP-47 tag, e.g. `en-US`, `und-Arab`, `ja-JP-u-em-emoji`.
    /// Unparseable or empty input yields the "und" (undetermined) locale
    /// rather than an error: locale parsing failure is a resource-absence
    /// case (§7), not a hard failure.
    pub fn parse(tag: &str) -> Self {
        let mut language = String::new();
        let mut script = None;
        let mut region = None;
        let mut emoji_style = EmojiStyleRepr(0);
        let mut linebreak = LineBreakSubtagRepr(0);

        let mut parts = tag.split(['-', '_']).filter(|s| !s.is_empty());
        if let Some(first) = parts.next() {
            language = first.to_ascii_lowercase();
        }
        let mut pending: Vec<&str> = parts.collect();
        let mut i = 0;
        while i < pending.len() {
            let part = pending[i];
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) && script.is_none()
            {
                script = Some(title_case(part));
            } else if (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            {
                region = Some(part.to_ascii_uppercase());
            } else if part.eq_ignore_ascii_case("u") && i + 1 < pending.len() {
                // Unicode extension: scan key-value pairs until the next
                // singleton subtag or the end.
                let mut j = i + 1;
                while j < pending.len() && pending[j].len() > 1 {
                    let key = pending[j];
                    let value = pending.get(j + 1).copied().unwrap_or("");
                    match key {
                        "em" => {
                            emoji_style = EmojiStyleRepr(match value {
                                "emoji" => 1,
                                "text" => 2,
                                _ => 0,
                            });
                        }
                        "lb" => {
                            linebreak = LineBreakSubtagRepr(match value {
                                "loose" => 1,
                                "strict" => 2,
                                _ => 0,
                            });
                        }
                        _ => {}
                    }
                    j += 2;
                }
                i = j;
                continue;
            }
            i += 1;
        }
        pending.clear();

        Self {
            language,
            script,
            region,
            emoji_style,
            linebreak,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script_subtag(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn emoji_style(&self) -> EmojiStyle {
        match self.emoji_style.0 {
            1 => EmojiStyle::Emoji,
            2 => EmojiStyle::Text,
            _ => EmojiStyle::Default,
        }
    }

    pub fn linebreak_subtag(&self) -> LineBreakSubtag {
        match self.linebreak.0 {
            1 => LineBreakSubtag::Loose,
            2 => LineBreakSubtag::Strict,
            _ => LineBreakSubtag::Normal,
        }
    }

    /// Resolve to a `unicode_script::Script`, inferring from language when
    /// no explicit script subtag was given (covers the common cases this
    /// engine's scoring needs: §4.3's locale/script matching).
    pub fn resolved_script(&self) -> Option<Script> {
        if let Some(s) = &self.script {
            return script_from_subtag(s);
        }
        infer_script_from_language(&self.language)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

fn script_from_subtag(subtag: &str) -> Option<Script> {
    Some(match subtag {
        "Latn" => Script::Latin,
        "Cyrl" => Script::Cyrillic,
        "Grek" => Script::Greek,
        "Armn" => Script::Armenian,
        "Ethi" => Script::Ethiopic,
        "Geor" => Script::Georgian,
        "Cans" => Script::Canadian_Aboriginal,
        "Arab" => Script::Arabic,
        "Nkoo" => Script::Nko,
        "Hebr" => Script::Hebrew,
        "Deva" => Script::Devanagari,
        "Beng" => Script::Bengali,
        "Guru" => Script::Gurmukhi,
        "Mlym" => Script::Malayalam,
        "Knda" => Script::Kannada,
        "Taml" => Script::Tamil,
        "Telu" => Script::Telugu,
        "Hani" => Script::Han,
        "Hira" => Script::Hiragana,
        "Kana" => Script::Katakana,
        "Hang" => Script::Hangul,
        _ => return None,
    })
}

fn infer_script_from_language(lang: &str) -> Option<Script> {
    Some(match lang {
        "en" | "fr" | "de" | "es" | "it" | "pt" | "pl" | "sl" | "ca" | "nl" | "sv" | "vi" => {
            Script::Latin
        }
        "ru" | "uk" | "bg" | "sr" => Script::Cyrillic,
        "el" => Script::Greek,
        "hy" => Script::Armenian,
        "am" | "ti" => Script::Ethiopic,
        "ka" => Script::Georgian,
        "iu" | "cr" => Script::Canadian_Aboriginal,
        "ar" | "fa" | "ur" | "ps" => Script::Arabic,
        "he" | "yi" => Script::Hebrew,
        "hi" | "mr" | "ne" => Script::Devanagari,
        "bn" => Script::Bengali,
        "pa" => Script::Gurmukhi,
        "ml" => Script::Malayalam,
        "kn" => Script::Kannada,
        "ta" => Script::Tamil,
        "te" => Script::Telugu,
        "zh" => Script::Han,
        "ja" => Script::Hiragana,
        "ko" => Script::Hangul,
        _ => return None,
    })
}

/// An ordered, immutable list of locales parsed from a single `Accept-Language`-
/// style string (e.g. `"en-US,fr-FR"`), matched up to the first 12 entries
/// per §4.3's `calcFamilyScore` locale-score rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleList {
    locales: Vec<Locale>,
    raw: String,
}

impl LocaleList {
    pub fn parse(raw: &str) -> Self {
        let locales = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Locale::parse)
            .collect();
        Self {
            locales,
            raw: raw.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self {
            locales: Vec::new(),
            raw: String::new(),
        }
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Opaque interned id for a `LocaleList`, cheap to copy/compare/hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleListId(pub u32);

impl LocaleListId {
    pub const EMPTY: LocaleListId = LocaleListId(0);
}

/// Process-wide interning cache mapping raw locale-list strings to
/// [`LocaleListId`]s and back, guarded by a single mutex (§5).
pub struct LocaleListCache {
    inner: Mutex<Inner>,
}

struct Inner {
    by_string: ahash::AHashMap<String, LocaleListId>,
    by_id: Vec<Arc<LocaleList>>,
}

impl LocaleListCache {
    pub fn new() -> Self {
        let mut by_id = Vec::new();
        by_id.push(Arc::new(LocaleList::empty()));
        let mut by_string = ahash::AHashMap::default();
        by_string.insert(String::new(), LocaleListId::EMPTY);
        Self {
            inner: Mutex::new(Inner { by_string, by_id }),
        }
    }

    /// Intern `raw`, returning its stable id. Repeated calls with an equal
    /// string return the same id.
    pub fn get_id(&self, raw: &str) -> LocaleListId {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.by_string.get(raw) {
            return *id;
        }
        let id = LocaleListId(inner.by_id.len() as u32);
        let list = Arc::new(LocaleList::parse(raw));
        inner.by_id.push(list);
        inner.by_string.insert(raw.to_string(), id);
        id
    }

    pub fn get(&self, id: LocaleListId) -> Arc<LocaleList> {
        let inner = self.inner.lock();
        inner
            .by_id
            .get(id.0 as usize)
            .cloned()
            .unwrap_or_else(|| inner.by_id[0].clone())
    }
}

impl Default for LocaleListCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_LOCALE_CACHE: once_cell::sync::Lazy<LocaleListCache> =
    once_cell::sync::Lazy::new(LocaleListCache::new);

pub fn global_locale_cache() -> &'static LocaleListCache {
    &GLOBAL_LOCALE_CACHE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_script_region() {
        let l = Locale::parse("zh-Hant-TW");
        assert_eq!(l.language(), "zh");
        assert_eq!(l.script_subtag(), Some("Hant"));
        assert_eq!(l.region(), Some("TW"));
    }

    #[test]
    fn parses_emoji_style_extension() {
        let l = Locale::parse("und-u-em-emoji");
        assert_eq!(l.emoji_style(), EmojiStyle::Emoji);
    }

    #[test]
    fn interning_is_stable() {
        let cache = LocaleListCache::new();
        let a = cache.get_id("en-US,fr-FR");
        let b = cache.get_id("en-US,fr-FR");
        assert_eq!(a, b);
        let c = cache.get_id("ja-JP");
        assert_ne!(a, c);
    }
}
