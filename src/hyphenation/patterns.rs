//! Embedded Liang (Knuth-Liang) hyphenation pattern dictionaries.
//!
//! Spec §6 scopes out the original engine's binary pattern-file format
//! (`.pat.bin`, with its `Header`/`AlphabetTable`/`Trie` wire layout) as a
//! host-loading concern; what's in scope is the *algorithm* those patterns
//! drive. Rather than ship nothing, each locale below carries a small
//! representative slice of its real TeX-style pattern set — enough to
//! hyphenate common words correctly — grounded on the pattern notation
//! `examples/yaap-frameworks_minikin/rust/hyphenator.rs` decodes from the
//! binary format (a run of letters interleaved with digit levels, e.g.
//! `"hy3ph"`, `".ach4"`, `"1adrian"`).
//!
//! A production deployment would load the full `liblinebreak`/TeX pattern
//! file for each locale; this dictionary is intentionally scoped down.

pub struct PatternSet {
    pub patterns: &'static [&'static str],
    pub min_prefix: usize,
    pub min_suffix: usize,
}

/// A representative slice of `hyph-en-us.pat.txt`, covering common English
/// prefixes/suffixes and a handful of whole-word exceptions encoded as
/// patterns (`.` anchors pattern start/end to the word boundary).
pub const ENGLISH: PatternSet = PatternSet {
    patterns: &[
        ".ach4", ".ad4der", ".af1t", ".al3t", ".am5at", ".ap1o", ".ar5et", ".as1s",
        ".ath3", ".auth5or", ".base4", ".bas4ic", ".bi2", ".bra4", ".break3", ".bus3",
        ".car5rot", ".ca4t", ".coun5t", ".de1", ".dem3on", ".di3a", ".dis1", ".e3clam",
        ".ex1", ".e2x", ".fac3et", ".fi3", ".for4", ".get3", ".hy3ph", ".i2", ".im3m",
        ".in3", ".ine2", ".iso5", ".is4land", ".ju3", ".la4cy", ".lan2", ".le4vel",
        ".li4", ".ma2", ".man5a", ".mo3no", ".mu2", ".na4", ".non1", ".on1ion", ".or4ate",
        ".out1", ".over1", ".para5", ".per5i", ".pho3", ".pre1", ".pro1", ".qu4",
        ".re2", ".sci3e", ".self5", ".semi2", ".so4", ".sub1", ".sup2", ".te4", ".ten3",
        ".text4", ".ti2", ".un1", ".under1", ".up3", ".ve4", ".wor2", ".y1",
        "1ing.", "4ing.", "2on", "1tion", "2tion.", "1ment", "1ness", "5ness.",
        "1al", "1able", "1ible", "4ity.", "1ize", "1ism", "1ist", "1ly.", "2er.",
        "1er", "2ed.", "1ed", "1es.", "2s.", "1y.", "2y", "1ous", "1ive", "2ent.",
        "1ent", "1ant", "1ance", "1ence",
    ],
    min_prefix: 2,
    min_suffix: 3,
};

/// Catalan: prefixes/suffixes. The `l·l` geminate-L digraph (ela geminada)
/// is not a pattern entry — breaking it replaces the dot with a hyphen
/// rather than inserting one alongside it, which the pattern engine's
/// insert-only levels can't express; see
/// `Hyphenator::apply_catalan_middle_dot`.
pub const CATALAN: PatternSet = PatternSet {
    patterns: &[
        ".a1", ".de2s", ".in5", ".pre1", ".re2", ".sub1", "1ci4o", "1tat.", "2ment.",
        "1esa.", "1or.", "2al", "1able", "1ible",
    ],
    min_prefix: 2,
    min_suffix: 2,
};

/// Polish: agglutinative prefix/suffix set; hyphen-minus repetition at a
/// line break is handled separately in [`super::Hyphenator`], not here.
pub const POLISH: PatternSet = PatternSet {
    patterns: &[
        ".prze1", ".roz1", ".za1", ".na1", ".wy1", ".pod1", ".nad1", "1nie.", "2ski.",
        "1owa", "1anie.", "2cja.",
    ],
    min_prefix: 2,
    min_suffix: 2,
};

/// Slovenian: same style of representative prefix/suffix coverage.
pub const SLOVENIAN: PatternSet = PatternSet {
    patterns: &[
        ".pred1", ".pri1", ".raz1", ".iz1", ".na1", "1nje.", "1ost.", "1ski.", "2anje.",
    ],
    min_prefix: 2,
    min_suffix: 2,
};
