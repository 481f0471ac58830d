//! Font itemization, shaping-driven layout, and line-breaking engine.
//!
//! This crate provides the pieces a text renderer needs between "here is a
//! UTF-16 string and a style" and "here are lines of positioned glyphs":
//! - Font fallback and itemization across a family collection, including
//!   script/locale/coverage scoring and emoji tag-sequence handling
//! - Shaping-driven layout via a pluggable [`shaper_contract::ShaperBackend`]
//!   (backed by `swash` in production, a deterministic fake in tests)
//! - Greedy and optimal (dynamic-programming) line breaking, with
//!   locale-aware hyphenation feeding both

#![allow(dead_code)]

pub mod bidi;
pub mod error;
pub mod font;
pub mod hasher;
pub mod hyphenation;
pub mod line_breaking;
pub mod locale;
pub mod measured_text;
pub mod paint;
pub mod shaper_contract;
pub mod shaping;
pub mod text;
pub mod types;
pub mod unicode_data;
pub mod word_break;

pub use bidi::{resolve_visual_runs, BidiFlag, VisualRun};
pub use error::{Result, TypesetError};
pub use font::collection::{FontCollection, ItemizedRun};
pub use font::family::{Coverage, FamilyVariant, FontFamily};
pub use font::{FakedFont, Font, FontAsset, FontBuilder, NativeFace};
pub use hyphenation::Hyphenator;
pub use line_breaking::greedy::break_greedy;
pub use line_breaking::optimal::break_optimal;
pub use line_breaking::{
    BreakStrategy, HyphenationFrequency, LineBreakResult, LineHyphenEdit, LineWidth, TabStops,
};
pub use locale::{EmojiStyle, Locale, LocaleList, LocaleListId};
pub use measured_text::{
    HyphenBreak, MeasuredText, MeasuredTextBuilder, ReplacementRun, Run, RunKind, StyleRun,
};
pub use paint::{FeatureSetting, MinikinPaint};
pub use shaper_contract::fake::FakeShaperBackend;
pub use shaper_contract::{Extent, ShaperBackend, ShapeOutput, ShapedGlyph, SwashShaperBackend};
pub use shaping::cache::LayoutCache;
pub use shaping::layout::Layout;
pub use shaping::layout_piece::{LayoutPiece, PositionedGlyph};
pub use text::{Range, U16StringPiece};
pub use types::{
    edit_for_next_line, edit_for_this_line, AxisTag, EndHyphenEdit, FontFakery, FontStyle,
    FontVariation, HyphenEdit, HyphenationType, Slant, StartHyphenEdit,
};
pub use word_break::{word_boundaries, word_range, LineBreakWordStyle, WordBoundary};
