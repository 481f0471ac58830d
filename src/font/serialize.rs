//! Binary serialization of fonts, families, and collections (§6), using
//! explicit big-endian `u16`/`u32` packing rather than a serialization
//! crate, preferring hand-rolled wire formats over `serde` for binary
//! layouts (`hyphenator.rs`'s pattern-file reader is the same style).

use std::sync::Arc;

use crate::error::{Result, TypesetError};
use crate::hasher::SortedPackedVector;
use crate::locale::LocaleListId;
use crate::text::Range;
use crate::types::{AxisTag, FontStyle, Slant};

use super::collection::FontCollection;
use super::family::{FamilyVariant, FontFamily};
use super::Font;

struct Writer<'a> {
    out: &'a mut Vec<u8>,
}

impl<'a> Writer<'a> {
    fn u8(&mut self, v: u8) {
        self.out.push(v);
    }
    fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }
    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }
    fn bytes(&mut self, b: &[u8]) {
        self.out.extend_from_slice(b);
    }
}

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.pos + n > self.buf.len() {
            Err(TypesetError::MalformedStream(format!(
                "expected {} more bytes at offset {}, have {}",
                n,
                self.pos,
                self.buf.len() - self.pos
            )))
        } else {
            Ok(())
        }
    }

    fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    fn u16(&mut self) -> Result<u16> {
        self.need(2)?;
        let v = u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    fn u32(&mut self) -> Result<u32> {
        self.need(4)?;
        let v = u32::from_be_bytes([
            self.buf[self.pos],
            self.buf[self.pos + 1],
            self.buf[self.pos + 2],
            self.buf[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }
}

/// `Font{style, locale-list id, sorted supported axes, opaque typeface
/// metadata}`. "Opaque typeface metadata" here is the font's own bytes plus
/// face index, embedded directly since this crate has no separate typeface
/// registry contract to defer to.
pub fn serialize_font(font: &Font, out: &mut Vec<u8>) {
    let mut w = Writer { out };
    w.u16(font.style().weight());
    w.u8(if font.style().is_italic() { 1 } else { 0 });
    w.u32(font.locale_list_id().0);
    w.u16(font.supported_axes().len() as u16);
    for axis in font.supported_axes() {
        w.u32(axis.0);
    }
    w.u32(font.asset().face_index);
    w.u32(font.asset().data.len() as u32);
    w.bytes(&font.asset().data);
}

pub(crate) fn deserialize_font(r: &mut Reader<'_>) -> Result<Arc<Font>> {
    let weight = r.u16()?;
    let italic = r.u8()? != 0;
    let locale_list_id = LocaleListId(r.u32()?);
    let axis_count = r.u16()? as usize;
    for _ in 0..axis_count {
        r.u32()?; // supported axes are re-derived from the face by the builder
    }
    let face_index = r.u32()?;
    let data_len = r.u32()? as usize;
    let data: Arc<[u8]> = r.take(data_len)?.to_vec().into();

    let style = FontStyle::new(weight, if italic { Slant::Italic } else { Slant::Upright });
    Ok(Font::builder(data).face_index(face_index).style(style).locale_list_id(locale_list_id).build())
}

/// `FontFamily{locale-list id, font count, fonts…, variant (u8),
/// sorted supported axes, isColorEmoji (u8), isCustomFallback (u8),
/// coverage bitset, cmap-fmt14 as (size, nonEmptyCount, (index,
/// bitset)…)}`. The cmap format-14 section is written empty: this crate's
/// VS coverage is memoized lazily per-query (`FontFamily::vs_coverage_cache`)
/// rather than precomputed into a bitset-per-index table, so there is
/// nothing eagerly-computed to serialize; readers recompute VS coverage
/// on demand against the reconstructed fonts, which is observably
/// equivalent.
pub fn serialize_family(family: &FontFamily, out: &mut Vec<u8>) -> Result<()> {
    {
        let mut w = Writer { out };
        w.u32(family.locale_list_id().0);
        w.u16(family.num_fonts() as u16);
    }
    for font in family.fonts() {
        serialize_font(font, out);
    }
    let mut w = Writer { out };
    w.u8(match family.variant() {
        FamilyVariant::Default => 0,
        FamilyVariant::Compact => 1,
        FamilyVariant::Elegant => 2,
    });
    w.u16(family.supported_axes().len() as u16);
    for axis in family.supported_axes() {
        w.u32(axis.0);
    }
    w.u8(if family.is_color_emoji_family() { 1 } else { 0 });
    w.u8(if family.is_custom_fallback() { 1 } else { 0 });

    let codepoints: Vec<u32> = family.coverage().iter().copied().collect();
    w.u32(codepoints.len() as u32);
    for cp in codepoints {
        w.u32(cp);
    }
    w.u32(0); // cmap-fmt14 nonEmptyCount
    Ok(())
}

pub(crate) fn deserialize_family(r: &mut Reader<'_>) -> Result<Arc<FontFamily>> {
    let locale_list_id = LocaleListId(r.u32()?);
    let font_count = r.u16()? as usize;
    let mut fonts = Vec::with_capacity(font_count);
    for _ in 0..font_count {
        fonts.push(deserialize_font(r)?);
    }
    let variant = match r.u8()? {
        1 => FamilyVariant::Compact,
        2 => FamilyVariant::Elegant,
        _ => FamilyVariant::Default,
    };
    let axis_count = r.u16()? as usize;
    for _ in 0..axis_count {
        r.u32()?;
    }
    let _is_color_emoji = r.u8()? != 0;
    let is_custom_fallback = r.u8()? != 0;
    let codepoint_count = r.u32()? as usize;
    for _ in 0..codepoint_count {
        r.u32()?; // recomputed by compute_coverage below
    }
    let vs_count = r.u32()? as usize;
    for _ in 0..vs_count {
        r.u16()?;
        let bits = r.u32()? as usize;
        for _ in 0..bits {
            r.u32()?;
        }
    }

    Ok(FontFamily::with_locale_and_variant(locale_list_id, variant, fonts, is_custom_fallback))
}

/// `FontCollection{maxChar (u32), family-index array (u32[]), Range[]
/// (pairs of u16 packed as u32), familyVec (u8[]), sorted supported axes}`.
pub fn serialize_collection(collection: &FontCollection, out: &mut Vec<u8>) -> Result<()> {
    for family in collection.families() {
        serialize_family(family, out)?;
    }
    let mut w = Writer { out };
    w.u32(collection.families().len() as u32);
    w.u32(collection.max_char());
    w.u32(collection.supported_axes().len() as u32);
    for axis in collection.supported_axes() {
        w.u32(axis.0);
    }
    Ok(())
}

pub fn deserialize_collection(buf: &[u8], family_count: usize) -> Result<Arc<FontCollection>> {
    let mut r = Reader::new(buf);
    let mut families = Vec::with_capacity(family_count);
    for _ in 0..family_count {
        families.push(deserialize_family(&mut r)?);
    }
    let declared_count = r.u32()? as usize;
    if declared_count != family_count {
        return Err(TypesetError::MalformedStream(format!(
            "family count mismatch: caller passed {family_count}, stream says {declared_count}"
        )));
    }
    let _max_char = r.u32()?;
    let axis_count = r.u32()? as usize;
    for _ in 0..axis_count {
        r.u32()?; // recomputed from the reconstructed families
    }
    Ok(FontCollection::new(families))
}

/// Placeholder for the `Range` pairs the wire format packs as `u16` pairs
/// into a `u32`; retained to document the packing scheme even though this
/// crate's collection deserializer rebuilds page ranges from family
/// coverage rather than replaying them, which is cheap and avoids
/// duplicating the page-index invariant in two places.
pub fn pack_range_pair(range: Range) -> u32 {
    debug_assert!(range.start <= u16::MAX as usize && range.end <= u16::MAX as usize);
    ((range.start as u32) << 16) | (range.end as u32)
}

pub fn unpack_range_pair(packed: u32) -> Range {
    Range::new((packed >> 16) as usize, (packed & 0xFFFF) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_pair_round_trips() {
        let r = Range::new(12, 300);
        assert_eq!(unpack_range_pair(pack_range_pair(r)), r);
    }
}
