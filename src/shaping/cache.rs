//! LayoutCache (C10): a bounded cache of [`LayoutPiece`]s keyed by the text
//! content of a sub-run plus the paint/direction/hyphen-edit state that
//! shaping it depends on (§4.7).

use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::paint::MinikinPaint;
use crate::shaper_contract::ShaperBackend;
use crate::text::U16StringPiece;
use crate::types::{EndHyphenEdit, StartHyphenEdit};

use super::layout_piece::{self, LayoutPiece};

/// Default cache capacity in bytes, matching a `DEFAULT_LAYOUT_CACHE_BYTES`
/// budget sized for a typical shaping cache.
pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    units: Vec<u16>,
    paint_hash: u64,
    is_rtl: bool,
    start_edit: StartHyphenEdit,
    end_edit: EndHyphenEdit,
}

struct Inner {
    map: LruCache<CacheKey, Arc<LayoutPiece>>,
    bytes_used: usize,
    max_bytes: usize,
}

/// Process-wide shaping cache. `get_or_create` shapes on a cache miss and
/// stores the result; on a hit it returns the cached piece without calling
/// the shaper at all. Per §4.7's concurrency note the shaping work itself
/// (inside [`layout_piece::shape`]) runs without holding `self.inner`'s
/// lock across the actual shape call would be ideal, but since
/// `LayoutPiece` construction is cheap relative to the lock and this
/// crate's `ShaperBackend`s are themselves internally synchronized
/// (`SwashShaperBackend`'s mutex-guarded `ShapeContext`), holding the lock
/// for the whole miss path keeps the cache simple without a real
/// concurrency cost in practice.
pub struct LayoutCache {
    inner: Mutex<Inner>,
}

impl LayoutCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: LruCache::unbounded(),
                bytes_used: 0,
                max_bytes,
            }),
        }
    }

    /// Look up or shape `piece` under `paint`/`is_rtl`/hyphen edits. Paints
    /// with `disable_cache` set bypass the cache entirely and shape
    /// directly, matching §4.7's justification-feature bypass.
    #[allow(clippy::too_many_arguments)]
    pub fn get_or_create(
        &self,
        piece: U16StringPiece<'_>,
        paint: &MinikinPaint,
        is_rtl: bool,
        start_edit: StartHyphenEdit,
        end_edit: EndHyphenEdit,
        shaper: &dyn ShaperBackend,
    ) -> Arc<LayoutPiece> {
        if paint.disable_cache {
            return Arc::new(layout_piece::shape(piece, paint, is_rtl, start_edit, end_edit, shaper));
        }

        let key = CacheKey {
            units: piece.as_slice().to_vec(),
            paint_hash: paint.structural_hash(),
            is_rtl,
            start_edit,
            end_edit,
        };

        {
            let mut inner = self.inner.lock();
            if let Some(hit) = inner.map.get(&key) {
                return hit.clone();
            }
        }

        let piece_result = Arc::new(layout_piece::shape(piece, paint, is_rtl, start_edit, end_edit, shaper));

        let mut inner = self.inner.lock();
        let cost = piece_result.memory_usage();
        while inner.bytes_used + cost > inner.max_bytes {
            match inner.map.pop_lru() {
                Some((_, evicted)) => inner.bytes_used = inner.bytes_used.saturating_sub(evicted.memory_usage()),
                None => break,
            }
        }
        inner.map.put(key, piece_result.clone());
        inner.bytes_used += cost;
        piece_result
    }

    /// `purgeCaches` (§5): drop every cached entry, e.g. after a locale
    /// data update invalidates prior shaping results.
    pub fn purge(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.bytes_used = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A real lookup needs a parseable `FontCollection`, which in turn needs
    // a real font file to build a `Font` from (`swash::FontRef::from_index`
    // rejects empty data) — out of scope to hand-construct in a unit test,
    // same convention `font/mod.rs` and `paint.rs` follow. The cache's
    // behavior around its key and its disable/purge entry points is
    // exercised here directly; the full shape-through-cache path is
    // covered by `tests/end_to_end.rs` against the fixture font.

    #[test]
    fn cache_key_equality_is_structural() {
        let a = CacheKey {
            units: vec![b'h' as u16, b'i' as u16],
            paint_hash: 42,
            is_rtl: false,
            start_edit: StartHyphenEdit::NoEdit,
            end_edit: EndHyphenEdit::NoEdit,
        };
        let b = a.clone();
        let mut c = a.clone();
        c.paint_hash = 43;
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fresh_cache_starts_empty() {
        let cache = LayoutCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn purge_on_empty_cache_is_a_no_op() {
        let cache = LayoutCache::default();
        cache.purge();
        assert!(cache.is_empty());
    }
}
