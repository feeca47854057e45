use lru::LruCache;
use parking_lot::Mutex;
use roaring::RoaringBitmap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use log::trace;
use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::index_reader::SegmentReader;
use crate::index::inverted::SegmentId;
use crate::query::ast::Query;
use crate::search::iterator::{DocIdSetIterator, SortedDocIdSetIterator, NO_MORE_DOCS};
use crate::search::searcher::IndexSearcher;
use crate::search::weight::{scorer_or_none, Weight};

/// Unscored document-set restriction.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Documents matched by a query; scores are discarded
    Query(Box<Query>),
    /// Explicit set of reader-global doc ids
    DocIds(RoaringBitmap),
    /// Another filter with its per-segment result memoized
    Cached(CachingFilter),
}

impl Filter {
    pub fn query(query: Query) -> Filter {
        Filter::Query(Box::new(query))
    }

    pub fn doc_ids(ids: impl IntoIterator<Item = u32>) -> Filter {
        Filter::DocIds(ids.into_iter().collect())
    }

    pub fn cached(self, capacity: usize) -> Result<Filter> {
        Ok(Filter::Cached(CachingFilter::new(self, capacity)?))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Filter::Query(query) => write!(f, "QueryWrapperFilter({})", query),
            Filter::DocIds(ids) => write!(f, "DocIdsFilter({} docs)", ids.len()),
            Filter::Cached(cached) => write!(f, "CachingFilter({})", cached.inner),
        }
    }
}

/// Filter wrapper that memoizes the inner filter's doc set per segment.
///
/// Clones share one cache, so a filter reused across queries only walks
/// each segment once. Entries are keyed by segment and doc base: the same
/// segment mounted at another base in a different reader resolves global
/// doc ids differently.
#[derive(Clone)]
pub struct CachingFilter {
    inner: Box<Filter>,
    cache: Arc<Mutex<LruCache<(SegmentId, u32), Arc<RoaringBitmap>>>>,
    capacity: usize,
    hit_count: Arc<AtomicUsize>,
    miss_count: Arc<AtomicUsize>,
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

impl CachingFilter {
    pub fn new(inner: Filter, capacity: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::invalid_input("filter cache capacity must be positive"))?;
        Ok(CachingFilter {
            inner: Box::new(inner),
            cache: Arc::new(Mutex::new(LruCache::new(cap))),
            capacity,
            hit_count: Arc::new(AtomicUsize::new(0)),
            miss_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn inner(&self) -> &Filter {
        &self.inner
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.lock().len(),
            capacity: self.capacity,
        }
    }

    fn doc_set(&self, reader: &SegmentReader, inner: &FilterWeight<'_>) -> Result<Arc<RoaringBitmap>> {
        let key = (reader.segment().id(), reader.doc_base());
        if let Some(bits) = self.cache.lock().get(&key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return Ok(bits.clone());
        }
        self.miss_count.fetch_add(1, Ordering::Relaxed);

        // Computed outside the lock; a concurrent miss just does the work twice
        let mut bits = RoaringBitmap::new();
        if let Some(mut it) = inner.iterator(reader)? {
            loop {
                let doc = it.next_doc();
                if doc == NO_MORE_DOCS {
                    break;
                }
                bits.insert(doc.as_u32());
            }
        }
        trace!("cached {} docs for segment {}", bits.len(), reader.ord());

        let bits = Arc::new(bits);
        self.cache.lock().put(key, bits.clone());
        Ok(bits)
    }
}

impl fmt::Debug for CachingFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CachingFilter")
            .field("inner", &self.inner)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// A filter prepared for one search.
///
/// Query filters hold their own weight, normalized in isolation so the
/// wrapped query never influences the outer query norm.
pub enum FilterWeight<'q> {
    Query(Box<Weight<'q>>),
    DocIds(&'q RoaringBitmap),
    Cached {
        filter: &'q CachingFilter,
        inner: Box<FilterWeight<'q>>,
    },
}

impl<'q> FilterWeight<'q> {
    pub fn new(filter: &'q Filter, searcher: &IndexSearcher) -> Result<Self> {
        Ok(match filter {
            Filter::Query(query) => FilterWeight::Query(Box::new(searcher.create_normalized_weight(query)?)),
            Filter::DocIds(ids) => FilterWeight::DocIds(ids),
            Filter::Cached(cached) => FilterWeight::Cached {
                filter: cached,
                inner: Box::new(FilterWeight::new(&cached.inner, searcher)?),
            },
        })
    }

    /// Iterator over the filter's live documents in `reader`, or `None` when
    /// the segment has none.
    pub fn iterator<'a>(&self, reader: &'a SegmentReader) -> Result<Option<Box<dyn DocIdSetIterator + 'a>>> {
        match self {
            FilterWeight::Query(weight) => Ok(scorer_or_none(weight.scorer(reader, true, false))?
                .map(|scorer| Box::new(scorer) as Box<dyn DocIdSetIterator + 'a>)),
            FilterWeight::DocIds(ids) => {
                let base = reader.doc_base();
                let mut local: RoaringBitmap = segment_window(ids, reader).iter().map(|id| id - base).collect();
                local -= reader.segment().deleted();
                Ok(boxed_bitmap(&local, reader.max_doc()))
            }
            FilterWeight::Cached { filter, inner } => {
                let bits = filter.doc_set(reader, inner)?;
                Ok(boxed_bitmap(&bits, reader.max_doc()))
            }
        }
    }

    /// Whether segment-local `doc` passes the filter.
    pub fn matches(&self, reader: &SegmentReader, doc: DocId) -> Result<bool> {
        if !doc.is_doc() || doc.as_u32() >= reader.max_doc() {
            return Ok(false);
        }
        match self {
            FilterWeight::Query(_) => Ok(match self.iterator(reader)? {
                Some(mut it) => it.advance(doc) == doc,
                None => false,
            }),
            FilterWeight::DocIds(ids) => {
                Ok(ids.contains(reader.doc_base() + doc.as_u32()) && !reader.segment().is_deleted(doc))
            }
            FilterWeight::Cached { filter, inner } => Ok(filter.doc_set(reader, inner)?.contains(doc.as_u32())),
        }
    }
}

/// Global ids of `ids` that fall inside `reader`'s doc range.
fn segment_window(ids: &RoaringBitmap, reader: &SegmentReader) -> RoaringBitmap {
    let base = reader.doc_base();
    let mut window = RoaringBitmap::new();
    window.insert_range(base..base.saturating_add(reader.max_doc()));
    window &= ids;
    window
}

fn boxed_bitmap<'a>(bits: &RoaringBitmap, max_doc: u32) -> Option<Box<dyn DocIdSetIterator + 'a>> {
    if bits.is_empty() {
        None
    } else {
        Some(Box::new(SortedDocIdSetIterator::from_bitmap_range(bits, 0, max_doc)))
    }
}
