use roaring::RoaringBitmap;
use crate::core::types::DocId;

pub const NO_MORE_DOCS: DocId = DocId::NO_MORE_DOCS;

/// Forward-only cursor over ascending document ids.
///
/// Starts unpositioned (`doc_id()` returns [`DocId::UNPOSITIONED`]); once
/// it returns [`NO_MORE_DOCS`] every later call does too.
pub trait DocIdSetIterator {
    fn doc_id(&self) -> DocId;

    /// Moves to the next document and returns it, or `NO_MORE_DOCS`.
    fn next_doc(&mut self) -> DocId;

    /// Moves to the first document `>= target` and returns it. A target at
    /// or before the current position leaves the cursor where it is.
    fn advance(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc_id();
        while doc < target {
            doc = self.next_doc();
        }
        doc
    }

    /// Estimated number of documents this cursor will visit.
    fn cost(&self) -> u64;
}

impl<I: DocIdSetIterator + ?Sized> DocIdSetIterator for Box<I> {
    fn doc_id(&self) -> DocId {
        (**self).doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        (**self).advance(target)
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }
}

impl std::fmt::Debug for dyn DocIdSetIterator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocIdSetIterator")
            .field("doc_id", &self.doc_id())
            .finish_non_exhaustive()
    }
}

/// Iterator over nothing.
#[derive(Debug, Clone)]
pub struct EmptyDocIdSetIterator {
    doc: DocId,
}

impl EmptyDocIdSetIterator {
    pub fn new() -> Self {
        EmptyDocIdSetIterator {
            doc: DocId::UNPOSITIONED,
        }
    }
}

impl Default for EmptyDocIdSetIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocIdSetIterator for EmptyDocIdSetIterator {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        self.doc = NO_MORE_DOCS;
        self.doc
    }

    fn advance(&mut self, _target: DocId) -> DocId {
        self.next_doc()
    }

    fn cost(&self) -> u64 {
        0
    }
}

/// Iterator over a sorted, deduplicated id array.
#[derive(Debug, Clone)]
pub struct SortedDocIdSetIterator {
    docs: Vec<DocId>,
    next: usize,
    doc: DocId,
}

impl SortedDocIdSetIterator {
    pub fn new(mut docs: Vec<DocId>) -> Self {
        docs.sort_unstable();
        docs.dedup();
        SortedDocIdSetIterator {
            docs,
            next: 0,
            doc: DocId::UNPOSITIONED,
        }
    }

    pub fn from_ids(ids: &[u32]) -> Self {
        Self::new(ids.iter().map(|&id| DocId::new(id)).collect())
    }

    /// Ids of `bitmap` within `[base, base + max_doc)`, rebased to zero.
    pub fn from_bitmap_range(bitmap: &RoaringBitmap, base: u32, max_doc: u32) -> Self {
        let mut window = RoaringBitmap::new();
        window.insert_range(base..base.saturating_add(max_doc));
        window &= bitmap;
        let docs = window.iter().map(|id| DocId::new(id - base)).collect();
        SortedDocIdSetIterator {
            docs,
            next: 0,
            doc: DocId::UNPOSITIONED,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocIdSetIterator for SortedDocIdSetIterator {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        self.doc = match self.docs.get(self.next) {
            Some(&doc) => {
                self.next += 1;
                doc
            }
            None => NO_MORE_DOCS,
        };
        self.doc
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        self.next += self.docs[self.next..].partition_point(|&d| d < target);
        self.next_doc()
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}

/// Every live document in `[0, max_doc)`.
#[derive(Debug, Clone)]
pub struct AllDocsIterator<'a> {
    max_doc: u32,
    deleted: &'a RoaringBitmap,
    doc: DocId,
}

impl<'a> AllDocsIterator<'a> {
    pub fn new(max_doc: u32, deleted: &'a RoaringBitmap) -> Self {
        AllDocsIterator {
            max_doc,
            deleted,
            doc: DocId::UNPOSITIONED,
        }
    }

    fn seek_live(&mut self, mut candidate: u32) -> DocId {
        while candidate < self.max_doc && self.deleted.contains(candidate) {
            candidate += 1;
        }
        self.doc = if candidate < self.max_doc {
            DocId::new(candidate)
        } else {
            NO_MORE_DOCS
        };
        self.doc
    }
}

impl DocIdSetIterator for AllDocsIterator<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        self.seek_live((self.doc.value() + 1) as u32)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        if target == NO_MORE_DOCS {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }
        self.seek_live(target.value().max(0) as u32)
    }

    fn cost(&self) -> u64 {
        self.max_doc as u64 - self.deleted.len()
    }
}
