use roaring::RoaringBitmap;
use crate::core::types::DocId;
use crate::index::posting::{Posting, PostingList};
use crate::index::skiplist::SkipList;
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};

/// Cursor over one term's postings in a segment.
///
/// `advance` seeks through the posting list's skip entries; deleted
/// documents are never returned.
#[derive(Debug, Clone)]
pub struct PostingsCursor<'a> {
    postings: &'a [Posting],
    skips: &'a SkipList,
    deleted: &'a RoaringBitmap,
    next: usize,     // Index of the next posting to inspect
    current: usize,  // Index of the posting under the cursor
    doc: DocId,
}

impl<'a> PostingsCursor<'a> {
    pub fn new(list: &'a PostingList, deleted: &'a RoaringBitmap) -> Self {
        PostingsCursor {
            postings: list.postings(),
            skips: list.skip_list(),
            deleted,
            next: 0,
            current: 0,
            doc: DocId::UNPOSITIONED,
        }
    }

    /// Term frequency in the current document.
    pub fn freq(&self) -> u32 {
        debug_assert!(self.doc.is_doc());
        self.postings[self.current].term_freq
    }

    fn scan_live(&mut self) -> DocId {
        while let Some(posting) = self.postings.get(self.next) {
            self.next += 1;
            if self.deleted.contains(posting.doc_id.as_u32()) {
                continue;
            }
            self.current = self.next - 1;
            self.doc = posting.doc_id;
            return self.doc;
        }
        self.doc = NO_MORE_DOCS;
        self.doc
    }
}

impl DocIdSetIterator for PostingsCursor<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        self.scan_live()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        self.next = self.skips.skip_to_ge(self.postings, target, self.next);
        self.scan_live()
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::iterator::tests::collect_docs;

    fn list(docs: &[u32]) -> PostingList {
        PostingList::from_postings(
            docs.iter()
                .map(|&d| Posting {
                    doc_id: DocId::new(d),
                    term_freq: d + 1,
                    positions: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn walks_live_postings_with_freqs() {
        let list = list(&[1, 4, 6, 9]);
        let deleted: RoaringBitmap = [4u32].into_iter().collect();
        let mut cursor = PostingsCursor::new(&list, &deleted);
        assert_eq!(cursor.next_doc(), DocId::new(1));
        assert_eq!(cursor.freq(), 2);
        assert_eq!(cursor.next_doc(), DocId::new(6));
        assert_eq!(cursor.freq(), 7);
        assert_eq!(collect_docs(&mut cursor), vec![9]);
        assert_eq!(cursor.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn advance_returns_smallest_match_at_or_after_target() {
        let docs: Vec<u32> = (0..500).map(|i| i * 2 + 1).collect();
        let list = list(&docs);
        let deleted = RoaringBitmap::new();

        for target in [0u32, 1, 2, 57, 58, 500, 998, 999] {
            let mut cursor = PostingsCursor::new(&list, &deleted);
            let expected = docs
                .iter()
                .find(|&&d| d >= target)
                .map(|&d| DocId::new(d))
                .unwrap_or(NO_MORE_DOCS);
            assert_eq!(cursor.advance(DocId::new(target)), expected, "target {}", target);
        }

        let mut cursor = PostingsCursor::new(&list, &deleted);
        assert_eq!(cursor.advance(DocId::new(100)), DocId::new(101));
        assert_eq!(cursor.advance(DocId::new(50)), DocId::new(101));
        assert_eq!(cursor.next_doc(), DocId::new(103));
        assert_eq!(cursor.advance(DocId::new(5000)), NO_MORE_DOCS);
        assert_eq!(cursor.advance(DocId::new(1)), NO_MORE_DOCS);
    }
}
