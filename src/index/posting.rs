use crate::core::types::DocId;
use crate::index::skiplist::SkipList;

#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_freq: u32,       // Term frequency in document
    pub positions: Vec<u32>,  // Token positions, kept for callers outside the kernel
}

/// Posting list for a term, sorted by doc_id with a skip list over it.
#[derive(Debug, Clone)]
pub struct PostingList {
    postings: Vec<Posting>,
    skips: SkipList,
}

impl PostingList {
    pub fn from_postings(mut postings: Vec<Posting>) -> Self {
        postings.sort_by_key(|p| p.doc_id);
        postings.dedup_by_key(|p| p.doc_id);
        let skips = SkipList::build(&postings);
        PostingList { postings, skips }
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn skip_list(&self) -> &SkipList {
        &self.skips
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn doc_freq(&self) -> u32 {
        self.postings.len() as u32
    }

    pub fn total_freq(&self) -> u64 {
        self.postings.iter().map(|p| p.term_freq as u64).sum()
    }

    /// Posting for `doc`, if the term occurs in it.
    pub fn find(&self, doc: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc, |p| p.doc_id)
            .ok()
            .map(|pos| &self.postings[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc: u32, freq: u32) -> Posting {
        Posting {
            doc_id: DocId::new(doc),
            term_freq: freq,
            positions: (0..freq).collect(),
        }
    }

    #[test]
    fn postings_are_sorted_and_deduplicated() {
        let list = PostingList::from_postings(vec![posting(9, 1), posting(2, 3), posting(9, 2), posting(4, 1)]);
        let docs: Vec<i32> = list.postings().iter().map(|p| p.doc_id.value()).collect();
        assert_eq!(docs, vec![2, 4, 9]);
        assert_eq!(list.doc_freq(), 3);
        assert_eq!(list.total_freq(), 5);
        assert_eq!(list.find(DocId::new(2)).map(|p| p.term_freq), Some(3));
        assert!(list.find(DocId::new(3)).is_none());
    }
}
