use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use crate::core::types::{DocId, Score};
use crate::index::index_reader::SegmentReader;

/// Receives the matches of a scorer, one segment at a time.
///
/// `set_segment` is called before the first `collect` of each segment;
/// `collect` receives segment-local ids.
pub trait Collector {
    fn set_segment(&mut self, reader: &SegmentReader);

    fn collect(&mut self, doc: DocId, score: Score);

    /// Collectors that only count can skip score computation.
    fn needs_scores(&self) -> bool {
        true
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        false
    }
}

/// Document with relevance score, by reader-global id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreDoc {
    pub doc: DocId,
    pub score: Score,
}

impl ScoreDoc {
    /// Ranking order: higher score first, then lower doc id.
    fn rank(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.doc.cmp(&self.doc))
    }
}

// Greater means better ranked
impl PartialEq for ScoreDoc {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl Eq for ScoreDoc {}

impl PartialOrd for ScoreDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

/// Ranked search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDocs {
    pub total_hits: usize,
    pub score_docs: Vec<ScoreDoc>,
    pub max_score: Score,
}

impl TopDocs {
    pub fn empty() -> Self {
        TopDocs {
            total_hits: 0,
            score_docs: Vec::new(),
            max_score: 0.0,
        }
    }

    /// Combines per-segment results into the global top `k`.
    pub fn merge(k: usize, shards: Vec<TopDocs>) -> TopDocs {
        let total_hits = shards.iter().map(|s| s.total_hits).sum();
        let mut score_docs: Vec<ScoreDoc> = shards.into_iter().flat_map(|s| s.score_docs).collect();
        score_docs.sort_unstable_by(|a, b| b.cmp(a));
        score_docs.truncate(k);
        let max_score = score_docs.first().map(|d| d.score).unwrap_or(0.0);
        TopDocs {
            total_hits,
            score_docs,
            max_score,
        }
    }
}

/// Heap slots reserved up front; larger `k` grows on demand.
const PREALLOCATED_HITS: usize = 1024;

/// Top-K collector for efficient result collection
pub struct TopKCollector {
    heap: BinaryHeap<Reverse<ScoreDoc>>,
    k: usize,
    doc_base: u32,
    total_hits: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(PREALLOCATED_HITS)),
            k,
            doc_base: 0,
            total_hits: 0,
        }
    }

    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    pub fn into_top_docs(self) -> TopDocs {
        let mut score_docs: Vec<ScoreDoc> = self.heap.into_iter().map(|Reverse(d)| d).collect();
        score_docs.sort_unstable_by(|a, b| b.cmp(a));
        let max_score = score_docs.first().map(|d| d.score).unwrap_or(0.0);
        TopDocs {
            total_hits: self.total_hits,
            score_docs,
            max_score,
        }
    }
}

impl Collector for TopKCollector {
    fn set_segment(&mut self, reader: &SegmentReader) {
        self.doc_base = reader.doc_base();
    }

    fn collect(&mut self, doc: DocId, score: Score) {
        self.total_hits += 1;
        if self.k == 0 {
            return;
        }
        let candidate = ScoreDoc {
            doc: DocId::new(self.doc_base + doc.as_u32()),
            score,
        };

        if self.heap.len() < self.k {
            self.heap.push(Reverse(candidate));
        } else if let Some(Reverse(worst)) = self.heap.peek() {
            if candidate > *worst {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
            }
        }
    }
}

/// Counts matches without scoring them.
#[derive(Debug, Default)]
pub struct CountCollector {
    count: usize,
}

impl CountCollector {
    pub fn new() -> Self {
        CountCollector::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Collector for CountCollector {
    fn set_segment(&mut self, _reader: &SegmentReader) {}

    fn collect(&mut self, _doc: DocId, _score: Score) {
        self.count += 1;
    }

    fn needs_scores(&self) -> bool {
        false
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        true
    }
}
