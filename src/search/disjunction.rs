use std::cmp::Reverse;
use std::collections::BinaryHeap;
use crate::core::types::{DocId, Score};
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use crate::search::scorer::Scorer;

/// Matches documents on which at least `minimum_matchers` sub-scorers are
/// positioned, merging the sub-scorers through a min-heap keyed by
/// `(doc, index)`.
///
/// Sub-scorers sitting on the current document are kept out of the heap in
/// `matching` until the next move, so ties are drained together and scored
/// as a single match.
#[derive(Debug)]
pub struct DisjunctionSumScorer<'a> {
    scorers: Vec<Scorer<'a>>,
    heap: BinaryHeap<Reverse<(DocId, usize)>>,
    matching: Vec<usize>,
    minimum_matchers: usize,
    doc: DocId,
}

impl<'a> DisjunctionSumScorer<'a> {
    pub fn new(scorers: Vec<Scorer<'a>>, minimum_matchers: usize) -> Self {
        // Every sub-scorer starts unpositioned, i.e. "on the current doc"
        let matching = (0..scorers.len()).collect();
        DisjunctionSumScorer {
            heap: BinaryHeap::with_capacity(scorers.len()),
            scorers,
            matching,
            minimum_matchers: minimum_matchers.max(1),
            doc: DocId::UNPOSITIONED,
        }
    }

    /// Sum of the matching sub-scorers' scores, in sub-scorer order.
    pub fn score(&mut self) -> Score {
        let mut sum = 0.0;
        for &i in &self.matching {
            sum += self.scorers[i].score();
        }
        sum
    }

    pub(crate) fn matching_clauses(&mut self) -> usize {
        let mut count = 0;
        for &i in &self.matching {
            count += self.scorers[i].matching_clauses();
        }
        count
    }

    /// Number of sub-scorers positioned on the current document.
    pub fn matchers(&self) -> usize {
        self.matching.len()
    }

    /// Moves every sub-scorer in `matching` with `step` and re-heaps it.
    fn step_matching(&mut self, step: impl Fn(&mut Scorer<'a>) -> DocId) {
        let mut matching = std::mem::take(&mut self.matching);
        for i in matching.drain(..) {
            let doc = step(&mut self.scorers[i]);
            if doc != NO_MORE_DOCS {
                self.heap.push(Reverse((doc, i)));
            }
        }
        self.matching = matching;
    }

    /// Pops the smallest doc and every tie with it; retries while fewer
    /// than `minimum_matchers` agree.
    fn collect_min(&mut self) -> DocId {
        loop {
            let Some(&Reverse((doc, _))) = self.heap.peek() else {
                self.doc = NO_MORE_DOCS;
                return NO_MORE_DOCS;
            };

            while let Some(&Reverse((d, i))) = self.heap.peek() {
                if d != doc {
                    break;
                }
                self.heap.pop();
                self.matching.push(i);
            }

            if self.matching.len() >= self.minimum_matchers {
                self.matching.sort_unstable();
                self.doc = doc;
                return doc;
            }
            self.step_matching(|s| s.next_doc());
        }
    }
}

impl DocIdSetIterator for DisjunctionSumScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        self.step_matching(|s| s.next_doc());
        self.collect_min()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        self.step_matching(|s| s.advance(target));

        while let Some(&Reverse((doc, i))) = self.heap.peek() {
            if doc >= target {
                break;
            }
            self.heap.pop();
            let doc = self.scorers[i].advance(target);
            if doc != NO_MORE_DOCS {
                self.heap.push(Reverse((doc, i)));
            }
        }
        self.collect_min()
    }

    fn cost(&self) -> u64 {
        self.scorers.iter().map(|s| s.cost()).sum()
    }
}
