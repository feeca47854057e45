use crate::core::types::{DocId, Score};
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use crate::search::scorer::Scorer;

/// Matches documents on which every sub-scorer agrees.
///
/// The cheapest sub-scorer leads; the others are advanced to its position
/// and, when one overshoots, the lead is advanced past it in turn. Scores
/// are summed in clause order.
#[derive(Debug)]
pub struct ConjunctionScorer<'a> {
    scorers: Vec<Scorer<'a>>,
    order: Vec<usize>,  // Indices into `scorers`, cheapest first
    doc: DocId,
}

impl<'a> ConjunctionScorer<'a> {
    pub fn new(scorers: Vec<Scorer<'a>>) -> Self {
        let mut order: Vec<usize> = (0..scorers.len()).collect();
        order.sort_by_key(|&i| scorers[i].cost());
        ConjunctionScorer {
            scorers,
            order,
            doc: DocId::UNPOSITIONED,
        }
    }

    pub fn score(&mut self) -> Score {
        self.scorers.iter_mut().fold(0.0, |sum, scorer| sum + scorer.score())
    }

    pub(crate) fn matching_clauses(&mut self) -> usize {
        self.scorers.iter_mut().map(|s| s.matching_clauses()).sum()
    }

    /// Leapfrogs from the lead's candidate until all sub-scorers agree.
    fn do_next(&mut self, mut target: DocId) -> DocId {
        let lead = self.order[0];

        'candidate: while target != NO_MORE_DOCS {
            for &i in &self.order[1..] {
                let scorer = &mut self.scorers[i];
                let mut doc = scorer.doc_id();
                if doc < target {
                    doc = scorer.advance(target);
                }
                if doc > target {
                    target = self.scorers[lead].advance(doc);
                    continue 'candidate;
                }
            }
            break;
        }

        self.doc = target;
        target
    }
}

impl DocIdSetIterator for ConjunctionScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        if self.scorers.is_empty() {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }
        let candidate = self.scorers[self.order[0]].next_doc();
        self.do_next(candidate)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        if self.scorers.is_empty() {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }
        let candidate = self.scorers[self.order[0]].advance(target);
        self.do_next(candidate)
    }

    fn cost(&self) -> u64 {
        self.order.first().map(|&i| self.scorers[i].cost()).unwrap_or(0)
    }
}
