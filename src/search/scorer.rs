use crate::core::types::{DocId, Score};
use crate::search::boolean::CoordScorer;
use crate::search::collector::Collector;
use crate::search::conjunction::ConjunctionScorer;
use crate::search::constant::ConstantScorer;
use crate::search::disjunction::DisjunctionSumScorer;
use crate::search::filtered::FilteredScorer;
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use crate::search::req::{ReqExclScorer, ReqOptSumScorer};
use crate::search::term::TermScorer;

/// Scored cursor over one segment.
///
/// Every variant moves through `Unpositioned -> Positioned(doc) ->
/// Exhausted` via `next_doc` / `advance` only. `score` is valid while
/// positioned on a document and panics otherwise.
#[derive(Debug)]
pub enum Scorer<'a> {
    Term(TermScorer<'a>),
    Conjunction(ConjunctionScorer<'a>),
    Disjunction(DisjunctionSumScorer<'a>),
    ReqExcl(ReqExclScorer<'a>),
    ReqOpt(ReqOptSumScorer<'a>),
    Coord(CoordScorer<'a>),
    Constant(ConstantScorer<'a>),
    Filtered(FilteredScorer<'a>),
}

impl<'a> Scorer<'a> {
    /// Score of the current document.
    pub fn score(&mut self) -> Score {
        let doc = self.doc_id();
        assert!(
            doc.is_doc(),
            "score() called on a scorer that is not positioned on a document (doc_id = {})",
            doc
        );
        match self {
            Scorer::Term(s) => s.score(),
            Scorer::Conjunction(s) => s.score(),
            Scorer::Disjunction(s) => s.score(),
            Scorer::ReqExcl(s) => s.score(),
            Scorer::ReqOpt(s) => s.score(),
            Scorer::Coord(s) => s.score(),
            Scorer::Constant(s) => s.score(),
            Scorer::Filtered(s) => s.score(),
        }
    }

    /// Number of boolean clauses matching the current document, as counted
    /// by an enclosing boolean scorer. Leaves and nested boolean queries
    /// count as one clause.
    pub(crate) fn matching_clauses(&mut self) -> usize {
        match self {
            Scorer::Conjunction(s) => s.matching_clauses(),
            Scorer::Disjunction(s) => s.matching_clauses(),
            Scorer::ReqExcl(s) => s.matching_clauses(),
            Scorer::ReqOpt(s) => s.matching_clauses(),
            Scorer::Term(_) | Scorer::Coord(_) | Scorer::Constant(_) | Scorer::Filtered(_) => 1,
        }
    }

    /// Drives the scorer to exhaustion, feeding every match to `collector`.
    pub fn score_into(&mut self, collector: &mut dyn Collector) {
        let needs_scores = collector.needs_scores();
        loop {
            let doc = self.next_doc();
            if doc == NO_MORE_DOCS {
                break;
            }
            let score = if needs_scores { self.score() } else { 0.0 };
            collector.collect(doc, score);
        }
    }

    fn iter(&self) -> &dyn DocIdSetIterator {
        match self {
            Scorer::Term(s) => s,
            Scorer::Conjunction(s) => s,
            Scorer::Disjunction(s) => s,
            Scorer::ReqExcl(s) => s,
            Scorer::ReqOpt(s) => s,
            Scorer::Coord(s) => s,
            Scorer::Constant(s) => s,
            Scorer::Filtered(s) => s,
        }
    }

    fn iter_mut(&mut self) -> &mut dyn DocIdSetIterator {
        match self {
            Scorer::Term(s) => s,
            Scorer::Conjunction(s) => s,
            Scorer::Disjunction(s) => s,
            Scorer::ReqExcl(s) => s,
            Scorer::ReqOpt(s) => s,
            Scorer::Coord(s) => s,
            Scorer::Constant(s) => s,
            Scorer::Filtered(s) => s,
        }
    }
}

impl DocIdSetIterator for Scorer<'_> {
    fn doc_id(&self) -> DocId {
        self.iter().doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        self.iter_mut().next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        self.iter_mut().advance(target)
    }

    fn cost(&self) -> u64 {
        self.iter().cost()
    }
}
