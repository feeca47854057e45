use crate::core::types::{DocId, Score};
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use crate::search::scorer::Scorer;

/// Documents of `req` that `excl` is not positioned on.
#[derive(Debug)]
pub struct ReqExclScorer<'a> {
    req: Box<Scorer<'a>>,
    excl: Box<Scorer<'a>>,
    doc: DocId,
}

impl<'a> ReqExclScorer<'a> {
    pub fn new(req: Scorer<'a>, excl: Scorer<'a>) -> Self {
        ReqExclScorer {
            req: Box::new(req),
            excl: Box::new(excl),
            doc: DocId::UNPOSITIONED,
        }
    }

    pub fn score(&mut self) -> Score {
        self.req.score()
    }

    pub(crate) fn matching_clauses(&mut self) -> usize {
        self.req.matching_clauses()
    }

    fn to_non_excluded(&mut self, mut doc: DocId) -> DocId {
        while doc != NO_MORE_DOCS {
            let mut excluded = self.excl.doc_id();
            if excluded < doc {
                excluded = self.excl.advance(doc);
            }
            if excluded != doc {
                break;
            }
            doc = self.req.next_doc();
        }
        self.doc = doc;
        doc
    }
}

impl DocIdSetIterator for ReqExclScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        let doc = self.req.next_doc();
        self.to_non_excluded(doc)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        let doc = self.req.advance(target);
        self.to_non_excluded(doc)
    }

    fn cost(&self) -> u64 {
        self.req.cost()
    }
}

/// Iterates `req`; adds `opt`'s score on documents it also matches.
#[derive(Debug)]
pub struct ReqOptSumScorer<'a> {
    req: Box<Scorer<'a>>,
    opt: Box<Scorer<'a>>,
}

impl<'a> ReqOptSumScorer<'a> {
    pub fn new(req: Scorer<'a>, opt: Scorer<'a>) -> Self {
        ReqOptSumScorer {
            req: Box::new(req),
            opt: Box::new(opt),
        }
    }

    /// Brings `opt` up to `req`'s position; true if it lands on it.
    fn opt_matches(&mut self) -> bool {
        let doc = self.req.doc_id();
        let mut opt_doc = self.opt.doc_id();
        if opt_doc < doc {
            opt_doc = self.opt.advance(doc);
        }
        opt_doc == doc
    }

    pub fn score(&mut self) -> Score {
        let req_score = self.req.score();
        if self.opt_matches() {
            req_score + self.opt.score()
        } else {
            req_score
        }
    }

    pub(crate) fn matching_clauses(&mut self) -> usize {
        let required = self.req.matching_clauses();
        if self.opt_matches() {
            required + self.opt.matching_clauses()
        } else {
            required
        }
    }
}

impl DocIdSetIterator for ReqOptSumScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.req.doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        self.req.next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        self.req.advance(target)
    }

    fn cost(&self) -> u64 {
        self.req.cost()
    }
}
