use std::sync::Arc;
use log::trace;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Score};
use crate::index::index_reader::SegmentReader;
use crate::query::ast::{BooleanQuery, Occur, Query};
use crate::scoring::similarity::Similarity;
use crate::search::conjunction::ConjunctionScorer;
use crate::search::disjunction::DisjunctionSumScorer;
use crate::search::explanation::Explanation;
use crate::search::iterator::DocIdSetIterator;
use crate::search::req::{ReqExclScorer, ReqOptSumScorer};
use crate::search::scorer::Scorer;
use crate::search::searcher::IndexSearcher;
use crate::search::weight::{scorer_or_none, NormState, Weight};

pub struct BooleanWeight<'q> {
    query: &'q Query,
    boolean: &'q BooleanQuery,
    weights: Vec<Weight<'q>>,
    similarity: Arc<dyn Similarity>,
    max_coord: usize,
    state: NormState,
}

impl<'q> BooleanWeight<'q> {
    pub fn new(query: &'q Query, boolean: &'q BooleanQuery, searcher: &IndexSearcher) -> Result<Self> {
        let weights = boolean
            .clauses
            .iter()
            .map(|clause| clause.query.create_weight(searcher))
            .collect::<Result<Vec<_>>>()?;
        let max_coord = boolean.clauses.iter().filter(|c| !c.is_prohibited()).count();

        Ok(BooleanWeight {
            query,
            boolean,
            weights,
            similarity: searcher.similarity(),
            max_coord,
            state: NormState::default(),
        })
    }

    pub fn query(&self) -> &'q Query {
        self.query
    }

    pub fn value(&self) -> f32 {
        self.boolean.boost()
    }

    pub fn sum_of_squared_weights(&mut self) -> f32 {
        self.state.summed();
        let mut sum = 0.0;
        for (weight, clause) in self.weights.iter_mut().zip(&self.boolean.clauses) {
            // Prohibited clauses are summed to keep their protocol state, not counted
            let s = weight.sum_of_squared_weights();
            if !clause.is_prohibited() {
                sum += s;
            }
        }
        let boost = self.boolean.boost();
        sum * boost * boost
    }

    pub fn normalize(&mut self, norm: f32) {
        self.state.normalized();
        let norm = norm * self.boolean.boost();
        for weight in &mut self.weights {
            weight.normalize(norm);
        }
    }

    pub fn scorer<'a>(
        &self,
        reader: &'a SegmentReader,
        score_docs_in_order: bool,
        top_scorer: bool,
    ) -> Result<Scorer<'a>> {
        self.state.check_normalized("scorer");
        trace!(
            "boolean scorer for {} (in_order={}, top={})",
            self.query, score_docs_in_order, top_scorer
        );

        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut prohibited = Vec::new();

        for (weight, clause) in self.weights.iter().zip(&self.boolean.clauses) {
            match scorer_or_none(weight.scorer(reader, true, false))? {
                Some(scorer) => match clause.occur {
                    Occur::Must => required.push(scorer),
                    Occur::Should => optional.push(scorer),
                    Occur::MustNot => prohibited.push(scorer),
                },
                None if clause.is_required() => {
                    return Err(Error::unsupported(format!(
                        "required clause {} has no matches in segment {}",
                        clause.query,
                        reader.ord()
                    )));
                }
                None => {}
            }
        }

        let min_should_match = self.boolean.minimum_should_match as usize;
        if required.is_empty() && optional.is_empty() {
            return Err(Error::unsupported(format!("{} has no positive clause to iterate", self.query)));
        }
        if optional.len() < min_should_match {
            return Err(Error::unsupported(format!(
                "only {} optional clauses can match, {} required",
                optional.len(),
                min_should_match
            )));
        }

        let positive = if required.is_empty() {
            Scorer::Disjunction(DisjunctionSumScorer::new(optional, min_should_match))
        } else {
            let req = single_or(required, |scorers| Scorer::Conjunction(ConjunctionScorer::new(scorers)));
            if optional.is_empty() {
                req
            } else if min_should_match > 0 {
                let opt = Scorer::Disjunction(DisjunctionSumScorer::new(optional, min_should_match));
                Scorer::Conjunction(ConjunctionScorer::new(vec![req, opt]))
            } else {
                let opt = single_or(optional, |scorers| Scorer::Disjunction(DisjunctionSumScorer::new(scorers, 1)));
                Scorer::ReqOpt(ReqOptSumScorer::new(req, opt))
            }
        };

        let filtered = if prohibited.is_empty() {
            positive
        } else {
            let excl = single_or(prohibited, |scorers| Scorer::Disjunction(DisjunctionSumScorer::new(scorers, 1)));
            Scorer::ReqExcl(ReqExclScorer::new(positive, excl))
        };

        Ok(Scorer::Coord(CoordScorer::new(filtered, self.coord_factors())))
    }

    pub fn explain(&self, reader: &SegmentReader, doc: DocId) -> Result<Explanation> {
        self.state.check_normalized("explain");

        let mut sum_expl = Explanation::new(0.0, "sum of:");
        let mut required_sum = 0.0f32;
        let mut optional_sum = 0.0f32;
        let mut coord = 0usize;
        let mut should_matches = 0usize;
        let mut fail = false;

        for (weight, clause) in self.weights.iter().zip(&self.boolean.clauses) {
            let expl = weight.explain(reader, doc)?;

            if expl.is_match() {
                match clause.occur {
                    Occur::MustNot => {
                        let mut r = Explanation::new(0.0, format!("match on prohibited clause ({})", clause.query));
                        r.add_detail(expl);
                        sum_expl.add_detail(r);
                        fail = true;
                    }
                    Occur::Must => {
                        required_sum += expl.value();
                        coord += 1;
                        sum_expl.add_detail(expl);
                    }
                    Occur::Should => {
                        optional_sum += expl.value();
                        coord += 1;
                        should_matches += 1;
                        sum_expl.add_detail(expl);
                    }
                }
            } else if clause.is_required() {
                let mut r = Explanation::new(0.0, format!("no match on required clause ({})", clause.query));
                r.add_detail(expl);
                sum_expl.add_detail(r);
                fail = true;
            }
        }

        if fail {
            sum_expl.set_match(false);
            sum_expl.set_value(0.0);
            sum_expl.set_description("Failure to meet condition(s) of required/prohibited clause(s)");
            return Ok(sum_expl);
        }

        let min_should_match = self.boolean.minimum_should_match as usize;
        if should_matches < min_should_match {
            sum_expl.set_match(false);
            sum_expl.set_value(0.0);
            sum_expl.set_description(format!(
                "Failure to match minimum number of optional clauses: {}",
                min_should_match
            ));
            return Ok(sum_expl);
        }

        // Same grouping as the scorer tree: required sum, then optional sum
        let sum = required_sum + optional_sum;
        sum_expl.set_match(coord > 0);
        sum_expl.set_value(sum);

        let coord_factor = self.coord_factors()[coord];
        if coord_factor == 1.0 {
            return Ok(sum_expl);
        }

        let matched = sum_expl.is_match();
        let mut result = Explanation::with_match(matched, sum * coord_factor, "product of:");
        result.add_detail(sum_expl);
        result.add_detail(Explanation::new(
            coord_factor,
            format!("coord({}/{})", coord, self.max_coord),
        ));
        Ok(result)
    }

    fn coord_factors(&self) -> Vec<f32> {
        (0..=self.max_coord)
            .map(|overlap| {
                if self.boolean.disable_coord {
                    1.0
                } else {
                    self.similarity.coord(overlap, self.max_coord)
                }
            })
            .collect()
    }
}

fn single_or<'a>(mut scorers: Vec<Scorer<'a>>, combine: impl FnOnce(Vec<Scorer<'a>>) -> Scorer<'a>) -> Scorer<'a> {
    if scorers.len() == 1 {
        if let Some(scorer) = scorers.pop() {
            return scorer;
        }
    }
    combine(scorers)
}

/// Scales the composed boolean score by `coord(matching clauses, max)`.
#[derive(Debug)]
pub struct CoordScorer<'a> {
    inner: Box<Scorer<'a>>,
    coord_factors: Vec<f32>,
}

impl<'a> CoordScorer<'a> {
    pub fn new(inner: Scorer<'a>, coord_factors: Vec<f32>) -> Self {
        CoordScorer {
            inner: Box::new(inner),
            coord_factors,
        }
    }

    pub fn score(&mut self) -> Score {
        let sum = self.inner.score();
        let overlap = self.inner.matching_clauses();
        sum * self.coord_factors[overlap]
    }
}

impl DocIdSetIterator for CoordScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.inner.doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        self.inner.next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        self.inner.advance(target)
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }
}
