use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::index_reader::SegmentReader;
use crate::query::ast::Query;
use crate::search::boolean::BooleanWeight;
use crate::search::constant::ConstantWeight;
use crate::search::explanation::Explanation;
use crate::search::filtered::FilteredWeight;
use crate::search::scorer::Scorer;
use crate::search::term::TermWeight;

/// Compiled, per-search form of a [`Query`].
///
/// Normalization protocol: call [`Weight::sum_of_squared_weights`] on the
/// root, turn the result into a query norm, pass that to
/// [`Weight::normalize`] exactly once, and only then ask for scorers or
/// explanations. Breaking the order panics.
pub enum Weight<'q> {
    Term(TermWeight<'q>),
    Boolean(BooleanWeight<'q>),
    Constant(ConstantWeight<'q>),
    Filtered(FilteredWeight<'q>),
}

impl<'q> Weight<'q> {
    /// The query this weight was created from.
    pub fn query(&self) -> &'q Query {
        match self {
            Weight::Term(w) => w.query(),
            Weight::Boolean(w) => w.query(),
            Weight::Constant(w) => w.query(),
            Weight::Filtered(w) => w.query(),
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Weight::Term(w) => w.value(),
            Weight::Boolean(w) => w.value(),
            Weight::Constant(w) => w.value(),
            Weight::Filtered(w) => w.value(),
        }
    }

    /// This weight's contribution to the query norm denominator.
    pub fn sum_of_squared_weights(&mut self) -> f32 {
        match self {
            Weight::Term(w) => w.sum_of_squared_weights(),
            Weight::Boolean(w) => w.sum_of_squared_weights(),
            Weight::Constant(w) => w.sum_of_squared_weights(),
            Weight::Filtered(w) => w.sum_of_squared_weights(),
        }
    }

    /// Applies the global query norm to this weight and its children.
    pub fn normalize(&mut self, norm: f32) {
        match self {
            Weight::Term(w) => w.normalize(norm),
            Weight::Boolean(w) => w.normalize(norm),
            Weight::Constant(w) => w.normalize(norm),
            Weight::Filtered(w) => w.normalize(norm),
        }
    }

    /// Creates a scorer over `reader`'s segment.
    ///
    /// Fails with `UnsupportedOperation` when the segment cannot match
    /// (absent term, unmatched required clause, empty filter).
    /// `score_docs_in_order` asks for ascending delivery; `top_scorer`
    /// marks the outermost scorer, the one driven by a collector.
    pub fn scorer<'a>(
        &self,
        reader: &'a SegmentReader,
        score_docs_in_order: bool,
        top_scorer: bool,
    ) -> Result<Scorer<'a>> {
        match self {
            Weight::Term(w) => w.scorer(reader),
            Weight::Boolean(w) => w.scorer(reader, score_docs_in_order, top_scorer),
            Weight::Constant(w) => w.scorer(reader, score_docs_in_order),
            Weight::Filtered(w) => w.scorer(reader, score_docs_in_order),
        }
    }

    /// Recomputes the score of `doc` (segment-local) as an explanation tree.
    pub fn explain(&self, reader: &SegmentReader, doc: DocId) -> Result<Explanation> {
        if !doc.is_doc() || doc.as_u32() >= reader.max_doc() {
            return Err(Error::invalid_input(format!(
                "doc {} is outside segment with {} documents",
                doc,
                reader.max_doc()
            )));
        }
        match self {
            Weight::Term(w) => w.explain(reader, doc),
            Weight::Boolean(w) => w.explain(reader, doc),
            Weight::Constant(w) => w.explain(reader, doc),
            Weight::Filtered(w) => w.explain(reader, doc),
        }
    }
}

/// Maps the "no scorer for this segment" error to `None`.
pub fn scorer_or_none(result: Result<Scorer<'_>>) -> Result<Option<Scorer<'_>>> {
    match result {
        Ok(scorer) => Ok(Some(scorer)),
        Err(err) if err.is_unsupported() => Ok(None),
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Created,
    Summed,
    Normalized,
}

/// Tracks a weight's progress through the normalization protocol.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NormState {
    stage: Stage,
}

impl NormState {
    pub(crate) fn summed(&mut self) {
        assert!(
            self.stage != Stage::Normalized,
            "sum_of_squared_weights() called after normalize()"
        );
        self.stage = Stage::Summed;
    }

    pub(crate) fn normalized(&mut self) {
        match self.stage {
            Stage::Created => panic!("normalize() called before sum_of_squared_weights()"),
            Stage::Normalized => panic!("normalize() called more than once"),
            Stage::Summed => self.stage = Stage::Normalized,
        }
    }

    pub(crate) fn check_normalized(&self, operation: &str) {
        assert!(
            self.stage == Stage::Normalized,
            "{}() called on a weight that has not been normalized",
            operation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_in_order() {
        let mut state = NormState::default();
        state.summed();
        state.summed();
        state.normalized();
        state.check_normalized("scorer");
    }

    #[test]
    #[should_panic(expected = "normalize() called before sum_of_squared_weights()")]
    fn normalize_before_sum_panics() {
        NormState::default().normalized();
    }

    #[test]
    #[should_panic(expected = "normalize() called more than once")]
    fn double_normalize_panics() {
        let mut state = NormState::default();
        state.summed();
        state.normalized();
        state.normalized();
    }

    #[test]
    #[should_panic(expected = "has not been normalized")]
    fn scorer_before_normalize_panics() {
        let mut state = NormState::default();
        state.summed();
        state.check_normalized("scorer");
    }
}
