use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Score};
use crate::index::index_reader::SegmentReader;
use crate::query::ast::{FilteredQuery, Query};
use crate::query::filter::FilterWeight;
use crate::search::explanation::Explanation;
use crate::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use crate::search::scorer::Scorer;
use crate::search::searcher::IndexSearcher;
use crate::search::weight::{NormState, Weight};

pub struct FilteredWeight<'q> {
    query: &'q Query,
    filtered: &'q FilteredQuery,
    inner: Box<Weight<'q>>,
    filter: FilterWeight<'q>,
    value: f32,
    state: NormState,
}

impl<'q> FilteredWeight<'q> {
    pub fn new(query: &'q Query, filtered: &'q FilteredQuery, searcher: &IndexSearcher) -> Result<Self> {
        Ok(FilteredWeight {
            query,
            filtered,
            inner: Box::new(filtered.query.create_weight(searcher)?),
            filter: FilterWeight::new(&filtered.filter, searcher)?,
            value: 0.0,
            state: NormState::default(),
        })
    }

    pub fn query(&self) -> &'q Query {
        self.query
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn sum_of_squared_weights(&mut self) -> f32 {
        self.state.summed();
        let boost = self.filtered.boost();
        self.inner.sum_of_squared_weights() * boost * boost
    }

    pub fn normalize(&mut self, norm: f32) {
        self.state.normalized();
        self.inner.normalize(norm);
        self.value = self.inner.value() * self.filtered.boost();
    }

    pub fn scorer<'a>(&self, reader: &'a SegmentReader, score_docs_in_order: bool) -> Result<Scorer<'a>> {
        self.state.check_normalized("scorer");
        let filter = self
            .filter
            .iterator(reader)?
            .ok_or_else(|| Error::unsupported(format!("filter {} is empty in segment {}", self.filtered.filter, reader.ord())))?;
        let inner = self.inner.scorer(reader, score_docs_in_order, false)?;
        Ok(Scorer::Filtered(FilteredScorer::new(inner, filter, self.filtered.boost())))
    }

    pub fn explain(&self, reader: &SegmentReader, doc: DocId) -> Result<Explanation> {
        self.state.check_normalized("explain");
        let inner = self.inner.explain(reader, doc)?;

        if !self.filter.matches(reader, doc)? {
            let mut result = Explanation::with_match(
                false,
                0.0,
                format!("failure to match filter: {}", self.filtered.filter),
            );
            result.add_detail(inner);
            return Ok(result);
        }

        let boost = self.filtered.boost();
        if boost == 1.0 {
            return Ok(inner);
        }
        // Same product order as FilteredScorer::score
        let mut result = Explanation::with_match(inner.is_match(), boost * inner.value(), "product of:");
        result.add_detail(Explanation::new(boost, "boost"));
        result.add_detail(inner);
        Ok(result)
    }
}

/// Intersection of a scorer with an unscored filter iterator.
#[derive(Debug)]
pub struct FilteredScorer<'a> {
    inner: Box<Scorer<'a>>,
    filter: Box<dyn DocIdSetIterator + 'a>,
    boost: f32,
    doc: DocId,
}

impl<'a> FilteredScorer<'a> {
    pub fn new(inner: Scorer<'a>, filter: Box<dyn DocIdSetIterator + 'a>, boost: f32) -> Self {
        FilteredScorer {
            inner: Box::new(inner),
            filter,
            boost,
            doc: DocId::UNPOSITIONED,
        }
    }

    pub fn score(&mut self) -> Score {
        self.boost * self.inner.score()
    }

    /// Leapfrogs both cursors from `doc` (the inner position) to agreement.
    fn align(&mut self, mut doc: DocId) -> DocId {
        loop {
            if doc == NO_MORE_DOCS {
                break;
            }
            let filter_doc = self.filter.advance(doc);
            if filter_doc == doc {
                break;
            }
            doc = self.inner.advance(filter_doc);
            if doc == filter_doc {
                break;
            }
        }
        self.doc = doc;
        doc
    }
}

impl DocIdSetIterator for FilteredScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        let doc = self.inner.next_doc();
        self.align(doc)
    }

    fn advance(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        let doc = self.inner.advance(target);
        self.align(doc)
    }

    fn cost(&self) -> u64 {
        self.inner.cost().min(self.filter.cost())
    }
}
