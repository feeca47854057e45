use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Score};
use crate::index::index_reader::SegmentReader;
use crate::query::ast::{ConstantScoreQuery, ConstantScoreSource, Query};
use crate::query::filter::FilterWeight;
use crate::search::explanation::Explanation;
use crate::search::iterator::{AllDocsIterator, DocIdSetIterator};
use crate::search::scorer::Scorer;
use crate::search::searcher::IndexSearcher;
use crate::search::weight::{NormState, Weight};

/// Where a constant-score weight gets its documents from.
pub enum ConstantSource<'q> {
    Filter(FilterWeight<'q>),
    Query(Box<Weight<'q>>),
    AllDocs,
}

/// Weight for queries whose every match scores `boost * query_norm`.
pub struct ConstantWeight<'q> {
    query: &'q Query,
    label: String,
    source: ConstantSource<'q>,
    boost: f32,
    query_norm: f32,
    query_weight: f32,
    state: NormState,
}

impl<'q> ConstantWeight<'q> {
    pub fn for_constant_score(
        query: &'q Query,
        constant: &'q ConstantScoreQuery,
        searcher: &IndexSearcher,
    ) -> Result<Self> {
        let (source, label) = match &constant.source {
            ConstantScoreSource::Filter(filter) => (
                ConstantSource::Filter(FilterWeight::new(filter, searcher)?),
                format!("ConstantScoreQuery({})", filter),
            ),
            ConstantScoreSource::Query(inner) => (
                ConstantSource::Query(Box::new(inner.create_weight(searcher)?)),
                format!("ConstantScoreQuery({})", inner),
            ),
        };
        Ok(Self::with_source(query, label, source, constant.boost()))
    }

    pub fn for_match_all(query: &'q Query, _searcher: &IndexSearcher) -> Self {
        Self::with_source(query, "MatchAllDocsQuery".to_string(), ConstantSource::AllDocs, query.boost())
    }

    fn with_source(query: &'q Query, label: String, source: ConstantSource<'q>, boost: f32) -> Self {
        ConstantWeight {
            query,
            label,
            source,
            boost,
            query_norm: 1.0,
            query_weight: 0.0,
            state: NormState::default(),
        }
    }

    pub fn query(&self) -> &'q Query {
        self.query
    }

    pub fn value(&self) -> f32 {
        self.query_weight
    }

    pub fn sum_of_squared_weights(&mut self) -> f32 {
        self.state.summed();
        // The wrapped query still walks the protocol; its scores are ignored
        if let ConstantSource::Query(inner) = &mut self.source {
            inner.sum_of_squared_weights();
        }
        self.query_weight = self.boost;
        self.query_weight * self.query_weight
    }

    pub fn normalize(&mut self, norm: f32) {
        self.state.normalized();
        self.query_norm = norm;
        self.query_weight *= norm;
        if let ConstantSource::Query(inner) = &mut self.source {
            inner.normalize(1.0);
        }
    }

    pub fn scorer<'a>(&self, reader: &'a SegmentReader, score_docs_in_order: bool) -> Result<Scorer<'a>> {
        self.state.check_normalized("scorer");
        let segment = reader.segment();

        let iterator: Box<dyn DocIdSetIterator + 'a> = match &self.source {
            ConstantSource::Filter(filter) => filter
                .iterator(reader)?
                .ok_or_else(|| Error::unsupported(format!("{} matches nothing in segment {}", self.query, reader.ord())))?,
            ConstantSource::Query(inner) => Box::new(inner.scorer(reader, score_docs_in_order, false)?),
            ConstantSource::AllDocs => {
                if segment.num_docs() == 0 {
                    return Err(Error::unsupported(format!("segment {} has no live documents", reader.ord())));
                }
                Box::new(AllDocsIterator::new(segment.max_doc(), segment.deleted()))
            }
        };

        Ok(Scorer::Constant(ConstantScorer::new(iterator, self.query_weight)))
    }

    pub fn explain(&self, reader: &SegmentReader, doc: DocId) -> Result<Explanation> {
        self.state.check_normalized("explain");

        let matched = match &self.source {
            ConstantSource::Filter(filter) => filter.matches(reader, doc)?,
            ConstantSource::Query(inner) => inner.explain(reader, doc)?.is_match(),
            ConstantSource::AllDocs => !reader.segment().is_deleted(doc),
        };

        if !matched {
            return Ok(Explanation::no_match(format!("{} doesn't match id {}", self.query, doc)));
        }

        let mut result = Explanation::with_match(true, self.query_weight, format!("{}, product of:", self.label));
        result.add_detail(Explanation::new(self.boost, "boost"));
        result.add_detail(Explanation::new(self.query_norm, "queryNorm"));
        Ok(result)
    }
}

/// Scores every document of its iterator with the same value.
#[derive(Debug)]
pub struct ConstantScorer<'a> {
    iterator: Box<dyn DocIdSetIterator + 'a>,
    score: Score,
}

impl<'a> ConstantScorer<'a> {
    pub fn new(iterator: Box<dyn DocIdSetIterator + 'a>, score: Score) -> Self {
        ConstantScorer { iterator, score }
    }

    pub fn score(&mut self) -> Score {
        self.score
    }
}

impl DocIdSetIterator for ConstantScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.iterator.doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        self.iterator.next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        self.iterator.advance(target)
    }

    fn cost(&self) -> u64 {
        self.iterator.cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::iterator::{SortedDocIdSetIterator, NO_MORE_DOCS};
    use crate::search::iterator::tests::collect_docs;

    #[test]
    fn constant_scorer_follows_iterator() {
        let mut scorer = ConstantScorer::new(Box::new(SortedDocIdSetIterator::from_ids(&[2, 4, 6])), 0.75);
        assert_eq!(scorer.doc_id(), DocId::UNPOSITIONED);
        assert_eq!(scorer.advance(DocId::new(3)), DocId::new(4));
        assert_eq!(scorer.score(), 0.75);
        assert_eq!(collect_docs(&mut scorer), vec![6]);
        assert_eq!(scorer.advance(NO_MORE_DOCS), NO_MORE_DOCS);
    }
}
