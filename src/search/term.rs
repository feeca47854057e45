use std::sync::Arc;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Score};
use crate::index::index_reader::SegmentReader;
use crate::query::ast::{Query, TermQuery};
use crate::scoring::similarity::Similarity;
use crate::search::explanation::Explanation;
use crate::search::iterator::DocIdSetIterator;
use crate::search::postings::PostingsCursor;
use crate::search::scorer::Scorer;
use crate::search::searcher::IndexSearcher;
use crate::search::weight::NormState;

/// Frequencies below this get their `tf * weight` product precomputed.
const SCORE_CACHE_SIZE: usize = 32;

pub struct TermWeight<'q> {
    query: &'q Query,
    term_query: &'q TermQuery,
    similarity: Arc<dyn Similarity>,
    idf_explanation: Explanation,
    idf: f32,
    doc_freq: u32,
    max_doc: u32,
    query_norm: f32,
    query_weight: f32,
    value: f32,
    state: NormState,
}

impl<'q> TermWeight<'q> {
    pub fn new(query: &'q Query, term_query: &'q TermQuery, searcher: &IndexSearcher) -> Self {
        let similarity = searcher.similarity();
        let doc_freq = searcher.doc_freq(&term_query.term);
        let max_doc = searcher.max_doc();
        let idf_explanation = similarity.idf_explain(doc_freq, max_doc);

        TermWeight {
            query,
            term_query,
            idf: idf_explanation.value(),
            idf_explanation,
            similarity,
            doc_freq,
            max_doc,
            query_norm: 1.0,
            query_weight: 0.0,
            value: 0.0,
            state: NormState::default(),
        }
    }

    pub fn query(&self) -> &'q Query {
        self.query
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn sum_of_squared_weights(&mut self) -> f32 {
        self.state.summed();
        self.query_weight = self.idf * self.term_query.boost();
        self.query_weight * self.query_weight
    }

    pub fn normalize(&mut self, norm: f32) {
        self.state.normalized();
        self.query_norm = norm;
        self.query_weight *= norm;
        self.value = self.query_weight * self.idf;
    }

    pub fn scorer<'a>(&self, reader: &'a SegmentReader) -> Result<Scorer<'a>> {
        self.state.check_normalized("scorer");
        let segment = reader.segment();
        let term = &self.term_query.term;

        let postings = segment
            .postings(term)
            .filter(|list| !list.is_empty())
            .ok_or_else(|| Error::unsupported(format!("no postings for {} in segment {}", term, reader.ord())))?;

        Ok(Scorer::Term(TermScorer::new(
            PostingsCursor::new(postings, segment.deleted()),
            self.value,
            segment.norms(&term.field),
            self.similarity.clone(),
        )))
    }

    pub fn explain(&self, reader: &SegmentReader, doc: DocId) -> Result<Explanation> {
        self.state.check_normalized("explain");
        let segment = reader.segment();
        let term = &self.term_query.term;
        let boost = self.term_query.boost();

        let freq = match segment.postings(term) {
            Some(list) if !segment.is_deleted(doc) => list.find(doc).map(|p| p.term_freq).unwrap_or(0),
            _ => 0,
        };

        let mut query_expl = Explanation::new(
            self.query_weight,
            format!("queryWeight({}), product of:", self.query),
        );
        if boost != 1.0 {
            query_expl.add_detail(Explanation::new(boost, "boost"));
        }
        query_expl.add_detail(self.idf_explanation.clone());
        query_expl.add_detail(Explanation::new(self.query_norm, "queryNorm"));

        let tf = self.similarity.tf(freq as f32);
        let field_norm = segment
            .norms(&term.field)
            .and_then(|norms| norms.get(doc.as_usize()).copied())
            .unwrap_or(1.0);

        let mut field_expl = Explanation::with_match(
            freq > 0,
            tf * self.idf * field_norm,
            format!("fieldWeight({} in {}), product of:", term, doc),
        );
        field_expl.add_detail(Explanation::new(tf, format!("tf(termFreq({})={})", term, freq)));
        field_expl.add_detail(self.idf_explanation.clone());
        field_expl.add_detail(Explanation::new(
            field_norm,
            format!("fieldNorm(field={}, doc={})", term.field, doc),
        ));

        if self.query_weight == 1.0 {
            return Ok(field_expl);
        }

        // Same operation order as TermScorer::score
        let mut result = Explanation::with_match(
            freq > 0,
            tf * self.value * field_norm,
            format!("weight({} in {}), product of:", self.query, doc),
        );
        result.add_detail(query_expl);
        result.add_detail(field_expl);
        Ok(result)
    }

    pub fn doc_freq(&self) -> u32 {
        self.doc_freq
    }

    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }
}

/// Scores one term's postings: `tf(freq) * weight * norm(doc)`.
#[derive(Debug)]
pub struct TermScorer<'a> {
    cursor: PostingsCursor<'a>,
    weight_value: f32,
    norms: Option<&'a [f32]>,
    similarity: Arc<dyn Similarity>,
    score_cache: [f32; SCORE_CACHE_SIZE],
}

impl<'a> TermScorer<'a> {
    pub fn new(
        cursor: PostingsCursor<'a>,
        weight_value: f32,
        norms: Option<&'a [f32]>,
        similarity: Arc<dyn Similarity>,
    ) -> Self {
        let mut score_cache = [0.0; SCORE_CACHE_SIZE];
        for (freq, slot) in score_cache.iter_mut().enumerate() {
            *slot = similarity.tf(freq as f32) * weight_value;
        }
        TermScorer {
            cursor,
            weight_value,
            norms,
            similarity,
            score_cache,
        }
    }

    pub fn freq(&self) -> u32 {
        self.cursor.freq()
    }

    pub fn score(&mut self) -> Score {
        let freq = self.cursor.freq() as usize;
        let raw = if freq < SCORE_CACHE_SIZE {
            self.score_cache[freq]
        } else {
            self.similarity.tf(freq as f32) * self.weight_value
        };
        match self.norms {
            Some(norms) => raw * norms[self.cursor.doc_id().as_usize()],
            None => raw,
        }
    }
}

impl DocIdSetIterator for TermScorer<'_> {
    fn doc_id(&self) -> DocId {
        self.cursor.doc_id()
    }

    fn next_doc(&mut self) -> DocId {
        self.cursor.next_doc()
    }

    fn advance(&mut self, target: DocId) -> DocId {
        self.cursor.advance(target)
    }

    fn cost(&self) -> u64 {
        self.cursor.cost()
    }
}
