use std::sync::Arc;
use log::{debug, trace, warn};
use crate::core::config::SearchConfig;
use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::index_reader::IndexReader;
use crate::index::inverted::Term;
use crate::parallel::executor::SegmentExecutor;
use crate::query::ast::Query;
use crate::query::validator::{QueryValidator, ValidationConfig};
use crate::scoring::similarity::{normalization_factor, DefaultSimilarity, Similarity};
use crate::search::collector::{Collector, CountCollector, TopDocs, TopKCollector};
use crate::search::explanation::Explanation;
use crate::search::weight::{scorer_or_none, Weight};

/// Executes queries against an [`IndexReader`].
///
/// Each search compiles the query into a normalized [`Weight`], then walks
/// every segment's scorer, inline or on the configured rayon pool.
pub struct IndexSearcher {
    reader: IndexReader,
    similarity: Arc<dyn Similarity>,
    config: SearchConfig,
    validator: QueryValidator,
    executor: SegmentExecutor,
}

impl IndexSearcher {
    pub fn new(reader: IndexReader) -> Result<Self> {
        Self::with_config(reader, SearchConfig::default())
    }

    pub fn with_config(reader: IndexReader, config: SearchConfig) -> Result<Self> {
        Ok(IndexSearcher {
            reader,
            similarity: Arc::new(DefaultSimilarity),
            validator: QueryValidator::new(ValidationConfig::from(&config)),
            executor: SegmentExecutor::new(&config)?,
            config,
        })
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn Similarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn executor(&self) -> &SegmentExecutor {
        &self.executor
    }

    pub fn similarity(&self) -> Arc<dyn Similarity> {
        self.similarity.clone()
    }

    pub fn max_doc(&self) -> u32 {
        self.reader.max_doc()
    }

    pub fn doc_freq(&self, term: &Term) -> u32 {
        self.reader.doc_freq(term)
    }

    /// Validates `query`, builds its weight tree and runs normalization.
    pub fn create_normalized_weight<'q>(&self, query: &'q Query) -> Result<Weight<'q>> {
        if let Err(err) = self.validator.validate(query) {
            warn!("rejected query {}: {}", query, err);
            return Err(err);
        }

        let mut weight = query.create_weight(self)?;
        let sum = weight.sum_of_squared_weights();
        let norm = normalization_factor(self.similarity.as_ref(), sum);
        weight.normalize(norm);
        debug!("weight for {}: sum_of_squared_weights={}, query_norm={}", query, sum, norm);
        Ok(weight)
    }

    /// Top `k` hits by score, ties broken by lower doc id.
    pub fn search(&self, query: &Query, k: usize) -> Result<TopDocs> {
        if k == 0 {
            return Err(Error::invalid_input("top-k search needs k > 0"));
        }
        // No segment can return more hits than the reader holds
        let k = k.min(self.reader.max_doc().max(1) as usize);
        let weight = self.create_normalized_weight(query)?;

        let shards = self.executor.map_segments(self.reader.segments(), |segment| {
            let mut collector = TopKCollector::new(k);
            collector.set_segment(segment);
            match scorer_or_none(weight.scorer(segment, self.config.score_docs_in_order, true))? {
                Some(mut scorer) => scorer.score_into(&mut collector),
                None => trace!("segment {} has no scorer for {}", segment.ord(), query),
            }
            Ok(collector.into_top_docs())
        })?;

        let top = TopDocs::merge(k, shards);
        debug!("{} matched {} docs", query, top.total_hits);
        Ok(top)
    }

    /// Number of matching live documents.
    pub fn count(&self, query: &Query) -> Result<usize> {
        let weight = self.create_normalized_weight(query)?;
        let counts = self.executor.map_segments(self.reader.segments(), |segment| {
            let mut collector = CountCollector::new();
            collector.set_segment(segment);
            if let Some(mut scorer) = scorer_or_none(weight.scorer(segment, false, true))? {
                scorer.score_into(&mut collector);
            }
            Ok(collector.count())
        })?;
        Ok(counts.into_iter().sum())
    }

    /// Feeds every match to `collector`, segment by segment in order.
    pub fn search_with_collector(&self, query: &Query, collector: &mut dyn Collector) -> Result<()> {
        let weight = self.create_normalized_weight(query)?;
        let in_order = self.config.score_docs_in_order && !collector.accepts_docs_out_of_order();

        for segment in self.reader.segments() {
            collector.set_segment(segment);
            match scorer_or_none(weight.scorer(segment, in_order, true))? {
                Some(mut scorer) => scorer.score_into(collector),
                None => trace!("segment {} has no scorer for {}", segment.ord(), query),
            }
        }
        Ok(())
    }

    /// Explains the score of reader-global `doc` for `query`.
    pub fn explain(&self, query: &Query, doc: DocId) -> Result<Explanation> {
        let (segment, local) = self.reader.segment_for_doc(doc).ok_or_else(|| {
            Error::invalid_input(format!("doc {} is not in an index of {} documents", doc, self.reader.max_doc()))
        })?;
        let weight = self.create_normalized_weight(query)?;
        weight.explain(segment, local)
    }
}
