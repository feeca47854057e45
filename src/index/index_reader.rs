use std::sync::Arc;
use crate::core::types::DocId;
use crate::index::inverted::{Segment, Term};

/// A segment as seen through an [`IndexReader`]: the segment plus the
/// offset that maps its local doc ids into the reader's global id space.
#[derive(Debug, Clone)]
pub struct SegmentReader {
    segment: Arc<Segment>,
    doc_base: u32,
    ord: usize,
}

impl SegmentReader {
    pub fn new(segment: Arc<Segment>, doc_base: u32, ord: usize) -> Self {
        SegmentReader { segment, doc_base, ord }
    }

    /// Wraps a single segment at doc base 0.
    pub fn standalone(segment: Segment) -> Self {
        SegmentReader::new(Arc::new(segment), 0, 0)
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn doc_base(&self) -> u32 {
        self.doc_base
    }

    /// Position of the segment in its reader.
    pub fn ord(&self) -> usize {
        self.ord
    }

    pub fn max_doc(&self) -> u32 {
        self.segment.max_doc()
    }

    pub fn to_global(&self, doc: DocId) -> DocId {
        DocId::new(self.doc_base + doc.as_u32())
    }
}

/// Point-in-time view over a list of immutable segments.
#[derive(Debug, Clone, Default)]
pub struct IndexReader {
    segments: Vec<SegmentReader>,
    max_doc: u32,
}

impl IndexReader {
    pub fn new(segments: Vec<Arc<Segment>>) -> Self {
        let mut doc_base = 0u32;
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(ord, segment)| {
                let max_doc = segment.max_doc();
                let reader = SegmentReader::new(segment, doc_base, ord);
                doc_base += max_doc;
                reader
            })
            .collect();

        IndexReader {
            segments,
            max_doc: doc_base,
        }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        IndexReader::new(segments.into_iter().map(Arc::new).collect())
    }

    pub fn segments(&self) -> &[SegmentReader] {
        &self.segments
    }

    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    pub fn num_docs(&self) -> u32 {
        self.segments.iter().map(|s| s.segment().num_docs()).sum()
    }

    /// Number of documents containing `term`, summed over segments.
    pub fn doc_freq(&self, term: &Term) -> u32 {
        self.segments.iter().map(|s| s.segment().doc_freq(term)).sum()
    }

    /// Resolves a global doc id to its segment and segment-local id.
    pub fn segment_for_doc(&self, doc: DocId) -> Option<(&SegmentReader, DocId)> {
        if !doc.is_doc() || doc.as_u32() >= self.max_doc {
            return None;
        }
        let global = doc.as_u32();
        let idx = self.segments.partition_point(|s| s.doc_base() <= global) - 1;
        let reader = &self.segments[idx];
        Some((reader, DocId::new(global - reader.doc_base())))
    }
}
