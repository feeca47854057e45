use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;
use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::posting::{Posting, PostingList};
use crate::scoring::similarity::{DefaultSimilarity, Similarity};

/// Term representation: a field name and the indexed token text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    pub field: String,
    pub text: String,
}

impl Term {
    pub fn new(field: &str, text: &str) -> Self {
        Term {
            field: field.to_string(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.text)
    }
}

/// Unique segment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    pub fn new() -> Self {
        SegmentId(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable in-memory index segment.
///
/// Holds what the query kernel consumes from storage: per-term postings,
/// per-field length norms and the deleted-document set.
#[derive(Debug)]
pub struct Segment {
    id: SegmentId,
    postings: HashMap<Term, PostingList>,
    norms: HashMap<String, Vec<f32>>,
    max_doc: u32,
    deleted: RoaringBitmap,
}

impl Segment {
    pub fn builder() -> SegmentBuilder {
        SegmentBuilder::new()
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// One greater than the largest doc id in the segment.
    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    /// Live documents.
    pub fn num_docs(&self) -> u32 {
        self.max_doc - self.deleted.len() as u32
    }

    pub fn postings(&self, term: &Term) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn doc_freq(&self, term: &Term) -> u32 {
        self.postings.get(term).map(|list| list.doc_freq()).unwrap_or(0)
    }

    /// Length norms for a field, indexed by doc id.
    pub fn norms(&self, field: &str) -> Option<&[f32]> {
        self.norms.get(field).map(|n| n.as_slice())
    }

    pub fn deleted(&self) -> &RoaringBitmap {
        &self.deleted
    }

    pub fn is_deleted(&self, doc: DocId) -> bool {
        doc.is_doc() && self.deleted.contains(doc.as_u32())
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.postings.keys()
    }
}

/// Accumulates pre-analyzed documents into a [`Segment`].
///
/// Field text is split on whitespace only; analysis happens upstream.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    postings: HashMap<Term, Vec<Posting>>,
    field_lengths: HashMap<String, HashMap<u32, u32>>,
    max_doc: u32,
    deleted: RoaringBitmap,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        SegmentBuilder::default()
    }

    /// Adds one document and returns its segment-local id.
    pub fn add_document(&mut self, fields: &[(&str, &str)]) -> DocId {
        let doc_id = DocId::new(self.max_doc);

        for (field, text) in fields {
            let mut term_positions: HashMap<&str, Vec<u32>> = HashMap::new();
            let mut length = 0u32;

            // Group tokens by term
            for (position, token) in text.split_whitespace().enumerate() {
                term_positions.entry(token).or_default().push(position as u32);
                length += 1;
            }

            *self.field_lengths
                .entry(field.to_string())
                .or_default()
                .entry(doc_id.as_u32())
                .or_insert(0) += length;

            for (token, positions) in term_positions {
                let postings = self.postings.entry(Term::new(field, token)).or_default();
                match postings.last_mut() {
                    // Same field listed twice for one document
                    Some(last) if last.doc_id == doc_id => {
                        last.term_freq += positions.len() as u32;
                        last.positions.extend(positions);
                    }
                    _ => postings.push(Posting {
                        doc_id,
                        term_freq: positions.len() as u32,
                        positions,
                    }),
                }
            }
        }

        self.max_doc += 1;
        doc_id
    }

    pub fn delete_document(&mut self, doc: DocId) -> Result<()> {
        if !doc.is_doc() || doc.as_u32() >= self.max_doc {
            return Err(Error::invalid_input(format!(
                "cannot delete doc {}: segment has {} documents",
                doc, self.max_doc
            )));
        }
        self.deleted.insert(doc.as_u32());
        Ok(())
    }

    pub fn build(self) -> Segment {
        self.build_with(&DefaultSimilarity)
    }

    /// Freezes the segment, computing length norms with `similarity`.
    pub fn build_with(self, similarity: &dyn Similarity) -> Segment {
        let max_doc = self.max_doc;

        let norms = self.field_lengths
            .into_iter()
            .map(|(field, lengths)| {
                let mut norms = vec![1.0f32; max_doc as usize];
                for (doc, length) in lengths {
                    norms[doc as usize] = similarity.length_norm(&field, length);
                }
                (field, norms)
            })
            .collect();

        let postings = self.postings
            .into_iter()
            .map(|(term, postings)| (term, PostingList::from_postings(postings)))
            .collect();

        Segment {
            id: SegmentId::new(),
            postings,
            norms,
            max_doc,
            deleted: self.deleted,
        }
    }
}
