//! Shared fixtures for integration tests.

#![allow(dead_code)]

use quarry::core::config::SearchConfig;
use quarry::core::types::DocId;
use quarry::index::index_reader::{IndexReader, SegmentReader};
use quarry::index::inverted::Segment;
use quarry::query::ast::Query;
use quarry::search::iterator::{DocIdSetIterator, NO_MORE_DOCS};
use quarry::search::searcher::IndexSearcher;

pub const FIELD: &str = "f";

/// Segment of `max_doc` documents where doc `d` contains token `t` for
/// every `(t, docs)` pair with `d` in `docs`.
pub fn segment_from_sets(max_doc: u32, sets: &[(&str, &[u32])]) -> Segment {
    let mut builder = Segment::builder();
    for doc in 0..max_doc {
        let text: Vec<&str> = sets
            .iter()
            .filter(|(_, docs)| docs.contains(&doc))
            .map(|(token, _)| *token)
            .collect();
        builder.add_document(&[(FIELD, &text.join(" "))]);
    }
    builder.build()
}

pub fn searcher_over(segments: Vec<Segment>) -> IndexSearcher {
    IndexSearcher::new(IndexReader::from_segments(segments)).expect("searcher")
}

pub fn parallel_searcher_over(segments: Vec<Segment>, workers: usize) -> IndexSearcher {
    IndexSearcher::with_config(
        IndexReader::from_segments(segments),
        SearchConfig::default().parallel(workers),
    )
    .expect("parallel searcher")
}

/// Small multi-field corpus spread over two segments.
pub fn library() -> Vec<Segment> {
    let mut first = Segment::builder();
    first.add_document(&[("title", "rust in action"), ("body", "systems programming with rust and cargo")]);
    first.add_document(&[("title", "programming rust"), ("body", "fast safe systems programming rust rust")]);
    first.add_document(&[("title", "the go programming language"), ("body", "simple concurrent programming")]);
    first.add_document(&[("title", "zero to production"), ("body", "backend development in rust")]);

    let mut second = Segment::builder();
    second.add_document(&[("title", "learning python"), ("body", "dynamic programming language")]);
    second.add_document(&[("title", "rust for rustaceans"), ("body", "idiomatic rust for experienced programmers")]);
    second.add_document(&[("title", "crafting interpreters"), ("body", "building languages in java and c")]);
    second.add_document(&[("title", "hands on rust"), ("body", "game programming in rust")]);
    second.add_document(&[("title", "deleted rust book"), ("body", "rust rust rust")]);
    second.delete_document(DocId::new(4)).expect("delete");

    vec![first.build(), second.build()]
}

pub fn term(text: &str) -> Query {
    Query::term(FIELD, text)
}

/// Runs the normalized weight of `query` over `segment`, returning
/// `(doc, score)` pairs, or nothing when the segment has no scorer.
pub fn scored_docs(searcher: &IndexSearcher, query: &Query, segment: &SegmentReader) -> Vec<(i32, f32)> {
    let weight = searcher.create_normalized_weight(query).expect("weight");
    let mut hits = Vec::new();
    let Ok(mut scorer) = weight.scorer(segment, true, false) else {
        return hits;
    };
    loop {
        let doc = scorer.next_doc();
        if doc == NO_MORE_DOCS {
            return hits;
        }
        hits.push((doc.value(), scorer.score()));
    }
}

pub fn docs(hits: &[(i32, f32)]) -> Vec<i32> {
    hits.iter().map(|(doc, _)| *doc).collect()
}
