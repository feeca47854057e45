mod common;

use common::{library, parallel_searcher_over, scored_docs, searcher_over};
use quarry::core::config::SearchConfig;
use quarry::core::error::{ErrorKind, Result};
use quarry::core::types::{DocId, Score};
use quarry::index::index_reader::{IndexReader, SegmentReader};
use quarry::query::ast::{BooleanQuery, ConstantScoreSource, Query};
use quarry::query::filter::Filter;
use quarry::search::collector::Collector;
use quarry::search::explanation::Explanation;
use quarry::search::searcher::IndexSearcher;

fn rust_books() -> Query {
    BooleanQuery::new()
        .with_must(Query::term("body", "rust"))
        .with_should(Query::term("title", "rust").with_boost(2.0))
        .with_should(Query::term("body", "programming"))
        .with_must_not(Query::term("title", "go"))
        .build()
}

fn mixed() -> Query {
    BooleanQuery::new()
        .with_should(Query::filtered(
            Query::term("body", "programming"),
            Filter::query(Query::term("title", "rust")),
        ).with_boost(3.0))
        .with_should(Query::constant_score(ConstantScoreSource::Query(Box::new(Query::term("body", "systems")))).with_boost(0.5))
        .with_should(
            BooleanQuery::new()
                .with_should(Query::term("body", "language"))
                .with_should(Query::term("body", "languages"))
                .without_coord()
                .build(),
        )
        .with_must_not(Query::term("title", "python"))
        .build()
}

fn assert_explains_scores(searcher: &IndexSearcher, query: &Query) -> Result<()> {
    let weight = searcher.create_normalized_weight(query)?;
    for segment in searcher.reader().segments() {
        let hits = scored_docs(searcher, query, segment);
        for doc in 0..segment.max_doc() {
            let expl = weight.explain(segment, DocId::new(doc))?;
            match hits.iter().find(|(d, _)| *d == doc as i32) {
                Some((_, score)) => {
                    assert!(expl.is_match(), "{} should match doc {}:\n{}", query, doc, expl);
                    let tolerance = 1e-6 * score.abs().max(1.0);
                    assert!(
                        (expl.value() - score).abs() <= tolerance,
                        "{} doc {}: explain {} vs score {}\n{}",
                        query,
                        doc,
                        expl.value(),
                        score,
                        expl
                    );
                }
                None => assert!(!expl.is_match(), "{} should not match doc {}:\n{}", query, doc, expl),
            }
        }
    }
    Ok(())
}

#[test]
fn explanations_reproduce_scores() -> Result<()> {
    let searcher = searcher_over(library());
    assert_explains_scores(&searcher, &rust_books())?;
    assert_explains_scores(&searcher, &mixed())?;
    assert_explains_scores(&searcher, &Query::term("body", "rust").with_boost(4.0))?;
    assert_explains_scores(&searcher, &Query::match_all())?;
    Ok(())
}

#[test]
fn search_ranks_and_skips_deleted() -> Result<()> {
    let searcher = searcher_over(library());
    assert_eq!(searcher.reader().max_doc(), 9);
    assert_eq!(searcher.reader().num_docs(), 8);

    let top = searcher.search(&rust_books(), 10)?;
    let ids: Vec<i32> = top.score_docs.iter().map(|d| d.doc.value()).collect();
    // Doc 8 ("rust rust rust") is deleted, doc 2 is about go
    assert_eq!(top.total_hits, 5);
    assert!(!ids.contains(&8));
    assert_eq!(ids.len(), 5);
    for doc in [0, 1, 3, 5, 7] {
        assert!(ids.contains(&doc), "missing doc {}", doc);
    }
    assert!(top.score_docs.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(top.max_score, top.score_docs[0].score);

    let top2 = searcher.search(&rust_books(), 2)?;
    assert_eq!(top2.total_hits, 5);
    assert_eq!(top2.score_docs[..], top.score_docs[..2]);
    Ok(())
}

#[test]
fn explain_by_global_doc_matches_search() -> Result<()> {
    let searcher = searcher_over(library());
    let query = rust_books();
    for hit in searcher.search(&query, 10)?.score_docs {
        let expl = searcher.explain(&query, hit.doc)?;
        assert!((expl.value() - hit.score).abs() <= 1e-6 * hit.score.max(1.0));
    }
    let expl = searcher.explain(&query, DocId::new(8))?;
    assert!(!expl.is_match());
    assert_eq!(searcher.explain(&query, DocId::new(9)).unwrap_err().kind, ErrorKind::InvalidInput);
    Ok(())
}

#[test]
fn parallel_search_matches_sequential() -> Result<()> {
    let sequential = searcher_over(library());
    let parallel = parallel_searcher_over(library(), 4);
    assert!(parallel.executor().is_parallel());

    for query in [rust_books(), mixed(), Query::match_all()] {
        let a = sequential.search(&query, 4)?;
        let b = parallel.search(&query, 4)?;
        assert_eq!(a.total_hits, b.total_hits);
        assert_eq!(a.score_docs.len(), b.score_docs.len());
        for (x, y) in a.score_docs.iter().zip(&b.score_docs) {
            assert_eq!(x.doc, y.doc);
            assert_eq!(x.score, y.score);
        }
        assert_eq!(sequential.count(&query)?, parallel.count(&query)?);
    }
    Ok(())
}

#[test]
fn custom_collector_sees_every_segment() -> Result<()> {
    #[derive(Default)]
    struct Everything {
        base: u32,
        hits: Vec<(u32, Score)>,
        segments: usize,
    }

    impl Collector for Everything {
        fn set_segment(&mut self, reader: &SegmentReader) {
            self.base = reader.doc_base();
            self.segments += 1;
        }

        fn collect(&mut self, doc: DocId, score: Score) {
            self.hits.push((self.base + doc.as_u32(), score));
        }
    }

    let searcher = searcher_over(library());
    let mut collector = Everything::default();
    searcher.search_with_collector(&Query::term("body", "rust"), &mut collector)?;
    assert_eq!(collector.segments, 2);
    let docs: Vec<u32> = collector.hits.iter().map(|(d, _)| *d).collect();
    assert_eq!(docs, vec![0, 1, 3, 5, 7]);
    assert!(collector.hits.iter().all(|(_, s)| *s > 0.0));
    Ok(())
}

#[test]
fn cached_filter_is_shared_across_searches() -> Result<()> {
    let searcher = searcher_over(library());
    let filter = Filter::query(Query::term("title", "rust")).cached(16)?;
    let query = Query::filtered(Query::term("body", "programming"), filter.clone());

    let first = searcher.search(&query, 10)?;
    let second = searcher.search(&query, 10)?;
    assert_eq!(first, second);
    // title:rust docs 0, 1, 5, 7, 8 (deleted); body:programming among them: 0, 1, 7
    let mut ids: Vec<i32> = first.score_docs.iter().map(|d| d.doc.value()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 7]);

    let Filter::Cached(cached) = &filter else {
        panic!("expected a caching filter");
    };
    let stats = cached.stats();
    assert_eq!(stats.miss_count, 2);
    assert_eq!(stats.hit_count, 2);
    Ok(())
}

#[test]
fn validation_rejects_oversized_queries() {
    let config = SearchConfig {
        max_clause_count: 3,
        max_query_depth: 2,
        ..SearchConfig::default()
    };
    let searcher = IndexSearcher::with_config(IndexReader::from_segments(library()), config).unwrap();

    let wide = (0..4)
        .fold(BooleanQuery::new(), |q, i| q.with_should(Query::term("body", &format!("t{}", i))))
        .build();
    assert_eq!(searcher.search(&wide, 3).unwrap_err().kind, ErrorKind::TooManyClauses);

    let deep = BooleanQuery::new()
        .with_must(BooleanQuery::new().with_must(BooleanQuery::new().with_must(Query::term("body", "rust")).build()).build())
        .build();
    assert_eq!(searcher.count(&deep).unwrap_err().kind, ErrorKind::InvalidInput);
}

#[test]
fn explanation_serializes_to_json() -> Result<()> {
    let searcher = searcher_over(library());
    let expl = searcher.explain(&rust_books(), DocId::new(1))?;
    let json = expl.to_json()?;
    let parsed: Explanation = serde_json::from_str(&json)?;
    assert_eq!(parsed, expl);
    assert!(json.contains("\"description\""));
    assert!(expl.to_string().lines().count() > 3);
    Ok(())
}

#[test]
fn queries_display_in_lucene_syntax() {
    assert_eq!(rust_books().to_string(), "+body:rust title:rust^2.0 body:programming -title:go");
}
