use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quarry::core::config::SearchConfig;
use quarry::index::index_reader::IndexReader;
use quarry::index::inverted::Segment;
use quarry::query::ast::{BooleanQuery, Query};
use quarry::query::filter::Filter;
use quarry::search::searcher::IndexSearcher;
use rand::Rng;

const WORDS: [&str; 12] = [
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "rust", "search", "index", "score",
];

/// Helper to create a segment of random documents
fn create_segment(docs: usize, words_per_doc: usize) -> Segment {
    let mut rng = rand::thread_rng();
    let mut builder = Segment::builder();
    for _ in 0..docs {
        let body: String = (0..words_per_doc)
            .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ");
        builder.add_document(&[("body", &body)]);
    }
    builder.build()
}

fn create_searcher(segments: usize, docs_per_segment: usize, config: SearchConfig) -> IndexSearcher {
    let segments = (0..segments).map(|_| create_segment(docs_per_segment, 20)).collect();
    IndexSearcher::with_config(IndexReader::from_segments(segments), config).unwrap()
}

fn bench_term_query(c: &mut Criterion) {
    let searcher = create_searcher(4, 5_000, SearchConfig::default());
    let query = Query::term("body", "rust");

    c.bench_function("term_query_top10", |b| {
        b.iter(|| searcher.search(black_box(&query), 10).unwrap());
    });
}

fn bench_boolean_queries(c: &mut Criterion) {
    let searcher = create_searcher(4, 5_000, SearchConfig::default());
    let mut group = c.benchmark_group("boolean");

    let conjunction = BooleanQuery::new()
        .with_must(Query::term("body", "rust"))
        .with_must(Query::term("body", "search"))
        .with_must(Query::term("body", "index"))
        .build();
    let disjunction = BooleanQuery::new()
        .with_should(Query::term("body", "quick"))
        .with_should(Query::term("body", "brown"))
        .with_should(Query::term("body", "fox"))
        .build();
    let min_match = BooleanQuery::new()
        .with_should(Query::term("body", "quick"))
        .with_should(Query::term("body", "brown"))
        .with_should(Query::term("body", "fox"))
        .with_should(Query::term("body", "lazy"))
        .with_minimum_should_match(3)
        .build();
    let excluded = BooleanQuery::new()
        .with_must(Query::term("body", "score"))
        .with_should(Query::term("body", "dog"))
        .with_must_not(Query::term("body", "the"))
        .build();

    for (name, query) in [
        ("conjunction", &conjunction),
        ("disjunction", &disjunction),
        ("min_should_match", &min_match),
        ("req_excl_opt", &excluded),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| searcher.search(black_box(query), 10).unwrap());
        });
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let searcher = create_searcher(4, 5_000, SearchConfig::default());
    let mut group = c.benchmark_group("filtered");

    let uncached = Query::filtered(Query::term("body", "fox"), Filter::query(Query::term("body", "dog")));
    let cached = Query::filtered(
        Query::term("body", "fox"),
        Filter::query(Query::term("body", "dog")).cached(64).unwrap(),
    );

    group.bench_function("query_filter", |b| {
        b.iter(|| searcher.search(black_box(&uncached), 10).unwrap());
    });
    group.bench_function("cached_filter", |b| {
        b.iter(|| searcher.search(black_box(&cached), 10).unwrap());
    });
    group.finish();
}

fn bench_parallel_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("segments");
    let query = BooleanQuery::new()
        .with_should(Query::term("body", "rust"))
        .with_should(Query::term("body", "score"))
        .build();

    for workers in [1usize, 2, 4, 8].iter() {
        let config = if *workers == 1 {
            SearchConfig::default()
        } else {
            SearchConfig::default().parallel(*workers)
        };
        let searcher = create_searcher(8, 2_500, config);
        group.bench_with_input(BenchmarkId::from_parameter(workers), workers, |b, _| {
            b.iter(|| searcher.search(black_box(&query), 10).unwrap());
        });
    }
    group.finish();
}

fn bench_explain(c: &mut Criterion) {
    let searcher = create_searcher(1, 5_000, SearchConfig::default());
    let query = BooleanQuery::new()
        .with_must(Query::term("body", "rust"))
        .with_should(Query::term("body", "search"))
        .build();
    let top = searcher.search(&query, 1).unwrap();
    let Some(hit) = top.score_docs.first().copied() else {
        return;
    };

    c.bench_function("explain", |b| {
        b.iter(|| searcher.explain(black_box(&query), hit.doc).unwrap());
    });
}

criterion_group!(
    benches,
    bench_term_query,
    bench_boolean_queries,
    bench_filters,
    bench_parallel_segments,
    bench_explain,
);

criterion_main!(benches);
