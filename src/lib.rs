pub mod core;
pub mod index;
pub mod scoring;
pub mod search;
pub mod query;
pub mod parallel;

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                              QUARRY SEARCH ARCHITECTURE                                      │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────────── INDEX LAYER ────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────┐  ┌──────────────────────────┐  ┌─────────────────────────┐ │
│  │ struct Segment             │  │ struct PostingList       │  │ struct IndexReader      │ │
│  │ • id: SegmentId            │  │ • postings: Vec<Posting> │  │ • segments:             │ │
│  │ • postings: HashMap<Term,  │  │ • skips: SkipList        │  │   Vec<SegmentReader>    │ │
│  │   PostingList>             │  └──────────────────────────┘  │ • max_doc: u32          │ │
│  │ • norms: HashMap<String,   │                                 └─────────────────────────┘ │
│  │   Vec<f32>>                │  ┌──────────────────────────┐  ┌─────────────────────────┐ │
│  │ • max_doc: u32             │  │ struct Posting           │  │ struct SegmentReader    │ │
│  │ • deleted: RoaringBitmap   │  │ • doc_id, term_freq      │  │ • segment: Arc<Segment> │ │
│  └────────────────────────────┘  │ • positions: Vec<u32>    │  │ • doc_base, ord         │ │
│                                  └──────────────────────────┘  └─────────────────────────┘ │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────────── QUERY LAYER ────────────────────────────────────────┐
│                                                                                              │
│  enum Query ──create_weight──▶ enum Weight<'q> ──scorer(segment)──▶ enum Scorer<'a>          │
│  • Term                        • Term      (idf, query_norm)       • Term (postings cursor)  │
│  • Boolean (Occur clauses)     • Boolean   (coord factors)         • Conjunction / Disjunction│
│  • ConstantScore               • Constant  (boost * query_norm)    • ReqExcl / ReqOpt / Coord│
│  • Filtered                    • Filtered  (FilterWeight)          • Constant / Filtered     │
│  • MatchAll                                                                                  │
│                                                                                              │
│  Normalization: sum_of_squared_weights() ─▶ Similarity::query_norm ─▶ normalize(norm)        │
│  Explanation: Weight::explain(segment, doc) mirrors Scorer::score for one document           │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── EXECUTION LAYER ──────────────────────────────────────┐
│                                                                                              │
│  ┌───────────────────────────────────┐   ┌─────────────────────────────────────────────┐   │
│  │ struct IndexSearcher              │   │ struct SegmentExecutor                      │   │
│  │ • reader: IndexReader             │──▶│ • pool: Option<rayon::ThreadPool>           │   │
│  │ • similarity: Arc<dyn Similarity> │   │ • map_segments(segments, task)              │   │
│  │ • config: SearchConfig            │   └─────────────────────────────────────────────┘   │
│  │ • validator: QueryValidator       │   ┌─────────────────────────────────────────────┐   │
│  │ • search / count / explain        │──▶│ trait Collector: TopKCollector, CountCollector│ │
│  └───────────────────────────────────┘   └─────────────────────────────────────────────┘   │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
