/// Searcher configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub parallel_segments: bool,        // Fan segments out over a rayon pool
    pub worker_threads: usize,          // Pool size when parallel_segments is set
    pub max_clause_count: usize,        // Per boolean query
    pub max_query_depth: usize,         // Nesting limit for composite queries
    pub score_docs_in_order: bool,      // Passed to Weight::scorer by the searcher
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            parallel_segments: false,
            worker_threads: num_cpus::get(),
            max_clause_count: 1024,
            max_query_depth: 32,
            score_docs_in_order: true,
        }
    }
}

impl SearchConfig {
    pub fn parallel(mut self, workers: usize) -> Self {
        self.parallel_segments = true;
        self.worker_threads = workers.max(1);
        self
    }
}
