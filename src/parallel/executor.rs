use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use log::{debug, trace};
use crate::core::config::SearchConfig;
use crate::core::error::Result;
use crate::index::index_reader::SegmentReader;

/// Runs per-segment work either inline or on a dedicated rayon pool.
pub struct SegmentExecutor {
    pool: Option<ThreadPool>,
    segments_searched: AtomicUsize,
}

impl SegmentExecutor {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let pool = if config.parallel_segments {
            let workers = config.worker_threads.max(1);
            debug!("building segment pool with {} workers", workers);
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("quarry-search-{}", i))
                    .build()?,
            )
        } else {
            None
        };

        Ok(SegmentExecutor {
            pool,
            segments_searched: AtomicUsize::new(0),
        })
    }

    pub fn sequential() -> Self {
        SegmentExecutor {
            pool: None,
            segments_searched: AtomicUsize::new(0),
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Total segments visited since construction
    pub fn segments_searched(&self) -> usize {
        self.segments_searched.load(Ordering::Relaxed)
    }

    /// Applies `task` to every segment, returning results in segment order.
    /// The first error wins.
    pub fn map_segments<T, F>(&self, segments: &[SegmentReader], task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&SegmentReader) -> Result<T> + Sync,
    {
        let run = |segment: &SegmentReader| {
            trace!("searching segment {} (base {})", segment.ord(), segment.doc_base());
            self.segments_searched.fetch_add(1, Ordering::Relaxed);
            task(segment)
        };

        match &self.pool {
            Some(pool) => pool.install(|| segments.par_iter().map(run).collect()),
            None => segments.iter().map(run).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::index::inverted::Segment;
    use crate::index::index_reader::IndexReader;

    fn reader(segments: usize) -> IndexReader {
        IndexReader::from_segments(
            (0..segments)
                .map(|_| {
                    let mut builder = Segment::builder();
                    builder.add_document(&[("f", "x")]);
                    builder.build()
                })
                .collect(),
        )
    }

    #[test]
    fn parallel_preserves_segment_order() {
        let reader = reader(6);
        let executor = SegmentExecutor::new(&SearchConfig::default().parallel(3)).unwrap();
        assert!(executor.is_parallel());
        let bases = executor.map_segments(reader.segments(), |s| Ok(s.doc_base())).unwrap();
        assert_eq!(bases, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(executor.segments_searched(), 6);
    }

    #[test]
    fn errors_propagate() {
        let reader = reader(2);
        let executor = SegmentExecutor::sequential();
        let result: Result<Vec<()>> = executor.map_segments(reader.segments(), |s| {
            Err(Error::invalid_input(format!("segment {}", s.ord())))
        });
        assert!(result.is_err());
    }
}
