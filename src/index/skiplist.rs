use crate::core::types::DocId;
use crate::index::posting::Posting;

/// Skip list over a sorted posting array.
///
/// Entries are taken every `sqrt(len)` postings (at least every 4), so a
/// forward seek costs one binary search over the entries plus a bounded
/// linear scan.
#[derive(Debug, Clone, Default)]
pub struct SkipList {
    pub entries: Vec<SkipEntry>,
    pub skip_interval: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SkipEntry {
    pub doc_id: DocId,
    pub position: usize,          // Index into the posting array
}

impl SkipList {
    pub fn build(postings: &[Posting]) -> Self {
        let len = postings.len();
        let interval = (len as f32).sqrt().max(4.0) as usize;  // At least 4

        let entries = (0..len)
            .step_by(interval)
            .map(|i| SkipEntry {
                doc_id: postings[i].doc_id,
                position: i,
            })
            .collect();

        SkipList {
            entries,
            skip_interval: interval,
        }
    }

    /// First position at or after `from` whose doc id is >= `target`,
    /// or `postings.len()` when there is none.
    pub fn skip_to_ge(&self, postings: &[Posting], target: DocId, from: usize) -> usize {
        let mut pos = from;

        // Every posting before the last entry below target is below target too
        let below = self.entries.partition_point(|e| e.doc_id < target);
        if below > 0 {
            let entry = self.entries[below - 1];
            if entry.position > pos {
                pos = entry.position;
            }
        }

        while pos < postings.len() && postings[pos].doc_id < target {
            pos += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(docs: &[u32]) -> Vec<Posting> {
        docs.iter()
            .map(|&d| Posting {
                doc_id: DocId::new(d),
                term_freq: 1,
                positions: vec![0],
            })
            .collect()
    }

    #[test]
    fn skip_to_ge_matches_linear_scan() {
        let docs: Vec<u32> = (0..200).map(|i| i * 3).collect();
        let list = postings(&docs);
        let skips = SkipList::build(&list);
        assert!(skips.skip_interval >= 4);

        for target in 0..620u32 {
            for from in [0usize, 10, 50, 150] {
                let expected = (from..list.len())
                    .find(|&i| list[i].doc_id >= DocId::new(target))
                    .unwrap_or(list.len());
                assert_eq!(skips.skip_to_ge(&list, DocId::new(target), from), expected);
            }
        }
    }

    #[test]
    fn never_moves_before_from() {
        let list = postings(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let skips = SkipList::build(&list);
        assert_eq!(skips.skip_to_ge(&list, DocId::new(1), 6), 6);
    }
}
