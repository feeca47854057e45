use serde::{Deserialize, Serialize};
use std::fmt;

/// Relevance score.
pub type Score = f32;

/// Segment-local document identifier.
///
/// Real documents are numbered densely from zero. Two reserved values sit
/// outside that range: [`DocId::UNPOSITIONED`] is reported by a cursor
/// before its first advance, and [`DocId::NO_MORE_DOCS`] once it is
/// exhausted. Both compare correctly against real ids, so cursor code can
/// use plain `<` / `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub i32);

impl DocId {
    pub const UNPOSITIONED: DocId = DocId(-1);
    pub const NO_MORE_DOCS: DocId = DocId(i32::MAX);

    pub fn new(id: u32) -> Self {
        debug_assert!(id < i32::MAX as u32, "doc id {} collides with NO_MORE_DOCS", id);
        DocId(id as i32)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_positioned(&self) -> bool {
        self.0 >= 0
    }

    pub fn is_exhausted(&self) -> bool {
        *self == DocId::NO_MORE_DOCS
    }

    /// True when the id names an actual document.
    pub fn is_doc(&self) -> bool {
        self.is_positioned() && !self.is_exhausted()
    }

    pub fn as_u32(&self) -> u32 {
        debug_assert!(self.is_positioned());
        self.0 as u32
    }

    pub fn as_usize(&self) -> usize {
        self.as_u32() as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId::new(id)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DocId::UNPOSITIONED => write!(f, "unpositioned"),
            DocId::NO_MORE_DOCS => write!(f, "NO_MORE_DOCS"),
            DocId(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_order_around_real_ids() {
        assert!(DocId::UNPOSITIONED < DocId::new(0));
        assert!(DocId::new(u32::MAX / 2) < DocId::NO_MORE_DOCS);
        assert!(!DocId::UNPOSITIONED.is_doc());
        assert!(!DocId::NO_MORE_DOCS.is_doc());
        assert!(DocId::new(7).is_doc());
    }
}
