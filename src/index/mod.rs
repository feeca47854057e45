pub mod inverted;
pub mod posting;
pub mod skiplist;
pub mod index_reader;
