pub mod iterator;
pub mod postings;
pub mod explanation;
pub mod weight;
pub mod scorer;
pub mod term;
pub mod conjunction;
pub mod disjunction;
pub mod req;
pub mod boolean;
pub mod constant;
pub mod filtered;
pub mod collector;
pub mod searcher;
