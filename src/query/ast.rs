use std::fmt;
use crate::core::error::Result;
use crate::index::inverted::Term;
use crate::query::filter::Filter;
use crate::search::boolean::BooleanWeight;
use crate::search::constant::ConstantWeight;
use crate::search::filtered::FilteredWeight;
use crate::search::searcher::IndexSearcher;
use crate::search::term::TermWeight;
use crate::search::weight::Weight;

/// Main query enum representing all query types
#[derive(Debug, Clone)]
pub enum Query {
    Term(TermQuery),                   // Single term, graded by tf-idf
    Boolean(BooleanQuery),             // Must / should / must-not combinations
    ConstantScore(ConstantScoreQuery), // Filter or query with a fixed score
    Filtered(FilteredQuery),           // Query restricted by a filter
    MatchAll(MatchAllQuery),           // Every live document
}

/// Single term query
#[derive(Debug, Clone)]
pub struct TermQuery {
    pub term: Term,
    pub boost: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,     // Must match (AND)
    Should,   // May match, adds to score (OR)
    MustNot,  // Must not match (NOT)
}

#[derive(Debug, Clone)]
pub struct BooleanClause {
    pub query: Query,
    pub occur: Occur,
}

/// Boolean query over ordered clauses
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    pub clauses: Vec<BooleanClause>,
    pub minimum_should_match: u32,
    pub disable_coord: bool,
    pub boost: Option<f32>,
}

/// What a constant-score query iterates over.
#[derive(Debug, Clone)]
pub enum ConstantScoreSource {
    Filter(Filter),
    Query(Box<Query>),
}

/// Matches whatever its source matches, with score `boost * query_norm`
#[derive(Debug, Clone)]
pub struct ConstantScoreQuery {
    pub source: ConstantScoreSource,
    pub boost: Option<f32>,
}

/// Query whose matches are restricted to a filter's documents
#[derive(Debug, Clone)]
pub struct FilteredQuery {
    pub query: Box<Query>,
    pub filter: Filter,
    pub boost: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchAllQuery {
    pub boost: Option<f32>,
}

impl Query {
    pub fn term(field: &str, text: &str) -> Query {
        Query::Term(TermQuery {
            term: Term::new(field, text),
            boost: None,
        })
    }

    pub fn match_all() -> Query {
        Query::MatchAll(MatchAllQuery::default())
    }

    pub fn constant_score(source: ConstantScoreSource) -> Query {
        Query::ConstantScore(ConstantScoreQuery { source, boost: None })
    }

    pub fn filtered(query: Query, filter: Filter) -> Query {
        Query::Filtered(FilteredQuery {
            query: Box::new(query),
            filter,
            boost: None,
        })
    }

    pub fn boost(&self) -> f32 {
        let boost = match self {
            Query::Term(q) => q.boost,
            Query::Boolean(q) => q.boost,
            Query::ConstantScore(q) => q.boost,
            Query::Filtered(q) => q.boost,
            Query::MatchAll(q) => q.boost,
        };
        boost.unwrap_or(1.0)
    }

    pub fn with_boost(mut self, value: f32) -> Query {
        let boost = match &mut self {
            Query::Term(q) => &mut q.boost,
            Query::Boolean(q) => &mut q.boost,
            Query::ConstantScore(q) => &mut q.boost,
            Query::Filtered(q) => &mut q.boost,
            Query::MatchAll(q) => &mut q.boost,
        };
        *boost = Some(value);
        self
    }

    /// Compiles this query against `searcher`'s statistics.
    ///
    /// The result is not normalized; see [`IndexSearcher::create_normalized_weight`].
    pub fn create_weight(&self, searcher: &IndexSearcher) -> Result<Weight<'_>> {
        Ok(match self {
            Query::Term(q) => Weight::Term(TermWeight::new(self, q, searcher)),
            Query::Boolean(q) => Weight::Boolean(BooleanWeight::new(self, q, searcher)?),
            Query::ConstantScore(q) => Weight::Constant(ConstantWeight::for_constant_score(self, q, searcher)?),
            Query::Filtered(q) => Weight::Filtered(FilteredWeight::new(self, q, searcher)?),
            Query::MatchAll(_) => Weight::Constant(ConstantWeight::for_match_all(self, searcher)),
        })
    }
}

impl TermQuery {
    pub fn boost(&self) -> f32 {
        self.boost.unwrap_or(1.0)
    }
}

impl BooleanClause {
    pub fn is_required(&self) -> bool {
        self.occur == Occur::Must
    }

    pub fn is_prohibited(&self) -> bool {
        self.occur == Occur::MustNot
    }
}

impl BooleanQuery {
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            minimum_should_match: 0,
            disable_coord: false,
            boost: None,
        }
    }

    pub fn boost(&self) -> f32 {
        self.boost.unwrap_or(1.0)
    }

    pub fn add(mut self, query: Query, occur: Occur) -> Self {
        self.clauses.push(BooleanClause { query, occur });
        self
    }

    pub fn with_must(self, query: Query) -> Self {
        self.add(query, Occur::Must)
    }

    pub fn with_should(self, query: Query) -> Self {
        self.add(query, Occur::Should)
    }

    pub fn with_must_not(self, query: Query) -> Self {
        self.add(query, Occur::MustNot)
    }

    pub fn with_minimum_should_match(mut self, minimum: u32) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    pub fn without_coord(mut self) -> Self {
        self.disable_coord = true;
        self
    }

    pub fn build(self) -> Query {
        Query::Boolean(self)
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantScoreQuery {
    pub fn boost(&self) -> f32 {
        self.boost.unwrap_or(1.0)
    }
}

impl FilteredQuery {
    pub fn boost(&self) -> f32 {
        self.boost.unwrap_or(1.0)
    }
}

fn write_boost(f: &mut fmt::Formatter, boost: Option<f32>) -> fmt::Result {
    match boost {
        Some(b) if b != 1.0 => write!(f, "^{:?}", b),
        _ => Ok(()),
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Query::Term(q) => {
                write!(f, "{}", q.term)?;
                write_boost(f, q.boost)
            }
            Query::Boolean(q) => {
                let wrap = q.boost() != 1.0 || q.minimum_should_match > 0;
                if wrap {
                    write!(f, "(")?;
                }
                for (i, clause) in q.clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match clause.occur {
                        Occur::Must => write!(f, "+")?,
                        Occur::MustNot => write!(f, "-")?,
                        Occur::Should => {}
                    }
                    match clause.query {
                        Query::Boolean(_) => write!(f, "({})", clause.query)?,
                        _ => write!(f, "{}", clause.query)?,
                    }
                }
                if wrap {
                    write!(f, ")")?;
                }
                if q.minimum_should_match > 0 {
                    write!(f, "~{}", q.minimum_should_match)?;
                }
                write_boost(f, q.boost)
            }
            Query::ConstantScore(q) => {
                match &q.source {
                    ConstantScoreSource::Filter(filter) => write!(f, "ConstantScore({})", filter)?,
                    ConstantScoreSource::Query(query) => write!(f, "ConstantScore({})", query)?,
                }
                write_boost(f, q.boost)
            }
            Query::Filtered(q) => {
                write!(f, "filtered({})->{}", q.query, q.filter)?;
                write_boost(f, q.boost)
            }
            Query::MatchAll(q) => {
                write!(f, "*:*")?;
                write_boost(f, q.boost)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mirrors_structure() {
        let query = BooleanQuery::new()
            .with_must(Query::term("body", "rust"))
            .with_should(Query::term("body", "fast").with_boost(2.0))
            .with_must_not(BooleanQuery::new().with_should(Query::term("body", "slow")).build())
            .build();
        assert_eq!(query.to_string(), "+body:rust body:fast^2.0 -(body:slow)");

        let query = BooleanQuery::new()
            .with_should(Query::term("t", "a"))
            .with_should(Query::term("t", "b"))
            .with_minimum_should_match(1)
            .build();
        assert_eq!(query.to_string(), "(t:a t:b)~1");
        assert_eq!(Query::match_all().with_boost(0.5).to_string(), "*:*^0.5");
    }

    #[test]
    fn boost_defaults_to_one() {
        assert_eq!(Query::term("f", "x").boost(), 1.0);
        assert_eq!(Query::term("f", "x").with_boost(3.0).boost(), 3.0);
        assert_eq!(BooleanQuery::new().build().boost(), 1.0);
    }
}
