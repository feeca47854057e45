use crate::core::config::SearchConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::ast::{ConstantScoreSource, Query};
use crate::query::filter::Filter;

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_query_depth: usize,
    pub max_clause_count: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for ValidationConfig {
    fn from(config: &SearchConfig) -> Self {
        ValidationConfig {
            max_query_depth: config.max_query_depth,
            max_clause_count: config.max_clause_count,
        }
    }
}

/// Rejects query trees the searcher refuses to compile.
#[derive(Debug, Clone, Default)]
pub struct QueryValidator {
    config: ValidationConfig,
}

impl QueryValidator {
    pub fn new(config: ValidationConfig) -> Self {
        QueryValidator { config }
    }

    /// Validate query structure and constraints
    pub fn validate(&self, query: &Query) -> Result<()> {
        self.validate_query(query, 0)
    }

    fn validate_query(&self, query: &Query, depth: usize) -> Result<()> {
        if depth > self.config.max_query_depth {
            return Err(Error::invalid_input(format!(
                "Query depth {} exceeds maximum {}",
                depth, self.config.max_query_depth
            )));
        }

        let boost = query.boost();
        if !boost.is_finite() || boost < 0.0 {
            return Err(Error::invalid_input(format!("invalid boost {} on {}", boost, query)));
        }

        match query {
            Query::Boolean(boolean) => {
                if boolean.clauses.len() > self.config.max_clause_count {
                    return Err(Error::new(
                        ErrorKind::TooManyClauses,
                        format!(
                            "Boolean query has {} clauses, max is {}",
                            boolean.clauses.len(),
                            self.config.max_clause_count
                        ),
                    ));
                }
                for clause in &boolean.clauses {
                    self.validate_query(&clause.query, depth + 1)?;
                }
            }
            Query::ConstantScore(constant) => match &constant.source {
                ConstantScoreSource::Filter(filter) => self.validate_filter(filter, depth + 1)?,
                ConstantScoreSource::Query(inner) => self.validate_query(inner, depth + 1)?,
            },
            Query::Filtered(filtered) => {
                self.validate_query(&filtered.query, depth + 1)?;
                self.validate_filter(&filtered.filter, depth + 1)?;
            }
            Query::Term(_) | Query::MatchAll(_) => {}
        }

        Ok(())
    }

    fn validate_filter(&self, filter: &Filter, depth: usize) -> Result<()> {
        match filter {
            Filter::Query(query) => self.validate_query(query, depth),
            Filter::Cached(cached) => self.validate_filter(cached.inner(), depth),
            Filter::DocIds(_) => Ok(()),
        }
    }
}
