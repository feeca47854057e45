use serde::{Deserialize, Serialize};
use std::fmt;
use crate::core::error::Result;
use crate::core::types::Score;

/// Score explanation tree.
///
/// Mirrors the weight composition that produced a score: leaves carry the
/// formula inputs, inner nodes their sum or product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    value: Score,
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<Explanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    matched: Option<bool>,
}

impl Explanation {
    pub fn new(value: Score, description: impl Into<String>) -> Self {
        Explanation {
            value,
            description: description.into(),
            details: Vec::new(),
            matched: None,
        }
    }

    /// Node with an explicit match flag, independent of its value.
    pub fn with_match(matched: bool, value: Score, description: impl Into<String>) -> Self {
        Explanation {
            matched: Some(matched),
            ..Explanation::new(value, description)
        }
    }

    pub fn no_match(description: impl Into<String>) -> Self {
        Explanation::with_match(false, 0.0, description)
    }

    pub fn value(&self) -> Score {
        self.value
    }

    pub fn set_value(&mut self, value: Score) {
        self.value = value;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    pub fn add_detail(&mut self, detail: Explanation) {
        self.details.push(detail);
    }

    pub fn detail(mut self, detail: Explanation) -> Self {
        self.details.push(detail);
        self
    }

    /// Whether the explained document matched. Without an explicit flag a
    /// positive value counts as a match.
    pub fn is_match(&self) -> bool {
        self.matched.unwrap_or(self.value > 0.0)
    }

    pub fn set_match(&mut self, matched: bool) {
        self.matched = Some(matched);
    }

    pub fn summary(&self) -> String {
        format!("{} = {}", self.value, self.description)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn write_tree(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        writeln!(f, "{}{}", "  ".repeat(depth), self.summary())?;
        for detail in &self.details {
            detail.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
