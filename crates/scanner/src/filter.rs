//! Tag-based result filtering.
//!
//! A filter maps tag keys to sets of accepted values: a resource matches
//! when every filtered key is present with one of its accepted values
//! (AND across keys, OR within a key). An empty filter matches everything.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A malformed tag filter clause on the input surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagFilterError {
    /// The clause is not of the form `Key=Value`.
    #[error("invalid tag filter '{0}', expected Key=Value")]
    InvalidClause(String),
}

/// Tag filter specification: tag key -> accepted values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagFilter {
    clauses: BTreeMap<String, BTreeSet<String>>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse repeated `Key=Value` clauses; values for the same key merge
    /// into one accepted-value set. The value may contain `=`; only the
    /// first one splits.
    pub fn parse<S: AsRef<str>>(clauses: &[S]) -> Result<Self, TagFilterError> {
        let mut filter = Self::new();
        for clause in clauses {
            let clause = clause.as_ref();
            match clause.split_once('=') {
                Some((key, value)) if !key.is_empty() => filter.insert(key, value),
                _ => return Err(TagFilterError::InvalidClause(clause.to_string())),
            }
        }
        Ok(filter)
    }

    /// Accept `value` for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.clauses
            .entry(key.into())
            .or_default()
            .insert(value.into());
    }

    /// True when no clause is configured (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against a resource's tags.
    ///
    /// A resource lacking a filtered key never matches that clause.
    pub fn matches(&self, tags: &BTreeMap<String, String>) -> bool {
        self.clauses
            .iter()
            .all(|(key, accepted)| tags.get(key).is_some_and(|value| accepted.contains(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TagFilter::new();
        assert!(filter.matches(&tags(&[])));
        assert!(filter.matches(&tags(&[("Owner", "John")])));
    }

    #[test]
    fn test_or_within_key() {
        let filter = TagFilter::parse(&["Owner=John", "Owner=Jane"]).unwrap();
        assert!(filter.matches(&tags(&[("Owner", "John")])));
        assert!(filter.matches(&tags(&[("Owner", "Jane")])));
        assert!(!filter.matches(&tags(&[("Owner", "Bob")])));
        assert!(!filter.matches(&tags(&[("Env", "Prod")])));
    }

    #[test]
    fn test_and_across_keys() {
        let filter = TagFilter::parse(&["Owner=John", "Env=Prod"]).unwrap();
        assert!(filter.matches(&tags(&[("Owner", "John"), ("Env", "Prod")])));
        // Only one clause satisfied: no match.
        assert!(!filter.matches(&tags(&[("Owner", "John")])));
        assert!(!filter.matches(&tags(&[("Env", "Prod")])));
        assert!(!filter.matches(&tags(&[("Owner", "John"), ("Env", "Dev")])));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let filter = TagFilter::parse(&["Expr=a=b"]).unwrap();
        assert!(filter.matches(&tags(&[("Expr", "a=b")])));
    }

    #[test]
    fn test_malformed_clause_rejected() {
        assert_eq!(
            TagFilter::parse(&["OwnerJohn"]),
            Err(TagFilterError::InvalidClause("OwnerJohn".to_string()))
        );
        assert_eq!(
            TagFilter::parse(&["=value"]),
            Err(TagFilterError::InvalidClause("=value".to_string()))
        );
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let filter = TagFilter::parse(&["Owner=John", "Owner=Jane"]).unwrap();
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["Owner"], serde_json::json!(["Jane", "John"]));
    }
}
