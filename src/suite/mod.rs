//! Suite membership
//!
//! A suite is a named, duplicate-free, ordered list of test classes. Members
//! come from the explicit membership map held by the [`Catalog`], widened by
//! ancestry (a membership declared on an ancestor applies to descendants that
//! do not declare their own) and by statically nested declarations.
//!
//! [`Catalog`]: crate::registry::Catalog

mod resolver;

pub use resolver::{ancestry, closure_of, effective_suites, members_of};

use serde::Serialize;
use std::collections::HashSet;

/// Resolved suite
#[derive(Clone, Debug, Default, Serialize)]
pub struct Suite {
    name: String,
    members: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a member; returns false if it was already present
    pub fn insert(&mut self, class: impl Into<String>) -> bool {
        let class = class.into();
        if self.seen.insert(class.clone()) {
            self.members.push(class);
            true
        } else {
            false
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in first-seen order
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, class: &str) -> bool {
        self.seen.contains(class)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates_and_keeps_order() {
        let mut suite = Suite::new("demo::Suite");
        assert!(suite.insert("b"));
        assert!(suite.insert("a"));
        assert!(!suite.insert("b"));
        assert_eq!(suite.members(), ["b".to_string(), "a".to_string()]);
        assert!(suite.contains("a"));
        assert_eq!(suite.len(), 2);
    }
}
