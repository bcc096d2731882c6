//! Filter engine
//!
//! A pure projection from the registry to the currently visible options.
//! Nothing here is cached: the visible set is recomputed on every keystroke
//! and on open.

use std::sync::Arc;

use crate::registry::OptionRecord;

/// Custom predicate: `(query, value, text) -> visible`
pub type FilterFn = Arc<dyn Fn(&str, &str, &str) -> bool + Send + Sync>;

/// Decides which registered options are visible for a query
#[derive(Clone, Default)]
pub struct Filter {
    predicate: Option<FilterFn>,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("custom", &self.predicate.is_some())
            .finish()
    }
}

impl Filter {
    /// Case-insensitive substring match against option text
    pub fn new() -> Self {
        Self { predicate: None }
    }

    /// Use a custom predicate instead of the substring match
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    pub fn from_fn(predicate: Option<FilterFn>) -> Self {
        Self { predicate }
    }

    pub fn is_custom(&self) -> bool {
        self.predicate.is_some()
    }

    /// Check a single option against the query
    ///
    /// An empty query matches everything regardless of predicate.
    pub fn matches(&self, query: &str, value: &str, text: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        match &self.predicate {
            Some(predicate) => predicate(query, value, text),
            None => text.to_lowercase().contains(&query.to_lowercase()),
        }
    }

    /// The visible subset of `records`, preserving their order
    pub fn visible<'a>(&self, query: &str, records: &[&'a OptionRecord]) -> Vec<&'a OptionRecord> {
        records
            .iter()
            .copied()
            .filter(|r| self.matches(query, &r.value, &r.text))
            .collect()
    }
}
