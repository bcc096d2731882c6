//! Selection values
//!
//! Hosts hand values over in whatever shape is convenient
//! ([`SelectionValue`]); the engine normalizes them once per instance mode
//! into a [`Selection`]. In multiple mode the normalized form is always a
//! list, even when the host supplied a bare string.

use serde::Deserialize;

/// A value as supplied by the host
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    #[default]
    Unset,
    One(String),
    Many(Vec<String>),
}

impl From<&str> for SelectionValue {
    fn from(value: &str) -> Self {
        SelectionValue::One(value.to_string())
    }
}

impl From<String> for SelectionValue {
    fn from(value: String) -> Self {
        SelectionValue::One(value)
    }
}

impl From<Option<String>> for SelectionValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SelectionValue::Unset, SelectionValue::One)
    }
}

impl From<Vec<String>> for SelectionValue {
    fn from(values: Vec<String>) -> Self {
        SelectionValue::Many(values)
    }
}

impl From<Vec<&str>> for SelectionValue {
    fn from(values: Vec<&str>) -> Self {
        SelectionValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Normalized selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Single(Option<String>),
    Multiple(Vec<String>),
}

impl Selection {
    /// Normalize a host value for the given mode
    ///
    /// Single mode keeps only the first entry of a list. Multiple mode wraps a
    /// bare value and drops duplicates.
    pub fn normalize(value: SelectionValue, multiple: bool) -> Self {
        if multiple {
            let mut values: Vec<String> = match value {
                SelectionValue::Unset => Vec::new(),
                SelectionValue::One(v) => vec![v],
                SelectionValue::Many(vs) => vs,
            };
            let mut seen = rustc_hash::FxHashSet::default();
            values.retain(|v| seen.insert(v.clone()));
            Selection::Multiple(values)
        } else {
            Selection::Single(match value {
                SelectionValue::Unset => None,
                SelectionValue::One(v) => Some(v),
                SelectionValue::Many(vs) => vs.into_iter().next(),
            })
        }
    }

    /// The empty selection for a mode
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Selection::Multiple(Vec::new())
        } else {
            Selection::Single(None)
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multiple(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(v) => v.is_none(),
            Selection::Multiple(vs) => vs.is_empty(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::Single(v) => v.as_deref() == Some(value),
            Selection::Multiple(vs) => vs.iter().any(|v| v == value),
        }
    }

    /// Selected values, in selection order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Selection::Single(v) => v.iter().map(String::as_str).collect(),
            Selection::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// The single value, or the first of a list
    pub fn first(&self) -> Option<&str> {
        self.values().into_iter().next()
    }

    /// The selection after committing `value`
    ///
    /// Single mode replaces; multiple mode toggles membership.
    pub fn with_committed(&self, value: &str) -> Self {
        match self {
            Selection::Single(_) => Selection::Single(Some(value.to_string())),
            Selection::Multiple(vs) => {
                let mut next = vs.clone();
                if let Some(pos) = next.iter().position(|v| v == value) {
                    next.remove(pos);
                } else {
                    next.push(value.to_string());
                }
                Selection::Multiple(next)
            }
        }
    }

    /// Back to the host-facing representation
    pub fn to_value(&self) -> SelectionValue {
        match self {
            Selection::Single(None) => SelectionValue::Unset,
            Selection::Single(Some(v)) => SelectionValue::One(v.clone()),
            Selection::Multiple(vs) => SelectionValue::Many(vs.clone()),
        }
    }
}
