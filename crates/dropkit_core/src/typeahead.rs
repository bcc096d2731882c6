//! Type-ahead for the non-searchable select
//!
//! Printable keys typed while the panel is open accumulate into a lowercase
//! buffer. The controller resets it after a period of inactivity (via the
//! timer queue) and whenever the panel closes.

use crate::registry::OptionRecord;

/// Inactivity window after which the buffer resets
pub const TYPEAHEAD_RESET_MS: u64 = 1000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Typeahead {
    buffer: String,
}

impl Typeahead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append a typed character
    pub fn push(&mut self, c: char) -> &str {
        self.buffer.extend(c.to_lowercase());
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// First record, in registration order, whose text starts with the buffer
    pub fn find<'a>(&self, records: &[&'a OptionRecord]) -> Option<&'a OptionRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        records
            .iter()
            .copied()
            .find(|r| r.text.to_lowercase().starts_with(&self.buffer))
    }
}
