//! Option registry
//!
//! Options are not a fixed list. Each rendered option registers itself when
//! it mounts and unregisters when it unmounts, so at any instant the registry
//! holds only what is currently alive. Iteration order comes from a
//! monotonically increasing sequence number assigned on first registration;
//! re-registering a live value updates its metadata but keeps its slot, so
//! options whose visibility toggles while the user types never reshuffle.
//!
//! ```
//! use dropkit_core::registry::{OptionMeta, OptionRegistry};
//!
//! let mut registry = OptionRegistry::new();
//! registry.register("b", OptionMeta::new("Beta"), None);
//! registry.register("a", OptionMeta::new("Alpha"), None);
//! registry.register("b", OptionMeta::new("Beta (renamed)"), None);
//!
//! assert_eq!(registry.values(), vec!["b".to_string(), "a".to_string()]);
//! assert_eq!(registry.text("b"), Some("Beta (renamed)"));
//! ```

use rustc_hash::FxHashMap;

/// Opaque host reference to an option's rendered surface
///
/// Only used to ask the host to scroll an option into view. The registry
/// never owns or dereferences it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnchorHandle(u64);

impl AnchorHandle {
    /// Create from a raw host id
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Mutable metadata supplied on every registration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionMeta {
    /// Text used for filtering, type-ahead and the trigger label
    pub text: String,
    /// Disabled options can be highlighted but never committed
    pub disabled: bool,
}

impl OptionMeta {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: false,
        }
    }

    /// Mark the option as disabled
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// One live option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRecord {
    pub value: String,
    pub text: String,
    pub disabled: bool,
    /// Registration sequence number
    pub order: u64,
    pub handle: Option<AnchorHandle>,
}

/// Keyed set of currently mounted options
#[derive(Debug, Default)]
pub struct OptionRegistry {
    records: FxHashMap<String, OptionRecord>,
    next_order: u64,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option, or update it in place if already registered
    pub fn register(
        &mut self,
        value: impl Into<String>,
        meta: OptionMeta,
        handle: Option<AnchorHandle>,
    ) {
        let value = value.into();
        if let Some(record) = self.records.get_mut(&value) {
            record.text = meta.text;
            record.disabled = meta.disabled;
            record.handle = handle;
            tracing::trace!("registry: updated option {:?} (order {})", value, record.order);
            return;
        }

        let order = self.next_order;
        self.next_order += 1;
        tracing::trace!("registry: registered option {:?} (order {})", value, order);
        self.records.insert(
            value.clone(),
            OptionRecord {
                value,
                text: meta.text,
                disabled: meta.disabled,
                order,
                handle,
            },
        );
    }

    /// Remove an option
    ///
    /// The selection is owned elsewhere; removing the selected option leaves
    /// it selected.
    pub fn unregister(&mut self, value: &str) {
        if self.records.remove(value).is_some() {
            tracing::trace!("registry: unregistered option {:?}", value);
        }
    }

    pub fn get(&self, value: &str) -> Option<&OptionRecord> {
        self.records.get(value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.records.contains_key(value)
    }

    pub fn text(&self, value: &str) -> Option<&str> {
        self.records.get(value).map(|r| r.text.as_str())
    }

    /// Unregistered values report `false`
    pub fn is_disabled(&self, value: &str) -> bool {
        self.records.get(value).is_some_and(|r| r.disabled)
    }

    pub fn handle(&self, value: &str) -> Option<AnchorHandle> {
        self.records.get(value).and_then(|r| r.handle)
    }

    /// All records in registration order
    pub fn records(&self) -> Vec<&OptionRecord> {
        let mut records: Vec<&OptionRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.order);
        records
    }

    /// All values in registration order
    pub fn values(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.value.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
