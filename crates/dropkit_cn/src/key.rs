//! Stable unique keys for dropdown instances.
//!
//! Every rendered dropdown needs DOM-style ids that tie the trigger to its
//! listbox (`aria-controls`) and to the active option
//! (`aria-activedescendant`). Two dropdowns built on the same source line
//! (in a loop, say) must not share ids, so the key carries a UUID.
//!
//! # Example
//!
//! ```
//! use dropkit_cn::InstanceKey;
//!
//! let key = InstanceKey::explicit("country");
//! assert_eq!(key.listbox_id(), "country-listbox");
//! assert_eq!(key.option_id("fr"), "country-option-6672");
//! ```

use std::cell::OnceCell;
use std::fmt::Write;

use uuid::Uuid;

/// Generates a stable unique key for a dropdown instance.
///
/// Key format: `{prefix}-{line}-{uuid}`. The key is generated lazily on
/// first access and cached for the instance's lifetime.
pub struct InstanceKey {
    key: OnceCell<String>,
    prefix: &'static str,
    file: &'static str,
    line: u32,
}

impl InstanceKey {
    /// Create from the caller's location with an auto-generated UUID
    #[track_caller]
    pub fn new(prefix: &'static str) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            key: OnceCell::new(),
            prefix,
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Create with an explicit key, for deterministic ids in tests and
    /// server-rendered markup
    pub fn explicit(key: impl Into<String>) -> Self {
        let instance = Self {
            key: OnceCell::new(),
            prefix: "",
            file: "",
            line: 0,
        };
        let _ = instance.key.set(key.into());
        instance
    }

    pub fn get(&self) -> &str {
        self.key.get_or_init(|| {
            format!(
                "{}-{}-{}",
                self.prefix,
                self.line,
                Uuid::new_v4().as_simple()
            )
        })
    }

    /// Derived id for a sub-part
    pub fn derive(&self, suffix: &str) -> String {
        format!("{}-{}", self.get(), suffix)
    }

    pub fn trigger_id(&self) -> String {
        self.derive("trigger")
    }

    pub fn listbox_id(&self) -> String {
        self.derive("listbox")
    }

    /// Id for an option element
    ///
    /// Option values are arbitrary strings, so they are hex-encoded to stay
    /// valid and collision-free as id tokens.
    pub fn option_id(&self, value: &str) -> String {
        self.derive(&option_suffix(value))
    }

    /// Source location for debugging
    pub fn location(&self) -> (&'static str, u32) {
        (self.file, self.line)
    }
}

pub(crate) fn option_suffix(value: &str) -> String {
    let mut suffix = String::with_capacity(7 + value.len() * 2);
    suffix.push_str("option-");
    for byte in value.bytes() {
        let _ = write!(suffix, "{:02x}", byte);
    }
    suffix
}

impl std::fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstanceKey({})", self.get())
    }
}

impl Clone for InstanceKey {
    fn clone(&self) -> Self {
        // Clones keep the same key
        Self::explicit(self.get())
    }
}
