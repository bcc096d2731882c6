//! Dropdown configuration
//!
//! Plain data only. Host-owned props (`value`, `query`) and callbacks are
//! supplied through [`crate::DropdownBuilder`] since they cannot live in a
//! config file.
//!
//! ```
//! use dropkit_core::config::{DropdownConfig, Variant};
//!
//! let config = DropdownConfig::from_toml_str(r#"
//!     variant = "combobox"
//!     name = "country"
//!     placeholder = "Search countries..."
//!     clear_on_select = false
//!
//!     [timing]
//!     blur_clear_delay_ms = 250
//! "#).unwrap();
//!
//! assert_eq!(config.variant, Variant::Combobox);
//! assert_eq!(config.timing.blur_clear_delay_ms, 250);
//! ```

use serde::Deserialize;

use crate::error::Result;
use crate::position::PositionOptions;
use crate::typeahead::TYPEAHEAD_RESET_MS;
use crate::value::SelectionValue;

/// Default delay before stale typed text is cleared after a blur
pub const BLUR_CLEAR_DELAY_MS: u64 = 150;

/// Which widget the engine backs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Button trigger, type-ahead, no free text
    #[default]
    Select,
    /// Text input trigger with filtering
    Combobox,
}

impl Variant {
    pub fn is_searchable(&self) -> bool {
        matches!(self, Variant::Combobox)
    }
}

/// Timer delays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub blur_clear_delay_ms: u64,
    pub typeahead_reset_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            blur_clear_delay_ms: BLUR_CLEAR_DELAY_MS,
            typeahead_reset_ms: TYPEAHEAD_RESET_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    pub variant: Variant,
    /// Form field name for the hidden input mirror
    pub name: Option<String>,
    pub disabled: bool,
    pub multiple: bool,
    pub placeholder: Option<String>,
    /// Seed for uncontrolled instances
    pub default_value: SelectionValue,
    /// Seed for uncontrolled query (searchable only)
    pub default_query: String,
    /// Clear the typed query after a commit (searchable only)
    pub clear_on_select: bool,
    /// Return focus to the trigger after a commit
    pub focus_host_after_select: bool,
    /// Return focus to the trigger after Escape
    pub return_focus_on_escape: bool,
    pub position: PositionOptions,
    pub timing: TimingConfig,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Select,
            name: None,
            disabled: false,
            multiple: false,
            placeholder: None,
            default_value: SelectionValue::Unset,
            default_query: String::new(),
            clear_on_select: true,
            focus_host_after_select: true,
            return_focus_on_escape: true,
            position: PositionOptions::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl DropdownConfig {
    pub fn select() -> Self {
        Self::default()
    }

    pub fn combobox() -> Self {
        Self {
            variant: Variant::Combobox,
            ..Self::default()
        }
    }

    /// Parse from TOML; missing fields take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
