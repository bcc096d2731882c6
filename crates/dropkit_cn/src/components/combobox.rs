//! Combobox component - searchable dropdown selection
//!
//! A text input trigger that filters the option list as the user types.
//!
//! # Example
//!
//! ```
//! use dropkit_cn::prelude::*;
//!
//! let mut country = cn::combobox()
//!     .placeholder("Search countries...")
//!     .option("us", "United States")
//!     .option("uk", "United Kingdom")
//!     .option("de", "Germany")
//!     .option("fr", "France")
//!     .on_change(|value| println!("Selected: {:?}", value))
//!     .build();
//!
//! country.dispatch(DropdownEvent::Input("united".to_string()));
//! assert_eq!(country.dropdown().visible_values(), vec!["us", "uk"]);
//!
//! // Match on the value as well as the label
//! let codes = cn::combobox()
//!     .option("us", "United States")
//!     .filter(|query, value, text| {
//!         let query = query.to_lowercase();
//!         value.contains(&query) || text.to_lowercase().contains(&query)
//!     })
//!     .build();
//! assert!(codes.dropdown().registry().contains("us"));
//! ```

use std::ops::{Deref, DerefMut};

use dropkit_core::{
    Clock, DropdownBuilder, DropdownConfig, PositionOptions, SelectionValue, Variant,
};

use super::option::ComboboxOption;
use super::widget::DropdownWidget;
use crate::key::InstanceKey;

/// Combobox component
pub struct Combobox {
    widget: DropdownWidget,
}

impl Deref for Combobox {
    type Target = DropdownWidget;

    fn deref(&self) -> &Self::Target {
        &self.widget
    }
}

impl DerefMut for Combobox {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.widget
    }
}

impl std::fmt::Debug for Combobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Combobox").field(&self.widget).finish()
    }
}

impl Combobox {
    pub fn query(&self) -> &str {
        self.widget.dropdown().query()
    }
}

/// Builder for [`Combobox`]
pub struct ComboboxBuilder {
    key: InstanceKey,
    options: Vec<ComboboxOption>,
    dropdown: DropdownBuilder,
    empty_text: Option<String>,
}

impl ComboboxBuilder {
    #[track_caller]
    pub fn new() -> Self {
        Self::with_instance_key(InstanceKey::new("combobox"))
    }

    /// Create with an explicit key, for deterministic element ids
    pub fn with_key(key: impl Into<String>) -> Self {
        Self::with_instance_key(InstanceKey::explicit(key))
    }

    fn with_instance_key(key: InstanceKey) -> Self {
        Self {
            key,
            options: Vec::new(),
            dropdown: DropdownBuilder::new(DropdownConfig::combobox()),
            empty_text: None,
        }
    }

    /// Start from a loaded config; the variant is forced to `Combobox`
    pub fn config(mut self, config: DropdownConfig) -> Self {
        *self.dropdown.config_mut() = DropdownConfig {
            variant: Variant::Combobox,
            ..config
        };
        self
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(ComboboxOption::new(value, label));
        self
    }

    pub fn option_disabled(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(ComboboxOption::new(value, label).disabled());
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = ComboboxOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.dropdown.config_mut().placeholder = Some(placeholder.into());
        self
    }

    /// Text shown in the panel when nothing matches the query
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = Some(text.into());
        self
    }

    /// Form field name for the hidden input mirror
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.dropdown.config_mut().name = Some(name.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.dropdown.config_mut().disabled = disabled;
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.dropdown.config_mut().multiple = multiple;
        self
    }

    /// Keep the typed query after a commit instead of clearing it
    pub fn clear_on_select(mut self, clear: bool) -> Self {
        self.dropdown.config_mut().clear_on_select = clear;
        self
    }

    /// Move focus back to the trigger after a commit
    pub fn focus_host_after_select(mut self, focus: bool) -> Self {
        self.dropdown.config_mut().focus_host_after_select = focus;
        self
    }

    /// Move focus back to the trigger when Escape closes the panel
    pub fn return_focus_on_escape(mut self, focus: bool) -> Self {
        self.dropdown.config_mut().return_focus_on_escape = focus;
        self
    }

    pub fn position(mut self, position: PositionOptions) -> Self {
        self.dropdown.config_mut().position = position;
        self
    }

    /// Controlled value; re-supply it with `set_value_prop` on each render
    pub fn value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.dropdown = self.dropdown.value(value);
        self
    }

    pub fn default_value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.dropdown = self.dropdown.default_value(value);
        self
    }

    /// Controlled query; re-supply it with `set_query_prop` on each render
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.dropdown = self.dropdown.query(query);
        self
    }

    pub fn default_query(mut self, query: impl Into<String>) -> Self {
        self.dropdown = self.dropdown.default_query(query);
        self
    }

    /// Custom match predicate `(query, value, label) -> bool`
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.dropdown = self.dropdown.filter(predicate);
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectionValue) + Send + Sync + 'static,
    {
        self.dropdown = self.dropdown.on_value_change(callback);
        self
    }

    pub fn on_query_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.dropdown = self.dropdown.on_query_change(callback);
        self
    }

    pub fn on_escape<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.dropdown = self.dropdown.on_escape(callback);
        self
    }

    /// Time source for deferred work between ticks
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.dropdown = self.dropdown.clock(clock);
        self
    }

    pub fn build(self) -> Combobox {
        tracing::debug!("combobox {}: {} options", self.key.get(), self.options.len());
        Combobox {
            widget: DropdownWidget::new(
                self.key,
                self.dropdown.build(),
                self.options,
                self.empty_text,
            ),
        }
    }
}

impl Default for ComboboxBuilder {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

/// Create a combobox
#[track_caller]
pub fn combobox() -> ComboboxBuilder {
    ComboboxBuilder::new()
}
