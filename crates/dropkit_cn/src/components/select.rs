//! Select component for dropdown value selection
//!
//! A button trigger that opens a listbox panel, with keyboard navigation
//! and type-ahead. No free text.
//!
//! # Example
//!
//! ```
//! use dropkit_cn::prelude::*;
//!
//! let mut fruit = cn::select()
//!     .placeholder("Choose a fruit...")
//!     .option("apple", "Apple")
//!     .option("banana", "Banana")
//!     .option("cherry", "Cherry")
//!     .on_change(|value| println!("Selected: {:?}", value))
//!     .build();
//!
//! fruit.dispatch(DropdownEvent::KeyDown(Key::Down, Modifiers::NONE));
//! fruit.dispatch(DropdownEvent::Tick(0));
//! fruit.dispatch(DropdownEvent::KeyDown(Key::Enter, Modifiers::NONE));
//! assert_eq!(fruit.value(), SelectionValue::One("apple".to_string()));
//!
//! // Multiple selection with a form field
//! let tags = cn::select()
//!     .name("tags")
//!     .multiple(true)
//!     .option("news", "News")
//!     .option("events", "Events")
//!     .default_value(vec!["news"])
//!     .build();
//! assert_eq!(tags.dropdown().form_entries().len(), 1);
//! ```

use std::ops::{Deref, DerefMut};

use dropkit_core::{
    Clock, DropdownBuilder, DropdownConfig, PositionOptions, SelectionValue, Variant,
};

use super::option::SelectOption;
use super::widget::DropdownWidget;
use crate::key::InstanceKey;

/// Select component
pub struct Select {
    widget: DropdownWidget,
}

impl Deref for Select {
    type Target = DropdownWidget;

    fn deref(&self) -> &Self::Target {
        &self.widget
    }
}

impl DerefMut for Select {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.widget
    }
}

impl std::fmt::Debug for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Select").field(&self.widget).finish()
    }
}

/// Builder for [`Select`]
pub struct SelectBuilder {
    key: InstanceKey,
    options: Vec<SelectOption>,
    dropdown: DropdownBuilder,
}

impl SelectBuilder {
    #[track_caller]
    pub fn new() -> Self {
        Self::with_instance_key(InstanceKey::new("select"))
    }

    /// Create with an explicit key, for deterministic element ids
    pub fn with_key(key: impl Into<String>) -> Self {
        Self::with_instance_key(InstanceKey::explicit(key))
    }

    fn with_instance_key(key: InstanceKey) -> Self {
        Self {
            key,
            options: Vec::new(),
            dropdown: DropdownBuilder::new(DropdownConfig::select()),
        }
    }

    /// Start from a loaded config; the variant is forced to `Select`
    pub fn config(mut self, config: DropdownConfig) -> Self {
        *self.dropdown.config_mut() = DropdownConfig {
            variant: Variant::Select,
            ..config
        };
        self
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    pub fn option_disabled(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label).disabled());
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.dropdown.config_mut().placeholder = Some(placeholder.into());
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

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectionValue) + Send + Sync + 'static,
    {
        self.dropdown = self.dropdown.on_value_change(callback);
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

    pub fn build(self) -> Select {
        tracing::debug!("select {}: {} options", self.key.get(), self.options.len());
        Select {
            widget: DropdownWidget::new(self.key, self.dropdown.build(), self.options, None),
        }
    }
}

impl Default for SelectBuilder {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

/// Create a select
#[track_caller]
pub fn select() -> SelectBuilder {
    SelectBuilder::new()
}
