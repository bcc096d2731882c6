//! Dropkit components
//!
//! - [`select`] - button trigger, type-ahead
//! - [`combobox`] - text input trigger, filtering
//!
//! Both are thin builders over [`widget::DropdownWidget`], which renders
//! the [`parts`] inside a root context.

pub mod a11y;
pub mod combobox;
pub mod form;
pub mod option;
pub mod parts;
pub mod select;
pub mod widget;

pub use combobox::{combobox, Combobox, ComboboxBuilder};
pub use option::{ComboboxOption, DropdownOption, SelectOption};
pub use select::{select, Select, SelectBuilder};
pub use widget::{DropdownWidget, Rendered};
