//! # Dropkit Components (dropkit_cn)
//!
//! `Select` and `Combobox` built on the headless engine in `dropkit_core`.
//!
//! Components own a [`Dropdown`](dropkit_core::Dropdown), an instance key
//! for element ids and the option list. They render to a [`RenderNode`]
//! tree: the trigger (plus hidden form inputs) where the widget sits, and
//! the panel as a separate overlay node with viewport-fixed placement.
//!
//! ## Example
//!
//! ```
//! use dropkit_cn::prelude::*;
//!
//! let mut status = cn::select()
//!     .placeholder("Status")
//!     .option("draft", "Draft")
//!     .option("published", "Published")
//!     .build();
//!
//! status.dispatch(DropdownEvent::FocusIn);
//! let rendered = status.render();
//! assert!(rendered.overlay.is_some());
//! ```

pub mod components;
pub mod context;
pub mod key;
pub mod node;

pub use components::*;
pub use key::InstanceKey;
pub use node::RenderNode;

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::combobox::combobox;
    pub use crate::components::select::select;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::combobox::{Combobox, ComboboxBuilder};
    pub use crate::components::option::{ComboboxOption, DropdownOption, SelectOption};
    pub use crate::components::select::{Select, SelectBuilder};
    pub use crate::components::widget::Rendered;
    pub use crate::node::RenderNode;
    // Re-export the engine types hosts feed events with
    pub use dropkit_core::prelude::*;
}

#[cfg(test)]
mod tests;
