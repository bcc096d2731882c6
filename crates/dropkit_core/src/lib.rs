//! Dropkit Core
//!
//! Headless selection engine behind the Dropkit `Select` and `Combobox`
//! widgets:
//!
//! - **Option Registry**: options register themselves as they mount
//! - **Navigation**: a small state machine for open/closed and the active option
//! - **Value Sync**: controlled and uncontrolled value/query with optimistic commits
//! - **Dismissal**: blur, Escape and outside pointer-down, with the click/blur race handled
//! - **Placement**: viewport-fixed panel positioning that flips above when needed
//!
//! Nothing here touches a real event loop. Hosts forward events in, read
//! state out, drain [`HostEffect`]s, and drive time through
//! [`Dropdown::tick`].
//!
//! # Example
//!
//! ```rust
//! use dropkit_core::prelude::*;
//!
//! let mut combobox = Dropdown::builder(DropdownConfig::combobox()).build();
//! combobox.register_option("fr", OptionMeta::new("France"), None);
//! combobox.register_option("de", OptionMeta::new("Germany"), None);
//! combobox.register_option("es", OptionMeta::new("Spain"), None);
//!
//! combobox.input_changed("an");
//! assert!(combobox.is_open());
//! assert_eq!(combobox.visible_values(), vec!["fr", "de"]);
//!
//! combobox.key_down(Key::Enter, Modifiers::NONE);
//! assert_eq!(combobox.value(), SelectionValue::One("fr".to_string()));
//! assert_eq!(combobox.input_text(), "France");
//! ```

pub mod config;
pub mod controller;
pub mod dismiss;
pub mod error;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod navigation;
pub mod position;
pub mod registry;
pub mod sync;
pub mod timer;
pub mod typeahead;
pub mod value;

pub use config::{DropdownConfig, TimingConfig, Variant, BLUR_CLEAR_DELAY_MS};
pub use controller::{
    Dropdown, DropdownBuilder, EscapeFn, FormEntry, QueryChangeFn, ValueChangeFn,
};
pub use dismiss::{hit_test, DocumentListeners, GestureGuard};
pub use error::{DropdownError, Result};
pub use events::{
    DropdownEvent, EffectQueue, EventResponse, FocusTarget, HostEffect, Key, Modifiers,
    PointerTarget,
};
pub use filter::{Filter, FilterFn};
pub use geometry::{Point, Rect, Size};
pub use navigation::{Direction, NavEvent, NavState};
pub use position::{compute_placement, Placement, PositionOptions, Side, SidePreference};
pub use registry::{AnchorHandle, OptionMeta, OptionRecord, OptionRegistry};
pub use sync::{Controllable, PropChange};
pub use timer::{Clock, ManualClock, SystemClock, TimerId, TimerQueue, TimerTask};
pub use typeahead::{Typeahead, TYPEAHEAD_RESET_MS};
pub use value::{Selection, SelectionValue};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DropdownConfig, Variant};
    pub use crate::controller::{Dropdown, DropdownBuilder};
    pub use crate::events::{DropdownEvent, EventResponse, FocusTarget, HostEffect, Key, Modifiers};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::registry::{AnchorHandle, OptionMeta};
    pub use crate::value::{Selection, SelectionValue};
}
