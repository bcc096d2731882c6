//! Root ownership for dropdown parts
//!
//! Triggers, panels and options only make sense inside the dropdown that
//! owns them. A root pushes a [`RootContext`] snapshot while it renders;
//! parts look it up and fail when there is none.
//!
//! ```
//! use dropkit_cn::context::{try_root, with_root, RootContext};
//! use dropkit_core::DropdownError;
//!
//! assert_eq!(
//!     try_root("option").unwrap_err(),
//!     DropdownError::PartOutsideRoot { part: "option" }
//! );
//!
//! let ctx = RootContext::new("demo");
//! let key = with_root(ctx, || try_root("option").map(|r| r.key.clone()));
//! assert_eq!(key.unwrap(), "demo");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use dropkit_core::{Dropdown, DropdownError, Result};

use crate::key::option_suffix;

thread_local! {
    static ROOTS: RefCell<Vec<Rc<RootContext>>> = const { RefCell::new(Vec::new()) };
}

/// What parts need to know about their owning dropdown
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RootContext {
    pub key: String,
    pub searchable: bool,
    pub multiple: bool,
    pub open: bool,
    pub active: Option<String>,
    pub selected: Vec<String>,
}

impl RootContext {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Snapshot a dropdown's render-relevant state
    pub fn snapshot(key: impl Into<String>, dropdown: &Dropdown) -> Self {
        Self {
            key: key.into(),
            searchable: dropdown.is_searchable(),
            multiple: dropdown.config().multiple,
            open: dropdown.is_open(),
            active: dropdown.active_value().map(str::to_string),
            selected: dropdown
                .selection()
                .values()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    pub fn is_active(&self, value: &str) -> bool {
        self.active.as_deref() == Some(value)
    }

    pub fn trigger_id(&self) -> String {
        format!("{}-trigger", self.key)
    }

    pub fn listbox_id(&self) -> String {
        format!("{}-listbox", self.key)
    }

    pub fn option_id(&self, value: &str) -> String {
        format!("{}-{}", self.key, option_suffix(value))
    }
}

/// Pops the root on drop, so a panicking part does not leak it
struct RootGuard;

impl Drop for RootGuard {
    fn drop(&mut self) {
        ROOTS.with(|roots| {
            roots.borrow_mut().pop();
        });
    }
}

/// Run `f` with `ctx` as the innermost root
pub fn with_root<R>(ctx: RootContext, f: impl FnOnce() -> R) -> R {
    ROOTS.with(|roots| roots.borrow_mut().push(Rc::new(ctx)));
    let _guard = RootGuard;
    f()
}

/// Innermost root, if any
pub fn current_root() -> Option<Rc<RootContext>> {
    ROOTS.with(|roots| roots.borrow().last().cloned())
}

/// Innermost root, or [`DropdownError::PartOutsideRoot`]
pub fn try_root(part: &'static str) -> Result<Rc<RootContext>> {
    current_root().ok_or(DropdownError::PartOutsideRoot { part })
}

/// Innermost root; panics when `part` renders outside any root
pub fn root(part: &'static str) -> Rc<RootContext> {
    match try_root(part) {
        Ok(root) => root,
        Err(err) => panic!("{}", err),
    }
}
