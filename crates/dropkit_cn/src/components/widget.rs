//! Shared state and rendering behind `Select` and `Combobox`

use indexmap::IndexMap;

use dropkit_core::{
    AnchorHandle, Dropdown, DropdownEvent, EffectQueue, EventResponse, OptionMeta, SelectionValue,
};

use super::form::hidden_inputs;
use super::option::DropdownOption;
use super::parts;
use crate::context::{with_root, RootContext};
use crate::key::InstanceKey;
use crate::node::RenderNode;

/// Render output of a dropdown
///
/// `root` goes where the widget sits in the layout. `overlay` is present
/// while open and belongs in the top-level overlay layer, never inside
/// `root`'s subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub root: RenderNode,
    pub overlay: Option<RenderNode>,
}

/// A dropdown instance with its options and ids
pub struct DropdownWidget {
    key: InstanceKey,
    dropdown: Dropdown,
    /// Anchor handle per mounted option, in mount order
    handles: IndexMap<String, AnchorHandle>,
    next_handle: u64,
    empty_text: Option<String>,
}

impl std::fmt::Debug for DropdownWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownWidget")
            .field("key", &self.key)
            .field("dropdown", &self.dropdown)
            .finish()
    }
}

impl DropdownWidget {
    pub(crate) fn new(
        key: InstanceKey,
        dropdown: Dropdown,
        options: Vec<DropdownOption>,
        empty_text: Option<String>,
    ) -> Self {
        let mut widget = Self {
            key,
            dropdown,
            handles: IndexMap::new(),
            next_handle: 1,
            empty_text,
        };
        widget.set_options(options);
        widget
    }

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut Dropdown {
        &mut self.dropdown
    }

    pub fn value(&self) -> SelectionValue {
        self.dropdown.value()
    }

    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    /// Replace the option list
    ///
    /// Options that disappeared unmount (unregister), surviving ones update
    /// in place and keep their position, new ones mount at the end.
    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        let gone: Vec<String> = self
            .handles
            .keys()
            .filter(|v| !options.iter().any(|o| &o.value == *v))
            .cloned()
            .collect();
        for value in gone {
            self.unmount_option(&value);
        }
        for option in options {
            self.mount_option(option);
        }
    }

    /// Mount or update a single option
    pub fn mount_option(&mut self, option: DropdownOption) {
        let handle = match self.handles.get(&option.value) {
            Some(handle) => *handle,
            None => {
                let handle = AnchorHandle::from_raw(self.next_handle);
                self.next_handle += 1;
                self.handles.insert(option.value.clone(), handle);
                handle
            }
        };
        let meta = OptionMeta::new(option.label).disabled(option.disabled);
        self.dropdown.register_option(option.value, meta, Some(handle));
    }

    pub fn unmount_option(&mut self, value: &str) {
        self.handles.shift_remove(value);
        self.dropdown.unregister_option(value);
    }

    /// Option value behind a `ScrollIntoView` handle
    pub fn option_for_handle(&self, handle: AnchorHandle) -> Option<&str> {
        self.handles
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(v, _)| v.as_str())
    }

    /// Element id behind a `ScrollIntoView` handle
    pub fn element_id_for_handle(&self, handle: AnchorHandle) -> Option<String> {
        self.option_for_handle(handle).map(|v| self.key.option_id(v))
    }

    pub fn dispatch(&mut self, event: DropdownEvent) -> EventResponse {
        self.dropdown.dispatch(event)
    }

    pub fn take_effects(&mut self) -> EffectQueue {
        self.dropdown.take_effects()
    }

    pub fn unmount(&mut self) {
        self.dropdown.unmount();
    }

    pub fn render(&self) -> Rendered {
        let dropdown = &self.dropdown;
        let ctx = RootContext::snapshot(self.key.get(), dropdown);

        with_root(ctx, || {
            let label = if dropdown.is_searchable() {
                dropdown.input_text()
            } else {
                dropdown.display_text().unwrap_or_default()
            };
            let placeholder = dropdown.config().placeholder.as_deref();

            let mut trigger = parts::trigger(&label, placeholder);
            if dropdown.is_disabled() {
                trigger = trigger.attr("disabled", "");
            }

            let root = RenderNode::new("div")
                .attr("data-dropkit-root", "")
                .attr("data-state", if dropdown.is_open() { "open" } else { "closed" })
                .child(trigger)
                .children(hidden_inputs(dropdown));

            let overlay = dropdown.is_open().then(|| {
                let options = dropdown
                    .visible_values()
                    .iter()
                    .map(|value| {
                        let record = dropdown.registry().get(value);
                        let label = record.map(|r| r.text.as_str()).unwrap_or(value);
                        let disabled = record.is_some_and(|r| r.disabled);
                        parts::option(value, label, disabled)
                    })
                    .collect();
                parts::panel(
                    options,
                    dropdown.placement(),
                    dropdown.viewport(),
                    self.empty_text.as_deref(),
                )
            });

            tracing::trace!(
                "render {}: open={} label={:?}",
                self.key.get(),
                dropdown.is_open(),
                label
            );
            Rendered { root, overlay }
        })
    }
}
