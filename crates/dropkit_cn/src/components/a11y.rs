//! ARIA attributes for dropdown parts
//!
//! Searchable triggers follow the combobox pattern (`role="combobox"` with
//! `aria-activedescendant`), plain selects are a button that pops up a
//! listbox.

use crate::context::RootContext;
use crate::node::RenderNode;

/// Trigger attributes
pub fn trigger(node: RenderNode, ctx: &RootContext) -> RenderNode {
    let node = if ctx.searchable {
        let active = ctx.active.as_deref().map(|v| ctx.option_id(v));
        node.attr("role", "combobox")
            .attr("aria-autocomplete", "list")
            .flag("aria-expanded", ctx.open)
            .attr("aria-controls", ctx.listbox_id())
            .attr_opt("aria-activedescendant", active)
    } else {
        node.attr("aria-haspopup", "listbox")
            .flag("aria-expanded", ctx.open)
            .attr("aria-controls", ctx.listbox_id())
    };
    node.id(ctx.trigger_id())
}

/// Panel (listbox) attributes
pub fn listbox(node: RenderNode, ctx: &RootContext) -> RenderNode {
    let node = node
        .id(ctx.listbox_id())
        .attr("role", "listbox")
        .attr("aria-labelledby", ctx.trigger_id());
    if ctx.multiple {
        node.flag("aria-multiselectable", true)
    } else {
        node
    }
}

/// Option attributes
pub fn option(node: RenderNode, ctx: &RootContext, value: &str, disabled: bool) -> RenderNode {
    let node = node
        .id(ctx.option_id(value))
        .attr("role", "option")
        .flag("aria-selected", ctx.is_selected(value));
    let node = if disabled {
        node.flag("aria-disabled", true)
    } else {
        node
    };
    if ctx.is_active(value) {
        node.attr("data-active", "")
    } else {
        node
    }
}
