//! Dropdown parts: trigger, overlay panel and options
//!
//! Each part reads its owning dropdown from the current root
//! ([`crate::context`]). The `try_*` functions report a missing root as
//! [`DropdownError::PartOutsideRoot`](dropkit_core::DropdownError); the
//! plain functions are render entry points and panic instead.

use dropkit_core::{Placement, Result, Side, Size};

use super::a11y;
use crate::context::try_root;
use crate::node::RenderNode;

/// Marker attribute on nodes that belong in the overlay layer
pub const OVERLAY_ATTR: &str = "data-dropkit-overlay";

/// Trigger showing `label`, or `placeholder` while `label` is empty
///
/// Searchable roots render a text input, others a button.
pub fn try_trigger(label: &str, placeholder: Option<&str>) -> Result<RenderNode> {
    let ctx = try_root("trigger")?;
    let node = if ctx.searchable {
        RenderNode::new("input")
            .attr("type", "text")
            .attr("value", label)
            .attr_opt("placeholder", placeholder)
    } else if label.is_empty() {
        RenderNode::new("button")
            .attr("type", "button")
            .attr("data-placeholder", "")
            .text(placeholder.unwrap_or_default())
    } else {
        RenderNode::new("button").attr("type", "button").text(label)
    };
    Ok(a11y::trigger(node, &ctx))
}

pub fn trigger(label: &str, placeholder: Option<&str>) -> RenderNode {
    must(try_trigger(label, placeholder))
}

pub fn try_option(value: &str, label: &str, disabled: bool) -> Result<RenderNode> {
    let ctx = try_root("option")?;
    let node = RenderNode::new("div")
        .attr("data-value", value)
        .text(label);
    Ok(a11y::option(node, &ctx, value, disabled))
}

pub fn option(value: &str, label: &str, disabled: bool) -> RenderNode {
    must(try_option(value, label, disabled))
}

/// Listbox wrapped in a viewport-fixed overlay node
///
/// Below-placed panels are pinned by `top`, above-placed ones by `bottom`
/// so they grow away from the trigger. Without a placement (geometry not
/// reported yet) the panel is emitted unpositioned for the host to measure.
pub fn try_panel(
    options: Vec<RenderNode>,
    placement: Option<Placement>,
    viewport: Option<Size>,
    empty_text: Option<&str>,
) -> Result<RenderNode> {
    let ctx = try_root("panel")?;

    let listbox = if options.is_empty() {
        let empty = RenderNode::new("div")
            .attr("data-empty", "")
            .text(empty_text.unwrap_or("No results"));
        RenderNode::new("div").child(empty)
    } else {
        RenderNode::new("div").children(options)
    };
    let listbox = a11y::listbox(listbox, &ctx);

    let mut panel = RenderNode::new("div")
        .attr(OVERLAY_ATTR, "")
        .style("position", "fixed");

    if let Some(placement) = placement {
        let rect = placement.rect;
        panel = panel
            .attr(
                "data-side",
                match placement.side {
                    Side::Below => "below",
                    Side::Above => "above",
                },
            )
            .px("left", rect.left())
            .px("width", rect.width());
        panel = match (placement.side, viewport) {
            (Side::Above, Some(viewport)) => panel.px("bottom", placement.bottom_inset(viewport)),
            _ => panel.px("top", rect.top()),
        };
        panel = panel
            .px("max-height", placement.max_height)
            .style("overflow-y", "auto");
    }

    Ok(panel.child(listbox))
}

pub fn panel(
    options: Vec<RenderNode>,
    placement: Option<Placement>,
    viewport: Option<Size>,
    empty_text: Option<&str>,
) -> RenderNode {
    must(try_panel(options, placement, viewport, empty_text))
}

fn must(node: Result<RenderNode>) -> RenderNode {
    match node {
        Ok(node) => node,
        Err(err) => panic!("{}", err),
    }
}
