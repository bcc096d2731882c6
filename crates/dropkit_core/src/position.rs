//! Floating panel placement
//!
//! The panel is rendered in a top-level overlay layer, outside the trigger's
//! layout subtree, and positioned with viewport-fixed coordinates so that
//! scroll containers and clipping ancestors cannot cut it off.
//!
//! Placement is recomputed when the panel opens and when the viewport is
//! resized while open. It is *not* recomputed on scroll: an open panel stays
//! where it was placed until the next open or resize.

use serde::Deserialize;

use crate::geometry::{Rect, Size};

/// Default gap between trigger and panel
pub const DEFAULT_OFFSET: f32 = 4.0;

/// Default inset kept free along the viewport edges
pub const DEFAULT_VIEWPORT_PADDING: f32 = 8.0;

/// Requested side of the trigger
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePreference {
    /// Below unless it does not fit and above has more room
    #[default]
    Auto,
    Below,
    Above,
}

/// Side the panel ended up on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Below,
    Above,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    pub side: SidePreference,
    pub offset: f32,
    pub padding: f32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            side: SidePreference::Auto,
            offset: DEFAULT_OFFSET,
            padding: DEFAULT_VIEWPORT_PADDING,
        }
    }
}

/// Computed panel placement in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub side: Side,
    pub rect: Rect,
    /// Room available on the chosen side; the panel scrolls beyond this
    pub max_height: f32,
}

impl Placement {
    /// Distance from the viewport's bottom edge to the panel's bottom edge
    ///
    /// Above-placed panels are anchored by their bottom edge so that a
    /// height change grows them upward, away from the trigger.
    pub fn bottom_inset(&self, viewport: Size) -> f32 {
        viewport.height - self.rect.bottom()
    }
}

/// Compute where the panel goes for an anchor, panel height and viewport
pub fn compute_placement(
    anchor: Rect,
    panel_height: f32,
    viewport: Size,
    options: &PositionOptions,
) -> Placement {
    let offset = options.offset;
    let padding = options.padding;

    let space_below = (viewport.height - anchor.bottom() - offset - padding).max(0.0);
    let space_above = (anchor.top() - offset - padding).max(0.0);

    let side = match options.side {
        SidePreference::Below => Side::Below,
        SidePreference::Above => Side::Above,
        SidePreference::Auto => {
            if space_below < panel_height && space_above > space_below {
                Side::Above
            } else {
                Side::Below
            }
        }
    };

    let max_width = (viewport.width - 2.0 * padding).max(0.0);
    let width = anchor.width().min(max_width);
    let max_left = (viewport.width - padding - width).max(padding);
    let left = anchor.left().clamp(padding, max_left);

    let max_height = match side {
        Side::Below => space_below,
        Side::Above => space_above,
    };
    let height = panel_height.min(max_height);

    let top = match side {
        Side::Below => anchor.bottom() + offset,
        Side::Above => anchor.top() - offset - height,
    };

    tracing::trace!(
        "placement: side={:?} left={} top={} width={} height={} (below={}, above={})",
        side,
        left,
        top,
        width,
        height,
        space_below,
        space_above
    );

    Placement {
        side,
        rect: Rect::new(left, top, width, height),
        max_height,
    }
}
