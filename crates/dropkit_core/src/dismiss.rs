//! Dismissal and the click-versus-blur race
//!
//! Clicking an option is two platform events: pointer-down (which moves
//! focus and blurs the input) and click (which commits). Between the two the
//! input's blur handler runs. [`GestureGuard`] records that a pointer gesture
//! started on an option so the blur handler can stand down and let the click
//! finish the job.
//!
//! Outside dismissal needs document-level listeners. [`DocumentListeners`]
//! tracks whether they are attached so the controller can attach them on
//! open, detach them on close, and ignore stray events in between.

use crate::events::{EffectQueue, FocusTarget, HostEffect};
use crate::geometry::{Point, Rect};

/// Pointer gesture over an option
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureGuard {
    #[default]
    Idle,
    /// Pointer is down on this option; blur must not dismiss
    PointerDownOnOption(String),
    /// The gesture committed this option and closed the panel
    Committed(String),
}

impl GestureGuard {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureGuard::Idle)
    }

    /// Whether a blur arriving now belongs to an option gesture
    pub fn suppresses_blur(&self) -> bool {
        !self.is_idle()
    }

    pub fn pointer_down(&mut self, value: &str) {
        *self = GestureGuard::PointerDownOnOption(value.to_string());
    }

    pub fn committed(&mut self, value: &str) {
        *self = GestureGuard::Committed(value.to_string());
    }

    /// Global pointer-up ends any gesture, including aborted ones
    pub fn pointer_up(&mut self) {
        *self = GestureGuard::Idle;
    }
}

/// Document-level listener lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DocumentListeners {
    attached: bool,
}

impl DocumentListeners {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach(&mut self, effects: &mut EffectQueue) {
        if !self.attached {
            self.attached = true;
            effects.push(HostEffect::AttachDocumentListeners);
        }
    }

    pub fn detach(&mut self, effects: &mut EffectQueue) {
        if self.attached {
            self.attached = false;
            effects.push(HostEffect::DetachDocumentListeners);
        }
    }
}

/// Classify a pointer position against the trigger and panel bounds
pub fn hit_test(point: Point, anchor: Option<Rect>, panel: Option<Rect>) -> FocusTarget {
    if anchor.is_some_and(|r| r.contains(point)) {
        FocusTarget::Trigger
    } else if panel.is_some_and(|r| r.contains(point)) {
        FocusTarget::Panel
    } else {
        FocusTarget::Outside
    }
}
