//! Input events and host effects
//!
//! The engine is driven entirely by discrete events forwarded from the host
//! (key presses, focus changes, pointer gestures, viewport changes and clock
//! ticks). Everything the engine needs the host to do in return is queued as
//! a [`HostEffect`].

use smallvec::SmallVec;

use crate::geometry::{Point, Rect, Size};
use crate::registry::AnchorHandle;
use crate::value::SelectionValue;

/// Keys the engine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    // Navigation
    Up,
    Down,
    Home,
    End,

    Enter,
    Escape,
    Space,
    Tab,
    Backspace,

    // Character input (type-ahead)
    Char(char),

    // Unknown key
    Unknown,
}

impl Key {
    /// Printable single character, excluding space
    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() && !c.is_whitespace() => Some(*c),
            _ => None,
        }
    }
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS)
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }

    /// Check if only shift is held
    pub fn shift_only(&self) -> bool {
        self.shift && !self.ctrl && !self.alt && !self.meta
    }

    /// Ctrl, Alt or Meta held (Shift alone still types)
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Where focus went when the trigger/input blurred
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The trigger or input itself
    Trigger,
    /// Something inside the floating panel
    Panel,
    /// Anywhere else, or nowhere
    Outside,
}

impl FocusTarget {
    pub fn is_inside(&self) -> bool {
        !matches!(self, FocusTarget::Outside)
    }
}

/// Where a document-level pointer-down landed
pub type PointerTarget = FocusTarget;

/// Whether the host should suppress the platform default for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventResponse {
    /// Engine consumed the event; prevent the default action
    Handled,
    /// Engine did not act
    Ignored,
}

impl EventResponse {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResponse::Handled)
    }
}

/// A host event, for hosts that prefer a single dispatch entry point
#[derive(Clone, Debug, PartialEq)]
pub enum DropdownEvent {
    FocusIn,
    Blur(FocusTarget),
    KeyDown(Key, Modifiers),
    /// The search input's text changed
    Input(String),
    OptionPointerDown(String),
    OptionClick(String),
    /// Global pointer-up anywhere in the document
    PointerUp,
    DocumentPointerDown(PointerTarget),
    /// Document-level pointer-down at a position, hit-tested by the engine
    DocumentPointerDownAt(Point),
    DocumentKeyDown(Key),
    AnchorBounds(Rect),
    PanelHeight(f32),
    Resize(Size),
    Scroll,
    /// Controlled value re-supplied by the host
    ValueProp(SelectionValue),
    /// Controlled query re-supplied by the host
    QueryProp(String),
    Tick(u64),
}

/// Work the host performs on the engine's behalf
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEffect {
    /// Move focus back to the trigger/input
    FocusTrigger,
    /// Scroll the option's rendered surface into view
    ScrollIntoView(AnchorHandle),
    /// Start delivering document pointer-down and key events
    AttachDocumentListeners,
    /// Stop delivering document events
    DetachDocumentListeners,
}

/// Queue of effects, drained by the host after each event
pub type EffectQueue = SmallVec<[HostEffect; 4]>;
