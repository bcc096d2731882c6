//! Navigation state machine
//!
//! ```text
//!            Open                 Resolve/Step/First/Last/Hover
//!  Closed ─────────▶ OpenNoActive ─────────────────────────────▶ OpenActive(v)
//!     ▲                   │                                          │
//!     └────── Close ──────┴──────────────── Close ───────────────────┘
//! ```
//!
//! Transitions are pure: they take the current visible set (already filtered,
//! in display order) and return the next state, or `None` when the event does
//! not apply. Stepping wraps at both ends and does not skip disabled
//! options; only committing is guarded against them, which the controller
//! handles.

/// Direction for single-step movement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Previous,
}

/// Navigation input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent<'a> {
    Open,
    Close,
    Step(Direction),
    First,
    Last,
    /// Pointer moved over an option
    Hover(&'a str),
    /// Pick the initial active option, preferring the given value
    Resolve(Option<&'a str>),
    /// Visible set changed; keep the active option if it survived
    Revalidate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavState {
    #[default]
    Closed,
    OpenNoActive,
    OpenActive(String),
}

impl NavState {
    pub fn is_open(&self) -> bool {
        !matches!(self, NavState::Closed)
    }

    pub fn active(&self) -> Option<&str> {
        match self {
            NavState::OpenActive(v) => Some(v),
            _ => None,
        }
    }

    /// Compute the next state, or `None` if the event does not apply
    pub fn on_event(&self, event: NavEvent<'_>, visible: &[&str]) -> Option<NavState> {
        use NavEvent::*;

        match (self, event) {
            (NavState::Closed, Open) => Some(NavState::OpenNoActive),
            (NavState::Closed, _) => None,
            (_, Open) => None,
            (_, Close) => Some(NavState::Closed),

            (_, Step(direction)) => {
                if visible.is_empty() {
                    return Some(NavState::OpenNoActive);
                }
                let len = visible.len();
                let current = self.active().and_then(|a| visible.iter().position(|v| *v == a));
                let next = match (current, direction) {
                    (None, Direction::Next) => 0,
                    (None, Direction::Previous) => len - 1,
                    (Some(i), Direction::Next) => (i + 1) % len,
                    (Some(i), Direction::Previous) => (i + len - 1) % len,
                };
                Some(active_or_none(visible.get(next).copied()))
            }
            (_, First) => Some(active_or_none(visible.first().copied())),
            (_, Last) => Some(active_or_none(visible.last().copied())),
            (_, Hover(value)) => visible
                .contains(&value)
                .then(|| NavState::OpenActive(value.to_string())),
            (_, Resolve(preferred)) => {
                let target = preferred
                    .filter(|p| visible.contains(p))
                    .or_else(|| visible.first().copied());
                Some(active_or_none(target))
            }
            (_, Revalidate) => match self.active() {
                Some(active) if visible.contains(&active) => None,
                _ => Some(active_or_none(visible.first().copied())),
            },
        }
    }
}

fn active_or_none(value: Option<&str>) -> NavState {
    match value {
        Some(v) => NavState::OpenActive(v.to_string()),
        None => NavState::OpenNoActive,
    }
}
