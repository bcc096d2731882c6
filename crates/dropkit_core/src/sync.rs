//! Controlled / uncontrolled state reconciliation
//!
//! A [`Controllable`] is created once per instance and never switches mode.
//!
//! - **Uncontrolled**: the engine owns the value, seeded from a default.
//! - **Controlled**: the host owns the value and re-supplies it on every
//!   render through [`Controllable::receive_prop`]. An internal commit only
//!   produces an optimistic value for the render in flight; the next
//!   `receive_prop` drops it, so a host that ignores the change sees its own
//!   value come back.
//!
//! Every internal commit is marked, which lets `receive_prop` tell an echo of
//! our own change apart from a genuine host-driven update.

/// How an incoming prop relates to what the engine last saw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropChange {
    /// Prop equals the last external value and nothing was committed
    Unchanged,
    /// First prop after an internal commit
    Echo,
    /// The host changed the value on its own
    External,
    /// Uncontrolled instances ignore props
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Controllable<T> {
    Controlled {
        /// Last external value seen
        prop: T,
        /// Internally committed value, shown until the next prop arrives
        optimistic: Option<T>,
        committed_internally: bool,
    },
    Uncontrolled {
        current: T,
    },
}

impl<T: Clone + PartialEq> Controllable<T> {
    /// Controlled when `prop` is present, otherwise seeded from `default`
    pub fn new(prop: Option<T>, default: T) -> Self {
        match prop {
            Some(prop) => Controllable::Controlled {
                prop,
                optimistic: None,
                committed_internally: false,
            },
            None => Controllable::Uncontrolled { current: default },
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Controllable::Controlled { .. })
    }

    pub fn get(&self) -> &T {
        match self {
            Controllable::Controlled {
                prop, optimistic, ..
            } => optimistic.as_ref().unwrap_or(prop),
            Controllable::Uncontrolled { current } => current,
        }
    }

    /// Record an internally originated change
    ///
    /// Returns whether the visible value changed.
    pub fn commit(&mut self, next: T) -> bool {
        let changed = *self.get() != next;
        match self {
            Controllable::Controlled {
                optimistic,
                committed_internally,
                ..
            } => {
                *optimistic = Some(next);
                *committed_internally = true;
            }
            Controllable::Uncontrolled { current } => *current = next,
        }
        changed
    }

    /// Feed the host's current prop into a controlled instance
    pub fn receive_prop(&mut self, next: T) -> PropChange {
        match self {
            Controllable::Controlled {
                prop,
                optimistic,
                committed_internally,
            } => {
                let was_internal = std::mem::take(committed_internally);
                let expected = optimistic.take();
                let differs = *prop != next;
                *prop = next;

                if was_internal && expected.as_ref() == Some(&*prop) {
                    PropChange::Echo
                } else if differs {
                    PropChange::External
                } else if was_internal {
                    // Host declined the commit and kept its value
                    PropChange::Echo
                } else {
                    PropChange::Unchanged
                }
            }
            Controllable::Uncontrolled { .. } => PropChange::Ignored,
        }
    }
}
