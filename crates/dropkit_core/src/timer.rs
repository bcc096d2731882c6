//! Deferred work
//!
//! The engine never blocks and never spawns. Anything that has to happen
//! "a little later" is queued here with a delay and fires on the first
//! [`TimerQueue::advance`] at or past its deadline. Ids are tracked so a
//! pending task can be cancelled explicitly; that is the only form of
//! cancellation.
//!
//! Deadlines are measured in host time (the `now_ms` passed to `advance`).
//! Hosts do not have to tick every frame, so a task scheduled long after the
//! last tick adds the [`Clock`] time elapsed since that tick; the delay then
//! counts from the event that scheduled it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier for a scheduled task
    pub struct TimerId;
}

/// Monotonic millisecond source used between host ticks
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a dropdown.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Work the controller defers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Pick the initial active option once the list had a chance to mount
    ResolveInitialActive,
    /// Drop typed text left behind by a blur
    ClearStaleQuery,
    /// Forget the type-ahead buffer
    ResetTypeahead,
}

#[derive(Debug)]
struct Pending {
    task: TimerTask,
    due_ms: u64,
    seq: u64,
}

pub struct TimerQueue {
    pending: SlotMap<TimerId, Pending>,
    clock: Arc<dyn Clock>,
    /// Host time of the last `advance`
    now_ms: u64,
    /// Clock reading taken at the last `advance`
    synced_ms: u64,
    seq: u64,
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.pending.len())
            .field("now_ms", &self.now_ms)
            .finish()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let synced_ms = clock.now_ms();
        Self {
            pending: SlotMap::with_key(),
            clock,
            now_ms: 0,
            synced_ms,
            seq: 0,
        }
    }

    /// Current host time: the last `advance` plus clock time since then
    pub fn now(&self) -> u64 {
        let idle = self.clock.now_ms().saturating_sub(self.synced_ms);
        self.now_ms.saturating_add(idle)
    }

    /// Schedule `task` to fire `delay_ms` after the current time
    ///
    /// A zero delay means "on the next advance", whatever time it reports.
    pub fn schedule(&mut self, task: TimerTask, delay_ms: u64) -> TimerId {
        let seq = self.seq;
        self.seq += 1;
        let due_ms = if delay_ms == 0 {
            self.now_ms
        } else {
            self.now().saturating_add(delay_ms)
        };
        let id = self.pending.insert(Pending { task, due_ms, seq });
        tracing::trace!("timer: scheduled {:?} in {}ms", task, delay_ms);
        id
    }

    /// Cancel a task; returns whether it was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Cancel every pending instance of `task`
    pub fn cancel_task(&mut self, task: TimerTask) {
        self.pending.retain(|_, p| p.task != task);
    }

    pub fn is_pending(&self, task: TimerTask) -> bool {
        self.pending.values().any(|p| p.task == task)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and collect due tasks in scheduling order
    pub fn advance(&mut self, now_ms: u64) -> Vec<TimerTask> {
        self.now_ms = self.now_ms.max(now_ms);
        self.synced_ms = self.clock.now_ms();
        let now = self.now_ms;

        let mut due: Vec<(TimerId, u64, u64)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due_ms <= now)
            .map(|(id, p)| (id, p.due_ms, p.seq))
            .collect();
        due.sort_by_key(|&(_, due_ms, seq)| (due_ms, seq));

        due.into_iter()
            .filter_map(|(id, _, _)| self.pending.remove(id))
            .map(|p| p.task)
            .collect()
    }
}
