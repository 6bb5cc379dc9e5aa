//! Scheduler - Deferred tasks and a virtual clock.
//!
//! Two queues, both single-threaded:
//!
//! - **Tasks** run first-in first-out on [`Scheduler::flush`]. Effects and
//!   setter-triggered re-renders are queued here during a render and run
//!   after it returns. Tasks queued while flushing run in the same flush.
//! - **Timers** fire as the virtual clock moves forward with
//!   [`Scheduler::advance`]. The task queue is drained after every timer
//!   callback, so a timer that sets state sees the re-render completed before
//!   the next timer fires.
//!
//! ```text
//! advance(2):
//!   flush()                       ← leftovers from the last render
//!   tick 1: timer A → flush()     ← re-render + effects caused by A
//!           timer B → flush()
//!   tick 2: ...
//! ```
//!
//! The clock has no unit. Callers decide what a tick means; the demo maps one
//! tick to 100ms of wall time.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use crate::error::{Result, RuntimeError};

/// Maximum tasks a single flush runs before giving up.
pub const DEFAULT_FLUSH_BUDGET: usize = 10_000;

type Task = Box<dyn FnOnce() -> Result<()>>;

enum TimerCallback {
    Once(Box<dyn FnOnce()>),
    Repeat { every: u64, callback: Box<dyn FnMut()> },
}

struct Inner {
    tasks: RefCell<VecDeque<Task>>,
    /// Keyed by (due tick, timer id) so equal due ticks fire in registration order.
    timers: RefCell<BTreeMap<(u64, u64), TimerCallback>>,
    now: Cell<u64>,
    next_timer_id: Cell<u64>,
    /// Timer whose callback is running, and whether it was cancelled meanwhile.
    firing: Cell<Option<u64>>,
    firing_cancelled: Cell<bool>,
    flush_budget: usize,
}

/// Shared handle to one task queue and clock.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<Inner>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::with_flush_budget(DEFAULT_FLUSH_BUDGET)
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flush_budget(flush_budget: usize) -> Self {
        Self {
            inner: Rc::new(Inner {
                tasks: RefCell::new(VecDeque::new()),
                timers: RefCell::new(BTreeMap::new()),
                now: Cell::new(0),
                next_timer_id: Cell::new(0),
                firing: Cell::new(None),
                firing_cancelled: Cell::new(false),
                flush_budget: flush_budget.max(1),
            }),
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Queue a task to run on the next flush.
    pub fn enqueue(&self, task: impl FnOnce() -> Result<()> + 'static) {
        let mut tasks = self.inner.tasks.borrow_mut();
        tasks.push_back(Box::new(task));
        tracing::trace!(pending = tasks.len(), "task queued");
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_tasks() == 0
    }

    fn next_task(&self) -> Option<Task> {
        self.inner.tasks.borrow_mut().pop_front()
    }

    /// Run queued tasks until the queue is empty.
    ///
    /// Returns the number of tasks run. The first failing task stops the
    /// flush and its error is returned; later tasks stay queued.
    pub fn flush(&self) -> Result<usize> {
        let budget = self.inner.flush_budget;
        let mut ran = 0;
        while let Some(task) = self.next_task() {
            task()?;
            ran += 1;
            if ran >= budget && !self.is_idle() {
                tracing::warn!(budget, pending = self.pending_tasks(), "flush budget exhausted");
                return Err(RuntimeError::FlushBudgetExceeded { budget });
            }
        }
        if ran > 0 {
            tracing::trace!(ran, "flush complete");
        }
        Ok(ran)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Current virtual time.
    pub fn now(&self) -> u64 {
        self.inner.now.get()
    }

    fn register(&self, due: u64, callback: TimerCallback) -> TimerHandle {
        let id = self.inner.next_timer_id.get();
        self.inner.next_timer_id.set(id + 1);
        self.inner.timers.borrow_mut().insert((due, id), callback);
        tracing::trace!(id, due, "timer registered");
        TimerHandle {
            id,
            scheduler: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` once, `after` ticks from now.
    pub fn set_timeout(&self, after: u64, f: impl FnOnce() + 'static) -> TimerHandle {
        self.register(self.now() + after, TimerCallback::Once(Box::new(f)))
    }

    /// Run `f` every `every` ticks (at least 1) until cancelled.
    pub fn set_interval(&self, every: u64, f: impl FnMut() + 'static) -> TimerHandle {
        let every = every.max(1);
        self.register(
            self.now() + every,
            TimerCallback::Repeat {
                every,
                callback: Box::new(f),
            },
        )
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Tick at which the earliest timer fires.
    pub fn next_timer_due(&self) -> Option<u64> {
        self.inner.timers.borrow().keys().next().map(|(due, _)| *due)
    }

    fn take_due_timer(&self) -> Option<(u64, TimerCallback)> {
        let now = self.now();
        let mut timers = self.inner.timers.borrow_mut();
        let key = timers.keys().next().copied().filter(|(due, _)| *due <= now)?;
        timers.remove(&key).map(|callback| (key.1, callback))
    }

    fn fire(&self, id: u64, callback: TimerCallback) {
        self.inner.firing.set(Some(id));
        self.inner.firing_cancelled.set(false);
        tracing::trace!(id, now = self.now(), "timer fired");

        match callback {
            TimerCallback::Once(f) => f(),
            TimerCallback::Repeat { every, mut callback } => {
                callback();
                if !self.inner.firing_cancelled.get() {
                    self.inner
                        .timers
                        .borrow_mut()
                        .insert((self.now() + every, id), TimerCallback::Repeat { every, callback });
                }
            }
        }

        self.inner.firing.set(None);
    }

    /// Move the clock forward `ticks` steps, firing due timers.
    ///
    /// Pending tasks are flushed first and after every timer callback.
    /// Returns the number of timers fired.
    pub fn advance(&self, ticks: u64) -> Result<usize> {
        self.flush()?;
        let mut fired = 0;
        for _ in 0..ticks {
            self.inner.now.set(self.now() + 1);
            while let Some((id, callback)) = self.take_due_timer() {
                self.fire(id, callback);
                fired += 1;
                self.flush()?;
            }
        }
        Ok(fired)
    }

    /// Drop every queued task and timer without running them.
    pub fn clear(&self) {
        let tasks = std::mem::take(&mut *self.inner.tasks.borrow_mut());
        let timers = std::mem::take(&mut *self.inner.timers.borrow_mut());
        tracing::debug!(tasks = tasks.len(), timers = timers.len(), "scheduler cleared");
        // closures may own scheduler handles; drop them after the borrows end
        drop(tasks);
        drop(timers);
    }
}

// =============================================================================
// Timer Handle
// =============================================================================

/// Cancels a timer. Dropping the handle does not cancel.
pub struct TimerHandle {
    id: u64,
    scheduler: Weak<Inner>,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the timer. Returns `false` when it already fired or was cancelled.
    pub fn cancel(&self) -> bool {
        let Some(inner) = self.scheduler.upgrade() else {
            return false;
        };
        let key = inner
            .timers
            .borrow()
            .keys()
            .find(|(_, id)| *id == self.id)
            .copied();
        if let Some(key) = key {
            // bind first so the borrow ends before the callback drops
            let removed = inner.timers.borrow_mut().remove(&key);
            drop(removed);
            return true;
        }
        if inner.firing.get() == Some(self.id) && !inner.firing_cancelled.get() {
            inner.firing_cancelled.set(true);
            return true;
        }
        false
    }
}
