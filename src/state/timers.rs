//! Timers Module - Cooperative timer queue.
//!
//! Single-threaded deferred callbacks, fired by the event loop. Nothing here
//! blocks: a timer is an entry with a deadline on a virtual millisecond
//! clock, and `run_until` advances the clock and fires due entries in
//! deadline order. The pipeline drives the clock from wall time; tests drive
//! it directly, which makes every timing property deterministic.
//!
//! Callbacks may schedule and cancel timers while firing: an entry scheduled
//! during `run_until` whose deadline falls inside the advanced window fires
//! within the same call, in order.
//!
//! # API
//!
//! - `schedule(delay_ms, callback)` - Schedule a one-shot callback
//! - `cancel(handle)` - Cancel a pending timer
//! - `run_until(now_ms)` - Advance the clock, firing due callbacks
//! - `now_ms` - Current virtual clock reading
//!
//! # Example
//!
//! ```ignore
//! use neon_shell::state::timers;
//!
//! let handle = timers::schedule(500, || println!("fired"));
//! timers::run_until(499); // nothing yet
//! timers::run_until(500); // fires
//! ```

use std::cell::RefCell;

// =============================================================================
// Types
// =============================================================================

/// Handle identifying a pending timer. Cancelling a handle that has already
/// fired (or was already cancelled) is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

struct Entry {
    id: u64,
    deadline_ms: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

thread_local! {
    static QUEUE: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
}

// =============================================================================
// Public API
// =============================================================================

/// Schedule a one-shot callback to fire `delay_ms` from the current clock.
///
/// Returns a handle for cancellation.
pub fn schedule(delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerHandle {
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let deadline_ms = queue.now_ms + delay_ms;
        queue.entries.push(Entry {
            id,
            deadline_ms,
            callback: Box::new(callback),
        });
        TimerHandle(id)
    })
}

/// Cancel a pending timer.
///
/// Returns true if the timer was still pending.
pub fn cancel(handle: TimerHandle) -> bool {
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        let before = queue.entries.len();
        queue.entries.retain(|entry| entry.id != handle.0);
        queue.entries.len() != before
    })
}

/// Advance the clock to `now_ms`, firing every due callback in deadline
/// order (ties break by scheduling order).
///
/// The clock never moves backwards: a `now_ms` at or before the current
/// reading fires nothing new. Returns the number of callbacks fired.
pub fn run_until(now_ms: u64) -> usize {
    let mut fired = 0;

    loop {
        // Pull the earliest due entry, releasing the borrow before firing so
        // the callback can schedule and cancel freely.
        let next = QUEUE.with(|queue| {
            let mut queue = queue.borrow_mut();
            let target = now_ms.max(queue.now_ms);
            let due = queue
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.deadline_ms <= target)
                .min_by_key(|(_, entry)| (entry.deadline_ms, entry.id))
                .map(|(position, _)| position);
            due.map(|position| {
                let entry = queue.entries.swap_remove(position);
                queue.now_ms = queue.now_ms.max(entry.deadline_ms);
                entry.callback
            })
        });

        match next {
            Some(callback) => {
                callback();
                fired += 1;
            }
            None => break,
        }
    }

    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.now_ms = queue.now_ms.max(now_ms);
    });

    fired
}

/// Current virtual clock reading in milliseconds.
pub fn now_ms() -> u64 {
    QUEUE.with(|queue| queue.borrow().now_ms)
}

/// Deadline of the nearest pending timer, if any.
pub fn next_deadline() -> Option<u64> {
    QUEUE.with(|queue| queue.borrow().entries.iter().map(|e| e.deadline_ms).min())
}

/// Number of pending timers.
pub fn pending_count() -> usize {
    QUEUE.with(|queue| queue.borrow().entries.len())
}

/// Reset clock and drop all pending timers (for testing).
pub fn reset_timers() {
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.now_ms = 0;
        queue.next_id = 0;
        queue.entries.clear();
    });
}
