//! Typing Module - Loading sequence controller.
//!
//! Reveals a fixed disclaimer string one character at a time at a uniform
//! interval, reports progress, and signals completion exactly once. This is
//! the splash screen's state machine.
//!
//! Every state change follows the cancel-then-reschedule rule: any pending
//! timer is cancelled before a new one is scheduled, so a controller never
//! has two timers in flight and reveal ticks can never overlap or
//! accelerate. The reveal timer and the completion grace timer are mutually
//! exclusive.
//!
//! # Example
//!
//! ```ignore
//! use neon_shell::state::{timers, typing::TypingSequence};
//!
//! let seq = TypingSequence::start("hello", 40, || println!("done"));
//! timers::run_until(80);
//! assert_eq!(seq.revealed_text(), "he");
//! assert_eq!(seq.progress_percent(), 40.0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::timers::{self, TimerHandle};

/// Delay between the last revealed character and the completion signal.
pub const COMPLETION_GRACE_MS: u64 = 500;

// =============================================================================
// State
// =============================================================================

struct Inner {
    /// Full text, split into characters up front. Immutable after start.
    chars: Vec<char>,
    /// How many characters are revealed. Mutated only by the reveal tick,
    /// monotonically non-decreasing.
    revealed: usize,
    /// Uniform per-character delay.
    speed_ms: u64,
    /// The single pending timer (reveal tick or completion grace).
    pending: Option<TimerHandle>,
    /// True once the grace timer has fired and `on_complete` ran.
    complete: bool,
    /// True after dispose; all callbacks become no-ops.
    disposed: bool,
    /// Completion callback, taken exactly once.
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// Typewriter reveal controller for the splash screen.
///
/// Dropping the controller tears it down: pending timers are cancelled and
/// `on_complete` will never fire afterwards.
pub struct TypingSequence {
    inner: Rc<RefCell<Inner>>,
}

impl TypingSequence {
    /// Start revealing `text` at `speed_ms` per character.
    ///
    /// Empty text is treated as already fully revealed: no reveal ticks
    /// occur and the completion grace timer is scheduled immediately.
    pub fn start(text: &str, speed_ms: u64, on_complete: impl FnOnce() + 'static) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            chars: text.chars().collect(),
            revealed: 0,
            speed_ms,
            pending: None,
            complete: false,
            disposed: false,
            on_complete: Some(Box::new(on_complete)),
        }));
        Self::arm(&inner);
        Self { inner }
    }

    /// Cancel any stale timer and schedule the next one for the current
    /// state: a reveal tick while characters remain, the grace timer once
    /// the text is fully revealed, nothing after completion or dispose.
    fn arm(inner: &Rc<RefCell<Inner>>) {
        let weak = Rc::downgrade(inner);
        let mut state = inner.borrow_mut();

        if let Some(handle) = state.pending.take() {
            timers::cancel(handle);
        }
        if state.disposed || state.complete {
            return;
        }

        let handle = if state.revealed < state.chars.len() {
            timers::schedule(state.speed_ms, move || Self::tick(&weak))
        } else {
            timers::schedule(COMPLETION_GRACE_MS, move || Self::finish(&weak))
        };
        state.pending = Some(handle);
    }

    /// Reveal tick: the only place `revealed` is mutated.
    fn tick(weak: &Weak<RefCell<Inner>>) {
        let Some(inner) = weak.upgrade() else { return };
        {
            let mut state = inner.borrow_mut();
            if state.disposed {
                return;
            }
            state.pending = None;
            state.revealed += 1;
        }
        Self::arm(&inner);
    }

    /// Grace timer fired: invoke `on_complete` exactly once.
    fn finish(weak: &Weak<RefCell<Inner>>) {
        let Some(inner) = weak.upgrade() else { return };
        let callback = {
            let mut state = inner.borrow_mut();
            if state.disposed || state.complete {
                return;
            }
            state.pending = None;
            state.complete = true;
            state.on_complete.take()
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Change the per-character delay.
    ///
    /// Re-arms the controller: the stale timer is cancelled before the new
    /// one is scheduled, so rapid retiming can never duplicate timers or
    /// re-fire completion.
    pub fn set_speed(&self, speed_ms: u64) {
        self.inner.borrow_mut().speed_ms = speed_ms;
        Self::arm(&self.inner);
    }

    /// The revealed prefix of the text.
    pub fn revealed_text(&self) -> String {
        let state = self.inner.borrow();
        state.chars[..state.revealed].iter().collect()
    }

    /// How many characters are revealed so far.
    pub fn revealed_count(&self) -> usize {
        self.inner.borrow().revealed
    }

    /// Reveal progress in percent (0.0..=100.0).
    ///
    /// Empty text reports 100 (already complete, no division by zero).
    pub fn progress_percent(&self) -> f64 {
        let state = self.inner.borrow();
        if state.chars.is_empty() {
            return 100.0;
        }
        state.revealed as f64 / state.chars.len() as f64 * 100.0
    }

    /// True while characters remain to reveal (drives the blinking caret).
    pub fn is_revealing(&self) -> bool {
        let state = self.inner.borrow();
        state.revealed < state.chars.len()
    }

    /// True once the grace delay has elapsed and `on_complete` ran.
    pub fn is_complete(&self) -> bool {
        self.inner.borrow().complete
    }

    /// Tear down: cancel pending timers. No state mutation and no
    /// `on_complete` can happen afterwards.
    pub fn dispose(&self) {
        let mut state = self.inner.borrow_mut();
        state.disposed = true;
        if let Some(handle) = state.pending.take() {
            timers::cancel(handle);
        }
        state.on_complete = None;
    }
}

impl Drop for TypingSequence {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() {
        timers::reset_timers();
    }

    #[test]
    fn test_end_to_end_abc_at_40ms() {
        setup();

        let completions = Rc::new(Cell::new(0u32));
        let c = completions.clone();
        let seq = TypingSequence::start("abc", 40, move || c.set(c.get() + 1));

        assert_eq!(seq.revealed_text(), "");
        assert_eq!(seq.progress_percent(), 0.0);
        assert!(seq.is_revealing());

        timers::run_until(40);
        assert_eq!(seq.revealed_text(), "a");
        assert!((seq.progress_percent() - 100.0 / 3.0).abs() < 1e-9);

        timers::run_until(80);
        assert_eq!(seq.revealed_text(), "ab");
        assert!((seq.progress_percent() - 200.0 / 3.0).abs() < 1e-9);

        timers::run_until(120);
        assert_eq!(seq.revealed_text(), "abc");
        assert_eq!(seq.progress_percent(), 100.0);
        assert!(!seq.is_revealing());
        assert!(!seq.is_complete()); // grace period still pending
        assert_eq!(completions.get(), 0);

        timers::run_until(619);
        assert_eq!(completions.get(), 0);

        timers::run_until(620);
        assert!(seq.is_complete());
        assert_eq!(completions.get(), 1);

        // Long after: still exactly once, nothing pending.
        timers::run_until(10_000);
        assert_eq!(completions.get(), 1);
        assert_eq!(timers::pending_count(), 0);
    }

    #[test]
    fn test_single_timer_in_flight() {
        setup();

        let seq = TypingSequence::start("abcdef", 10, || {});
        assert_eq!(timers::pending_count(), 1);

        timers::run_until(30);
        assert_eq!(seq.revealed_count(), 3);
        assert_eq!(timers::pending_count(), 1);
    }

    #[test]
    fn test_empty_text_completes_after_grace() {
        setup();

        let completions = Rc::new(Cell::new(0u32));
        let c = completions.clone();
        let seq = TypingSequence::start("", 40, move || c.set(c.get() + 1));

        // Progress is 100 at every observed state, no reveal tick pending.
        assert_eq!(seq.progress_percent(), 100.0);
        assert!(!seq.is_revealing());
        assert_eq!(timers::pending_count(), 1);

        timers::run_until(COMPLETION_GRACE_MS - 1);
        assert_eq!(completions.get(), 0);
        assert_eq!(seq.progress_percent(), 100.0);

        timers::run_until(COMPLETION_GRACE_MS);
        assert_eq!(completions.get(), 1);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_dispose_before_completion() {
        setup();

        let completions = Rc::new(Cell::new(0u32));
        let c = completions.clone();
        let seq = TypingSequence::start("abc", 40, move || c.set(c.get() + 1));

        timers::run_until(40);
        assert_eq!(seq.revealed_count(), 1);

        seq.dispose();
        assert_eq!(timers::pending_count(), 0);

        // Wait well past the original expected completion time.
        timers::run_until(5_000);
        assert_eq!(seq.revealed_count(), 1);
        assert_eq!(completions.get(), 0);
        assert!(!seq.is_complete());
    }

    #[test]
    fn test_drop_cancels_pending_timers() {
        setup();

        let completions = Rc::new(Cell::new(0u32));
        let c = completions.clone();
        let seq = TypingSequence::start("ab", 40, move || c.set(c.get() + 1));
        drop(seq);

        assert_eq!(timers::pending_count(), 0);
        timers::run_until(5_000);
        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn test_retiming_never_duplicates_timers_or_completion() {
        setup();

        let completions = Rc::new(Cell::new(0u32));
        let c = completions.clone();
        let seq = TypingSequence::start("ab", 40, move || c.set(c.get() + 1));

        // Rapid retiming mid-reveal: stale timer is always cancelled first.
        seq.set_speed(20);
        seq.set_speed(10);
        assert_eq!(timers::pending_count(), 1);

        timers::run_until(10);
        assert_eq!(seq.revealed_count(), 1);

        timers::run_until(20);
        assert_eq!(seq.revealed_count(), 2);

        // Retiming during the grace window must not re-arm a reveal tick.
        seq.set_speed(5);
        assert_eq!(timers::pending_count(), 1);

        timers::run_until(520);
        assert_eq!(completions.get(), 1);

        // Retiming after completion is inert.
        seq.set_speed(1);
        assert_eq!(timers::pending_count(), 0);
        timers::run_until(10_000);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_revealed_count_is_monotonic() {
        setup();

        let seq = TypingSequence::start("abcd", 25, || {});
        let mut last = 0;
        for t in (0..=700).step_by(7) {
            timers::run_until(t);
            let revealed = seq.revealed_count();
            assert!(revealed >= last);
            last = revealed;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn test_unicode_text_counts_characters() {
        setup();

        let seq = TypingSequence::start("né🦈", 10, || {});
        timers::run_until(20);
        assert_eq!(seq.revealed_text(), "né");
        timers::run_until(30);
        assert_eq!(seq.revealed_text(), "né🦈");
        assert_eq!(seq.progress_percent(), 100.0);
    }
}
