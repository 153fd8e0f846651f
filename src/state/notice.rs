//! Notice Module - Transient auto-dismissing notification.
//!
//! Shows a single message for a fixed duration, then clears it. At most one
//! notification is active at a time: triggers during an active window are
//! dropped, not queued and not replacing the current message. This is the
//! guarded single in-flight pattern the interaction guard relies on.

use std::cell::RefCell;
use std::rc::Rc;

use super::timers::{self, TimerHandle};

/// How long a triggered notice stays visible.
pub const NOTICE_VISIBLE_MS: u64 = 3000;

// =============================================================================
// State
// =============================================================================

struct Inner {
    message: Option<String>,
    /// Pending clear timer; present exactly while `message` is present.
    pending: Option<TimerHandle>,
    visible_ms: u64,
}

/// Transient notification with auto-dismiss.
///
/// Dropping the notice cancels a pending clear so nothing fires against a
/// torn-down view.
pub struct TransientNotice {
    inner: Rc<RefCell<Inner>>,
}

impl TransientNotice {
    /// Create an inactive notice with the standard visible duration.
    pub fn new() -> Self {
        Self::with_duration(NOTICE_VISIBLE_MS)
    }

    /// Create an inactive notice with a custom visible duration.
    pub fn with_duration(visible_ms: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                message: None,
                pending: None,
                visible_ms,
            })),
        }
    }

    /// Show `message` and schedule its clear.
    ///
    /// Returns true if the notice was shown. If a message is already
    /// active this is a no-op returning false: the new trigger is dropped.
    pub fn trigger(&self, message: impl Into<String>) -> bool {
        let weak = Rc::downgrade(&self.inner);
        let mut state = self.inner.borrow_mut();
        if state.message.is_some() {
            return false;
        }

        state.message = Some(message.into());
        let handle = timers::schedule(state.visible_ms, move || {
            let Some(inner) = weak.upgrade() else { return };
            let mut state = inner.borrow_mut();
            // Clear runs exactly once per successful trigger.
            state.message = None;
            state.pending = None;
        });
        state.pending = Some(handle);
        true
    }

    /// The currently visible message, if any.
    pub fn message(&self) -> Option<String> {
        self.inner.borrow().message.clone()
    }

    /// Whether a message is currently visible.
    pub fn is_active(&self) -> bool {
        self.inner.borrow().message.is_some()
    }

    /// Tear down: cancel a pending clear and drop the message.
    pub fn dispose(&self) {
        let mut state = self.inner.borrow_mut();
        if let Some(handle) = state.pending.take() {
            timers::cancel(handle);
        }
        state.message = None;
    }
}

impl Default for TransientNotice {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransientNotice {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        timers::reset_timers();
    }

    #[test]
    fn test_trigger_then_auto_clear() {
        setup();

        let notice = TransientNotice::new();
        assert!(!notice.is_active());

        assert!(notice.trigger("upgrade to pro"));
        assert_eq!(notice.message(), Some("upgrade to pro".to_string()));

        timers::run_until(NOTICE_VISIBLE_MS - 1);
        assert!(notice.is_active());

        timers::run_until(NOTICE_VISIBLE_MS);
        assert!(!notice.is_active());
        assert_eq!(notice.message(), None);
    }

    #[test]
    fn test_retrigger_while_active_is_dropped() {
        setup();

        let notice = TransientNotice::new();
        assert!(notice.trigger("first"));
        assert!(!notice.trigger("second"));

        // First message is what stays shown; one clear timer total.
        assert_eq!(notice.message(), Some("first".to_string()));
        assert_eq!(timers::pending_count(), 1);

        timers::run_until(NOTICE_VISIBLE_MS);
        assert!(!notice.is_active());
        assert_eq!(timers::pending_count(), 0);
    }

    #[test]
    fn test_retrigger_after_clear_works() {
        setup();

        let notice = TransientNotice::new();
        assert!(notice.trigger("first"));
        timers::run_until(NOTICE_VISIBLE_MS);

        assert!(notice.trigger("second"));
        assert_eq!(notice.message(), Some("second".to_string()));
    }

    #[test]
    fn test_custom_duration() {
        setup();

        let notice = TransientNotice::with_duration(100);
        notice.trigger("quick");

        timers::run_until(99);
        assert!(notice.is_active());
        timers::run_until(100);
        assert!(!notice.is_active());
    }

    #[test]
    fn test_dispose_cancels_pending_clear() {
        setup();

        let notice = TransientNotice::new();
        notice.trigger("doomed");
        notice.dispose();

        assert!(!notice.is_active());
        assert_eq!(timers::pending_count(), 0);

        // Nothing fires later against the disposed notice.
        timers::run_until(10_000);
        assert!(!notice.is_active());
    }

    #[test]
    fn test_drop_cancels_pending_clear() {
        setup();

        let notice = TransientNotice::new();
        notice.trigger("doomed");
        drop(notice);

        assert_eq!(timers::pending_count(), 0);
    }
}
