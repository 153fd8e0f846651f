//! Guard Module - Copy and context-menu interception.
//!
//! Suppresses copy and context-menu interactions on the shell container
//! unless the interaction passed through a select-text node on its way up
//! the tree, and surfaces a transient upsell notice otherwise.
//!
//! The exemption scan is expressed over an abstract [`AncestryScan`] so the
//! walk is independent of the node tree representation: anything with parent
//! links and an exemption marker can be guarded.

use super::notice::TransientNotice;

/// Notice shown when a guarded interaction is suppressed.
pub const UPSELL_NOTICE: &str = "This feature will be available in the Pro edition";

// =============================================================================
// Types
// =============================================================================

/// Tree access needed by the exemption scan.
pub trait AncestryScan {
    /// Parent of `index`, or None at the root.
    fn parent_of(&self, index: usize) -> Option<usize>;

    /// Whether `index` carries the exemption (select-text) marker.
    fn is_exempt(&self, index: usize) -> bool;
}

/// Kind of guarded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Copy attempt (clipboard shortcut).
    Copy,
    /// Context-menu attempt (right click).
    ContextMenu,
}

/// A guarded interaction event.
#[derive(Debug, Clone, Copy)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    /// Leaf node the interaction originated from.
    pub target: usize,
    /// Bound container: exclusive upper bound of the ancestry walk.
    pub current_target: usize,
}

/// What the guard decided for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    /// The default action was suppressed.
    pub default_prevented: bool,
    /// A notice was shown for this event (false when one was already active).
    pub notice_shown: bool,
}

impl GuardOutcome {
    /// Outcome of the exemption fast path: nothing suppressed, no notice.
    pub const EXEMPT: Self = Self {
        default_prevented: false,
        notice_shown: false,
    };
}

// =============================================================================
// Exemption Scan
// =============================================================================

/// Walk from `target` (inclusive) up strict ancestors until `container`
/// (exclusive) or a missing parent, testing the exemption marker at each
/// visited node.
///
/// Bounded by tree depth between target and container.
pub fn exemption_on_path<S: AncestryScan>(scan: &S, target: usize, container: usize) -> bool {
    let mut node = target;
    while node != container {
        if scan.is_exempt(node) {
            return true;
        }
        match scan.parent_of(node) {
            Some(parent) => node = parent,
            None => return false,
        }
    }
    false
}

// =============================================================================
// Guard
// =============================================================================

/// Handle a guarded interaction.
///
/// Exemption fast path: if any node on the target→container path is exempt,
/// return immediately without suppressing and without a notice. Otherwise
/// suppress the default action and attempt the upsell notice; an already
/// active notice silently drops the attempt.
///
/// The guard holds no state of its own between invocations.
pub fn handle_interaction<S: AncestryScan>(
    scan: &S,
    event: &InteractionEvent,
    notice: &TransientNotice,
) -> GuardOutcome {
    if exemption_on_path(scan, event.target, event.current_target) {
        return GuardOutcome::EXEMPT;
    }

    let notice_shown = notice.trigger(UPSELL_NOTICE);
    GuardOutcome {
        default_prevented: true,
        notice_shown,
    }
}
