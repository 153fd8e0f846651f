//! NeonShell - a neon-styled terminal shell around an external chat service.
//!
//! The shell boots through a typewriter loading sequence, then mounts the
//! main frame: a select-text header, a bordered chat pane it treats as
//! opaque, and a footer. Copy and context-menu interactions anywhere in the
//! frame are suppressed with an upsell notice unless they originate inside
//! a select-text region.
//!
//! # Architecture
//!
//! ```text
//!   crossterm events            timer queue (virtual ms clock)
//!        │                            │
//!        ▼                            ▼
//!   ┌─────────────────────────────────────────┐
//!   │ pipeline: mount → tick loop → unmount    │
//!   │   routes events, advances timers, paints │
//!   └─────┬──────────────────────────┬────────┘
//!         │                          │
//!         ▼                          ▼
//!   shell views                 state machines
//!   (splash, frame)             (typing, notice, guard,
//!         │                      hit grid, clipboard)
//!         ▼
//!   engine node tree ── ancestry walk ──▶ guard exemption
//!         │
//!         ▼
//!   renderer (batched ANSI frames)
//! ```
//!
//! Everything timer-driven runs off one cooperative queue keyed by a
//! millisecond clock, so behavior is deterministic and directly testable
//! without sleeping.

pub mod engine;
pub mod pipeline;
pub mod renderer;
pub mod shell;
pub mod state;
pub mod types;

pub use pipeline::{MountHandle, Phase, mount, run};
pub use shell::{Frame, Splash};
pub use state::guard::{GuardOutcome, InteractionKind};
pub use state::notice::TransientNotice;
pub use state::typing::TypingSequence;
