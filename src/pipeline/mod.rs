//! Pipeline - Application lifecycle.
//!
//! Wires everything together: mounting sets up the terminal, the timer
//! clock, and the loading view; each tick advances timers from wall time,
//! routes one input event, and paints the active view; unmounting restores
//! the terminal and releases all state.

mod mount;

pub use mount::{MountHandle, Phase, mount, run};
