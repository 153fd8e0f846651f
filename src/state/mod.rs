//! State Module - Runtime state machines.
//!
//! The behavioral core of the shell:
//!
//! - **Timers** - Cooperative timer queue driven by the event loop
//! - **Typing** - Loading sequence controller (typewriter + progress)
//! - **Notice** - Transient auto-dismissing notification
//! - **Guard** - Copy/context-menu interception with exemption scan
//! - **Hit** - Coordinate to node lookup for mouse targeting
//! - **Clipboard** - Internal copy buffer for exempted regions
//! - **Input** - crossterm event conversion and polling

pub mod clipboard;
pub mod guard;
pub mod hit;
pub mod input;
pub mod notice;
pub mod timers;
pub mod typing;
