//! Clipboard Module - Internal copy buffer.
//!
//! Holds the text of an exempted copy (a select-text region the guard let
//! through). Internal buffer only, no system clipboard integration.

use std::cell::RefCell;

thread_local! {
    /// Internal clipboard buffer.
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Copy text to the buffer.
///
/// Empty strings are ignored (clipboard not modified).
pub fn copy(text: &str) {
    if text.is_empty() {
        return;
    }
    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = Some(text.to_string());
    });
}

/// Read the most recently copied text, or None if the buffer is empty.
pub fn paste() -> Option<String> {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().clone())
}

/// Clear the buffer.
pub fn clear() {
    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = None;
    });
}

/// Check if the buffer has content.
pub fn has_content() -> bool {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().is_some())
}
