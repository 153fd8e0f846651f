//! ANSI escape sequences for terminal control.
//!
//! Cursor movement, screen clearing, truecolor, text attributes, alternate
//! screen, and synchronized output for flicker-free frames.

use crate::types::{Attr, Rgba};
use std::io::Write;

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to absolute position (0-indexed input, 1-indexed sequence).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, x: u16, y: u16) -> std::io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor.
#[inline]
pub fn hide_cursor<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25l")
}

/// Show the cursor.
#[inline]
pub fn show_cursor<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25h")
}

// =============================================================================
// Screen
// =============================================================================

/// Clear the entire screen.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[2J")
}

/// Enter the alternate screen buffer.
#[inline]
pub fn enter_alt_screen<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?1049h")
}

/// Leave the alternate screen buffer.
#[inline]
pub fn leave_alt_screen<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?1049l")
}

/// Begin synchronized output (frames apply atomically where supported).
#[inline]
pub fn begin_sync<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?2026l")
}

// =============================================================================
// Colors and Attributes
// =============================================================================

/// Set the foreground color (truecolor), or the terminal default.
#[inline]
pub fn set_fg<W: Write>(w: &mut W, color: Rgba) -> std::io::Result<()> {
    if color.is_terminal_default() {
        write!(w, "\x1b[39m")
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set the background color (truecolor), or the terminal default.
#[inline]
pub fn set_bg<W: Write>(w: &mut W, color: Rgba) -> std::io::Result<()> {
    if color.is_terminal_default() {
        write!(w, "\x1b[49m")
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set text attributes.
#[inline]
pub fn set_attrs<W: Write>(w: &mut W, attrs: Attr) -> std::io::Result<()> {
    if attrs.contains(Attr::BOLD) {
        write!(w, "\x1b[1m")?;
    }
    if attrs.contains(Attr::DIM) {
        write!(w, "\x1b[2m")?;
    }
    if attrs.contains(Attr::ITALIC) {
        write!(w, "\x1b[3m")?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        write!(w, "\x1b[4m")?;
    }
    Ok(())
}

/// Reset all colors and attributes.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::output::OutputBuffer;

    #[test]
    fn test_cursor_to_is_one_indexed() {
        let mut buffer = OutputBuffer::new();
        cursor_to(&mut buffer, 0, 0).unwrap();
        assert_eq!(buffer.as_str(), "\x1b[1;1H");
    }

    #[test]
    fn test_truecolor_fg() {
        let mut buffer = OutputBuffer::new();
        set_fg(&mut buffer, Rgba::rgb(0, 255, 255)).unwrap();
        assert_eq!(buffer.as_str(), "\x1b[38;2;0;255;255m");
    }

    #[test]
    fn test_terminal_default_fg() {
        let mut buffer = OutputBuffer::new();
        set_fg(&mut buffer, Rgba::TERMINAL_DEFAULT).unwrap();
        assert_eq!(buffer.as_str(), "\x1b[39m");
    }

    #[test]
    fn test_attrs_compose() {
        let mut buffer = OutputBuffer::new();
        set_attrs(&mut buffer, Attr::BOLD | Attr::DIM).unwrap();
        assert_eq!(buffer.as_str(), "\x1b[1m\x1b[2m");
    }
}
