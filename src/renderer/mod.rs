//! Renderer - terminal output for the shell views.
//!
//! A thin painting layer: an [`OutputBuffer`] that batches a frame into one
//! syscall, raw escape-sequence helpers in [`ansi`], and a [`Screen`] that
//! owns the fullscreen terminal session and offers the drawing calls the
//! shell views use.

pub mod ansi;
pub mod output;

pub use output::OutputBuffer;

use std::io;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use unicode_width::UnicodeWidthStr;

use crate::types::{Attr, Rgba};

// =============================================================================
// Screen
// =============================================================================

/// Fullscreen terminal session plus frame painting.
///
/// Entering switches to the alternate screen in raw mode with the cursor
/// hidden; leaving (or dropping) restores the terminal.
pub struct Screen {
    output: OutputBuffer,
    fullscreen: bool,
}

impl Screen {
    /// Create a screen without touching the terminal yet.
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            fullscreen: false,
        }
    }

    /// Enter raw-mode alternate screen with hidden cursor.
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        ansi::enter_alt_screen(&mut self.output)?;
        ansi::hide_cursor(&mut self.output)?;
        ansi::clear_screen(&mut self.output)?;
        self.output.flush_stdout()?;
        self.fullscreen = true;
        Ok(())
    }

    /// Restore the terminal.
    pub fn leave_fullscreen(&mut self) -> io::Result<()> {
        if !self.fullscreen {
            return Ok(());
        }
        ansi::reset(&mut self.output)?;
        ansi::show_cursor(&mut self.output)?;
        ansi::leave_alt_screen(&mut self.output)?;
        self.output.flush_stdout()?;
        disable_raw_mode()?;
        self.fullscreen = false;
        Ok(())
    }

    /// Begin a frame: synchronized output, cleared screen.
    pub fn begin_frame(&mut self) -> io::Result<()> {
        ansi::begin_sync(&mut self.output)?;
        ansi::clear_screen(&mut self.output)
    }

    /// End a frame: reset styling, close the sync block, flush once.
    pub fn end_frame(&mut self) -> io::Result<()> {
        ansi::reset(&mut self.output)?;
        ansi::end_sync(&mut self.output)?;
        self.output.flush_stdout()
    }

    /// Draw styled text at a position.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: Attr) -> io::Result<()> {
        ansi::cursor_to(&mut self.output, x, y)?;
        ansi::set_attrs(&mut self.output, attrs)?;
        ansi::set_fg(&mut self.output, fg)?;
        self.output.write_str(text);
        ansi::reset(&mut self.output)
    }

    /// Draw text centered within `[x, x + width)`, truncating if needed.
    pub fn draw_text_centered(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        fg: Rgba,
        attrs: Attr,
    ) -> io::Result<()> {
        let text_width = text.width() as u16;
        let start = if text_width >= width {
            x
        } else {
            x + (width - text_width) / 2
        };
        self.draw_text(start, y, text, fg, attrs)
    }

    /// Draw a horizontal line colored by interpolating across a palette.
    ///
    /// The palette wraps the ends together so the line reads as one
    /// continuous gradient.
    pub fn draw_gradient_line(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        palette: &[Rgba],
        glyph: char,
    ) -> io::Result<()> {
        if palette.is_empty() || width == 0 {
            return Ok(());
        }
        ansi::cursor_to(&mut self.output, x, y)?;
        for i in 0..width {
            let t = i as f32 / width.max(1) as f32 * palette.len() as f32;
            let slot = (t as usize) % palette.len();
            let next = (slot + 1) % palette.len();
            let color = Rgba::lerp(palette[slot], palette[next], t.fract());
            ansi::set_fg(&mut self.output, color)?;
            self.output.write_char(glyph);
        }
        ansi::reset(&mut self.output)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        // Best effort restore
        let _ = self.leave_fullscreen();
    }
}
