//! Splash view - the loading sequence.
//!
//! Owns a [`TypingSequence`] revealing the disclaimer, and renders the logo,
//! the typewriter line with a blinking caret, and a progress bar. The caret
//! blinks only while characters remain; once the reveal is done the bar sits
//! at 100% through the completion grace window.

use std::io;

use unicode_width::UnicodeWidthStr;

use crate::renderer::Screen;
use crate::state::timers;
use crate::state::typing::TypingSequence;
use crate::types::{Attr, Rgba};

use super::{DISCLAIMER, LOGO_URL, NEON_PALETTE, SHELL_TITLE, TYPE_SPEED_MS};

/// Caret blink half-period, derived from the shared clock.
const CARET_BLINK_MS: u64 = 500;

/// ASCII fallback for the logo image.
const LOGO_LINES: [&str; 4] = [
    "  _   _  ___  ___  _   _ ",
    " | \\ | || __|/ _ \\| \\ | |",
    " |  \\| || _|| (_) |  \\| |",
    " |_|\\__||___|\\___/|_|\\__|",
];

/// Width of the progress bar in cells.
const BAR_WIDTH: u16 = 30;

/// The loading view.
///
/// Construction starts the reveal; dropping the view cancels it (the owned
/// sequence tears itself down), so an abandoned splash never completes.
pub struct Splash {
    typing: TypingSequence,
    /// Display width of the full text; anchors the typewriter line so it
    /// does not shift as characters appear.
    text_width: u16,
}

impl Splash {
    /// Start the loading sequence. `on_complete` fires exactly once, after
    /// the full disclaimer has been visible for the grace period.
    pub fn new(on_complete: impl FnOnce() + 'static) -> Self {
        Self::with_text(DISCLAIMER, TYPE_SPEED_MS, on_complete)
    }

    /// Start with custom text and speed. Used by tests and demos.
    pub fn with_text(text: &str, speed_ms: u64, on_complete: impl FnOnce() + 'static) -> Self {
        Self {
            typing: TypingSequence::start(text, speed_ms, on_complete),
            text_width: text.width() as u16,
        }
    }

    /// True while the typewriter still has characters to reveal.
    pub fn is_revealing(&self) -> bool {
        self.typing.is_revealing()
    }

    /// True once the sequence has completed (grace period included).
    pub fn is_complete(&self) -> bool {
        self.typing.is_complete()
    }

    /// Reveal progress in percent.
    pub fn progress_percent(&self) -> f64 {
        self.typing.progress_percent()
    }

    /// Whether the caret is in the visible half of its blink at `now_ms`.
    /// The caret exists only while revealing.
    pub fn caret_visible(&self, now_ms: u64) -> bool {
        self.typing.is_revealing() && (now_ms / CARET_BLINK_MS) % 2 == 0
    }

    /// Draw the splash frame.
    pub fn render(&self, screen: &mut Screen, width: u16, height: u16) -> io::Result<()> {
        screen.begin_frame()?;

        let mid = height / 2;
        let logo_top = mid.saturating_sub(6);

        for (i, line) in LOGO_LINES.iter().enumerate() {
            screen.draw_text_centered(
                0,
                logo_top + i as u16,
                width,
                line,
                Rgba::CYAN,
                Attr::BOLD,
            )?;
        }
        screen.draw_text_centered(
            0,
            logo_top + LOGO_LINES.len() as u16,
            width,
            SHELL_TITLE,
            Rgba::rgb(138, 43, 226),
            Attr::BOLD,
        )?;

        // Typewriter line: revealed prefix plus the blinking caret.
        let line_x = if self.text_width >= width {
            0
        } else {
            (width - self.text_width) / 2
        };
        let mut line = self.typing.revealed_text();
        if self.caret_visible(timers::now_ms()) {
            line.push('▌');
        }
        screen.draw_text(line_x, mid + 1, &line, Rgba::WHITE, Attr::empty())?;

        self.render_progress(screen, width, mid + 3)?;

        screen.draw_text_centered(
            0,
            height.saturating_sub(2),
            width,
            LOGO_URL,
            Rgba::GRAY,
            Attr::DIM,
        )?;

        screen.end_frame()
    }

    /// Progress bar and percentage readout.
    fn render_progress(&self, screen: &mut Screen, width: u16, y: u16) -> io::Result<()> {
        let percent = self.typing.progress_percent();
        let filled = (percent / 100.0 * f64::from(BAR_WIDTH)).round() as u16;

        let bar_x = width.saturating_sub(BAR_WIDTH + 6) / 2;
        screen.draw_gradient_line(bar_x, y, filled.min(BAR_WIDTH), &NEON_PALETTE, '█')?;
        if filled < BAR_WIDTH {
            let rest: String = std::iter::repeat('░')
                .take((BAR_WIDTH - filled) as usize)
                .collect();
            screen.draw_text(bar_x + filled, y, &rest, Rgba::GRAY, Attr::DIM)?;
        }
        let label = format!(" {:>3.0}%", percent);
        screen.draw_text(bar_x + BAR_WIDTH, y, &label, Rgba::CYAN, Attr::empty())
    }
}
