//! Frame view - the main shell around the chat pane.
//!
//! Builds the node tree (header with a select-text title block, chat pane,
//! footer), answers guarded interactions through the ancestry scan, and
//! paints the neon chrome. The chat pane is an opaque external region; the
//! shell styles its frame and nothing inside it.

use std::io;

use crate::engine::{self, NodeKind};
use crate::renderer::Screen;
use crate::state::clipboard;
use crate::state::guard::{self, GuardOutcome, InteractionEvent, InteractionKind};
use crate::state::hit;
use crate::state::notice::TransientNotice;
use crate::types::{Attr, Rect, Rgba};

use super::{CHAT_URL, NEON_PALETTE, PROFILE_LABEL, PROFILE_URL, RegistryScan, SHELL_TAGLINE, SHELL_TITLE};

/// The main view.
///
/// Owns its node indices and its own notice instance. `dispose` (or drop)
/// releases the tree.
pub struct Frame {
    root: usize,
    header: usize,
    title: usize,
    chat: usize,
    footer: usize,
    notice: TransientNotice,
    disposed: bool,
}

impl Frame {
    /// Allocate the node tree.
    ///
    /// The header's title block carries the select-text marker, so copy
    /// attempts originating inside it pass the guard.
    pub fn build() -> Self {
        let root = engine::allocate_node(Some("shell_root"), NodeKind::Container);

        engine::push_parent_context(root);

        let header = engine::allocate_node(Some("header"), NodeKind::Container);
        engine::set_select_text(header, true);
        engine::push_parent_context(header);
        let title = engine::allocate_node(Some("title"), NodeKind::Text);
        engine::set_text_content(title, SHELL_TITLE);
        let tagline = engine::allocate_node(Some("tagline"), NodeKind::Text);
        engine::set_text_content(tagline, SHELL_TAGLINE);
        engine::pop_parent_context();

        let chat = engine::allocate_node(Some("chat_pane"), NodeKind::Container);
        engine::set_text_content(chat, CHAT_URL);

        let footer = engine::allocate_node(Some("footer"), NodeKind::Container);
        engine::push_parent_context(footer);
        let profile = engine::allocate_node(Some("profile"), NodeKind::Text);
        engine::set_text_content(profile, PROFILE_LABEL);
        engine::pop_parent_context();

        engine::pop_parent_context();

        Self {
            root,
            header,
            title,
            chat,
            footer,
            notice: TransientNotice::new(),
            disposed: false,
        }
    }

    /// Root node index (the guard's bound container).
    pub fn root(&self) -> usize {
        self.root
    }

    /// This view's notice.
    pub fn notice(&self) -> &TransientNotice {
        &self.notice
    }

    /// Route a guarded interaction originating at `target`.
    ///
    /// Exempted copies read the target region's text into the clipboard;
    /// everything else is suppressed with the upsell notice.
    pub fn handle_interaction(&self, kind: InteractionKind, target: usize) -> GuardOutcome {
        let event = InteractionEvent {
            kind,
            target,
            current_target: self.root,
        };
        let outcome = guard::handle_interaction(&RegistryScan, &event, &self.notice);
        if !outcome.default_prevented && kind == InteractionKind::Copy {
            clipboard::copy(&engine::collect_text(target));
        }
        outcome
    }

    /// Release the node tree and dismiss the notice.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.notice.dispose();
        engine::release_node(self.root);
    }

    /// Draw the frame and refill the hit grid for this layout.
    pub fn render(&self, screen: &mut Screen, width: u16, height: u16) -> io::Result<()> {
        screen.begin_frame()?;

        hit::clear_hit_grid();
        hit::fill_hit_rect(0, 0, width, height, self.root);

        // Header: title, tagline, gradient divider.
        screen.draw_text_centered(0, 0, width, SHELL_TITLE, Rgba::CYAN, Attr::BOLD)?;
        screen.draw_text_centered(0, 1, width, SHELL_TAGLINE, Rgba::rgb(138, 43, 226), Attr::empty())?;
        screen.draw_gradient_line(0, 2, width, &NEON_PALETTE, '━')?;
        hit::fill_hit_rect(0, 0, width, 2, self.header);

        // Chat pane: bordered opaque region. Only the border and label are
        // ours to draw.
        let chat_area = Rect::new(0, 3, width, height.saturating_sub(3).saturating_sub(3));
        if chat_area.height > 0 {
            self.render_chat_border(screen, &chat_area)?;
            let chat_mid = chat_area.y + chat_area.height / 2;
            screen.draw_text_centered(0, chat_mid, width, CHAT_URL, Rgba::GRAY, Attr::DIM)?;
            hit::fill_hit_rect(chat_area.x, chat_area.y, chat_area.width, chat_area.height, self.chat);
        }

        // Footer: divider, profile label, and the notice line when active.
        let footer_top = height.saturating_sub(3);
        screen.draw_gradient_line(0, footer_top, width, &NEON_PALETTE, '━')?;
        screen.draw_text_centered(
            0,
            footer_top + 1,
            width,
            &format!("{PROFILE_LABEL} · {PROFILE_URL}"),
            Rgba::rgb(0, 255, 128),
            Attr::empty(),
        )?;
        hit::fill_hit_rect(0, footer_top, width, 3, self.footer);

        if let Some(message) = self.notice.message() {
            screen.draw_text_centered(
                0,
                footer_top + 2,
                width,
                &format!(" {message} "),
                Rgba::CYAN,
                Attr::BOLD,
            )?;
        }

        // Title row stays on top of the header fill so hit tests resolve to
        // the text node itself.
        hit::fill_hit_rect(0, 0, width, 1, self.title);

        screen.end_frame()
    }

    fn render_chat_border(&self, screen: &mut Screen, area: &Rect) -> io::Result<()> {
        let horizontal = "─".repeat(area.width.saturating_sub(2) as usize);
        let border = Rgba::CYAN;
        let bottom = area.y + area.height - 1;

        screen.draw_text(area.x, area.y, &format!("┌{horizontal}┐"), border, Attr::DIM)?;
        for y in (area.y + 1)..bottom {
            screen.draw_text(area.x, y, "│", border, Attr::DIM)?;
            screen.draw_text(area.x + area.width.saturating_sub(1), y, "│", border, Attr::DIM)?;
        }
        screen.draw_text(area.x, bottom, &format!("└{horizontal}┘"), border, Attr::DIM)
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::guard::UPSELL_NOTICE;
    use crate::state::timers;

    fn setup() {
        timers::reset_timers();
        engine::reset_registry();
        clipboard::clear();
    }

    #[test]
    fn test_build_marks_header_select_text() {
        setup();

        let frame = Frame::build();
        assert!(engine::is_select_text(frame.header));
        assert!(!engine::is_select_text(frame.chat));
        assert_eq!(engine::get_parent_index(frame.title), Some(frame.header));
        assert_eq!(engine::get_parent_index(frame.header), Some(frame.root));
    }

    #[test]
    fn test_copy_on_title_is_exempt_and_fills_clipboard() {
        setup();

        let frame = Frame::build();
        let outcome = frame.handle_interaction(InteractionKind::Copy, frame.title);

        assert_eq!(outcome, GuardOutcome::EXEMPT);
        assert!(!frame.notice.is_active());
        assert_eq!(clipboard::paste(), Some(SHELL_TITLE.to_string()));
    }

    #[test]
    fn test_copy_on_chat_is_prevented_with_notice() {
        setup();

        let frame = Frame::build();
        let outcome = frame.handle_interaction(InteractionKind::Copy, frame.chat);

        assert!(outcome.default_prevented);
        assert!(outcome.notice_shown);
        assert_eq!(frame.notice.message(), Some(UPSELL_NOTICE.to_string()));
        assert!(!clipboard::has_content());
    }

    #[test]
    fn test_context_menu_anywhere_outside_header_is_prevented() {
        setup();

        let frame = Frame::build();
        let on_root = frame.handle_interaction(InteractionKind::ContextMenu, frame.root);
        assert!(on_root.default_prevented);

        // Second attempt while the notice is live: suppressed silently.
        let on_footer = frame.handle_interaction(InteractionKind::ContextMenu, frame.footer);
        assert!(on_footer.default_prevented);
        assert!(!on_footer.notice_shown);
    }

    #[test]
    fn test_notice_expires_then_retriggers() {
        setup();

        let frame = Frame::build();
        frame.handle_interaction(InteractionKind::Copy, frame.chat);
        assert!(frame.notice.is_active());

        timers::run_until(3_000);
        assert!(!frame.notice.is_active());

        let again = frame.handle_interaction(InteractionKind::Copy, frame.chat);
        assert!(again.notice_shown);
    }

    #[test]
    fn test_dispose_releases_the_whole_tree() {
        setup();

        let mut frame = Frame::build();
        assert!(engine::allocated_count() > 0);

        frame.dispose();
        assert_eq!(engine::allocated_count(), 0);

        // Idempotent, and Drop after dispose is a no-op.
        frame.dispose();
    }
}
