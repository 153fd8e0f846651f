//! Shell - the two views of the application.
//!
//! The splash view runs the loading sequence; the frame view is the neon
//! shell around the embedded chat pane. Both draw through the renderer and
//! register their regions in the hit grid so mouse events resolve to nodes.
//!
//! All external references are build-time constants: the chat endpoint, the
//! profile link, and the splash logo image. None of them are contractual -
//! if an asset is unreachable the shell keeps rendering without it.

mod frame;
mod splash;

pub use frame::Frame;
pub use splash::Splash;

use crate::engine;
use crate::state::guard::AncestryScan;
use crate::types::Rgba;

// =============================================================================
// Fixed external references
// =============================================================================

/// Embedded chat endpoint (opaque; the shell has no contract with its
/// contents, only with its region in the layout).
pub const CHAT_URL: &str = "https://chat.dphn.ai";

/// Profile link shown in the footer, opened externally.
pub const PROFILE_URL: &str = "https://t.me/neonshell";

/// Footer label for the profile link.
pub const PROFILE_LABEL: &str = "Exclusive NEON™ made";

/// Splash logo image asset. The terminal renders the ASCII fallback; the
/// reference only needs to exist and degrade gracefully.
pub const LOGO_URL: &str = "https://neon-shell.dev/assets/logo.png";

// =============================================================================
// Branding
// =============================================================================

/// Header title (select-text region).
pub const SHELL_TITLE: &str = "‹ N E O N ™  C H A T ›";

/// Header tagline.
pub const SHELL_TAGLINE: &str = "LLM BY NEON™";

/// Disclaimer revealed by the splash typewriter.
pub const DISCLAIMER: &str =
    "Unofficial shell. Conversations are handled by an external chat service. \
     Nothing is stored locally.";

/// Uniform typewriter delay per character.
pub const TYPE_SPEED_MS: u64 = 40;

/// Divider gradient palette (ends wrap together).
pub const NEON_PALETTE: [Rgba; 4] = [
    Rgba::rgb(0, 255, 255),   // cyan
    Rgba::rgb(138, 43, 226),  // blue violet
    Rgba::rgb(0, 255, 128),   // spring green
    Rgba::rgb(138, 43, 226),  // blue violet
];

// =============================================================================
// Registry adapter
// =============================================================================

/// [`AncestryScan`] over the engine registry: parent links are node parents,
/// the exemption marker is the select-text flag.
pub struct RegistryScan;

impl AncestryScan for RegistryScan {
    fn parent_of(&self, index: usize) -> Option<usize> {
        engine::get_parent_index(index)
    }

    fn is_exempt(&self, index: usize) -> bool {
        engine::is_select_text(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, NodeKind};
    use crate::state::guard::exemption_on_path;

    #[test]
    fn test_registry_scan_walks_real_nodes() {
        engine::reset_registry();

        let root = engine::allocate_node(None, NodeKind::Container);
        engine::push_parent_context(root);
        let mid = engine::allocate_node(None, NodeKind::Container);
        engine::push_parent_context(mid);
        let leaf = engine::allocate_node(None, NodeKind::Text);
        engine::pop_parent_context();
        engine::pop_parent_context();

        assert!(!exemption_on_path(&RegistryScan, leaf, root));

        engine::set_select_text(mid, true);
        assert!(exemption_on_path(&RegistryScan, leaf, root));
    }
}
