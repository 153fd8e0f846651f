//! Mount, tick, run, unmount.
//!
//! The shell starts in the loading view; when the loading sequence completes
//! the view is swapped for the main frame. The swap happens inside the
//! sequence's completion callback, so it is driven by the same timer queue
//! as everything else.
//!
//! The tick is the single heartbeat: advance the timer queue to the current
//! wall-clock millisecond, route at most one input event, paint. There is no
//! background thread; all state is owned by the mounting thread.
//!
//! # Example
//!
//! ```ignore
//! use neon_shell::pipeline;
//!
//! let handle = pipeline::mount()?;
//! pipeline::run(&handle)?;
//! handle.unmount()?;
//! ```

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::engine;
use crate::renderer::Screen;
use crate::shell::{Frame, Splash};
use crate::state::guard::InteractionKind;
use crate::state::input::{self, InputEvent, MouseAction, MouseButton};
use crate::state::{hit, timers};

/// Poll timeout per tick; also the effective frame pacing.
const TICK_MS: u64 = 16;

// =============================================================================
// View
// =============================================================================

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Loading sequence running.
    Loading,
    /// Main frame mounted.
    Main,
}

/// The active view: exactly one of the two is populated after mount.
struct View {
    splash: Option<Splash>,
    frame: Option<Frame>,
}

impl View {
    fn phase(&self) -> Phase {
        if self.frame.is_some() {
            Phase::Main
        } else {
            Phase::Loading
        }
    }

    /// Swap loading for the main frame. Dropping the splash tears down its
    /// sequence, so nothing from the loading view can fire afterwards.
    fn complete_loading(&mut self) {
        self.splash = None;
        self.frame = Some(Frame::build());
    }
}

/// What the event router decided.
enum Directive {
    Continue,
    Quit,
    Resized(u16, u16),
}

// =============================================================================
// Mount Handle
// =============================================================================

/// A mounted application.
///
/// Dropping the handle restores mouse capture; the screen restores the
/// terminal itself on drop.
pub struct MountHandle {
    running: Arc<AtomicBool>,
    view: Rc<RefCell<View>>,
    screen: RefCell<Screen>,
    started: Instant,
    size: Cell<(u16, u16)>,
}

/// Mount the application: fullscreen terminal, mouse capture, fresh timer
/// clock, loading view armed.
pub fn mount() -> io::Result<MountHandle> {
    timers::reset_timers();
    engine::reset_registry();
    hit::reset_hit_state();

    let (width, height) = crossterm::terminal::size()?;
    hit::resize_hit_grid(width, height);

    let mut screen = Screen::new();
    screen.enter_fullscreen()?;
    input::enable_mouse()?;

    let view = Rc::new(RefCell::new(View {
        splash: None,
        frame: None,
    }));
    let weak = Rc::downgrade(&view);
    let splash = Splash::new(move || {
        if let Some(view) = weak.upgrade() {
            view.borrow_mut().complete_loading();
        }
    });
    view.borrow_mut().splash = Some(splash);

    Ok(MountHandle {
        running: Arc::new(AtomicBool::new(true)),
        view,
        screen: RefCell::new(screen),
        started: Instant::now(),
        size: Cell::new((width, height)),
    })
}

/// Run the tick loop until the application stops.
pub fn run(handle: &MountHandle) -> io::Result<()> {
    while handle.tick()? {}
    Ok(())
}

impl MountHandle {
    /// One heartbeat: timers, one input event, paint.
    ///
    /// Returns false once the application has stopped.
    pub fn tick(&self) -> io::Result<bool> {
        if !self.is_running() {
            return Ok(false);
        }

        timers::run_until(self.started.elapsed().as_millis() as u64);

        if let Some(event) = input::poll_event(Duration::from_millis(TICK_MS))? {
            match dispatch(&self.view, &event) {
                Directive::Continue => {}
                Directive::Quit => self.stop(),
                Directive::Resized(width, height) => {
                    self.size.set((width, height));
                    hit::resize_hit_grid(width, height);
                }
            }
        }

        self.render()?;
        Ok(self.is_running())
    }

    fn render(&self) -> io::Result<()> {
        let (width, height) = self.size.get();
        let view = self.view.borrow();
        let mut screen = self.screen.borrow_mut();
        if let Some(frame) = &view.frame {
            frame.render(&mut screen, width, height)
        } else if let Some(splash) = &view.splash {
            splash.render(&mut screen, width, height)
        } else {
            Ok(())
        }
    }

    /// Current view phase.
    pub fn phase(&self) -> Phase {
        self.view.borrow().phase()
    }

    /// Whether the application is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Request a stop; the current tick finishes, the next returns false.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Tear down: views released, mouse capture off, terminal restored.
    pub fn unmount(self) -> io::Result<()> {
        self.stop();
        {
            let mut view = self.view.borrow_mut();
            view.frame = None;
            view.splash = None;
        }
        input::disable_mouse()?;
        self.screen.borrow_mut().leave_fullscreen()
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        // Best effort if unmount was skipped
        let _ = input::disable_mouse();
    }
}

// =============================================================================
// Event Routing
// =============================================================================

/// Route one input event to the active view.
///
/// Quit keys work in both phases. Guarded interactions (Ctrl+C, right
/// click) only exist once the main frame is up; the loading view ignores
/// them. The guard's bound container is the frame root, and the event
/// target is the node under the mouse, falling back to the root.
fn dispatch(view: &RefCell<View>, event: &InputEvent) -> Directive {
    match event {
        InputEvent::Key(key) if key.is_press() => {
            if key.key == "Escape" || (key.key == "q" && !key.modifiers.ctrl) {
                return Directive::Quit;
            }
            if key.key == "c" && key.modifiers.ctrl {
                let view = view.borrow();
                if let Some(frame) = &view.frame {
                    let target = hit::hovered_node().unwrap_or(frame.root());
                    frame.handle_interaction(InteractionKind::Copy, target);
                }
            }
            Directive::Continue
        }
        InputEvent::Mouse(mouse) => {
            hit::set_mouse_position(mouse.x, mouse.y);
            if mouse.action == MouseAction::Down && mouse.button == MouseButton::Right {
                let view = view.borrow();
                if let Some(frame) = &view.frame {
                    let target = hit::hit_test(mouse.x, mouse.y).unwrap_or(frame.root());
                    frame.handle_interaction(InteractionKind::ContextMenu, target);
                }
            }
            Directive::Continue
        }
        InputEvent::Resize(width, height) => Directive::Resized(*width, *height),
        _ => Directive::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clipboard;
    use crate::state::input::{KeyboardEvent, Modifiers, MouseEvent};

    fn setup() -> Rc<RefCell<View>> {
        timers::reset_timers();
        engine::reset_registry();
        hit::reset_hit_state();
        clipboard::clear();
        Rc::new(RefCell::new(View {
            splash: None,
            frame: None,
        }))
    }

    fn key(k: &str) -> InputEvent {
        InputEvent::Key(KeyboardEvent::new(k))
    }

    fn ctrl_key(k: &str) -> InputEvent {
        InputEvent::Key(KeyboardEvent::with_modifiers(k, Modifiers::ctrl()))
    }

    fn right_click(x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            action: MouseAction::Down,
            button: MouseButton::Right,
            x,
            y,
            modifiers: Modifiers::none(),
        })
    }

    #[test]
    fn test_loading_hands_off_to_frame_on_completion() {
        let view = setup();

        let weak = Rc::downgrade(&view);
        let splash = Splash::with_text("ab", 40, move || {
            if let Some(view) = weak.upgrade() {
                view.borrow_mut().complete_loading();
            }
        });
        view.borrow_mut().splash = Some(splash);
        assert_eq!(view.borrow().phase(), Phase::Loading);

        // Fully revealed but still inside the grace window.
        timers::run_until(80);
        assert_eq!(view.borrow().phase(), Phase::Loading);

        timers::run_until(580);
        let v = view.borrow();
        assert_eq!(v.phase(), Phase::Main);
        assert!(v.splash.is_none());
        assert!(v.frame.is_some());
    }

    #[test]
    fn test_quit_keys_work_in_both_phases() {
        let view = setup();
        assert!(matches!(dispatch(&view, &key("Escape")), Directive::Quit));
        assert!(matches!(dispatch(&view, &key("q")), Directive::Quit));

        view.borrow_mut().frame = Some(Frame::build());
        assert!(matches!(dispatch(&view, &key("Escape")), Directive::Quit));
        // Ctrl+Q is not a quit chord.
        assert!(matches!(
            dispatch(&view, &ctrl_key("q")),
            Directive::Continue
        ));
    }

    #[test]
    fn test_guarded_events_ignored_while_loading() {
        let view = setup();
        view.borrow_mut().splash = Some(Splash::with_text("ab", 40, || {}));

        dispatch(&view, &ctrl_key("c"));
        dispatch(&view, &right_click(5, 5));
        assert!(!clipboard::has_content());
    }

    #[test]
    fn test_ctrl_c_over_guarded_region_is_suppressed() {
        let view = setup();
        view.borrow_mut().frame = Some(Frame::build());

        // Mouse over an unmarked region; copy falls back to the root path.
        dispatch(&view, &ctrl_key("c"));

        let v = view.borrow();
        let frame = v.frame.as_ref().unwrap();
        assert!(frame.notice().is_active());
        assert!(!clipboard::has_content());
    }

    #[test]
    fn test_ctrl_c_over_title_copies() {
        let view = setup();
        view.borrow_mut().frame = Some(Frame::build());

        let title = engine::get_index("title").unwrap();
        hit::fill_hit_rect(0, 0, 80, 1, title);
        dispatch(&view, &InputEvent::Mouse(MouseEvent {
            action: MouseAction::Move,
            button: MouseButton::None,
            x: 10,
            y: 0,
            modifiers: Modifiers::none(),
        }));
        dispatch(&view, &ctrl_key("c"));

        let v = view.borrow();
        assert!(clipboard::has_content());
        assert!(!v.frame.as_ref().unwrap().notice().is_active());
    }

    #[test]
    fn test_right_click_targets_hit_tested_node() {
        let view = setup();
        view.borrow_mut().frame = Some(Frame::build());

        let chat = engine::get_index("chat_pane").unwrap();
        hit::fill_hit_rect(0, 5, 80, 10, chat);
        dispatch(&view, &right_click(40, 8));

        let v = view.borrow();
        assert!(v.frame.as_ref().unwrap().notice().is_active());
        assert_eq!(hit::mouse_position(), (40, 8));
    }

    #[test]
    fn test_resize_directive_carries_new_size() {
        let view = setup();
        match dispatch(&view, &InputEvent::Resize(120, 40)) {
            Directive::Resized(width, height) => {
                assert_eq!((width, height), (120, 40));
            }
            _ => panic!("expected resize directive"),
        }
    }
}
