//! Hit Module - Coordinate to node lookup.
//!
//! `HitGrid` maps terminal cells to node indices in O(1). The shell fills
//! the grid while rendering; the pipeline queries it to resolve mouse events
//! to a target node for the interaction guard.

use std::cell::{Cell, RefCell};

// =============================================================================
// HIT GRID - O(1) Coordinate to Node Lookup
// =============================================================================

/// A grid for O(1) mouse hit detection.
///
/// Each cell contains the node index that occupies that position,
/// or `None` if empty.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    /// Create a new hit grid with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![usize::MAX; size],
        }
    }

    /// Get the grid width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the grid height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.cells.resize(size, usize::MAX);
        self.clear();
    }

    /// Clear all cells.
    pub fn clear(&mut self) {
        self.cells.fill(usize::MAX);
    }

    /// Fill a rectangle with a node index.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, index: usize) {
        for dy in 0..height {
            let cy = y + dy;
            if cy >= self.height {
                break;
            }
            for dx in 0..width {
                let cx = x + dx;
                if cx >= self.width {
                    break;
                }
                let idx = cy as usize * self.width as usize + cx as usize;
                if idx < self.cells.len() {
                    self.cells[idx] = index;
                }
            }
        }
    }

    /// Get the node index at a position.
    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let value = self.cells.get(idx).copied().unwrap_or(usize::MAX);
        if value == usize::MAX { None } else { Some(value) }
    }
}

// =============================================================================
// GLOBAL HIT GRID
// =============================================================================

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(80, 24));

    /// Last known mouse position, updated on every mouse event.
    static MOUSE_POS: Cell<(u16, u16)> = const { Cell::new((0, 0)) };
}

/// Resize the global hit grid.
pub fn resize_hit_grid(width: u16, height: u16) {
    HIT_GRID.with(|g| g.borrow_mut().resize(width, height));
}

/// Clear the global hit grid.
pub fn clear_hit_grid() {
    HIT_GRID.with(|g| g.borrow_mut().clear());
}

/// Fill a rectangle in the global hit grid.
pub fn fill_hit_rect(x: u16, y: u16, width: u16, height: u16, index: usize) {
    HIT_GRID.with(|g| g.borrow_mut().fill_rect(x, y, width, height, index));
}

/// Get the node at a position from the global hit grid.
pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

/// Record the last mouse position.
pub fn set_mouse_position(x: u16, y: u16) {
    MOUSE_POS.with(|pos| pos.set((x, y)));
}

/// Last known mouse position.
pub fn mouse_position() -> (u16, u16) {
    MOUSE_POS.with(|pos| pos.get())
}

/// Node currently under the mouse, if any.
pub fn hovered_node() -> Option<usize> {
    let (x, y) = mouse_position();
    hit_test(x, y)
}

/// Reset grid and mouse position (for testing).
pub fn reset_hit_state() {
    HIT_GRID.with(|g| g.borrow_mut().resize(80, 24));
    MOUSE_POS.with(|pos| pos.set((0, 0)));
}
