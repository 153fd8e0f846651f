//! Node Registry - Index allocation and tree structure.
//!
//! Manages the lifecycle of node indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Parent links, select-text markers, text content per node
//! - Parent context stack for nested node creation
//! - Destroy callbacks per node

use std::cell::RefCell;
use std::collections::HashMap;

// =============================================================================
// Types
// =============================================================================

/// Kind of node in the shell tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Container region (no own text).
    #[default]
    Container,
    /// Text region.
    Text,
}

/// Per-node state slot.
#[derive(Debug, Clone, Default)]
struct NodeSlot {
    kind: NodeKind,
    parent: Option<usize>,
    select_text: bool,
    text: Option<String>,
    occupied: bool,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map node ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to node ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Per-index node slots.
    static NODES: RefCell<Vec<NodeSlot>> = RefCell::new(Vec::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Stack of parent indices for nested node creation.
    static PARENT_STACK: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if at root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| stack.borrow_mut().push(index));
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

// =============================================================================
// Node Allocation
// =============================================================================

/// Allocate an index for a new node.
///
/// The node's parent is the current top of the parent context stack.
///
/// # Arguments
/// * `id` - Optional node ID. If not provided, one is generated.
/// * `kind` - Container or Text.
///
/// # Returns
/// The allocated index.
pub fn allocate_node(id: Option<&str>, kind: NodeKind) -> usize {
    let node_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("n{}", *counter);
            *counter += 1;
            id
        }),
    };

    // Already allocated under this ID
    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&node_id).copied());
    if let Some(index) = existing {
        return index;
    }

    // Reuse free index or allocate new
    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(node_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, node_id);
    });

    let parent = get_current_parent_index();
    NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        if nodes.len() <= index {
            nodes.resize_with(index + 1, NodeSlot::default);
        }
        nodes[index] = NodeSlot {
            kind,
            parent,
            select_text: false,
            text: None,
            occupied: true,
        };
    });

    index
}

/// Release an index back to the pool.
///
/// Also recursively releases all children.
pub fn release_node(index: usize) {
    let id = INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned());
    let Some(id) = id else { return };

    // Find and release all children first. Collected up front to avoid
    // mutating the slot table while iterating it.
    let children: Vec<usize> = NODES.with(|nodes| {
        nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupied && slot.parent == Some(index))
            .map(|(child, _)| child)
            .collect()
    });
    for child in children {
        release_node(child);
    }

    run_destroy_callbacks(index);

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    NODES.with(|nodes| {
        if let Some(slot) = nodes.borrow_mut().get_mut(index) {
            *slot = NodeSlot::default();
        }
    });
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    // When the last node is gone, drop all bookkeeping so a remount starts
    // from a clean slate.
    let is_empty = INDEX_TO_ID.with(|map| map.borrow().is_empty());
    if is_empty {
        NODES.with(|nodes| nodes.borrow_mut().clear());
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Node State
// =============================================================================

fn with_slot<T>(index: usize, f: impl FnOnce(&NodeSlot) -> T) -> Option<T> {
    NODES.with(|nodes| {
        let nodes = nodes.borrow();
        nodes.get(index).filter(|slot| slot.occupied).map(f)
    })
}

fn with_slot_mut(index: usize, f: impl FnOnce(&mut NodeSlot)) {
    NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        if let Some(slot) = nodes.get_mut(index).filter(|slot| slot.occupied) {
            f(slot);
        }
    });
}

/// Get a node's parent index.
pub fn get_parent_index(index: usize) -> Option<usize> {
    with_slot(index, |slot| slot.parent).flatten()
}

/// Get a node's kind.
pub fn node_kind(index: usize) -> Option<NodeKind> {
    with_slot(index, |slot| slot.kind)
}

/// Check whether a node carries the select-text marker.
pub fn is_select_text(index: usize) -> bool {
    with_slot(index, |slot| slot.select_text).unwrap_or(false)
}

/// Mark or unmark a node as select-text (exempt from the interaction guard).
pub fn set_select_text(index: usize, select_text: bool) {
    with_slot_mut(index, |slot| slot.select_text = select_text);
}

/// Get a node's own text content.
pub fn text_content(index: usize) -> Option<String> {
    with_slot(index, |slot| slot.text.clone()).flatten()
}

/// Set a node's own text content.
pub fn set_text_content(index: usize, text: impl Into<String>) {
    with_slot_mut(index, |slot| slot.text = Some(text.into()));
}

/// Collect a node's text together with all descendant text, in index order.
///
/// Lines are joined with '\n'. Used when an exempted copy needs the
/// target region's content.
pub fn collect_text(index: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(text) = text_content(index) {
        parts.push(text);
    }
    let children: Vec<usize> = NODES.with(|nodes| {
        nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupied && slot.parent == Some(index))
            .map(|(child, _)| child)
            .collect()
    });
    for child in children {
        let text = collect_text(child);
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join("\n")
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the node at `index` is released.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a node ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    with_slot(index, |_| ()).is_some()
}

/// Get the count of currently allocated nodes.
pub fn allocated_count() -> usize {
    INDEX_TO_ID.with(|map| map.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    NODES.with(|nodes| nodes.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_node() {
        reset_registry();

        let idx1 = allocate_node(None, NodeKind::Container);
        let idx2 = allocate_node(None, NodeKind::Text);
        let idx3 = allocate_node(Some("header"), NodeKind::Container);

        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(idx3, 2);

        assert!(is_allocated(0));
        assert!(is_allocated(2));
        assert!(!is_allocated(3));
        assert_eq!(allocated_count(), 3);
        assert_eq!(node_kind(1), Some(NodeKind::Text));
    }

    #[test]
    fn test_release_and_reuse() {
        reset_registry();

        let idx1 = allocate_node(None, NodeKind::Container);
        let idx2 = allocate_node(None, NodeKind::Container);

        release_node(idx1);
        assert!(!is_allocated(idx1));
        assert!(is_allocated(idx2));

        // Should reuse the freed index
        let idx3 = allocate_node(None, NodeKind::Container);
        assert_eq!(idx3, idx1);
    }

    #[test]
    fn test_id_mapping() {
        reset_registry();

        let idx = allocate_node(Some("chat_pane"), NodeKind::Container);
        assert_eq!(get_index("chat_pane"), Some(idx));
        assert_eq!(get_id(idx), Some("chat_pane".to_string()));
    }

    #[test]
    fn test_parent_context() {
        reset_registry();

        assert_eq!(get_current_parent_index(), None);

        let root = allocate_node(None, NodeKind::Container);
        assert_eq!(get_parent_index(root), None);

        push_parent_context(root);
        let child = allocate_node(None, NodeKind::Text);
        assert_eq!(get_parent_index(child), Some(root));

        push_parent_context(child);
        assert_eq!(get_current_parent_index(), Some(child));
        pop_parent_context();
        pop_parent_context();
        assert_eq!(get_current_parent_index(), None);
    }

    #[test]
    fn test_release_is_recursive() {
        reset_registry();

        let root = allocate_node(None, NodeKind::Container);
        push_parent_context(root);
        let mid = allocate_node(None, NodeKind::Container);
        push_parent_context(mid);
        let leaf = allocate_node(None, NodeKind::Text);
        pop_parent_context();
        pop_parent_context();

        release_node(root);
        assert!(!is_allocated(root));
        assert!(!is_allocated(mid));
        assert!(!is_allocated(leaf));
        assert_eq!(allocated_count(), 0);
    }

    #[test]
    fn test_select_text_marker() {
        reset_registry();

        let idx = allocate_node(None, NodeKind::Text);
        assert!(!is_select_text(idx));

        set_select_text(idx, true);
        assert!(is_select_text(idx));

        // Released slots never report the marker
        release_node(idx);
        assert!(!is_select_text(idx));
    }

    #[test]
    fn test_collect_text() {
        reset_registry();

        let root = allocate_node(None, NodeKind::Container);
        push_parent_context(root);
        let title = allocate_node(None, NodeKind::Text);
        set_text_content(title, "Title");
        let tagline = allocate_node(None, NodeKind::Text);
        set_text_content(tagline, "Tagline");
        pop_parent_context();

        assert_eq!(collect_text(root), "Title\nTagline");
        assert_eq!(collect_text(title), "Title");
    }

    #[test]
    fn test_destroy_callback() {
        use std::cell::Cell;
        use std::rc::Rc;

        reset_registry();

        let called = Rc::new(Cell::new(false));
        let called_clone = called.clone();

        let idx = allocate_node(None, NodeKind::Container);
        on_destroy(idx, move || {
            called_clone.set(true);
        });

        assert!(!called.get());
        release_node(idx);
        assert!(called.get());
    }
}
