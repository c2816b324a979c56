//! # Versioned State Store
//!
//! Owns the one live [`EditorState`] and its history.
//!
//! ## Design
//!
//! - Every transition replaces the state with `current ⊕ patch`
//! - A tracked transition first snapshots the current state onto the undo stack
//!   and clears the redo stack
//! - Undo moves the current state onto the redo stack and restores the most
//!   recent snapshot; redo is the mirror image
//! - The undo stack holds at most [`HISTORY_CAPACITY`] entries, oldest evicted
//! - Subscribers are told the label of every transition, synchronously
//!
//! History covers editor state only. Live tree edits already made in the
//! sandbox are not rolled back by `undo`.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut store = StateStore::new();
//! store.subscribe(|state, label| println!("{label}: {:?}", state.selected_node_id));
//!
//! store.set(StatePatch::new().selected(Some(id)), labels::SELECT_NODE, false);
//! store.set(StatePatch::new().last_style_change(Some(change)), labels::STYLE_CHANGE, true);
//!
//! store.undo();
//! store.redo();
//! ```

use crate::state::{EditorState, StatePatch};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// Maximum number of undo levels
pub const HISTORY_CAPACITY: usize = 120;

/// Change labels delivered to subscribers
pub mod labels {
    pub const UPDATE: &str = "update";
    pub const INITIAL_LOAD: &str = "initial-load";
    pub const SELECT_NODE: &str = "select-node";
    pub const STYLE_CHANGE: &str = "style-change";
    pub const STRUCTURE_ACTION: &str = "structure-action";
    pub const REGISTRY_LOADED: &str = "registry-loaded";
    pub const TOOL_ADDED: &str = "tool-added";
    pub const VIEWPORT: &str = "viewport";
    pub const UNDO: &str = "undo";
    pub const REDO: &str = "redo";
}

/// A snapshot of the state as it was before a tracked transition
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: EditorState,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn capture(state: &EditorState, label: &str) -> Self {
        Self {
            snapshot: state.clone(),
            label: label.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorState, &str)>;

pub struct StateStore {
    state: EditorState,

    /// Most recent last
    undo_stack: VecDeque<HistoryEntry>,

    /// Most recent last
    redo_stack: Vec<HistoryEntry>,

    capacity: usize,

    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_state(EditorState::default())
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: HISTORY_CAPACITY,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Store with a custom undo capacity (at least one level)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ..Self::new()
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Merge `patch` over the current state and notify subscribers with `label`.
    ///
    /// When `track` is set the previous state becomes an undo level and the
    /// redo stack is discarded.
    pub fn set(&mut self, patch: StatePatch, label: &str, track: bool) {
        if track {
            let entry = HistoryEntry::capture(&self.state, label);
            self.push_undo(entry);
            self.redo_stack.clear();
        }

        let current = std::mem::take(&mut self.state);
        self.state = patch.apply_to(current);

        debug!(
            label,
            track,
            undo_levels = self.undo_stack.len(),
            "state updated"
        );
        self.notify(label);
    }

    /// Restore the most recent snapshot. Returns false (and stays silent)
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };

        self.redo_stack
            .push(HistoryEntry::capture(&self.state, labels::REDO));
        self.state = previous.snapshot;

        debug!(undone = %previous.label, "undo");
        self.notify(labels::UNDO);
        true
    }

    /// Re-apply the most recently undone state. Returns false (and stays
    /// silent) when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };

        let entry = HistoryEntry::capture(&self.state, labels::UNDO);
        self.push_undo(entry);
        self.state = next.snapshot;

        debug!("redo");
        self.notify(labels::REDO);
        true
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Register a listener called after every transition
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EditorState, &str) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, label: &str) {
        let state = &self.state;
        for (_, listener) in self.listeners.iter_mut() {
            listener(state, label);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the transition the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|entry| entry.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.label.as_str())
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &self.state)
            .field("undo_levels", &self.undo_stack.len())
            .field("redo_levels", &self.redo_stack.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
