//! Bounded undo/redo over deep scene snapshots.
//!
//! Each undoable operation records a full clone of the scene before it runs.
//! Snapshots are cheap at interactive document sizes and make restore exact:
//! undo followed by redo reproduces the scene bit for bit.

use tracing::debug;

use crate::scene::Scene;

/// Oldest snapshots are evicted past this depth.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo stacks of scene snapshots.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Scene>,
    redo_stack: Vec<Scene>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Records `scene` as the state to restore on the next undo.
    ///
    /// Called with the scene as it is *before* a mutation. Any redo branch
    /// is invalidated: new edits fork the timeline.
    pub fn record(&mut self, scene: &Scene) {
        if self.undo_stack.len() == MAX_HISTORY {
            self.undo_stack.remove(0);
            debug!("history full, evicted oldest snapshot");
        }
        self.undo_stack.push(scene.clone());
        self.redo_stack.clear();
    }

    /// Swaps `scene` with the most recent snapshot. Returns `false` when
    /// there is nothing to undo, leaving `scene` untouched.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(scene, snapshot);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    /// Inverse of [`History::undo`]. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(scene, snapshot);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops both stacks, e.g. after loading a different document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
