//! The editor facade: one object owning the scene, selection, history, and
//! the live tool sessions, exposing the pointer-level API a host UI calls.
//!
//! Mutating operations snapshot the scene into history before they run, so
//! every host-visible edit is one undo step. Drags snapshot at pointer-down
//! and commit at pointer-up only if the drag actually changed something.

use tracing::{debug, warn};
use vectorkit_core::{Point, Result, Transform};

use crate::drag::{DragIntent, DragSession, ResizeHandle};
use crate::hit_test::hit_test;
use crate::history::History;
use crate::path_edit::{self, PathPoint};
use crate::pen::{PenPreview, PenState};
use crate::renderer::{render_commands, selection_overlays, RenderCommand, SelectionOverlay};
use crate::scene::{PathCommand, Scene, ShapeStyle};
use crate::serialization::SceneDocument;

/// Grab radius of a corner or rotation handle.
pub const HANDLE_INNER_RADIUS: f64 = 8.0;

/// Outer ring around a corner handle that starts a rotation instead.
pub const HANDLE_OUTER_RADIUS: f64 = 20.0;

/// Owns a document and every piece of interactive state over it.
#[derive(Debug, Default)]
pub struct Editor {
    scene: Scene,
    selection: Vec<u64>,
    history: History,
    drag: DragSession,
    pen: PenState,
    /// Scene as of the current drag's pointer-down; committed to history at
    /// pointer-up when the drag changed the scene.
    drag_snapshot: Option<Scene>,
}

impl Editor {
    pub fn new() -> Self {
        Editor::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &[u64] {
        &self.selection
    }

    // ---- object creation and removal -------------------------------------

    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> u64 {
        self.history.record(&self.scene);
        let id = self.scene.add_rectangle(x, y, width, height);
        self.selection = vec![id];
        id
    }

    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> u64 {
        self.history.record(&self.scene);
        let id = self.scene.add_ellipse(cx, cy, rx, ry);
        self.selection = vec![id];
        id
    }

    pub fn add_text(&mut self, content: impl Into<String>, x: f64, y: f64, font_size: f64) -> u64 {
        self.history.record(&self.scene);
        let id = self.scene.add_text(content, x, y, font_size);
        self.selection = vec![id];
        id
    }

    /// Removes every selected object and clears the selection.
    pub fn remove_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        for id in std::mem::take(&mut self.selection) {
            if let Err(err) = self.scene.remove(id) {
                warn!(%err, "stale selection entry during remove");
            }
        }
    }

    // ---- selection --------------------------------------------------------

    pub fn select(&mut self, id: u64) {
        self.selection = vec![id];
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selects the topmost object at `point`, replacing the selection.
    /// Clears it when the point hits nothing.
    pub fn select_at(&mut self, point: Point) -> Option<u64> {
        match hit_test(&self.scene, point) {
            Some(id) => {
                self.selection = vec![id];
                Some(id)
            }
            None => {
                self.selection.clear();
                None
            }
        }
    }

    /// Adds the topmost object at `point` to the selection, or removes it
    /// when already selected (shift-click semantics).
    pub fn toggle_select_at(&mut self, point: Point) -> Option<u64> {
        let id = hit_test(&self.scene, point)?;
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
        Some(id)
    }

    /// Nudges every selected object by `(dx, dy)` as one undo step.
    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        if self.selection.is_empty() {
            return;
        }
        self.history.record(&self.scene);
        let delta = Transform::translate(dx, dy);
        for &id in &self.selection {
            if let Ok(obj) = self.scene.get_mut(id) {
                obj.transform = Transform::compose(&delta, &obj.transform);
            }
        }
    }

    /// Centroid of the selection's overlay centers, when anything with
    /// extent is selected.
    pub fn selection_center(&self) -> Option<Point> {
        let overlays = selection_overlays(&self.scene, &self.selection);
        if overlays.is_empty() {
            return None;
        }
        let (x, y) = overlays.iter().fold((0.0, 0.0), |(x, y), o| {
            let c = o.center();
            (x + c.x, y + c.y)
        });
        let n = overlays.len() as f64;
        Some(Point::new(x / n, y / n))
    }

    // ---- z-order and styling ----------------------------------------------

    pub fn bring_to_front(&mut self, id: u64) -> Result<()> {
        self.scene.get(id)?;
        self.history.record(&self.scene);
        self.scene.bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: u64) -> Result<()> {
        self.scene.get(id)?;
        self.history.record(&self.scene);
        self.scene.send_to_back(id)
    }

    pub fn update_style(&mut self, id: u64, style: ShapeStyle) -> Result<()> {
        self.scene.get(id)?;
        self.history.record(&self.scene);
        self.scene.update_style(id, style)
    }

    // ---- pointer-driven transforms -----------------------------------------

    /// Resolves a pointer-down on the select tool.
    ///
    /// A press on the selection's handles starts a resize or rotate; a press
    /// on an object selects it (extending the selection when `additive`) and
    /// starts a move; a press on empty canvas clears the selection. Returns
    /// the drag intent that started, if any.
    pub fn pointer_down(&mut self, point: Point, additive: bool) -> Option<DragIntent> {
        let resolved = match self.handle_intent(point) {
            Some(hit) => Some(hit),
            None => match hit_test(&self.scene, point) {
                Some(id) => {
                    if !self.selection.contains(&id) {
                        if additive {
                            self.selection.push(id);
                        } else {
                            self.selection = vec![id];
                        }
                    }
                    Some((DragIntent::Move, point))
                }
                None => {
                    self.clear_selection();
                    None
                }
            },
        };

        let (intent, pivot) = resolved?;
        self.drag_snapshot = Some(self.scene.clone());
        self.drag
            .begin(&self.scene, &self.selection, intent, point, pivot);
        Some(intent)
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.drag.is_active() {
            self.drag.update(&mut self.scene, point);
        }
    }

    /// Ends the live drag, committing it to history if it changed the scene.
    /// A no-op when no drag is active.
    pub fn pointer_up(&mut self, point: Point) {
        if !self.drag.is_active() {
            return;
        }
        self.drag.update(&mut self.scene, point);
        self.drag.end();
        if let Some(snapshot) = self.drag_snapshot.take() {
            if snapshot != self.scene {
                self.history.record(&snapshot);
                debug!("drag committed");
            }
        }
    }

    /// Aborts the live drag, restoring the transforms it captured.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_active() {
            self.drag.cancel(&mut self.scene);
            self.drag_snapshot = None;
        }
    }

    /// Maps a pointer position onto the selection's handle chrome, returning
    /// the intent and the pivot the drag will use.
    ///
    /// Within the inner radius of a corner the press is a resize about the
    /// diagonally opposite corner; within the outer ring it is a rotation
    /// about that overlay's center. Corner grabs win over rotation rings.
    fn handle_intent(&self, point: Point) -> Option<(DragIntent, Point)> {
        let overlays = selection_overlays(&self.scene, &self.selection);
        for overlay in &overlays {
            for (index, corner) in overlay.corners.iter().enumerate() {
                if point.distance_to(*corner) <= HANDLE_INNER_RADIUS {
                    // Corner order matches ResizeHandle indices.
                    let handle = ResizeHandle::from_index(index as u8)?;
                    let pivot = overlay.corners[handle.opposite().index()];
                    return Some((DragIntent::Resize(handle), pivot));
                }
            }
        }
        for overlay in &overlays {
            for corner in &overlay.corners {
                if point.distance_to(*corner) <= HANDLE_OUTER_RADIUS {
                    return Some((DragIntent::Rotate, overlay.center()));
                }
            }
        }
        None
    }

    // ---- pen tool -----------------------------------------------------------

    /// Pen pointer-down. Returns the new path's id when this press closes it.
    pub fn pen_press(&mut self, point: Point) -> Option<u64> {
        self.pen.press(point).map(|commands| self.commit_path(commands))
    }

    pub fn pen_motion(&mut self, point: Point) {
        self.pen.motion(point);
    }

    pub fn pen_release(&mut self, point: Point) {
        self.pen.release(point);
    }

    /// Commits the in-progress pen path as an open path, if it has segments.
    pub fn pen_finish(&mut self) -> Option<u64> {
        self.pen.finish().map(|commands| self.commit_path(commands))
    }

    pub fn pen_cancel(&mut self) {
        self.pen.cancel();
    }

    pub fn pen_preview(&self) -> Option<PenPreview> {
        self.pen.preview()
    }

    fn commit_path(&mut self, commands: Vec<PathCommand>) -> u64 {
        self.history.record(&self.scene);
        let id = self.scene.add_path(commands);
        self.selection = vec![id];
        id
    }

    // ---- path editing --------------------------------------------------------

    /// Editable points of `id`, empty for non-paths.
    pub fn path_points(&self, id: u64) -> Result<Vec<PathPoint>> {
        Ok(path_edit::path_points(self.scene.get(id)?))
    }

    /// Moves one path point to a scene-space position, as one undo step.
    pub fn move_path_point(&mut self, id: u64, index: usize, position: Point) -> Result<()> {
        let snapshot = self.scene.clone();
        let result = path_edit::move_path_point(self.scene.get_mut(id)?, index, position);
        if result.is_ok() {
            self.history.record(&snapshot);
        }
        result
    }

    /// Applies an absolute transform to an object, as one undo step.
    pub fn set_transform(&mut self, id: u64, transform: Transform) -> Result<()> {
        self.scene.get(id)?;
        self.history.record(&self.scene);
        self.scene.get_mut(id)?.transform = transform;
        Ok(())
    }

    // ---- history ----------------------------------------------------------------

    /// Restores the previous scene state. Live tool sessions and the
    /// selection do not survive time travel.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo(&mut self.scene);
        if moved {
            self.reset_interaction();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo(&mut self.scene);
        if moved {
            self.reset_interaction();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn reset_interaction(&mut self) {
        self.selection.clear();
        self.drag.end();
        self.drag_snapshot = None;
        self.pen.cancel();
    }

    // ---- render and persistence -----------------------------------------------

    pub fn render(&self) -> Vec<RenderCommand> {
        render_commands(&self.scene)
    }

    pub fn selection_overlays(&self) -> Vec<SelectionOverlay> {
        selection_overlays(&self.scene, &self.selection)
    }

    pub fn hit_test(&self, point: Point) -> Option<u64> {
        hit_test(&self.scene, point)
    }

    pub fn export_scene_json(&self) -> anyhow::Result<String> {
        SceneDocument::new("Untitled", self.scene.clone()).to_json()
    }

    /// Replaces the document from serialized JSON.
    ///
    /// Returns `false` and leaves the editor untouched when the input does
    /// not parse; on success all interactive state and history are reset.
    pub fn import_scene_json(&mut self, json: &str) -> bool {
        match SceneDocument::from_json(json) {
            Ok(doc) => {
                self.scene = doc.scene;
                self.history.clear();
                self.reset_interaction();
                true
            }
            Err(err) => {
                warn!(%err, "scene import rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_down_selects_and_empty_click_clears() {
        let mut editor = Editor::new();
        let id = editor.add_rectangle(100.0, 100.0, 50.0, 50.0);
        editor.clear_selection();

        let intent = editor.pointer_down(Point::new(120.0, 120.0), false);
        assert_eq!(intent, Some(DragIntent::Move));
        assert_eq!(editor.selection(), &[id]);
        editor.pointer_up(Point::new(120.0, 120.0));

        editor.pointer_down(Point::new(500.0, 500.0), false);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn corner_press_resolves_to_a_resize() {
        let mut editor = Editor::new();
        editor.add_rectangle(100.0, 100.0, 50.0, 50.0);

        let intent = editor.pointer_down(Point::new(151.0, 151.0), false);
        assert_eq!(intent, Some(DragIntent::Resize(ResizeHandle::BottomRight)));
        editor.cancel_drag();
    }

    #[test]
    fn unchanged_drag_adds_no_history_entry() {
        let mut editor = Editor::new();
        let id = editor.add_rectangle(100.0, 100.0, 50.0, 50.0);
        let before_depth = editor.history.undo_depth();

        editor.pointer_down(Point::new(120.0, 120.0), false);
        editor.pointer_up(Point::new(120.0, 120.0));
        assert_eq!(editor.history.undo_depth(), before_depth);

        editor.pointer_down(Point::new(120.0, 120.0), false);
        editor.pointer_move(Point::new(140.0, 120.0));
        editor.pointer_up(Point::new(140.0, 120.0));
        assert_eq!(editor.history.undo_depth(), before_depth + 1);

        assert!(editor.undo());
        let t = editor.scene().get(id).unwrap().transform;
        assert_eq!((t.tx, t.ty), (100.0, 100.0));
    }

    #[test]
    fn undo_resets_selection_and_sessions() {
        let mut editor = Editor::new();
        editor.add_rectangle(0.0, 0.0, 10.0, 10.0);
        assert_eq!(editor.selection().len(), 1);

        assert!(editor.undo());
        assert!(editor.selection().is_empty());
        assert!(editor.scene().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn pen_close_commits_one_selected_path() {
        let mut editor = Editor::new();
        for (x, y) in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0)] {
            assert!(editor.pen_press(Point::new(x, y)).is_none());
            editor.pen_release(Point::new(x, y));
        }
        let id = editor.pen_press(Point::new(102.0, 101.0)).unwrap();
        assert_eq!(editor.selection(), &[id]);
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn toggle_select_builds_and_shrinks_the_selection() {
        let mut editor = Editor::new();
        let a = editor.add_rectangle(0.0, 0.0, 50.0, 50.0);
        let b = editor.add_rectangle(100.0, 100.0, 50.0, 50.0);
        editor.clear_selection();

        assert_eq!(editor.select_at(Point::new(25.0, 25.0)), Some(a));
        assert_eq!(editor.toggle_select_at(Point::new(125.0, 125.0)), Some(b));
        assert_eq!(editor.selection(), &[a, b]);

        // Toggling a selected object removes it.
        assert_eq!(editor.toggle_select_at(Point::new(25.0, 25.0)), Some(a));
        assert_eq!(editor.selection(), &[b]);

        assert_eq!(editor.select_at(Point::new(500.0, 500.0)), None);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn move_selected_nudges_everything_in_one_undo_step() {
        let mut editor = Editor::new();
        let a = editor.add_rectangle(0.0, 0.0, 10.0, 10.0);
        let b = editor.add_rectangle(100.0, 100.0, 10.0, 10.0);
        editor.select(a);
        editor.toggle_select_at(Point::new(105.0, 105.0));

        editor.move_selected(5.0, -3.0);
        assert_eq!(editor.scene().get(a).unwrap().transform.tx, 5.0);
        assert_eq!(editor.scene().get(b).unwrap().transform.ty, 97.0);

        assert!(editor.undo());
        assert_eq!(editor.scene().get(a).unwrap().transform.tx, 0.0);
        assert_eq!(editor.scene().get(b).unwrap().transform.ty, 100.0);
    }

    #[test]
    fn selection_center_averages_overlay_centers() {
        let mut editor = Editor::new();
        let a = editor.add_rectangle(0.0, 0.0, 10.0, 10.0);
        let b = editor.add_rectangle(90.0, 90.0, 10.0, 10.0);
        editor.select(a);
        editor.toggle_select_at(Point::new(95.0, 95.0));
        let _ = b;

        assert_eq!(editor.selection_center(), Some(Point::new(50.0, 50.0)));

        editor.clear_selection();
        assert_eq!(editor.selection_center(), None);
    }

    #[test]
    fn import_rejects_malformed_and_keeps_state() {
        let mut editor = Editor::new();
        editor.add_rectangle(0.0, 0.0, 10.0, 10.0);

        assert!(!editor.import_scene_json("{ not a document"));
        assert_eq!(editor.scene().len(), 1);
        assert!(editor.can_undo());

        let exported = editor.export_scene_json().unwrap();
        assert!(editor.import_scene_json(&exported));
        assert_eq!(editor.scene().len(), 1);
        assert!(!editor.can_undo());
    }
}
