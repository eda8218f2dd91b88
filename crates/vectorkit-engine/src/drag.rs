//! Interactive transform sessions: move, resize, and rotate drags.
//!
//! A session captures each participating object's transform once, when the
//! drag begins. Every pointer-move recomputes the live transform from scratch
//! as `delta ∘ origin`, so a drag never accumulates floating-point drift no
//! matter how many move events arrive, and cancelling is a plain restore of
//! the captured origins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vectorkit_core::{Point, Transform};

use crate::scene::Scene;

/// Minimum and maximum uniform scale a resize drag may produce.
const RESIZE_SCALE_MIN: f64 = 0.1;
const RESIZE_SCALE_MAX: f64 = 10.0;

/// The four corner handles of a selection, indexed clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl ResizeHandle {
    /// The diagonally opposite corner, used as the resize pivot.
    pub fn opposite(self) -> ResizeHandle {
        match self {
            ResizeHandle::TopLeft => ResizeHandle::BottomRight,
            ResizeHandle::TopRight => ResizeHandle::BottomLeft,
            ResizeHandle::BottomRight => ResizeHandle::TopLeft,
            ResizeHandle::BottomLeft => ResizeHandle::TopRight,
        }
    }

    pub fn from_index(index: u8) -> Option<ResizeHandle> {
        match index {
            0 => Some(ResizeHandle::TopLeft),
            1 => Some(ResizeHandle::TopRight),
            2 => Some(ResizeHandle::BottomRight),
            3 => Some(ResizeHandle::BottomLeft),
            _ => None,
        }
    }

    /// Index into an overlay's corner array.
    pub fn index(self) -> usize {
        match self {
            ResizeHandle::TopLeft => 0,
            ResizeHandle::TopRight => 1,
            ResizeHandle::BottomRight => 2,
            ResizeHandle::BottomLeft => 3,
        }
    }
}

/// What kind of transform a drag session applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    Idle,
    Move,
    Resize(ResizeHandle),
    Rotate,
}

/// What a pointer-down on the canvas resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragIntent {
    Move,
    Resize(ResizeHandle),
    Rotate,
}

/// A live drag over one or more selected objects.
///
/// `origin_transforms` holds the transform of every participant as of the
/// drag's first pointer event; live updates always start from those, never
/// from the previous frame's result.
#[derive(Debug, Clone)]
pub struct DragSession {
    mode: DragMode,
    anchor: Point,
    pivot: Point,
    origin_transforms: HashMap<u64, Transform>,
}

impl Default for DragSession {
    fn default() -> Self {
        DragSession::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        DragSession {
            mode: DragMode::Idle,
            anchor: Point::new(0.0, 0.0),
            pivot: Point::new(0.0, 0.0),
            origin_transforms: HashMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode != DragMode::Idle
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// The captured origin transform for `id`, if it participates.
    pub fn origin(&self, id: u64) -> Option<&Transform> {
        self.origin_transforms.get(&id)
    }

    /// Starts a drag at `anchor` over `ids`, capturing their current
    /// transforms from the scene. Objects missing from the scene are ignored.
    ///
    /// `pivot` is the fixed point of the delta transform: the corner opposite
    /// the grabbed handle for a resize, the selection center for a rotate.
    /// It is ignored for moves.
    pub fn begin(
        &mut self,
        scene: &Scene,
        ids: &[u64],
        intent: DragIntent,
        anchor: Point,
        pivot: Point,
    ) {
        self.origin_transforms.clear();
        for &id in ids {
            if let Ok(obj) = scene.get(id) {
                self.origin_transforms.insert(id, obj.transform);
            }
        }
        if self.origin_transforms.is_empty() {
            self.mode = DragMode::Idle;
            return;
        }
        self.anchor = anchor;
        self.pivot = pivot;
        self.mode = match intent {
            DragIntent::Move => DragMode::Move,
            DragIntent::Resize(handle) => DragMode::Resize(handle),
            DragIntent::Rotate => DragMode::Rotate,
        };
        debug!(mode = ?self.mode, objects = self.origin_transforms.len(), "drag started");
    }

    /// The delta transform for the pointer now being at `current`, or `None`
    /// when no drag is active or the pointer gives no usable delta.
    pub fn delta(&self, current: Point) -> Option<Transform> {
        match self.mode {
            DragMode::Idle => None,
            DragMode::Move => Some(Transform::translate(
                current.x - self.anchor.x,
                current.y - self.anchor.y,
            )),
            DragMode::Resize(_) => {
                let start = self.pivot.distance_to(self.anchor).max(1.0);
                let now = self.pivot.distance_to(current).max(1.0);
                let scale = (now / start).clamp(RESIZE_SCALE_MIN, RESIZE_SCALE_MAX);
                Some(Transform::around_pivot(
                    self.pivot,
                    &Transform::scale(scale, scale),
                ))
            }
            DragMode::Rotate => {
                let start =
                    (self.anchor.y - self.pivot.y).atan2(self.anchor.x - self.pivot.x);
                let now = (current.y - self.pivot.y).atan2(current.x - self.pivot.x);
                Some(Transform::around_pivot(
                    self.pivot,
                    &Transform::rotate(now - start),
                ))
            }
        }
    }

    /// Applies the live transform for pointer position `current` to every
    /// participant still present in the scene.
    pub fn update(&self, scene: &mut Scene, current: Point) {
        let Some(delta) = self.delta(current) else {
            return;
        };
        for (&id, origin) in &self.origin_transforms {
            if let Ok(obj) = scene.get_mut(id) {
                obj.transform = Transform::compose(&delta, origin);
            }
        }
    }

    /// Restores every participant to its captured origin transform.
    pub fn cancel(&mut self, scene: &mut Scene) {
        for (&id, origin) in &self.origin_transforms {
            if let Ok(obj) = scene.get_mut(id) {
                obj.transform = *origin;
            }
        }
        self.end();
    }

    /// Ends the session, leaving the scene as the last update left it.
    /// A no-op when no drag is active.
    pub fn end(&mut self) {
        self.mode = DragMode::Idle;
        self.origin_transforms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn scene_with_rect() -> (Scene, u64) {
        let mut scene = Scene::new();
        let id = scene.add_rectangle(100.0, 100.0, 50.0, 50.0);
        (scene, id)
    }

    #[test]
    fn move_drag_translates_from_origin_without_drift() {
        let (mut scene, id) = scene_with_rect();
        let anchor = Point::new(120.0, 120.0);
        let mut session = DragSession::new();
        session.begin(&scene, &[id], DragIntent::Move, anchor, anchor);

        // Many intermediate updates must not accumulate: only the final
        // pointer position matters.
        for i in 0..100 {
            session.update(&mut scene, Point::new(120.0 + i as f64, 120.0));
        }
        session.update(&mut scene, Point::new(130.0, 145.0));
        session.end();

        let t = scene.get(id).unwrap().transform;
        assert!(close(t.tx, 110.0) && close(t.ty, 125.0));
        assert!(close(t.a, 1.0) && close(t.d, 1.0));
    }

    #[test]
    fn resize_drag_scales_about_opposite_corner() {
        let (mut scene, id) = scene_with_rect();
        let mut session = DragSession::new();
        // Drag the bottom-right handle; the pivot is the top-left corner.
        session.begin(
            &scene,
            &[id],
            DragIntent::Resize(ResizeHandle::BottomRight),
            Point::new(150.0, 150.0),
            Point::new(100.0, 100.0),
        );
        session.update(&mut scene, Point::new(200.0, 200.0));
        session.end();

        let obj = scene.get(id).unwrap();
        let grown = obj.scene_bounds().unwrap();
        assert!(close(grown.min_x, 100.0) && close(grown.min_y, 100.0));
        assert!(close(grown.width(), 100.0) && close(grown.height(), 100.0));
    }

    #[test]
    fn resize_scale_is_clamped() {
        let (mut scene, id) = scene_with_rect();
        let mut session = DragSession::new();
        session.begin(
            &scene,
            &[id],
            DragIntent::Resize(ResizeHandle::BottomRight),
            Point::new(150.0, 150.0),
            Point::new(100.0, 100.0),
        );
        // Collapse the pointer onto the pivot: scale clamps at the minimum
        // instead of degenerating.
        session.update(&mut scene, Point::new(100.0, 100.0));
        session.end();

        let shrunk = scene.get(id).unwrap().scene_bounds().unwrap();
        assert!(close(shrunk.width(), 5.0));
    }

    #[test]
    fn rotate_drag_spins_about_the_pivot() {
        let (mut scene, id) = scene_with_rect();
        let center = Point::new(125.0, 125.0);
        let mut session = DragSession::new();
        session.begin(
            &scene,
            &[id],
            DragIntent::Rotate,
            Point::new(150.0, 125.0),
            center,
        );
        // Quarter turn of the pointer around the center.
        session.update(&mut scene, Point::new(125.0, 150.0));
        session.end();

        // The center stays put and the bounds are unchanged for a square.
        let rotated = scene.get(id).unwrap().scene_bounds().unwrap();
        assert!(close(rotated.center().x, center.x));
        assert!(close(rotated.center().y, center.y));
        assert!(close(rotated.width(), 50.0) && close(rotated.height(), 50.0));
    }

    #[test]
    fn cancel_restores_origin_transforms() {
        let (mut scene, id) = scene_with_rect();
        let before = scene.get(id).unwrap().transform;
        let anchor = Point::new(120.0, 120.0);
        let mut session = DragSession::new();
        session.begin(&scene, &[id], DragIntent::Move, anchor, anchor);
        session.update(&mut scene, Point::new(500.0, 500.0));
        session.cancel(&mut scene);

        assert_eq!(scene.get(id).unwrap().transform, before);
        assert!(!session.is_active());
    }

    #[test]
    fn updates_after_end_are_noops() {
        let (mut scene, id) = scene_with_rect();
        let anchor = Point::new(120.0, 120.0);
        let mut session = DragSession::new();
        session.begin(&scene, &[id], DragIntent::Move, anchor, anchor);
        session.end();

        let before = scene.get(id).unwrap().transform;
        session.update(&mut scene, Point::new(999.0, 999.0));
        assert_eq!(scene.get(id).unwrap().transform, before);
    }

    #[test]
    fn begin_over_missing_objects_stays_idle() {
        let (scene, _) = scene_with_rect();
        let origin = Point::new(0.0, 0.0);
        let mut session = DragSession::new();
        session.begin(&scene, &[999], DragIntent::Move, origin, origin);
        assert!(!session.is_active());
        assert!(session.delta(Point::new(10.0, 10.0)).is_none());
    }
}
