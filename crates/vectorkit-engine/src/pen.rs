//! The pen tool: incremental bezier path construction from pointer events.
//!
//! A click commits a straight segment; a press-drag-release commits a cubic
//! segment whose control points are derived from the drag handle, mirrored
//! about the anchor so consecutive segments stay tangent-continuous. Clicking
//! back near the first anchor closes the path and ends the drawing.

use vectorkit_core::Point;

use crate::scene::PathCommand;

/// Pointer travel (in scene units) past which a press becomes a handle drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Distance from the first anchor within which a press closes the path.
pub const CLOSE_RADIUS: f64 = 15.0;

/// A press waiting for its release to become a committed segment.
#[derive(Debug, Clone)]
struct PendingAnchor {
    anchor: Point,
    /// Set once the pointer travels past `DRAG_THRESHOLD`; tracks the
    /// pointer from then on.
    handle: Option<Point>,
    /// The very first press only establishes the `MoveTo`; its release sets
    /// the outgoing handle without committing a segment.
    is_first: bool,
}

#[derive(Debug, Clone)]
struct Drawing {
    commands: Vec<PathCommand>,
    first_anchor: Point,
    last_anchor: Point,
    /// Outgoing tangent handle of the last committed anchor, when that
    /// anchor was placed with a drag.
    last_handle: Option<Point>,
    pending: Option<PendingAnchor>,
    cursor: Option<Point>,
}

/// Everything a renderer needs to draw the in-progress path.
#[derive(Debug, Clone, PartialEq)]
pub struct PenPreview {
    /// Segments committed so far.
    pub commands: Vec<PathCommand>,
    /// The segment that would be committed if the pointer released or
    /// clicked at its current position.
    pub preview_segment: Option<PathCommand>,
    /// Endpoints of the symmetric handle bar while a drag is live.
    pub handle_line: Option<(Point, Point)>,
    /// True when a press at the current cursor would close the path.
    pub can_close: bool,
}

/// State machine for one pen drawing session.
#[derive(Debug, Clone, Default)]
pub struct PenState {
    drawing: Option<Drawing>,
}

impl PenState {
    pub fn new() -> Self {
        PenState::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// Handles a pointer press.
    ///
    /// Returns the completed command list when this press closes the path
    /// (the press lands within [`CLOSE_RADIUS`] of the first anchor and at
    /// least two segments exist); returns `None` while drawing continues.
    pub fn press(&mut self, point: Point) -> Option<Vec<PathCommand>> {
        let closes = self.drawing.as_ref().is_some_and(|d| {
            d.commands.len() >= 2 && point.distance_to(d.first_anchor) <= CLOSE_RADIUS
        });
        if closes {
            let mut drawing = self.drawing.take()?;
            drawing.commands.push(PathCommand::ClosePath);
            return Some(drawing.commands);
        }

        if self.drawing.is_none() {
            self.drawing = Some(Drawing {
                commands: vec![PathCommand::MoveTo {
                    x: point.x,
                    y: point.y,
                }],
                first_anchor: point,
                last_anchor: point,
                last_handle: None,
                pending: Some(PendingAnchor {
                    anchor: point,
                    handle: None,
                    is_first: true,
                }),
                cursor: Some(point),
            });
            return None;
        }
        if let Some(drawing) = self.drawing.as_mut() {
            drawing.cursor = Some(point);
            drawing.pending = Some(PendingAnchor {
                anchor: point,
                handle: None,
                is_first: false,
            });
        }
        None
    }

    /// Handles pointer movement, pressed or hovering.
    pub fn motion(&mut self, point: Point) {
        let Some(drawing) = self.drawing.as_mut() else {
            return;
        };
        drawing.cursor = Some(point);
        if let Some(pending) = drawing.pending.as_mut() {
            // Once past the threshold the press is a drag for good; the
            // handle keeps tracking even if the pointer swings back close.
            if pending.handle.is_some() || point.distance_to(pending.anchor) > DRAG_THRESHOLD {
                pending.handle = Some(point);
            }
        }
    }

    /// Handles pointer release, committing the pending segment.
    pub fn release(&mut self, point: Point) {
        self.motion(point);
        let Some(drawing) = self.drawing.as_mut() else {
            return;
        };
        let Some(pending) = drawing.pending.take() else {
            return;
        };
        if pending.is_first {
            drawing.last_handle = pending.handle;
            return;
        }
        match (pending.handle, drawing.last_handle) {
            // Plain click after a plain anchor: a straight segment.
            (None, None) => drawing.commands.push(PathCommand::LineTo {
                x: pending.anchor.x,
                y: pending.anchor.y,
            }),
            // Either end has a tangent handle: a cubic segment. A missing
            // handle degenerates its control point onto the anchor.
            (handle, last_handle) => {
                let cp1 = last_handle.unwrap_or(drawing.last_anchor);
                let cp2 = handle
                    .map(|h| pending.anchor.mirror(h))
                    .unwrap_or(pending.anchor);
                drawing.commands.push(PathCommand::CubicBezierTo {
                    cp1,
                    cp2,
                    to: pending.anchor,
                });
            }
        }
        drawing.last_anchor = pending.anchor;
        drawing.last_handle = pending.handle;
    }

    /// Ends the drawing as an open path.
    ///
    /// Returns the commands when the path has at least one real segment;
    /// a lone anchor is discarded. Idle either way afterwards.
    pub fn finish(&mut self) -> Option<Vec<PathCommand>> {
        let drawing = self.drawing.take()?;
        if drawing.commands.len() >= 2 {
            Some(drawing.commands)
        } else {
            None
        }
    }

    /// Discards the in-progress path.
    pub fn cancel(&mut self) {
        self.drawing = None;
    }

    /// Snapshot of the in-progress path for rendering, if drawing.
    pub fn preview(&self) -> Option<PenPreview> {
        let drawing = self.drawing.as_ref()?;
        let cursor = drawing.cursor;

        let handle_line = drawing
            .pending
            .as_ref()
            .and_then(|p| p.handle.map(|h| (p.anchor.mirror(h), h)));

        let preview_segment = cursor.map(|c| match drawing.last_handle {
            Some(handle) => PathCommand::CubicBezierTo {
                cp1: handle,
                cp2: c,
                to: c,
            },
            None => PathCommand::LineTo { x: c.x, y: c.y },
        });

        let can_close = drawing.commands.len() >= 2
            && cursor.is_some_and(|c| c.distance_to(drawing.first_anchor) <= CLOSE_RADIUS);

        Some(PenPreview {
            commands: drawing.commands.clone(),
            preview_segment,
            handle_line,
            can_close,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(pen: &mut PenState, x: f64, y: f64) -> Option<Vec<PathCommand>> {
        let p = Point::new(x, y);
        let closed = pen.press(p);
        pen.release(p);
        closed
    }

    #[test]
    fn clicks_build_a_polyline_and_closing_appends_close_path() {
        let mut pen = PenState::new();
        assert!(click(&mut pen, 100.0, 100.0).is_none());
        assert!(click(&mut pen, 200.0, 100.0).is_none());
        assert!(click(&mut pen, 200.0, 200.0).is_none());

        // Within CLOSE_RADIUS of the first anchor.
        let commands = click(&mut pen, 105.0, 102.0).unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo { x: 100.0, y: 100.0 },
                PathCommand::LineTo { x: 200.0, y: 100.0 },
                PathCommand::LineTo { x: 200.0, y: 200.0 },
                PathCommand::ClosePath,
            ]
        );
        assert!(!pen.is_drawing());
    }

    #[test]
    fn drag_produces_symmetric_control_points() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);

        pen.press(Point::new(100.0, 0.0));
        pen.motion(Point::new(130.0, 40.0));
        pen.release(Point::new(130.0, 40.0));

        let preview = pen.preview().unwrap();
        assert_eq!(
            preview.commands[1],
            PathCommand::CubicBezierTo {
                // First anchor had no handle, so the curve leaves from it.
                cp1: Point::new(0.0, 0.0),
                // Incoming control is the drag handle mirrored about the
                // anchor: 2*(100,0) - (130,40).
                cp2: Point::new(70.0, -40.0),
                to: Point::new(100.0, 0.0),
            }
        );
    }

    #[test]
    fn next_segment_leaves_along_the_stored_handle() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);

        pen.press(Point::new(100.0, 0.0));
        pen.motion(Point::new(130.0, 40.0));
        pen.release(Point::new(130.0, 40.0));

        click(&mut pen, 200.0, 0.0);
        let preview = pen.preview().unwrap();
        assert_eq!(
            preview.commands[2],
            PathCommand::CubicBezierTo {
                cp1: Point::new(130.0, 40.0),
                cp2: Point::new(200.0, 0.0),
                to: Point::new(200.0, 0.0),
            }
        );
    }

    #[test]
    fn micro_drag_within_threshold_is_a_click() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);

        pen.press(Point::new(50.0, 50.0));
        pen.motion(Point::new(51.0, 51.0));
        pen.release(Point::new(51.0, 51.0));

        let preview = pen.preview().unwrap();
        assert_eq!(preview.commands[1], PathCommand::LineTo { x: 50.0, y: 50.0 });
    }

    #[test]
    fn finish_keeps_open_paths_and_drops_lone_anchors() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);
        click(&mut pen, 100.0, 0.0);
        let commands = pen.finish().unwrap();
        assert_eq!(commands.len(), 2);
        assert!(!matches!(commands.last(), Some(PathCommand::ClosePath)));

        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);
        assert!(pen.finish().is_none());
        assert!(!pen.is_drawing());
    }

    #[test]
    fn early_close_attempt_is_just_another_anchor() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);
        // Only one command so far: a press near the start must not close.
        assert!(click(&mut pen, 5.0, 5.0).is_none());
        assert!(pen.is_drawing());
    }

    #[test]
    fn cancel_discards_everything() {
        let mut pen = PenState::new();
        click(&mut pen, 0.0, 0.0);
        click(&mut pen, 100.0, 0.0);
        pen.cancel();
        assert!(!pen.is_drawing());
        assert!(pen.preview().is_none());
    }
}
