//! Flattening the scene into a backend-neutral command stream.
//!
//! The engine never paints. It emits [`RenderCommand`]s that map one-to-one
//! onto an HTML canvas 2D context (or any backend with the same primitives);
//! the host replays them in order. `SetTransform` is emitted in the canvas
//! argument order `(a, b, c, d, e, f)`, which reads the matrix column-wise,
//! so the row-major `b`/`c` swap here is intentional.

use serde::{Deserialize, Serialize};
use vectorkit_core::{Point, Transform};

use crate::scene::{PathCommand, Scene, ShapeGeometry, ShapeStyle};

/// One drawing primitive for the host to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum RenderCommand {
    Save,
    Restore,
    SetTransform {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
    BeginPath,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    BezierCurveTo {
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
    FillStyle {
        color: String,
    },
    StrokeStyle {
        color: String,
    },
    LineWidth {
        width: f64,
    },
    Fill,
    Stroke,
    FillText {
        text: String,
        x: f64,
        y: f64,
        font_size: f64,
    },
}

impl RenderCommand {
    /// `SetTransform` from a row-major matrix, in canvas argument order.
    fn set_transform(m: &Transform) -> RenderCommand {
        RenderCommand::SetTransform {
            a: m.a,
            b: m.c,
            c: m.b,
            d: m.d,
            e: m.tx,
            f: m.ty,
        }
    }
}

/// Selection chrome for one object: its local bounding-box corners mapped
/// into scene space, clockwise from the local top-left, so the handles
/// rotate and scale with the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOverlay {
    pub id: u64,
    pub corners: [Point; 4],
}

impl SelectionOverlay {
    /// The overlay for one object, or `None` when its geometry has no extent.
    pub fn for_object(obj: &crate::scene::VectorObject) -> Option<SelectionOverlay> {
        let local = obj.geometry.local_bounds()?;
        Some(SelectionOverlay {
            id: obj.id,
            corners: local.corners().map(|c| obj.transform.apply(c)),
        })
    }

    /// Centroid of the corners; the rotation pivot.
    pub fn center(&self) -> Point {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(x, y), c| (x + c.x, y + c.y));
        Point::new(sx / 4.0, sy / 4.0)
    }
}

/// Overlays for the selected ids, in selection order. Ids that are missing
/// from the scene or have no extent contribute nothing.
pub fn selection_overlays(scene: &Scene, ids: &[u64]) -> Vec<SelectionOverlay> {
    ids.iter()
        .filter_map(|&id| scene.get(id).ok())
        .filter_map(SelectionOverlay::for_object)
        .collect()
}

fn emit_path(commands: &[PathCommand], out: &mut Vec<RenderCommand>) {
    for command in commands {
        out.push(match command {
            PathCommand::MoveTo { x, y } => RenderCommand::MoveTo { x: *x, y: *y },
            PathCommand::LineTo { x, y } => RenderCommand::LineTo { x: *x, y: *y },
            PathCommand::CubicBezierTo { cp1, cp2, to } => RenderCommand::BezierCurveTo {
                cp1x: cp1.x,
                cp1y: cp1.y,
                cp2x: cp2.x,
                cp2y: cp2.y,
                x: to.x,
                y: to.y,
            },
            PathCommand::ClosePath => RenderCommand::ClosePath,
        });
    }
}

fn emit_paint(style: &ShapeStyle, fill_allowed: bool, out: &mut Vec<RenderCommand>) {
    if fill_allowed {
        if let Some(fill) = &style.fill {
            out.push(RenderCommand::FillStyle {
                color: fill.clone(),
            });
            out.push(RenderCommand::Fill);
        }
    }
    if let Some(stroke) = &style.stroke {
        out.push(RenderCommand::StrokeStyle {
            color: stroke.clone(),
        });
        out.push(RenderCommand::LineWidth {
            width: style.stroke_width,
        });
        out.push(RenderCommand::Stroke);
    }
}

/// Flattens the scene back-to-front into a replayable command stream.
///
/// Every object is bracketed by `Save`/`Restore` so its transform and paint
/// state never leak into the next one.
pub fn render_commands(scene: &Scene) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    for obj in scene.iter() {
        out.push(RenderCommand::Save);
        out.push(RenderCommand::set_transform(&obj.transform));
        match &obj.geometry {
            ShapeGeometry::Rectangle { width, height } => {
                out.push(RenderCommand::BeginPath);
                out.push(RenderCommand::Rect {
                    x: 0.0,
                    y: 0.0,
                    width: *width,
                    height: *height,
                });
                emit_paint(&obj.style, true, &mut out);
            }
            ShapeGeometry::Ellipse { rx, ry } => {
                out.push(RenderCommand::BeginPath);
                out.push(RenderCommand::Ellipse {
                    cx: 0.0,
                    cy: 0.0,
                    rx: *rx,
                    ry: *ry,
                });
                emit_paint(&obj.style, true, &mut out);
            }
            ShapeGeometry::Path { commands } => {
                out.push(RenderCommand::BeginPath);
                emit_path(commands, &mut out);
                // Open paths stroke only; filling them would hallucinate an
                // implicit closing edge.
                let closed = commands
                    .iter()
                    .any(|c| matches!(c, PathCommand::ClosePath));
                emit_paint(&obj.style, closed, &mut out);
            }
            ShapeGeometry::Text {
                content,
                font_size,
                ..
            } => {
                if let Some(fill) = &obj.style.fill {
                    out.push(RenderCommand::FillStyle {
                        color: fill.clone(),
                    });
                }
                out.push(RenderCommand::FillText {
                    text: content.clone(),
                    x: 0.0,
                    y: 0.0,
                    font_size: *font_size,
                });
            }
        }
        out.push(RenderCommand::Restore);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn set_transform_uses_canvas_argument_order() {
        let m = Transform::rotate(PI / 2.0);
        // Row-major rotate(90°) is {a: 0, b: -1, c: 1, d: 0}; the canvas
        // call order transposes the linear part.
        assert_eq!(
            RenderCommand::set_transform(&m),
            RenderCommand::SetTransform {
                a: m.a,
                b: m.c,
                c: m.b,
                d: m.d,
                e: 0.0,
                f: 0.0,
            }
        );
    }

    #[test]
    fn objects_are_emitted_back_to_front_and_bracketed() {
        let mut scene = Scene::new();
        scene.add_rectangle(0.0, 0.0, 10.0, 10.0);
        scene.add_ellipse(50.0, 50.0, 5.0, 5.0);

        let commands = render_commands(&scene);
        assert_eq!(commands.first(), Some(&RenderCommand::Save));
        assert_eq!(commands.last(), Some(&RenderCommand::Restore));

        let rect_at = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::Rect { .. }))
            .unwrap();
        let ellipse_at = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::Ellipse { .. }))
            .unwrap();
        assert!(rect_at < ellipse_at);

        let saves = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Save))
            .count();
        let restores = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Restore))
            .count();
        assert_eq!(saves, 2);
        assert_eq!(restores, 2);
    }

    #[test]
    fn open_paths_are_stroked_but_not_filled() {
        let mut scene = Scene::new();
        scene.add_path(vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
        ]);

        let commands = render_commands(&scene);
        assert!(!commands.iter().any(|c| matches!(c, RenderCommand::Fill)));
        assert!(commands.iter().any(|c| matches!(c, RenderCommand::Stroke)));
    }

    #[test]
    fn overlay_corners_follow_the_object_transform() {
        let mut scene = Scene::new();
        let a = scene.add_rectangle(100.0, 100.0, 50.0, 50.0);
        let b = scene.add_rectangle(0.0, 0.0, 10.0, 10.0);

        let overlays = selection_overlays(&scene, &[a, b, 12345]);
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].corners[0], Point::new(100.0, 100.0));
        assert_eq!(overlays[0].corners[2], Point::new(150.0, 150.0));
        assert_eq!(overlays[0].center(), Point::new(125.0, 125.0));

        // Rotating the object carries its handles with it.
        let center = overlays[0].center();
        scene.get_mut(a).unwrap().transform = Transform::compose(
            &Transform::around_pivot(center, &Transform::rotate(PI / 2.0)),
            &Transform::translate(100.0, 100.0),
        );
        let rotated = selection_overlays(&scene, &[a]);
        let c0 = rotated[0].corners[0];
        assert!((c0.x - 150.0).abs() < 1e-9);
        assert!((c0.y - 100.0).abs() < 1e-9);
    }
}
