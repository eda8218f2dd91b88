//! Direct editing of path geometry: listing and moving individual points.
//!
//! A path's commands flatten into an indexed point list so callers can show
//! draggable markers. Anchors are the on-curve points of `MoveTo`, `LineTo`
//! and `CubicBezierTo`; handles are the two control points of a cubic,
//! listed before their anchor. `ClosePath` contributes no points. Positions
//! are surfaced in scene space and mutations are mapped back through the
//! object's inverse transform, so editing works on rotated and scaled paths.

use vectorkit_core::{EngineError, Point, Result};

use crate::scene::{PathCommand, ShapeGeometry, VectorObject};

/// Whether a path point sits on the curve or steers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPointKind {
    Anchor,
    Handle,
}

/// One editable point of a path, in scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub index: usize,
    pub kind: PathPointKind,
    pub position: Point,
}

fn command_points(command: &PathCommand) -> Vec<(PathPointKind, Point)> {
    match command {
        PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
            vec![(PathPointKind::Anchor, Point::new(*x, *y))]
        }
        PathCommand::CubicBezierTo { cp1, cp2, to } => vec![
            (PathPointKind::Handle, *cp1),
            (PathPointKind::Handle, *cp2),
            (PathPointKind::Anchor, *to),
        ],
        PathCommand::ClosePath => Vec::new(),
    }
}

/// Lists the editable points of `obj` in scene space.
///
/// Non-path objects have none.
pub fn path_points(obj: &VectorObject) -> Vec<PathPoint> {
    let ShapeGeometry::Path { commands } = &obj.geometry else {
        return Vec::new();
    };
    commands
        .iter()
        .flat_map(command_points)
        .enumerate()
        .map(|(index, (kind, local))| PathPoint {
            index,
            kind,
            position: obj.transform.apply(local),
        })
        .collect()
}

/// Moves the path point at flattened `index` to scene-space `position`.
///
/// The position is carried into local space through the inverse transform
/// before it is written back, so the rest of the path is untouched.
pub fn move_path_point(obj: &mut VectorObject, index: usize, position: Point) -> Result<()> {
    let local = obj.transform.apply_inverse(position)?;
    let ShapeGeometry::Path { commands } = &mut obj.geometry else {
        return Err(EngineError::InvalidIndex { index, len: 0 });
    };

    let mut cursor = 0usize;
    for command in commands.iter_mut() {
        let slots = match command {
            PathCommand::MoveTo { .. } | PathCommand::LineTo { .. } => 1,
            PathCommand::CubicBezierTo { .. } => 3,
            PathCommand::ClosePath => 0,
        };
        if index < cursor + slots {
            match command {
                PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                    *x = local.x;
                    *y = local.y;
                }
                PathCommand::CubicBezierTo { cp1, cp2, to } => {
                    match index - cursor {
                        0 => *cp1 = local,
                        1 => *cp2 = local,
                        _ => *to = local,
                    }
                }
                PathCommand::ClosePath => unreachable!("close path has no points"),
            }
            return Ok(());
        }
        cursor += slots;
    }
    Err(EngineError::InvalidIndex { index, len: cursor })
}
