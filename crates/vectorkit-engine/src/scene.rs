//! Scene model: shape geometry variants and the ordered object list.
//!
//! The scene is a flat, ordered sequence of [`VectorObject`]s. Sequence
//! position encodes z-order (last = frontmost). Geometry is expressed in
//! local coordinates; the object's transform maps local to scene space.

use serde::{Deserialize, Serialize};
use vectorkit_core::{Bounds, EngineError, Point, Result, Transform};

/// Approximate advance width of one glyph as a fraction of the font size.
/// Good enough for hit-testing and overlay boxes; glyph rasterization is
/// the renderer's problem.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// A single path construction command, SVG-compatible.
///
/// A well-formed command sequence starts with `MoveTo`; `ClosePath`, when
/// present, is last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CubicBezierTo { cp1: Point, cp2: Point, to: Point },
    ClosePath,
}

/// Shape geometry variants, in local coordinates.
///
/// A closed sum type: every consumer (renderer, hit-test, exporter) matches
/// exhaustively, so adding a shape kind is a compile-time-checked ripple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeGeometry {
    /// Axis-aligned rectangle with its top-left corner at the local origin.
    Rectangle { width: f64, height: f64 },
    /// Ellipse centered on the local origin.
    Ellipse { rx: f64, ry: f64 },
    /// Bezier path built from ordered commands.
    Path { commands: Vec<PathCommand> },
    /// Text run with simple metrics; the local origin is its top-left corner.
    Text {
        content: String,
        font_size: f64,
        #[serde(default)]
        letter_spacing: f64,
    },
}

impl ShapeGeometry {
    /// The tight local bounding box, or `None` for geometry with no extent
    /// (an empty path or empty text run).
    ///
    /// Path bounds cover all anchors and control points, so they are
    /// conservative for curves.
    pub fn local_bounds(&self) -> Option<Bounds> {
        match self {
            ShapeGeometry::Rectangle { width, height } => Some(Bounds::from_rect(*width, *height)),
            ShapeGeometry::Ellipse { rx, ry } => Some(Bounds::from_ellipse(*rx, *ry)),
            ShapeGeometry::Path { commands } => {
                let mut bounds = Bounds::empty();
                for cmd in commands {
                    match cmd {
                        PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                            bounds.include(Point::new(*x, *y));
                        }
                        PathCommand::CubicBezierTo { cp1, cp2, to } => {
                            bounds.include(*cp1);
                            bounds.include(*cp2);
                            bounds.include(*to);
                        }
                        PathCommand::ClosePath => {}
                    }
                }
                bounds.is_valid().then_some(bounds)
            }
            ShapeGeometry::Text {
                content,
                font_size,
                letter_spacing,
            } => {
                let glyphs = content.chars().count();
                if glyphs == 0 {
                    return None;
                }
                let width = glyphs as f64 * font_size * TEXT_ADVANCE_RATIO
                    + (glyphs as f64 - 1.0) * letter_spacing;
                Some(Bounds::from_rect(width, *font_size))
            }
        }
    }
}

fn default_fill() -> Option<String> {
    Some("#3b82f6".to_string())
}

fn default_stroke() -> Option<String> {
    Some("#1e40af".to_string())
}

fn default_stroke_width() -> f64 {
    2.0
}

/// Visual style for an object. `None` colors render as "none".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    #[serde(default = "default_fill")]
    pub fill: Option<String>,
    #[serde(default = "default_stroke")]
    pub stroke: Option<String>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// A drawable object: geometry, local-to-scene transform, and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorObject {
    pub id: u64,
    pub geometry: ShapeGeometry,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl VectorObject {
    /// The object's bounding box in scene space: the transformed local box.
    pub fn scene_bounds(&self) -> Option<Bounds> {
        Some(self.geometry.local_bounds()?.transformed(&self.transform))
    }
}

/// The authoritative, ordered scene of vector objects.
///
/// Ids are unique within the scene and stable across reordering. The scene
/// never snapshots history itself; that is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<VectorObject>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Hands out the next unique object id.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds an object at the front of the z-order and returns its id.
    pub fn add(&mut self, geometry: ShapeGeometry, transform: Transform) -> u64 {
        let id = self.generate_id();
        self.objects.push(VectorObject {
            id,
            geometry,
            transform,
            style: ShapeStyle::default(),
        });
        id
    }

    /// Adds a rectangle whose top-left corner lands at `(x, y)`.
    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> u64 {
        self.add(
            ShapeGeometry::Rectangle { width, height },
            Transform::translate(x, y),
        )
    }

    /// Adds an ellipse centered at `(cx, cy)`.
    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> u64 {
        self.add(ShapeGeometry::Ellipse { rx, ry }, Transform::translate(cx, cy))
    }

    /// Adds a path with an identity transform.
    pub fn add_path(&mut self, commands: Vec<PathCommand>) -> u64 {
        self.add(ShapeGeometry::Path { commands }, Transform::identity())
    }

    /// Adds a text run with its top-left corner at `(x, y)`.
    pub fn add_text(&mut self, content: impl Into<String>, x: f64, y: f64, font_size: f64) -> u64 {
        self.add(
            ShapeGeometry::Text {
                content: content.into(),
                font_size,
                letter_spacing: 0.0,
            },
            Transform::translate(x, y),
        )
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Removes and returns the object with the given id.
    pub fn remove(&mut self, id: u64) -> Result<VectorObject> {
        let index = self.index_of(id).ok_or(EngineError::NotFound { id })?;
        Ok(self.objects.remove(index))
    }

    /// Looks up an object by id.
    pub fn get(&self, id: u64) -> Result<&VectorObject> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .ok_or(EngineError::NotFound { id })
    }

    /// Looks up an object by id, mutably.
    pub fn get_mut(&mut self, id: u64) -> Result<&mut VectorObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(EngineError::NotFound { id })
    }

    /// Moves the object to the end of the order (top of z-order).
    pub fn bring_to_front(&mut self, id: u64) -> Result<()> {
        let index = self.index_of(id).ok_or(EngineError::NotFound { id })?;
        let obj = self.objects.remove(index);
        self.objects.push(obj);
        Ok(())
    }

    /// Moves the object to the start of the order (bottom of z-order).
    pub fn send_to_back(&mut self, id: u64) -> Result<()> {
        let index = self.index_of(id).ok_or(EngineError::NotFound { id })?;
        let obj = self.objects.remove(index);
        self.objects.insert(0, obj);
        Ok(())
    }

    /// Replaces the object's style.
    pub fn update_style(&mut self, id: u64, style: ShapeStyle) -> Result<()> {
        self.get_mut(id)?.style = style;
        Ok(())
    }

    /// Iterates objects back-to-front (z-order).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &VectorObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes every object. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
