//! # VectorKit Engine
//!
//! The geometric and interactive core of a 2D vector drawing surface. The
//! engine owns the authoritative scene of shapes, performs all
//! coordinate-space math, resolves pointer input into selection, transform,
//! and path-editing operations, and maintains a bounded undo/redo history.
//!
//! ## Core Components
//!
//! - **Scene**: flat, ordered collection of vector objects; order is z-order
//! - **Hit testing**: topmost-object queries via inverse transforms
//! - **Drag sessions**: move/resize/rotate state machine, drift-free updates
//! - **Pen sessions**: incremental bezier path construction
//! - **Path editing**: direct anchor/handle manipulation
//! - **History**: bounded deep-copy undo/redo stacks
//! - **Renderer boundary**: ordered drawing primitives, selection overlays,
//!   and pen previews for an external rasterizer
//!
//! ## Architecture
//!
//! ```text
//! Editor (facade, owns everything below)
//!   ├── Scene (objects, z-order, styles)
//!   ├── DragSession / PenState (transient gestures)
//!   ├── History (scene snapshots)
//!   └── Renderer boundary (primitives, overlays, previews)
//! ```
//!
//! The engine is single-threaded and command-driven: every public operation
//! runs to completion on the calling thread. One editor instance per logical
//! document; hosts embedding the engine in a multi-threaded environment must
//! serialize calls externally.
//!
//! ## Usage
//!
//! ```rust
//! use vectorkit_engine::Editor;
//! use vectorkit_core::Point;
//!
//! let mut editor = Editor::new();
//! let id = editor.add_rectangle(10.0, 10.0, 30.0, 30.0);
//! assert_eq!(editor.hit_test(Point::new(20.0, 20.0)), Some(id));
//! ```

pub mod drag;
pub mod editor;
pub mod history;
pub mod path_edit;
pub mod pen;
pub mod renderer;
pub mod scene;
pub mod serialization;

pub use drag::{DragIntent, DragMode, DragSession, ResizeHandle};
pub use editor::{Editor, HANDLE_INNER_RADIUS, HANDLE_OUTER_RADIUS};
pub use history::History;
pub use hit_test::hit_test;
pub use path_edit::{PathPoint, PathPointKind};
pub use pen::{PenPreview, PenState, CLOSE_RADIUS, DRAG_THRESHOLD};
pub use renderer::{render_commands, selection_overlays, RenderCommand, SelectionOverlay};
pub use scene::{PathCommand, Scene, ShapeGeometry, ShapeStyle, VectorObject};
pub use serialization::{DocumentMetadata, SceneDocument};
