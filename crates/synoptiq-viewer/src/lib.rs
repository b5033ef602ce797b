//! # Synoptiq Viewer
//!
//! Interactive floor-plan viewer over a shared `FloorPlanData`. Draws the
//! features of one floor, colours them by the categories of the selected
//! synoptique, and turns pointer strokes into category assignments.
//!
//! ## Core Components
//!
//! - **Viewer**: one view per host surface, redrawn on data changes
//! - **Camera**: scale and translation between plan and screen
//! - **Input**: pan, assign and unassign gestures plus cursor policy
//! - **Renderer**: per-feature paint resolution and drawing
//! - **Hit-test**: even-odd point-in-polygon with holes
//! - **Pixmap host**: headless `tiny-skia` surface with PNG export
//!
//! ## Architecture
//!
//! ```text
//! SynoptiqueFeature (registry)
//!   ├── FloorPlanData (shared, publishes DataEvents)
//!   └── FloorPlanViewer × n
//!         ├── Camera
//!         ├── Gesture (state machine)
//!         ├── CategoryCache (selected synoptique snapshot)
//!         └── Surface (attached through a SurfaceHost)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use synoptiq_viewer::{FloorPlanViewer, PixmapHost, ViewerOptions};
//!
//! let host = Arc::new(PixmapHost::new(800, 600));
//! let viewer = FloorPlanViewer::new(data.clone(), host.clone(), ViewerOptions::new().with_floor(1));
//! viewer.center_view();
//! host.save_png(Path::new("floor-1.png"))?;
//! ```

pub mod error;
pub mod feature;
pub mod input;
pub mod pixmap;
pub mod renderer;
pub mod surface;
pub mod viewer;
pub mod viewport;

pub use error::{ViewerError, ViewerResult};
pub use feature::SynoptiqueFeature;
pub use hit_test::{point_in_feature, point_in_polygon};
pub use input::{
    Cursor, EventResponse, Gesture, InteractionState, KeyCode, KeyEvent, PointerButton,
    PointerEvent, WheelEvent,
};
pub use pixmap::{PixmapHost, PixmapSurface};
pub use renderer::{CategoryCache, ResolvedStyle, Scene, Visibility};
pub use surface::{PolygonStyle, Surface, SurfaceHost};
pub use viewer::{FloorPlanViewer, ViewerOptions};
pub use viewport::Camera;
