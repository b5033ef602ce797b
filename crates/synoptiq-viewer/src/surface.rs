//! Drawing surface abstraction.
//!
//! A [`SurfaceHost`] is the container a viewer lives in. The viewer asks it
//! for exactly one [`Surface`] when it is built and hands it back when it is
//! disposed. Everything the viewer draws goes through these two traits.

use synoptiq_core::Rgba;

use crate::input::Cursor;
use crate::viewport::Camera;

/// Paint for one polygon. `line_width` is in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub line_width: f64,
}

/// A 2D drawing target sized in device pixels.
pub trait Surface: Send {
    fn size(&self) -> (u32, u32);

    /// Reallocates the backing store. Content is lost.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears every pixel to transparent.
    fn clear(&mut self);

    /// Fills then strokes one polygon given in world coordinates.
    ///
    /// `rings[0]` is the shell and the remaining rings are holes; they are
    /// filled together with the even-odd rule.
    fn draw_polygon(&mut self, rings: &[Vec<[f64; 2]>], style: &PolygonStyle, camera: &Camera);

    fn set_cursor(&mut self, cursor: Cursor);
}

/// Container that provides a viewer's surface.
pub trait SurfaceHost: Send + Sync {
    /// Current inner size in pixels.
    fn client_size(&self) -> (u32, u32);

    /// Creates a surface sized to the client area and attaches it.
    fn attach_surface(&self) -> Box<dyn Surface>;

    /// Removes the attached surface, if any.
    fn detach_surface(&self);
}
