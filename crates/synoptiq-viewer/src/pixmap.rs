//! In-memory surface host backed by `tiny-skia`.
//!
//! The host keeps a handle on whatever surface it handed out so callers can
//! read pixels back or export a PNG after the viewer has drawn.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use synoptiq_core::Rgba;
use tiny_skia::{Color, FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{ViewerError, ViewerResult};
use crate::input::Cursor;
use crate::surface::{PolygonStyle, Surface, SurfaceHost};
use crate::viewport::Camera;

#[derive(Debug, Default)]
struct Canvas {
    pixmap: Option<Pixmap>,
    cursor: Cursor,
}

impl Canvas {
    fn sized(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            cursor: Cursor::Default,
        }
    }
}

fn color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn build_path(rings: &[Vec<[f64; 2]>]) -> Option<SkPath> {
    let mut pb = PathBuilder::new();
    for ring in rings.iter().filter(|ring| ring.len() >= 3) {
        let [x0, y0] = ring[0];
        pb.move_to(x0 as f32, y0 as f32);
        for [x, y] in &ring[1..] {
            pb.line_to(*x as f32, *y as f32);
        }
        pb.close();
    }
    pb.finish()
}

/// Surface handed out by [`PixmapHost`].
pub struct PixmapSurface {
    canvas: Arc<Mutex<Canvas>>,
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas
            .lock()
            .pixmap
            .as_ref()
            .map(|p| (p.width(), p.height()))
            .unwrap_or((0, 0))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.lock().pixmap = Pixmap::new(width, height);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.canvas.lock().pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn draw_polygon(&mut self, rings: &[Vec<[f64; 2]>], style: &PolygonStyle, camera: &Camera) {
        let mut canvas = self.canvas.lock();
        let Some(pixmap) = canvas.pixmap.as_mut() else {
            return;
        };
        let Some(path) = build_path(rings) else {
            return;
        };

        let scale = camera.scale();
        let (tx, ty) = camera.translation();
        let transform =
            Transform::from_scale(scale as f32, scale as f32).post_translate(tx as f32, ty as f32);

        let mut paint = Paint::default();
        paint.anti_alias = true;

        if !style.fill.is_transparent() {
            paint.set_color(color(style.fill));
            pixmap.fill_path(&path, &paint, FillRule::EvenOdd, transform, None);
        }

        if !style.stroke.is_transparent() && style.line_width > 0.0 {
            paint.set_color(color(style.stroke));
            let stroke = Stroke {
                width: (style.line_width / scale) as f32,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.canvas.lock().cursor = cursor;
    }
}

/// Headless container holding one `tiny-skia` pixmap per attached viewer.
#[derive(Debug)]
pub struct PixmapHost {
    size: Mutex<(u32, u32)>,
    attached: Mutex<Option<Arc<Mutex<Canvas>>>>,
}

impl PixmapHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Mutex::new((width, height)),
            attached: Mutex::new(None),
        }
    }

    /// Changes the client size reported to the viewer. The viewer picks it
    /// up on its next `handle_resize`.
    pub fn set_client_size(&self, width: u32, height: u32) {
        *self.size.lock() = (width, height);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.lock().is_some()
    }

    /// Cursor last set on the attached surface.
    pub fn cursor(&self) -> Option<Cursor> {
        self.attached.lock().as_ref().map(|canvas| canvas.lock().cursor)
    }

    /// Copy of the attached surface's pixels.
    pub fn snapshot(&self) -> Option<Pixmap> {
        self.attached
            .lock()
            .as_ref()
            .and_then(|canvas| canvas.lock().pixmap.clone())
    }

    /// Un-premultiplied color of one pixel of the attached surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let attached = self.attached.lock();
        let canvas = attached.as_ref()?.lock();
        let c = canvas.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Encodes the attached surface as PNG.
    pub fn encode_png(&self) -> ViewerResult<Vec<u8>> {
        let pixmap = self.snapshot().ok_or_else(|| {
            if self.is_attached() {
                let (width, height) = *self.size.lock();
                ViewerError::EmptySurface { width, height }
            } else {
                ViewerError::NotAttached
            }
        })?;
        pixmap
            .encode_png()
            .map_err(|e| ViewerError::Encode(e.to_string()))
    }

    /// Writes the attached surface to a PNG file.
    pub fn save_png(&self, path: &Path) -> ViewerResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl SurfaceHost for PixmapHost {
    fn client_size(&self) -> (u32, u32) {
        *self.size.lock()
    }

    fn attach_surface(&self) -> Box<dyn Surface> {
        let (width, height) = self.client_size();
        let canvas = Arc::new(Mutex::new(Canvas::sized(width, height)));
        let previous = self.attached.lock().replace(canvas.clone());
        if previous.is_some() {
            tracing::warn!("Replacing a surface that was still attached");
        }
        Box::new(PixmapSurface { canvas })
    }

    fn detach_surface(&self) {
        self.attached.lock().take();
    }
}
