//! Camera and coordinate transformation for floor-plan rendering.
//!
//! Converts between screen pixels and plan (world) coordinates with
//! `screen = world * scale + translation`. The plan's Y axis points down,
//! the same as the screen, so no flip is applied.

use std::fmt;

/// Uniform scale plus translation applied to the plan, and the surface size
/// it is applied on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
    width: f64,
    height: f64,
}

impl Camera {
    /// Creates an identity camera for a surface of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            width,
            height,
        }
    }

    /// Gets the current scale (screen pixels per world unit).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Gets the translation in screen pixels.
    pub fn translation(&self) -> (f64, f64) {
        (self.translate_x, self.translate_y)
    }

    /// Gets the surface size the camera maps onto.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Sets scale and translation directly.
    pub fn set_transform(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        if scale > 0.0 && scale.is_finite() {
            self.scale = scale;
            self.translate_x = translate_x;
            self.translate_y = translate_y;
        }
    }

    /// Converts world coordinates to screen pixels.
    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.scale + self.translate_x,
            world_y * self.scale + self.translate_y,
        )
    }

    /// Converts screen pixels to world coordinates.
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> (f64, f64) {
        (
            (screen_x - self.translate_x) / self.scale,
            (screen_y - self.translate_y) / self.scale,
        )
    }

    /// Fits a bounding box into the surface minus `padding` pixels on every
    /// side, using the smaller of the two axis scales and centring the box.
    ///
    /// Returns `false` and leaves the camera unchanged when the box has no
    /// width or height, or when the padded surface has no room left.
    pub fn fit_to_bounds(
        &mut self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        padding: f64,
    ) -> bool {
        let data_width = max_x - min_x;
        let data_height = max_y - min_y;
        if !(data_width > 0.0 && data_height > 0.0) {
            return false;
        }

        let room_x = self.width - 2.0 * padding;
        let room_y = self.height - 2.0 * padding;
        if room_x <= 0.0 || room_y <= 0.0 {
            return false;
        }

        let scale = (room_x / data_width).min(room_y / data_height);
        let center_x = min_x + data_width / 2.0;
        let center_y = min_y + data_height / 2.0;

        self.scale = scale;
        self.translate_x = self.width / 2.0 - center_x * scale;
        self.translate_y = self.height / 2.0 - center_y * scale;
        true
    }

    /// Multiplies the scale by `factor` around a screen point, keeping the
    /// world point under it fixed. The new scale is clamped to
    /// `[min_scale, max_scale]`.
    pub fn zoom_at(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        factor: f64,
        min_scale: f64,
        max_scale: f64,
    ) {
        let (world_x, world_y) = self.screen_to_world(screen_x, screen_y);
        let new_scale = (self.scale * factor).clamp(min_scale, max_scale);

        self.scale = new_scale;
        self.translate_x = screen_x - world_x * new_scale;
        self.translate_y = screen_y - world_y * new_scale;
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Changes the surface size while keeping the world point at the centre
    /// of the surface in place.
    pub fn resize(&mut self, width: f64, height: f64) {
        let (center_x, center_y) = self.screen_to_world(self.width / 2.0, self.height / 2.0);
        self.width = width;
        self.height = height;
        self.translate_x = width / 2.0 - center_x * self.scale;
        self.translate_y = height / 2.0 - center_y * self.scale;
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scale: {:.3}x | Translation: ({:.1}, {:.1})",
            self.scale, self.translate_x, self.translate_y
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
