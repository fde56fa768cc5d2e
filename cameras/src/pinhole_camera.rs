//! Pinhole Camera

use lfcore::base::*;
use lfcore::camera::*;
use lfcore::geometry::*;

/// Pinhole viewer on the plane `z = 0` looking through an image plane of
/// half size `half_size` at `z = depth`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinholeCamera {
    /// Raster width.
    pub width: usize,

    /// Raster height.
    pub height: usize,

    /// Half of the image plane size `(x, y)`.
    pub half_size: [Float; 2],

    /// Depth of the image plane.
    pub depth: Float,

    /// Pinhole position `(x, y)` on the plane `z = 0`.
    pub origin: Point2f,
}

impl PinholeCamera {
    /// Create a new `PinholeCamera`.
    ///
    /// * `width`     - Raster width.
    /// * `height`    - Raster height.
    /// * `half_size` - Half of the image plane size.
    /// * `depth`     - Depth of the image plane.
    /// * `origin`    - Pinhole position on the plane `z = 0`.
    pub fn new(width: usize, height: usize, half_size: [Float; 2], depth: Float, origin: Point2f) -> Self {
        debug!("Pinhole camera {width}x{height} at ({}, {})", origin.x, origin.y);
        Self {
            width,
            height,
            half_size,
            depth,
            origin,
        }
    }
}

impl RayGenerator for PinholeCamera {
    /// Returns the ray through the image plane point of a raster position.
    ///
    /// * `raster`     - Raster position in pixels.
    /// * `_secondary` - Unused.
    fn generate_ray(&self, raster: &Point2f, _secondary: &Point2f) -> (Ray, Float) {
        let (w, h) = (self.width as Float, self.height as Float);
        if raster.x < 0.0 || raster.y < 0.0 || raster.x > w || raster.y > h {
            return (Ray::default(), 0.0);
        }

        let lx = -1.0 + 2.0 * raster.x / w;
        let ly = -1.0 + 2.0 * raster.y / h;
        let o = Point3f::new(self.origin.x, self.origin.y, 0.0);
        let d = Vector3f::new(lx * self.half_size[0], -ly * self.half_size[1], self.depth);
        (Ray::new(o, d), 1.0)
    }
}
