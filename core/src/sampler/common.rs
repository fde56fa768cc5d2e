//! Common

use super::*;

/// Stores the generator state shared by all sample generators.
#[derive(Copy, Clone, Debug, Default)]
pub struct SampleGeneratorData {
    /// Coordinates of the pixel being enumerated.
    pub current_pixel: Point2i,

    /// Index of the current sample inside the pixel.
    pub current_sample_index: usize,
}

impl SampleGeneratorData {
    /// Start enumerating a new pixel.
    ///
    /// * `p` - The pixel.
    pub fn reset_pixel(&mut self, p: &Point2i) {
        self.current_pixel = *p;
        self.current_sample_index = 0;
    }

    /// Returns the raster position of a stratum centre inside the current
    /// pixel.
    ///
    /// * `ix`  - Stratum column.
    /// * `iy`  - Stratum row.
    /// * `res` - Number of strata per axis.
    pub fn raster_position(&self, ix: usize, iy: usize, res: usize) -> Point2f {
        let d = stratum_center(ix, iy, res);
        Point2f::new(self.current_pixel.x as Float + d.x, self.current_pixel.y as Float + d.y)
    }
}

/// Returns the centre of the stratum `(ix, iy)` of a `res` x `res` grid over
/// the unit square.
///
/// * `ix`  - Stratum column.
/// * `iy`  - Stratum row.
/// * `res` - Number of strata per axis.
#[inline]
pub fn stratum_center(ix: usize, iy: usize, res: usize) -> Point2f {
    let inv = 1.0 / res as Float;
    Point2f::new((ix as Float + 0.5) * inv, (iy as Float + 0.5) * inv)
}
