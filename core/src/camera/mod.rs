//! Ray generators

use crate::base::*;
use crate::geometry::*;

/// Raster step used to estimate ray differentials by finite differences.
pub const DIFFERENTIAL_EPSILON: Float = 0.01;

/// Maps a raster position plus a secondary stratification coordinate to a
/// ray in display space.
pub trait RayGenerator: Send + Sync {
    /// Returns the ray for a raster position along with its weight. A weight
    /// of 0 means the position produces no ray.
    ///
    /// * `raster`    - Raster position in pixels.
    /// * `secondary` - Secondary coordinate in `[0, 1]^2`.
    fn generate_ray(&self, raster: &Point2f, secondary: &Point2f) -> (Ray, Float);

    /// Returns the ray, its differentials with respect to raster x and y, and
    /// its weight. Differentials are estimated by finite differences; where
    /// the forward step leaves the raster, a backward step is used instead.
    ///
    /// * `raster`    - Raster position in pixels.
    /// * `secondary` - Secondary coordinate in `[0, 1]^2`.
    fn generate_ray_differential(&self, raster: &Point2f, secondary: &Point2f) -> (Ray, RayDifferential, Float) {
        let (ray, weight) = self.generate_ray(raster, secondary);
        if weight == 0.0 {
            return (ray, RayDifferential::default(), weight);
        }

        let difference = |axis: usize| -> (Vector3f, Vector3f) {
            for eps in [DIFFERENTIAL_EPSILON, -DIFFERENTIAL_EPSILON] {
                let mut shifted = *raster;
                shifted[axis] += eps;
                let (r, w) = self.generate_ray(&shifted, secondary);
                if w != 0.0 {
                    return ((r.o - ray.o) / eps, (r.d - ray.d) / eps);
                }
            }
            (Vector3f::zero(), Vector3f::zero())
        };

        let (dodx, dddx) = difference(0);
        let (dody, dddy) = difference(1);
        (ray, RayDifferential { dodx, dddx, dody, dddy }, weight)
    }
}
