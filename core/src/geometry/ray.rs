//! Rays

use super::{Point3f, Vector3f};
use crate::base::Float;
use std::fmt;

/// A ray with an origin and a (not necessarily normalized) direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self { o, d }
    }

    /// Returns the point at a given parameter along the ray.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns the intersection with the plane `z = z0`, or `None` if the ray
    /// does not travel toward increasing `z`.
    ///
    /// * `z0` - Depth of the plane.
    pub fn intersect_z_plane(&self, z0: Float) -> Option<Point3f> {
        if self.d.z <= 0.0 {
            return None;
        }
        let t = (z0 - self.o.z) / self.d.z;
        Some(Point3f::new(self.o.x + t * self.d.x, self.o.y + t * self.d.y, z0))
    }
}

/// Derivatives of a ray's origin and direction with respect to the raster
/// coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Change in origin per unit step in raster x.
    pub dodx: Vector3f,

    /// Change in direction per unit step in raster x.
    pub dddx: Vector3f,

    /// Change in origin per unit step in raster y.
    pub dody: Vector3f,

    /// Change in direction per unit step in raster y.
    pub dddy: Vector3f,
}

impl fmt::Display for Ray {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o={}, d={}]", self.o, self.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_z_plane_scales_lateral_offset() {
        let ray = Ray::new(Point3f::new(1.0, 0.0, 0.0), Vector3f::new(0.5, -0.25, 1.0));
        let p = ray.intersect_z_plane(2.0).unwrap();
        assert_eq!(p, Point3f::new(2.0, -0.5, 2.0));
    }

    #[test]
    fn ray_pointing_away_from_plane_misses() {
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_z_plane(1.0).is_none());
        let parallel = Ray::new(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0));
        assert!(parallel.intersect_z_plane(1.0).is_none());
    }
}
