//! Focusing Eye Camera

use lfcore::base::*;
use lfcore::camera::*;
use lfcore::geometry::*;

/// Two-plane eye model able to focus.
///
/// The retina lies on `z = retina_z`, the aperture is centred at `position`
/// and rays start on the aperture plane `z = 0`. All rays for one retina
/// point meet on the in-focus plane `z = in_focus_z`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FocusEyeCamera {
    /// Raster width.
    pub width: usize,

    /// Raster height.
    pub height: usize,

    /// Depth of the retina plane.
    pub retina_z: Float,

    /// Depth of the in-focus plane.
    pub in_focus_z: Float,

    /// Retina corner mapped to raster `(0, H)`.
    pub retina_start: Point2f,

    /// Retina corner mapped to raster `(W, 0)`.
    pub retina_end: Point2f,

    /// Radius of the aperture.
    pub aperture_radius: Float,

    /// Centre of the eye on the aperture plane.
    pub position: Point2f,
}

impl Default for FocusEyeCamera {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            retina_z: -1.0,
            in_focus_z: 1.0,
            retina_start: Point2f::new(-1.0, -1.0),
            retina_end: Point2f::new(1.0, 1.0),
            aperture_radius: 1.0,
            position: Point2f::zero(),
        }
    }
}

impl FocusEyeCamera {
    /// Create a new `FocusEyeCamera` with a default retina.
    ///
    /// * `width`           - Raster width.
    /// * `height`          - Raster height.
    /// * `in_focus_z`      - Depth of the in-focus plane.
    /// * `aperture_radius` - Radius of the aperture.
    pub fn new(width: usize, height: usize, in_focus_z: Float, aperture_radius: Float) -> Self {
        Self {
            width,
            height,
            in_focus_z,
            aperture_radius,
            ..Default::default()
        }
    }

    /// Create a new `FocusEyeCamera` whose retina sees the screen rectangle
    /// upright, as a pinhole at the same position would.
    ///
    /// * `width`           - Raster width.
    /// * `height`          - Raster height.
    /// * `half_size`       - Half of the physical screen size.
    /// * `viewer_distance` - Depth of the screen plane.
    /// * `in_focus_z`      - Depth of the in-focus plane.
    /// * `aperture_radius` - Radius of the aperture.
    /// * `position`        - Centre of the eye on the aperture plane.
    pub fn looking_at_screen(
        width: usize,
        height: usize,
        half_size: [Float; 2],
        viewer_distance: Float,
        in_focus_z: Float,
        aperture_radius: Float,
        position: Point2f,
    ) -> Self {
        let retina_z = -1.0;
        let sx = half_size[0] * retina_z / viewer_distance;
        let sy = half_size[1] * retina_z / viewer_distance;
        Self {
            width,
            height,
            retina_z,
            in_focus_z,
            retina_start: Point2f::new(-sx, -sy),
            retina_end: Point2f::new(sx, sy),
            aperture_radius,
            position,
        }
    }
}

impl RayGenerator for FocusEyeCamera {
    /// Returns the ray from an aperture point to the in-focus point of a
    /// retina position.
    ///
    /// * `raster`    - Raster position in pixels.
    /// * `secondary` - Aperture position in `[0, 1]^2`.
    fn generate_ray(&self, raster: &Point2f, secondary: &Point2f) -> (Ray, Float) {
        let (w, h) = (self.width as Float, self.height as Float);
        if raster.x < 0.0 || raster.y < 0.0 || raster.x > w || raster.y > h {
            return (Ray::default(), 0.0);
        }

        let lx = raster.x / w;
        let ly = 1.0 - raster.y / h;
        let retina = Point2f::new(
            lerp(lx, self.retina_start.x, self.retina_end.x),
            lerp(ly, self.retina_start.y, self.retina_end.y),
        );
        let aperture = Point2f::new(
            (-1.0 + 2.0 * secondary.x) * self.aperture_radius,
            (-1.0 + 2.0 * secondary.y) * self.aperture_radius,
        );

        // Chief ray through the aperture centre meets the in-focus plane here.
        let coef = self.in_focus_z / self.retina_z;
        let target = Point2f::new(retina.x * coef, retina.y * coef);

        let o = Point3f::new(self.position.x + aperture.x, self.position.y + aperture.y, 0.0);
        let d = Vector3f::new(target.x - aperture.x, target.y - aperture.y, self.in_focus_z);
        (Ray::new(o, d), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_unit_eye() {
        let c = FocusEyeCamera::default();
        assert_eq!((c.width, c.height), (512, 512));
        assert_eq!(c.retina_z, -1.0);
        assert_eq!(c.in_focus_z, 1.0);
        assert_eq!(c.aperture_radius, 1.0);
    }

    #[test]
    fn centre_of_aperture_and_retina_looks_ahead() {
        let c = FocusEyeCamera::default();
        let (ray, w) = c.generate_ray(&Point2f::new(256.0, 256.0), &Point2f::new(0.5, 0.5));
        assert_eq!(w, 1.0);
        assert_eq!(ray.o, Point3f::zero());
        assert_eq!(ray.d, Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn retina_image_is_inverted() {
        let c = FocusEyeCamera::default();
        let (ray, _) = c.generate_ray(&Point2f::new(0.0, 0.0), &Point2f::new(0.5, 0.5));
        assert_eq!(ray.d, Vector3f::new(1.0, -1.0, 1.0));
    }

    #[test]
    fn outside_raster_has_zero_weight() {
        let c = FocusEyeCamera::new(10, 10, 2.0, 0.1);
        assert_eq!(c.generate_ray(&Point2f::new(10.5, 5.0), &Point2f::new(0.5, 0.5)).1, 0.0);
        assert_eq!(c.generate_ray(&Point2f::new(5.0, -1.0), &Point2f::new(0.5, 0.5)).1, 0.0);
    }

    #[test]
    fn screen_eye_chief_rays_hit_screen_corners() {
        let position = Point2f::new(0.1, -0.05);
        let c = FocusEyeCamera::looking_at_screen(8, 4, [1.0, 0.5], 1.5, 3.0, 0.1, position);
        let centre = Point2f::new(0.5, 0.5);
        for (raster, corner) in [
            (Point2f::new(0.0, 0.0), Point2f::new(-1.0, 0.5)),
            (Point2f::new(8.0, 4.0), Point2f::new(1.0, -0.5)),
        ] {
            let (ray, _) = c.generate_ray(&raster, &centre);
            let p = ray.at(1.5 / ray.d.z);
            assert!(approx_eq!(f32, p.x, corner.x + position.x, epsilon = 1e-5));
            assert!(approx_eq!(f32, p.y, corner.y + position.y, epsilon = 1e-5));
        }
    }

    #[test]
    fn moving_the_eye_translates_its_rays() {
        let a = FocusEyeCamera::new(16, 16, 2.0, 0.25);
        let b = FocusEyeCamera {
            position: Point2f::new(0.3, 0.2),
            ..a
        };
        let (raster, secondary) = (Point2f::new(3.0, 11.0), Point2f::new(0.2, 0.9));
        let (ra, _) = a.generate_ray(&raster, &secondary);
        let (rb, _) = b.generate_ray(&raster, &secondary);
        assert_eq!(rb.d, ra.d);
        assert!(approx_eq!(f32, rb.o.x, ra.o.x + 0.3, epsilon = 1e-6));
        assert!(approx_eq!(f32, rb.o.y, ra.o.y + 0.2, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn rays_of_one_retina_point_meet_on_focus_plane(
            rx in 0.0..512.0_f32,
            ry in 0.0..512.0_f32,
            sx in 0.0..1.0_f32,
            sy in 0.0..1.0_f32,
        ) {
            let c = FocusEyeCamera::new(512, 512, 2.0, 0.25);
            let raster = Point2f::new(rx, ry);
            let (a, _) = c.generate_ray(&raster, &Point2f::new(0.5, 0.5));
            let (b, _) = c.generate_ray(&raster, &Point2f::new(sx, sy));
            let pa = a.at(1.0);
            let pb = b.at(1.0);
            prop_assert!(approx_eq!(f32, pa.x, pb.x, epsilon = 1e-4));
            prop_assert!(approx_eq!(f32, pa.y, pb.y, epsilon = 1e-4));
            prop_assert!(approx_eq!(f32, pa.z, 2.0, epsilon = 1e-6));
        }
    }
}
