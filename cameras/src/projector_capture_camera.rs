//! Projector Capture Camera

use lfcore::base::*;
use lfcore::camera::*;
use lfcore::diffuser::*;
use lfcore::display::*;
use lfcore::geometry::*;

/// Captures what a projector contributes most: for every screen point of the
/// projector raster, the ray starts at the point of the viewer line where the
/// projector's light through that screen point is brightest.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectorCaptureCamera {
    /// Raster width.
    pub width: usize,

    /// Raster height.
    pub height: usize,

    /// Half of the physical screen size.
    pub half_size: [Float; 2],

    /// Depth of the screen plane.
    pub viewer_distance: Float,

    /// Position of the projector.
    pub projector: Point3f,

    /// Diffuser model of the screen.
    pub diffuser: DiffuserModel,
}

impl ProjectorCaptureCamera {
    /// Create a new `ProjectorCaptureCamera` at the display resolution.
    ///
    /// * `display`   - The display.
    /// * `projector` - Position of the projector.
    pub fn new(display: &ProjectorDisplay, projector: Point3f) -> Self {
        Self {
            width: display.width(),
            height: display.height(),
            half_size: display.half_phys_size,
            viewer_distance: display.viewer_distance,
            projector,
            diffuser: display.diffuser(),
        }
    }

    /// Returns the screen point of a raster position.
    ///
    /// * `raster` - Raster position in pixels.
    pub fn screen_point(&self, raster: &Point2f) -> Point3f {
        let lx = -1.0 + 2.0 * raster.x / self.width as Float;
        let ly = 1.0 - 2.0 * raster.y / self.height as Float;
        Point3f::new(lx * self.half_size[0], ly * self.half_size[1], self.viewer_distance)
    }
}

impl RayGenerator for ProjectorCaptureCamera {
    /// Returns the ray from the brightest viewer line point to the screen
    /// point of a raster position.
    ///
    /// * `raster`     - Raster position in pixels.
    /// * `_secondary` - Unused.
    fn generate_ray(&self, raster: &Point2f, _secondary: &Point2f) -> (Ray, Float) {
        let screen = self.screen_point(raster);
        let x = self.diffuser.find_max_on_viewer_line(&self.projector, &screen);
        let o = Point3f::new(x, 0.0, 0.0);
        (Ray::new(o, screen - o), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn display(diffuser_type: DiffuserType) -> ProjectorDisplay {
        ProjectorDisplay {
            viewer_distance: 1.0,
            resolution: [4, 2],
            half_phys_size: [1.0, 0.5],
            diffuser_type,
            ..Default::default()
        }
    }

    #[test]
    fn pixel_centres_match_display_screen_points() {
        let d = display(DiffuserType::Linear);
        let c = ProjectorCaptureCamera::new(&d, Point3f::new(0.0, 0.0, 2.0));
        for (x, y) in [(0, 0), (3, 1), (2, 0)] {
            let p = c.screen_point(&Point2f::new(x as Float + 0.5, y as Float + 0.5));
            let q = d.screen_point(x, y);
            assert!(approx_eq!(f32, p.x, q.x, epsilon = 1e-6));
            assert!(approx_eq!(f32, p.y, q.y, epsilon = 1e-6));
            assert_eq!(p.z, q.z);
        }
    }

    #[test]
    fn linear_ray_continues_projector_ray() {
        let d = display(DiffuserType::Linear);
        let c = ProjectorCaptureCamera::new(&d, Point3f::new(-0.2, 0.0, 2.0));
        // Raster (2, 1) is the screen centre.
        let (ray, w) = c.generate_ray(&Point2f::new(2.0, 1.0), &Point2f::new(0.5, 0.5));
        assert_eq!(w, 1.0);
        assert!(approx_eq!(f32, ray.o.x, 0.2, epsilon = 1e-6));
        assert_eq!(ray.o.y, 0.0);
        assert_eq!(ray.o.z, 0.0);
        assert!(approx_eq!(f32, ray.d.x, -0.2, epsilon = 1e-6));
        assert_eq!(ray.d.z, 1.0);
    }

    #[test]
    fn capture_ray_is_the_brightest_view_of_the_projector() {
        let d = display(DiffuserType::Conical);
        let projector = Point3f::new(0.3, 0.1, 2.5);
        let c = ProjectorCaptureCamera::new(&d, projector);
        let diffuser = d.diffuser();
        let (ray, _) = c.generate_ray(&Point2f::new(1.3, 0.4), &Point2f::new(0.5, 0.5));
        let screen = ray.o + ray.d;
        let best = diffuser.refracted_intensity(&projector, &screen, &ray.o);
        for dx in [-0.05, 0.05] {
            let other = Point3f::new(ray.o.x + dx, 0.0, 0.0);
            assert!(diffuser.refracted_intensity(&projector, &screen, &other) <= best);
        }
    }
}
