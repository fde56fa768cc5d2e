//! Perceived image renderer

use cameras::*;
use lfcore::app::*;
use lfcore::base::*;
use lfcore::camera::*;
use lfcore::diffuser::*;
use lfcore::display::*;
use lfcore::film::*;
use lfcore::geometry::*;
use lfcore::image_io::*;
use lfcore::integrator::*;
use lfcore::sampler::*;
use lfcore::spectrum::*;
use samplers::*;

/// Strata per pixel axis of the default sample generator.
pub const DEFAULT_SHOW_SAMPLES: usize = 3;

/// Renders what a viewer perceives from a projector display.
///
/// Every viewer ray is intersected with the screen plane; the colour at the
/// intersection is the diffuser weighted average of the projector images at
/// the texel under the intersection.
pub struct ProjectorsShow {
    /// The display.
    pub display: ProjectorDisplay,

    /// Diffuser model of the screen.
    pub diffuser: DiffuserModel,

    /// Projector positions in display order.
    pub projector_positions: Vec<Point3f>,

    /// One image per projector.
    pub projector_images: Vec<RGBImage>,
}

impl ProjectorsShow {
    /// Create a new `ProjectorsShow` without projector images.
    ///
    /// * `display` - The display.
    pub fn new(display: ProjectorDisplay) -> Self {
        let diffuser = display.diffuser();
        let projector_positions = display.projector_positions();
        Self {
            display,
            diffuser,
            projector_positions,
            projector_images: vec![],
        }
    }

    /// Create a new `ProjectorsShow` showing the given projector images.
    ///
    /// * `display` - The display.
    /// * `images`  - One image per projector.
    pub fn with_images(display: ProjectorDisplay, images: Vec<RGBImage>) -> Result<Self, String> {
        let mut show = Self::new(display);
        show.projector_images = images;
        show.validate()?;
        Ok(show)
    }

    /// Checks that there is one image per projector at projector resolution.
    pub fn validate(&self) -> Result<(), String> {
        let (width, height) = (self.display.width(), self.display.height());
        if width == 0 || height == 0 {
            return Err(format!("Invalid projector resolution {width} x {height}"));
        }
        if self.projector_images.is_empty() {
            return Err("No projector images".to_string());
        }
        if self.projector_images.len() != self.projector_positions.len() {
            return Err(format!(
                "Got {} projector images for {} projectors",
                self.projector_images.len(),
                self.projector_positions.len()
            ));
        }
        if let Some(i) = self.projector_images.iter().position(|img| !img.has_resolution(width, height)) {
            return Err(format!(
                "Projector image {i} is {} x {}, expected {width} x {height}",
                self.projector_images[i].width(),
                self.projector_images[i].height()
            ));
        }
        Ok(())
    }

    /// Returns the colour seen along a viewer ray, or `None` if the ray
    /// misses the screen.
    ///
    /// * `ray` - The viewer ray.
    pub fn perceived_colour(&self, ray: &Ray) -> Option<RGBSpectrum> {
        let p = ray.intersect_z_plane(self.display.viewer_distance)?;

        let [half_x, half_y] = self.display.half_phys_size;
        let u = 0.5 * (1.0 + p.x / half_x);
        let v = 0.5 * (1.0 - p.y / half_y);
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        let (width, height) = (self.display.width(), self.display.height());
        let tx = clamp((u * width as Float) as Int, 0, width as Int - 1) as usize;
        let ty = clamp((v * height as Float) as Int, 0, height as Int - 1) as usize;

        let mut weight_sum = 0.0;
        let mut colour_sum = RGBSpectrum::ZERO;
        for (position, image) in self.projector_positions.iter().zip(self.projector_images.iter()) {
            let w = self.diffuser.refracted_intensity(position, &p, &ray.o);
            if w >= WEIGHT_EPSILON {
                colour_sum += image.get(tx, ty) * w;
                weight_sum += w;
            }
        }

        if weight_sum >= WEIGHT_EPSILON {
            Some(colour_sum / weight_sum)
        } else {
            Some(RGBSpectrum::ZERO)
        }
    }

    /// Renders the view of a pinhole viewer at `(viewer.x, viewer.y, 0)`
    /// through an image plane the size of the screen.
    ///
    /// * `viewer`   - Viewer position.
    /// * `width`    - Image width.
    /// * `height`   - Image height.
    /// * `settings` - Thread count, tile size and progress output.
    pub fn render_view(
        &self,
        viewer: &Point3f,
        width: usize,
        height: usize,
        settings: &RenderSettings,
    ) -> Result<RGBImage, String> {
        if viewer.z != 0.0 {
            warn!("Viewer z = {} ignored, viewers live on z = 0", viewer.z);
        }
        let camera = PinholeCamera::new(
            width,
            height,
            self.display.half_phys_size,
            self.display.viewer_distance,
            Point2f::new(viewer.x, viewer.y),
        );
        let sampler = self.create_default_sample_generator(width, height);
        let accumulator = self.create_default_sample_accumulator(width, height)?;
        self.render(&camera, sampler.as_ref(), &accumulator, settings)?;
        Ok(accumulator.into())
    }
}

impl LightFieldRenderer for ProjectorsShow {
    /// Loads `0000.exr`, `0001.exr`, ... one per projector.
    ///
    /// * `path` - Directory with the projector images.
    fn load_scene(&mut self, path: &str) -> Result<(), String> {
        let images = read_image_set(path, self.projector_positions.len())?;
        info!("Loaded {} projector images from '{path}'", images.len());
        self.projector_images = images;
        self.validate()
    }

    fn create_default_ray_generator(&self, width: usize, height: usize) -> Box<dyn RayGenerator> {
        Box::new(PinholeCamera::new(
            width,
            height,
            self.display.half_phys_size,
            self.display.viewer_distance,
            Point2f::zero(),
        ))
    }

    fn create_default_sample_generator(&self, _width: usize, _height: usize) -> BoxSampleGenerator {
        Box::new(UniformSampler {
            data: SampleGeneratorData::default(),
            primary: DEFAULT_SHOW_SAMPLES,
            secondary: 1,
        })
    }

    fn render(
        &self,
        ray_generator: &dyn RayGenerator,
        sample_generator: &dyn SampleGenerator,
        accumulator: &SampleAccumulator,
        settings: &RenderSettings,
    ) -> Result<(), String> {
        self.validate()?;
        render_tiles(ray_generator, sample_generator, accumulator, settings, |ray| {
            self.perceived_colour(ray)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn settings() -> RenderSettings {
        RenderSettings {
            n_threads: 4,
            tile_size: 16,
            quiet: true,
        }
    }

    fn display(diffusion_power: [Float; 2], projectors: usize, resolution: [usize; 2]) -> ProjectorDisplay {
        ProjectorDisplay {
            viewer_distance: 1.0,
            resolution,
            half_phys_size: [0.5, 0.5],
            diffuser_type: DiffuserType::Linear,
            diffusion_power,
            observer: None,
            projector_lines: vec![ProjectorLine {
                start: [-0.2, 0.0, 2.0],
                step: [0.4, 0.0, 0.0],
                number: projectors,
            }],
        }
    }

    #[test]
    fn uniform_diffuser_shows_average_colour() {
        let images = vec![
            RGBImage::filled(8, 8, RGBSpectrum::from_rgb(1.0, 0.0, 0.5)),
            RGBImage::filled(8, 8, RGBSpectrum::from_rgb(0.0, 1.0, 0.5)),
        ];
        let show = ProjectorsShow::with_images(display([0.0, 0.0], 2, [8, 8]), images).unwrap();
        let img = show.render_view(&Point3f::zero(), 20, 12, &settings()).unwrap();
        assert_eq!(img.width(), 20);
        for p in img.pixels.iter() {
            assert!(approx_eq!(f32, p[0], 0.5, epsilon = 1e-5));
            assert!(approx_eq!(f32, p[1], 0.5, epsilon = 1e-5));
            assert!(approx_eq!(f32, p[2], 0.5, epsilon = 1e-5));
        }
    }

    #[test]
    fn texel_under_intersection_is_shown() {
        let mut image = RGBImage::new(2, 2);
        image.set(0, 0, RGBSpectrum::from_rgb(1.0, 0.0, 0.0));
        image.set(1, 0, RGBSpectrum::from_rgb(0.0, 1.0, 0.0));
        image.set(0, 1, RGBSpectrum::from_rgb(0.0, 0.0, 1.0));
        image.set(1, 1, RGBSpectrum::new(1.0));
        let show = ProjectorsShow::with_images(display([0.0, 0.0], 1, [2, 2]), vec![image.clone()]).unwrap();
        let rendered = show.render_view(&Point3f::zero(), 2, 2, &settings()).unwrap();
        assert_eq!(rendered, image);
    }

    #[test]
    fn sharp_diffuser_favours_aligned_projector() {
        let images = vec![
            RGBImage::filled(4, 4, RGBSpectrum::from_rgb(1.0, 0.0, 0.0)),
            RGBImage::filled(4, 4, RGBSpectrum::from_rgb(0.0, 1.0, 0.0)),
        ];
        let show = ProjectorsShow::with_images(display([100.0, 0.0], 2, [4, 4]), images).unwrap();
        // Projector 0 at x = -0.2, z = 2 lines up with a viewer at x = 0.2
        // through the screen centre.
        let ray = Ray::new(Point3f::new(0.2, 0.0, 0.0), Vector3f::new(-0.2, 0.0, 1.0));
        let c = show.perceived_colour(&ray).unwrap();
        assert!(c[0] > 0.99);
        assert!(c[1] < 0.01);
    }

    #[test]
    fn rays_missing_the_screen_contribute_nothing() {
        let show = ProjectorsShow::with_images(
            display([0.0, 0.0], 1, [4, 4]),
            vec![RGBImage::filled(4, 4, RGBSpectrum::new(1.0))],
        )
        .unwrap();
        let away = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0));
        assert!(show.perceived_colour(&away).is_none());
        let outside = Ray::new(Point3f::zero(), Vector3f::new(0.9, 0.0, 1.0));
        assert!(show.perceived_colour(&outside).is_none());

        // A camera twice as wide as the screen leaves the border empty.
        let camera = PinholeCamera::new(8, 8, [1.0, 1.0], 1.0, Point2f::zero());
        let sampler = show.create_default_sample_generator(8, 8);
        let acc = show.create_default_sample_accumulator(8, 8).unwrap();
        show.render(&camera, sampler.as_ref(), &acc, &settings()).unwrap();
        assert_eq!(acc.get_pixel(0, 0).unwrap().weight_sum, 0.0);
        assert_eq!(acc.get_color(0, 0), Some(RGBSpectrum::ZERO));
        assert_eq!(acc.get_color(4, 4), Some(RGBSpectrum::new(1.0)));
    }

    #[test]
    fn negligible_weights_give_black() {
        let show = ProjectorsShow::with_images(
            display([1.0e6, 0.0], 1, [4, 4]),
            vec![RGBImage::filled(4, 4, RGBSpectrum::new(1.0))],
        )
        .unwrap();
        let ray = Ray::new(Point3f::new(-0.3, 0.0, 0.0), Vector3f::new(0.3, 0.0, 1.0));
        assert_eq!(show.perceived_colour(&ray), Some(RGBSpectrum::ZERO));
    }

    #[test]
    fn invalid_image_sets_are_rejected() {
        let d = display([0.0, 0.0], 2, [4, 4]);
        assert!(ProjectorsShow::with_images(d.clone(), vec![]).is_err());
        assert!(ProjectorsShow::with_images(d.clone(), vec![RGBImage::new(4, 4)]).is_err());
        assert!(ProjectorsShow::with_images(d.clone(), vec![RGBImage::new(4, 4), RGBImage::new(4, 3)]).is_err());

        let show = ProjectorsShow::new(d);
        let camera = show.create_default_ray_generator(4, 4);
        let sampler = show.create_default_sample_generator(4, 4);
        let acc = show.create_default_sample_accumulator(4, 4).unwrap();
        assert!(show.render(camera.as_ref(), sampler.as_ref(), &acc, &settings()).is_err());
    }

    #[test]
    fn load_scene_reads_one_image_per_projector() {
        let dir = std::env::temp_dir().join("integrators-show-scene");
        let dir = dir.to_string_lossy().to_string();
        let images = vec![
            RGBImage::filled(4, 4, RGBSpectrum::new(0.25)),
            RGBImage::filled(4, 4, RGBSpectrum::new(0.75)),
        ];
        write_image_set(&dir, &images).unwrap();

        let mut show = ProjectorsShow::new(display([0.0, 0.0], 2, [4, 4]));
        show.load_scene(&dir).unwrap();
        assert_eq!(show.projector_images, images);

        let mut three = ProjectorsShow::new(display([0.0, 0.0], 3, [4, 4]));
        assert!(three.load_scene(&dir).is_err());
    }
}
