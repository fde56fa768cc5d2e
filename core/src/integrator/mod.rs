//! Integrator

use crate::app::*;
use crate::base::*;
use crate::camera::*;
use crate::film::*;
use crate::geometry::*;
use crate::parallel::*;
use crate::sampler::*;
use crate::spectrum::*;

/// Renderer interface shared by the perceived-image renderer and any external
/// ray tracer producing ground truth views.
pub trait LightFieldRenderer: Send + Sync {
    /// Loads the scene the renderer draws from.
    ///
    /// * `path` - Scene location (file or directory, renderer specific).
    fn load_scene(&mut self, path: &str) -> Result<(), String>;

    /// Returns the ray generator used when the caller supplies none.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    fn create_default_ray_generator(&self, width: usize, height: usize) -> Box<dyn RayGenerator>;

    /// Returns the sample generator used when the caller supplies none.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    fn create_default_sample_generator(&self, width: usize, height: usize) -> BoxSampleGenerator;

    /// Returns an empty accumulator of the given size.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    fn create_default_sample_accumulator(&self, width: usize, height: usize) -> Result<SampleAccumulator, String> {
        SampleAccumulator::new(width, height)
    }

    /// Renders into `accumulator`.
    ///
    /// * `ray_generator`    - Maps samples to rays.
    /// * `sample_generator` - Prototype cloned by every tile.
    /// * `accumulator`      - Receives the merged tiles.
    /// * `settings`         - Thread count, tile size and progress output.
    fn render(
        &self,
        ray_generator: &dyn RayGenerator,
        sample_generator: &dyn SampleGenerator,
        accumulator: &SampleAccumulator,
        settings: &RenderSettings,
    ) -> Result<(), String>;
}

/// Renders every tile of `accumulator` in parallel. `colorize` returns the
/// colour carried by a ray, or `None` if the ray contributes nothing.
///
/// * `ray_generator`    - Maps samples to rays.
/// * `sample_generator` - Prototype cloned by every tile.
/// * `accumulator`      - Receives the merged tiles.
/// * `settings`         - Thread count, tile size and progress output.
/// * `colorize`         - Per-ray colour.
pub fn render_tiles<F>(
    ray_generator: &dyn RayGenerator,
    sample_generator: &dyn SampleGenerator,
    accumulator: &SampleAccumulator,
    settings: &RenderSettings,
    colorize: F,
) -> Result<(), String>
where
    F: Fn(&Ray) -> Option<RGBSpectrum> + Sync,
{
    if settings.tile_size == 0 {
        return Err("Invalid tile size 0".to_string());
    }

    // Compute number of tiles, `n_tiles`, to use for parallel rendering.
    let sample_bounds = accumulator.get_sample_bounds();
    let sample_extent = sample_bounds.diagonal();
    let tile_size = settings.tile_size as Int;
    let n_tiles = Point2::new(
        ((sample_extent.x + tile_size - 1) / tile_size) as usize,
        ((sample_extent.y + tile_size - 1) / tile_size) as usize,
    );
    let tile_count = n_tiles.x * n_tiles.y;

    info!("Rendering {}x{} tiles", n_tiles.x, n_tiles.y);

    let progress = create_progress_reporter(tile_count as u64, settings.quiet);
    progress.set_message("Rendering");

    parallel_for(tile_count, settings.n_threads, |tile_idx| {
        let tile = render_tile(
            tile_idx,
            n_tiles,
            sample_bounds,
            tile_size,
            ray_generator,
            sample_generator,
            accumulator,
            &colorize,
        );
        accumulator.merge_sample_tile(tile);
        progress.inc(1);
    })?;

    progress.finish_with_message("Render complete");
    Ok(())
}

/// Renders one tile.
///
/// * `tile_idx`         - Unique tile index.
/// * `n_tiles`          - Number of tiles in (x, y) direction.
/// * `sample_bounds`    - Sample bounds.
/// * `tile_size`        - Tile size.
/// * `ray_generator`    - Maps samples to rays.
/// * `sample_generator` - Prototype generator.
/// * `accumulator`      - Supplies the tile buffer.
/// * `colorize`         - Per-ray colour.
#[allow(clippy::too_many_arguments)]
fn render_tile<F>(
    tile_idx: usize,
    n_tiles: Point2<usize>,
    sample_bounds: Bounds2i,
    tile_size: Int,
    ray_generator: &dyn RayGenerator,
    sample_generator: &dyn SampleGenerator,
    accumulator: &SampleAccumulator,
    colorize: &F,
) -> SampleTile
where
    F: Fn(&Ray) -> Option<RGBSpectrum> + Sync,
{
    // Get the x and y tile indices.
    let tile_x = tile_idx % n_tiles.x;
    let tile_y = tile_idx / n_tiles.x;

    // Compute sample bounds for tile.
    let x0 = sample_bounds.p_min.x + tile_x as Int * tile_size;
    let x1 = min(x0 + tile_size, sample_bounds.p_max.x);
    let y0 = sample_bounds.p_min.y + tile_y as Int * tile_size;
    let y1 = min(y0 + tile_size, sample_bounds.p_max.y);
    let tile_bounds = Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1));

    debug!("Starting image tile ({tile_x}, {tile_y}) -> {tile_bounds}");

    let mut tile_sampler = sample_generator.clone_generator();
    let mut tile = accumulator.create_sample_tile(tile_bounds);

    for pixel in tile.get_pixel_bounds() {
        tile_sampler.reset_pixel(&pixel);

        while let Some(sample) = tile_sampler.current_sample() {
            let (ray, ray_weight) = ray_generator.generate_ray(&sample.raster, &sample.secondary);

            if ray_weight > 0.0 {
                if let Some(colour) = colorize(&ray) {
                    let colour = if colour.has_nans() {
                        error!(
                            "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
                            pixel.x,
                            pixel.y,
                            tile_sampler.get_data().current_sample_index
                        );
                        RGBSpectrum::ZERO
                    } else {
                        colour
                    };
                    tile.add_sample(&sample.raster, sample.weight, ray_weight, colour);
                }
            }

            if !tile_sampler.move_to_next_sample() {
                break;
            }
        }
    }

    tile
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One sample at every pixel centre.
    #[derive(Clone, Default)]
    struct CentreSampler {
        data: SampleGeneratorData,
    }

    impl SampleGenerator for CentreSampler {
        fn get_data(&self) -> &SampleGeneratorData {
            &self.data
        }

        fn get_data_mut(&mut self) -> &mut SampleGeneratorData {
            &mut self.data
        }

        fn clone_generator(&self) -> BoxSampleGenerator {
            Box::new(Self::default())
        }

        fn num_samples_in_pixel(&self) -> usize {
            1
        }

        fn sample_at(&self, _index: usize) -> PixelSample {
            PixelSample {
                weight: 1.0,
                raster: self.data.raster_position(0, 0, 1),
                secondary: Point2f::new(0.5, 0.5),
                time: 0.0,
            }
        }
    }

    /// Ray through the raster position, zero weight left of `mask_left_of`.
    struct Straight {
        mask_left_of: Float,
    }

    impl RayGenerator for Straight {
        fn generate_ray(&self, raster: &Point2f, _secondary: &Point2f) -> (Ray, Float) {
            let ray = Ray::new(Point3f::new(raster.x, raster.y, 0.0), Vector3f::new(0.0, 0.0, 1.0));
            let weight = if raster.x < self.mask_left_of { 0.0 } else { 1.0 };
            (ray, weight)
        }
    }

    fn settings(tile_size: usize) -> RenderSettings {
        RenderSettings {
            n_threads: 4,
            tile_size,
            quiet: true,
        }
    }

    fn constant_round_trip(width: usize, height: usize) {
        let acc = SampleAccumulator::new(width, height).unwrap();
        let colour = RGBSpectrum::from_rgb(0.25, 0.5, 0.75);
        let straight = Straight { mask_left_of: -1.0 };
        render_tiles(&straight, &CentreSampler::default(), &acc, &settings(16), |_| Some(colour)).unwrap();
        let img = acc.to_image();
        assert!(img.pixels.iter().all(|p| *p == colour));
        assert!((0..height as Int).all(|y| acc.get_pixel(width as Int - 1, y).unwrap().weight_sum == 1.0));
    }

    #[test]
    fn constant_colour_round_trip_512() {
        constant_round_trip(512, 512);
    }

    #[test]
    fn constant_colour_round_trip_500() {
        constant_round_trip(500, 500);
    }

    #[test]
    fn zero_weight_and_no_contribution_rays_are_skipped() {
        let acc = SampleAccumulator::new(8, 4).unwrap();
        let straight = Straight { mask_left_of: 4.0 };
        render_tiles(&straight, &CentreSampler::default(), &acc, &settings(3), |ray| {
            if ray.o.y < 2.0 {
                Some(RGBSpectrum::new(1.0))
            } else {
                None
            }
        })
        .unwrap();
        assert_eq!(acc.get_pixel(1, 1).unwrap().weight_sum, 0.0);
        assert_eq!(acc.get_pixel(5, 3).unwrap().weight_sum, 0.0);
        assert_eq!(acc.get_color(5, 1), Some(RGBSpectrum::new(1.0)));
    }

    #[test]
    fn nan_colour_becomes_black() {
        let acc = SampleAccumulator::new(2, 2).unwrap();
        let straight = Straight { mask_left_of: -1.0 };
        render_tiles(&straight, &CentreSampler::default(), &acc, &settings(16), |_| {
            Some(RGBSpectrum::new(Float::NAN))
        })
        .unwrap();
        assert_eq!(acc.get_color(1, 1), Some(RGBSpectrum::ZERO));
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let acc = SampleAccumulator::new(2, 2).unwrap();
        let straight = Straight { mask_left_of: -1.0 };
        assert!(render_tiles(&straight, &CentreSampler::default(), &acc, &settings(0), |_| None).is_err());
    }
}
