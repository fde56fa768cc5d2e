//! Projector image optimization

use crate::pixel_solver::*;
use lfcore::app::*;
use lfcore::base::*;
use lfcore::diffuser::*;
use lfcore::display::*;
use lfcore::geometry::*;
use lfcore::image_analysis::*;
use lfcore::image_io::*;
use lfcore::observer::*;
use lfcore::parallel::*;
use lfcore::spectrum::*;

/// Number of pixel chunks handed to every worker thread.
const CHUNKS_PER_THREAD: usize = 16;

/// Optimizes the projector images of a display so that every viewer of an
/// observer space perceives its ground truth image.
pub struct ProjectorsOptimization {
    /// The display.
    pub display: ProjectorDisplay,

    /// Viewer positions.
    pub observer: ObserverSpace,

    /// Diffuser model of the screen.
    pub diffuser: DiffuserModel,

    /// Projector positions in display order.
    pub projector_positions: Vec<Point3f>,
}

impl ProjectorsOptimization {
    /// Create a new `ProjectorsOptimization`.
    ///
    /// * `display`  - The display.
    /// * `observer` - Viewer positions.
    pub fn new(display: ProjectorDisplay, observer: ObserverSpace) -> Self {
        let diffuser = display.diffuser();
        let projector_positions = display.projector_positions();
        Self {
            display,
            observer,
            diffuser,
            projector_positions,
        }
    }

    /// Returns the number of projectors.
    pub fn num_projectors(&self) -> usize {
        self.projector_positions.len()
    }

    /// Checks the inputs of `iterate()`.
    ///
    /// * `groundtrue`     - One image per viewer position.
    /// * `zero_iteration` - One image per projector.
    /// * `num_iterations` - Number of iterations.
    pub fn check_inputs(&self, groundtrue: &[RGBImage], zero_iteration: &[RGBImage], num_iterations: i32) -> Result<(), String> {
        if num_iterations <= 0 {
            return Err(format!("Invalid number of iterations {num_iterations}"));
        }
        let (width, height) = (self.display.width(), self.display.height());
        if width == 0 || height == 0 {
            return Err(format!("Invalid projector resolution {width} x {height}"));
        }
        if self.projector_positions.is_empty() {
            return Err("Display has no projectors".to_string());
        }
        if groundtrue.len() != self.observer.num_positions() {
            return Err(format!(
                "Got {} ground truth images for {} viewer positions",
                groundtrue.len(),
                self.observer.num_positions()
            ));
        }
        if zero_iteration.len() != self.num_projectors() {
            return Err(format!(
                "Got {} zero iteration images for {} projectors",
                zero_iteration.len(),
                self.num_projectors()
            ));
        }
        for (name, images) in [("Ground truth", groundtrue), ("Zero iteration", zero_iteration)] {
            if let Some(i) = images.iter().position(|img| !img.has_resolution(width, height)) {
                return Err(format!(
                    "{name} image {i} is {} x {}, expected {width} x {height}",
                    images[i].width(),
                    images[i].height()
                ));
            }
        }
        Ok(())
    }

    /// Runs the optimizer and returns the projector images after every
    /// iteration, `result[iteration][projector]`. Nothing is returned if an
    /// input is invalid.
    ///
    /// Returned images are clamped to `[0, 1]`. The solver itself continues
    /// from the unclamped values, so clamping never changes later iterations.
    ///
    /// * `groundtrue`     - One image per viewer position.
    /// * `zero_iteration` - One image per projector.
    /// * `num_iterations` - Number of iterations.
    /// * `settings`       - Thread count and progress output.
    pub fn iterate(
        &self,
        groundtrue: &[RGBImage],
        zero_iteration: &[RGBImage],
        num_iterations: i32,
        settings: &RenderSettings,
    ) -> Result<Vec<Vec<RGBImage>>, String> {
        self.check_inputs(groundtrue, zero_iteration, num_iterations)?;

        let num_iterations = num_iterations as usize;
        let (width, height) = (self.display.width(), self.display.height());
        let n_pixels = width * height;
        let n_chunks = n_pixels.min(settings.n_threads.max(1) * CHUNKS_PER_THREAD);
        let viewers = self.observer.positions();

        info!(
            "Optimizing {} projectors for {} viewers, {} iterations",
            self.num_projectors(),
            viewers.len(),
            num_iterations
        );

        let progress = create_progress_reporter(n_chunks as u64, settings.quiet);
        progress.set_message("Optimizing");

        let chunks = parallel_map(n_chunks, settings.n_threads, |chunk| {
            let pixels: Vec<Vec<Vec<RGBSpectrum>>> = chunk_range(n_pixels, n_chunks, chunk)
                .map(|pixel| {
                    let (x, y) = (pixel % width, pixel / width);
                    let gt: Vec<RGBSpectrum> = groundtrue.iter().map(|img| img.get(x, y)).collect();
                    let zero: Vec<RGBSpectrum> = zero_iteration.iter().map(|img| img.get(x, y)).collect();
                    optimize_pixel(
                        &self.display.screen_point(x, y),
                        &self.projector_positions,
                        &viewers,
                        &self.diffuser,
                        &gt,
                        &zero,
                        num_iterations,
                    )
                })
                .collect();
            progress.inc(1);
            pixels
        })?;

        let mut iterations = vec![vec![RGBImage::new(width, height); self.num_projectors()]; num_iterations];
        for (chunk, pixels) in chunks.into_iter().enumerate() {
            for (pixel, values) in chunk_range(n_pixels, n_chunks, chunk).zip(pixels.into_iter()) {
                let (x, y) = (pixel % width, pixel / width);
                for (iteration, projectors) in iterations.iter_mut().zip(values.iter()) {
                    for (image, colour) in iteration.iter_mut().zip(projectors.iter()) {
                        image.set(x, y, *colour);
                    }
                }
            }
        }

        for images in iterations.iter_mut() {
            clamp_images(images, settings.n_threads)?;
        }

        progress.finish_with_message("Optimization complete");
        Ok(iterations)
    }

    /// Returns what a viewer perceives of each screen pixel under the linear
    /// model the optimizer minimizes: the normalized diffuser weighted sum
    /// of the projector images.
    ///
    /// * `projector_images` - One image per projector.
    /// * `viewer`           - Viewer index in the observer space.
    pub fn reconstruct(&self, projector_images: &[RGBImage], viewer: usize) -> Result<RGBImage, String> {
        let (width, height) = (self.display.width(), self.display.height());
        if projector_images.len() != self.num_projectors()
            || projector_images.iter().any(|img| !img.has_resolution(width, height))
        {
            return Err("Projector images do not match the display".to_string());
        }
        if viewer >= self.observer.num_positions() {
            return Err(format!("Invalid viewer index {viewer}"));
        }

        let position = self.observer.position(viewer);
        let mut image = RGBImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let w = viewer_weights(&self.display.screen_point(x, y), &self.projector_positions, &position, &self.diffuser);
                let mut colour = RGBSpectrum::ZERO;
                for (i, img) in projector_images.iter().enumerate() {
                    colour += img.get(x, y) * w[i] as Float;
                }
                image.set(x, y, colour);
            }
        }
        Ok(image)
    }
}
