//! Sample generators

mod common;

use crate::base::*;
use crate::geometry::*;
use std::fmt;

// Re-export
pub use common::*;

/// One stratified sample of a pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelSample {
    /// Weight of the sample.
    pub weight: Float,

    /// Sub-pixel raster position.
    pub raster: Point2f,

    /// Secondary coordinate in `[0, 1]^2` (aperture or lens position).
    pub secondary: Point2f,

    /// Sample time.
    pub time: Float,
}

impl fmt::Display for PixelSample {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[raster={}, secondary={}, weight={}, time={}]",
            self.raster, self.secondary, self.weight, self.time
        )
    }
}

/// Deterministic per-pixel sample enumeration.
///
/// A generator is stateful and must not be shared between threads; every
/// rendering task works on its own copy obtained with `clone_generator()`.
pub trait SampleGenerator: Send + Sync {
    /// Returns a shared reference underlying `SampleGeneratorData`.
    fn get_data(&self) -> &SampleGeneratorData;

    /// Returns a mutable reference to underlying `SampleGeneratorData`.
    fn get_data_mut(&mut self) -> &mut SampleGeneratorData;

    /// Returns a fresh generator with the same configuration.
    fn clone_generator(&self) -> Box<dyn SampleGenerator>;

    /// Returns the number of samples generated for every pixel.
    fn num_samples_in_pixel(&self) -> usize;

    /// Returns the sample with the given index inside the current pixel.
    ///
    /// * `index` - Sample index in `[0, num_samples_in_pixel())`.
    fn sample_at(&self, index: usize) -> PixelSample;

    /// Starts enumerating the samples of a pixel.
    ///
    /// * `p` - The pixel.
    fn reset_pixel(&mut self, p: &Point2i) {
        self.get_data_mut().reset_pixel(p);
    }

    /// Returns the current sample or `None` if the pixel is exhausted.
    fn current_sample(&self) -> Option<PixelSample> {
        let index = self.get_data().current_sample_index;
        if index < self.num_samples_in_pixel() {
            Some(self.sample_at(index))
        } else {
            None
        }
    }

    /// Advances to the next sample. Returns `false` once every sample of the
    /// current pixel has been produced.
    fn move_to_next_sample(&mut self) -> bool {
        let n = self.num_samples_in_pixel();
        let data = self.get_data_mut();
        data.current_sample_index += 1;
        data.current_sample_index < n
    }
}

/// Boxed `SampleGenerator` as returned by `clone_generator()`.
pub type BoxSampleGenerator = Box<dyn SampleGenerator>;
