//! Uniform Sampler.

use lfcore::base::*;
use lfcore::sampler::*;

/// Stratifies every pixel into `primary` x `primary` raster positions and,
/// for each of them, `secondary` x `secondary` secondary positions. The
/// secondary index varies fastest.
#[derive(Clone, Debug)]
pub struct UniformSampler {
    /// The common generator data.
    pub data: SampleGeneratorData,

    /// Strata per pixel axis.
    pub primary: usize,

    /// Secondary strata per axis.
    pub secondary: usize,
}

impl UniformSampler {
    /// Create a new `UniformSampler`.
    ///
    /// * `primary`   - Strata per pixel axis.
    /// * `secondary` - Secondary strata per axis.
    pub fn new(primary: Int, secondary: Int) -> Result<Self, String> {
        if primary <= 0 || secondary <= 0 {
            return Err(format!("Invalid uniform sampler resolution ({primary}, {secondary})"));
        }
        debug!("Uniform sampler {primary}x{primary} / {secondary}x{secondary}");
        Ok(Self {
            data: SampleGeneratorData::default(),
            primary: primary as usize,
            secondary: secondary as usize,
        })
    }
}

impl SampleGenerator for UniformSampler {
    /// Returns a shared reference underlying `SampleGeneratorData`.
    fn get_data(&self) -> &SampleGeneratorData {
        &self.data
    }

    /// Returns a mutable reference to underlying `SampleGeneratorData`.
    fn get_data_mut(&mut self) -> &mut SampleGeneratorData {
        &mut self.data
    }

    /// Returns a fresh generator with the same resolutions.
    fn clone_generator(&self) -> BoxSampleGenerator {
        Box::new(Self {
            data: SampleGeneratorData::default(),
            primary: self.primary,
            secondary: self.secondary,
        })
    }

    fn num_samples_in_pixel(&self) -> usize {
        self.primary * self.primary * self.secondary * self.secondary
    }

    /// Returns the sample with the given index inside the current pixel.
    ///
    /// * `index` - Sample index.
    fn sample_at(&self, index: usize) -> PixelSample {
        let (p, s) = (self.primary, self.secondary);
        let iy2 = index % s;
        let ix2 = (index / s) % s;
        let iy1 = (index / (s * s)) % p;
        let ix1 = (index / (s * s * p)) % p;

        PixelSample {
            weight: 1.0,
            raster: self.data.raster_position(ix1, iy1, p),
            secondary: stratum_center(ix2, iy2, s),
            time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfcore::geometry::*;

    fn collect(sampler: &mut dyn SampleGenerator, pixel: Point2i) -> Vec<PixelSample> {
        sampler.reset_pixel(&pixel);
        let mut samples = vec![];
        while let Some(s) = sampler.current_sample() {
            samples.push(s);
            if !sampler.move_to_next_sample() {
                break;
            }
        }
        samples
    }

    #[test]
    fn non_positive_resolution_is_rejected() {
        assert!(UniformSampler::new(0, 1).is_err());
        assert!(UniformSampler::new(2, -1).is_err());
    }

    #[test]
    fn enumerates_every_stratum_once() {
        let mut sampler = UniformSampler::new(3, 2).unwrap();
        assert_eq!(sampler.num_samples_in_pixel(), 36);
        let samples = collect(&mut sampler, Point2i::new(4, 7));
        assert_eq!(samples.len(), 36);
        assert!(samples.iter().all(|s| s.weight == 1.0));
        assert!(samples
            .iter()
            .all(|s| s.raster.x > 4.0 && s.raster.x < 5.0 && s.raster.y > 7.0 && s.raster.y < 8.0));
    }

    #[test]
    fn secondary_index_is_fastest() {
        let mut sampler = UniformSampler::new(2, 2).unwrap();
        let samples = collect(&mut sampler, Point2i::new(0, 0));
        assert_eq!(samples[0].raster, Point2f::new(0.25, 0.25));
        assert_eq!(samples[0].secondary, Point2f::new(0.25, 0.25));
        assert_eq!(samples[1].raster, Point2f::new(0.25, 0.25));
        assert_eq!(samples[1].secondary, Point2f::new(0.25, 0.75));
        assert_eq!(samples[2].secondary, Point2f::new(0.75, 0.25));
        assert_eq!(samples[4].raster, Point2f::new(0.25, 0.75));
        assert_eq!(samples[8].raster, Point2f::new(0.75, 0.25));
    }

    #[test]
    fn clone_keeps_both_resolutions() {
        let sampler = UniformSampler::new(3, 4).unwrap();
        let clone = sampler.clone_generator();
        assert_eq!(clone.num_samples_in_pixel(), sampler.num_samples_in_pixel());
    }

    #[test]
    fn reset_restarts_enumeration() {
        let mut sampler = UniformSampler::new(1, 1).unwrap();
        assert_eq!(collect(&mut sampler, Point2i::new(1, 1)).len(), 1);
        let again = collect(&mut sampler, Point2i::new(2, 3));
        assert_eq!(again[0].raster, Point2f::new(2.5, 3.5));
    }
}
