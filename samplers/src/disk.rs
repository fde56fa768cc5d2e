//! Disk Sampler.

use lfcore::base::*;
use lfcore::geometry::*;
use lfcore::sampler::*;

/// Stratifies every pixel like `UniformSampler` but only keeps the secondary
/// strata whose centres lie inside the disk inscribed in the unit square,
/// which models a circular aperture.
#[derive(Clone, Debug)]
pub struct DiskSampler {
    /// The common generator data.
    pub data: SampleGeneratorData,

    /// Strata per pixel axis.
    pub primary: usize,

    /// Secondary strata per axis before filtering.
    pub secondary: usize,

    /// Secondary positions inside the disk.
    aperture: Vec<Point2f>,
}

impl DiskSampler {
    /// Create a new `DiskSampler`.
    ///
    /// * `primary`   - Strata per pixel axis.
    /// * `secondary` - Secondary strata per axis.
    pub fn new(primary: Int, secondary: Int) -> Result<Self, String> {
        if primary <= 0 || secondary <= 0 {
            return Err(format!("Invalid disk sampler resolution ({primary}, {secondary})"));
        }

        let s = secondary as usize;
        let mut aperture = Vec::with_capacity(s * s);
        for i in 0..s {
            for j in 0..s {
                let c = stratum_center(i, j, s);
                let (x, y) = (c.x - 0.5, c.y - 0.5);
                if x * x + y * y <= 0.25 {
                    aperture.push(c);
                }
            }
        }
        debug!("Disk sampler keeps {} of {} aperture cells", aperture.len(), s * s);

        Ok(Self {
            data: SampleGeneratorData::default(),
            primary: primary as usize,
            secondary: s,
            aperture,
        })
    }

    /// Returns the secondary positions inside the disk.
    pub fn aperture_positions(&self) -> &[Point2f] {
        &self.aperture
    }
}

impl SampleGenerator for DiskSampler {
    fn get_data(&self) -> &SampleGeneratorData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SampleGeneratorData {
        &mut self.data
    }

    fn clone_generator(&self) -> BoxSampleGenerator {
        Box::new(Self {
            data: SampleGeneratorData::default(),
            primary: self.primary,
            secondary: self.secondary,
            aperture: self.aperture.clone(),
        })
    }

    fn num_samples_in_pixel(&self) -> usize {
        self.primary * self.primary * self.aperture.len()
    }

    fn sample_at(&self, index: usize) -> PixelSample {
        let p = self.primary;
        let n_ap = self.aperture.len();
        let i_ap = index % n_ap;
        let iy = (index / n_ap) % p;
        let ix = (index / (n_ap * p)) % p;

        PixelSample {
            weight: 1.0,
            raster: self.data.raster_position(ix, iy, p),
            secondary: self.aperture[i_ap],
            time: 0.0,
        }
    }
}
