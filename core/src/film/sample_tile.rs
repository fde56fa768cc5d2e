//! Sample Tile

use super::*;

/// Private accumulation buffer for a rectangular region of the image. Tiles
/// are filled by a single task and merged into a `SampleAccumulator`.
#[derive(Clone, Debug)]
pub struct SampleTile {
    /// Bounding box of the pixels in the tile.
    pixel_bounds: Bounds2i,

    /// The tile pixels in row-major order.
    pub pixels: Vec<AccumulatorPixel>,
}

impl SampleTile {
    /// Create a new empty `SampleTile`.
    ///
    /// * `pixel_bounds` - Bounding box of the pixels in the tile.
    pub fn new(pixel_bounds: Bounds2i) -> Self {
        let n = max(0, pixel_bounds.area()) as usize;
        Self {
            pixel_bounds,
            pixels: vec![AccumulatorPixel::default(); n],
        }
    }

    /// Returns the pixel bounds.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }

    /// Returns the offset of the pixel containing a raster position, or
    /// `None` if it lies outside the tile.
    ///
    /// * `raster` - Raster position.
    fn pixel_offset(&self, raster: &Point2f) -> Option<usize> {
        if !(raster.x >= 0.0 && raster.y >= 0.0) {
            return None;
        }
        let p = Point2i::new(raster.x as Int, raster.y as Int);
        if !self.pixel_bounds.contains_exclusive(&p) {
            return None;
        }
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        let offset = (p.x - self.pixel_bounds.p_min.x) + (p.y - self.pixel_bounds.p_min.y) * width;
        Some(offset as usize)
    }

    /// Adds a weighted sample. Returns `false` if the raster position lies
    /// outside the tile.
    ///
    /// * `raster`        - Raster position of the sample.
    /// * `sample_weight` - Weight assigned by the sample generator.
    /// * `ray_weight`    - Weight assigned by the ray generator.
    /// * `colour`        - Colour carried by the ray.
    pub fn add_sample(&mut self, raster: &Point2f, sample_weight: Float, ray_weight: Float, colour: RGBSpectrum) -> bool {
        match self.pixel_offset(raster) {
            Some(offset) => {
                let w = sample_weight * ray_weight;
                let pixel = &mut self.pixels[offset];
                pixel.weighted_sum += colour * w;
                pixel.weight_sum += w;
                true
            }
            None => false,
        }
    }

    /// Adds a sample that bypasses weighting. Returns `false` if the raster
    /// position lies outside the tile.
    ///
    /// * `raster` - Raster position of the sample.
    /// * `colour` - Colour carried by the ray.
    pub fn add_unweighted_sample(&mut self, raster: &Point2f, colour: RGBSpectrum) -> bool {
        match self.pixel_offset(raster) {
            Some(offset) => {
                self.pixels[offset].unweighted_sum += colour;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_outside_tile_are_rejected() {
        let mut tile = SampleTile::new(Bounds2i::new(Point2i::new(16, 0), Point2i::new(32, 8)));
        assert!(!tile.add_sample(&Point2f::new(15.9, 0.5), 1.0, 1.0, RGBSpectrum::new(1.0)));
        assert!(!tile.add_sample(&Point2f::new(20.0, 8.0), 1.0, 1.0, RGBSpectrum::new(1.0)));
        assert!(!tile.add_unweighted_sample(&Point2f::new(-0.5, 2.0), RGBSpectrum::new(1.0)));
        assert!(tile.add_sample(&Point2f::new(31.9, 7.9), 1.0, 1.0, RGBSpectrum::new(1.0)));
        assert_eq!(tile.pixels[tile.pixels.len() - 1].weight_sum, 1.0);
    }

    #[test]
    fn non_square_tile_uses_its_own_height() {
        let mut tile = SampleTile::new(Bounds2i::new(Point2i::new(0, 0), Point2i::new(8, 2)));
        assert!(!tile.add_sample(&Point2f::new(1.0, 5.0), 1.0, 1.0, RGBSpectrum::new(1.0)));
    }

    #[test]
    fn empty_tile_has_no_pixels() {
        let tile = SampleTile::new(Bounds2i::new(Point2i::new(4, 4), Point2i::new(4, 9)));
        assert!(tile.pixels.is_empty());
    }
}
