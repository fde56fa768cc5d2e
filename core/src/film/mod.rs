//! Sample accumulation

use crate::base::*;
use crate::geometry::*;
use crate::image_io::*;
use crate::spectrum::*;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod sample_tile;

// Re-export.
pub use sample_tile::*;

/// Accumulated contributions of one pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AccumulatorPixel {
    /// Running sum of weighted colour contributions.
    pub weighted_sum: RGBSpectrum,

    /// Sum of the weights of the weighted contributions.
    pub weight_sum: Float,

    /// Running sum of unweighted (splatted) contributions.
    pub unweighted_sum: RGBSpectrum,
}

impl AccumulatorPixel {
    /// Returns the reconstructed colour: the unweighted sum plus the weighted
    /// average (only when some weight was collected).
    pub fn color(&self) -> RGBSpectrum {
        if self.weight_sum > 0.0 {
            self.unweighted_sum + self.weighted_sum / self.weight_sum
        } else {
            self.unweighted_sum
        }
    }
}

/// Owns the full resolution buffers into which `SampleTile`s are merged.
pub struct SampleAccumulator {
    /// Image resolution in pixels.
    pub resolution: Point2i,

    /// The pixels in row-major order.
    pixels: RwLock<Vec<AccumulatorPixel>>,
}

impl SampleAccumulator {
    /// Create a new empty `SampleAccumulator`.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid accumulator size {width} x {height}"));
        }
        Ok(Self {
            resolution: Point2i::new(width as Int, height as Int),
            pixels: RwLock::new(vec![AccumulatorPixel::default(); width * height]),
        })
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.resolution.x as usize
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.resolution.y as usize
    }

    /// Returns the pixel region that should be rendered.
    pub fn get_render_bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::zero(), self.resolution)
    }

    /// Returns the pixel region from which samples are taken.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::zero(), self.resolution)
    }

    /// Returns a `SampleTile` covering the part of `tile_bounds` that lies
    /// inside the image.
    ///
    /// * `tile_bounds` - Tile region in the overall image.
    pub fn create_sample_tile(&self, tile_bounds: Bounds2i) -> SampleTile {
        SampleTile::new(tile_bounds.intersect(&self.get_render_bounds()))
    }

    /// Merges a tile's contributions into the image. The tile is consumed so
    /// it can only be merged once.
    ///
    /// * `tile` - The `SampleTile` to merge.
    pub fn merge_sample_tile(&self, tile: SampleTile) {
        let bounds = tile.get_pixel_bounds();
        if bounds.is_empty() {
            return;
        }

        let mut pixels = self.write_pixels();
        let width = self.width();
        for (p, tile_pixel) in bounds.into_iter().zip(tile.pixels.iter()) {
            let offset = p.y as usize * width + p.x as usize;
            let pixel = &mut pixels[offset];
            pixel.weighted_sum += tile_pixel.weighted_sum;
            pixel.weight_sum += tile_pixel.weight_sum;
            pixel.unweighted_sum += tile_pixel.unweighted_sum;
        }
    }

    /// Returns the reconstructed colour of a pixel or `None` outside the image.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn get_color(&self, x: Int, y: Int) -> Option<RGBSpectrum> {
        if !self.get_render_bounds().contains_exclusive(&Point2i::new(x, y)) {
            return None;
        }
        let pixels = self.read_pixels();
        Some(pixels[y as usize * self.width() + x as usize].color())
    }

    /// Returns the accumulated pixel record or `None` outside the image.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn get_pixel(&self, x: Int, y: Int) -> Option<AccumulatorPixel> {
        if !self.get_render_bounds().contains_exclusive(&Point2i::new(x, y)) {
            return None;
        }
        Some(self.read_pixels()[y as usize * self.width() + x as usize])
    }

    /// Discards all contributions.
    pub fn clear(&self) {
        for pixel in self.write_pixels().iter_mut() {
            *pixel = AccumulatorPixel::default();
        }
    }

    /// Returns the reconstructed image.
    pub fn to_image(&self) -> RGBImage {
        let pixels = self.read_pixels();
        RGBImage {
            pixels: pixels.iter().map(|p| p.color()).collect(),
            resolution: Point2::new(self.width(), self.height()),
        }
    }

    /// Returns a read guard for the pixels, recovering from poisoning.
    fn read_pixels(&self) -> RwLockReadGuard<'_, Vec<AccumulatorPixel>> {
        self.pixels.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a write guard for the pixels, recovering from poisoning.
    fn write_pixels(&self) -> RwLockWriteGuard<'_, Vec<AccumulatorPixel>> {
        self.pixels.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl From<SampleAccumulator> for RGBImage {
    /// Converts the accumulated contributions into an image.
    ///
    /// * `accumulator` - The accumulator.
    fn from(accumulator: SampleAccumulator) -> Self {
        accumulator.to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(SampleAccumulator::new(0, 4).is_err());
        assert!(SampleAccumulator::new(4, 0).is_err());
    }

    #[test]
    fn color_combines_unweighted_and_weighted_average() {
        let acc = SampleAccumulator::new(4, 4).unwrap();
        let mut tile = acc.create_sample_tile(Bounds2i::new(Point2i::new(0, 0), Point2i::new(2, 2)));
        let raster = Point2f::new(1.5, 0.5);
        tile.add_sample(&raster, 1.0, 1.0, RGBSpectrum::new(1.0));
        tile.add_sample(&raster, 1.0, 3.0, RGBSpectrum::new(0.0));
        tile.add_unweighted_sample(&raster, RGBSpectrum::from_rgb(0.5, 0.0, 0.0));
        acc.merge_sample_tile(tile);

        assert_eq!(acc.get_color(1, 0), Some(RGBSpectrum::from_rgb(0.75, 0.25, 0.25)));
        assert_eq!(acc.get_color(0, 0), Some(RGBSpectrum::ZERO));
        assert_eq!(acc.get_pixel(1, 0).unwrap().weight_sum, 4.0);
    }

    #[test]
    fn out_of_range_color_is_none() {
        let acc = SampleAccumulator::new(3, 2).unwrap();
        assert!(acc.get_color(3, 0).is_none());
        assert!(acc.get_color(0, 2).is_none());
        assert!(acc.get_color(-1, 0).is_none());
    }

    #[test]
    fn tiles_crossing_the_border_are_clipped() {
        let acc = SampleAccumulator::new(20, 20).unwrap();
        let tile = acc.create_sample_tile(Bounds2i::new(Point2i::new(16, 16), Point2i::new(32, 32)));
        assert_eq!(tile.get_pixel_bounds().p_max, Point2i::new(20, 20));
        assert_eq!(tile.get_pixel_bounds().area(), 16);
    }

    #[test]
    fn clear_discards_contributions() {
        let acc = SampleAccumulator::new(2, 2).unwrap();
        let mut tile = acc.create_sample_tile(acc.get_render_bounds());
        tile.add_sample(&Point2f::new(0.5, 0.5), 1.0, 1.0, RGBSpectrum::new(1.0));
        acc.merge_sample_tile(tile);
        acc.clear();
        assert_eq!(acc.to_image(), RGBImage::new(2, 2));
    }
}
