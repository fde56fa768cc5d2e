//! Image statistics

use crate::image_analysis::*;
use crate::image_io::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Quality metrics of one image pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ImageStatisticsElem {
    /// Mean squared error per channel.
    pub mse: ChannelValues,

    /// Peak signal-to-noise ratio per channel.
    pub psnr: ChannelValues,

    /// Mean structural similarity per channel.
    pub mssim: ChannelValues,
}

/// Quality metrics of a sequence of image pairs.
#[derive(Clone, Debug, Default)]
pub struct ImageStatistics {
    /// One entry per image pair.
    pub data: Vec<ImageStatisticsElem>,
}

impl ImageStatistics {
    /// Evaluates every pair `(images_a[i], images_b[i])`. All images must
    /// share the resolution of `images_a[0]`.
    ///
    /// * `images_a` - First images.
    /// * `images_b` - Second images.
    pub fn evaluate(images_a: &[RGBImage], images_b: &[RGBImage]) -> Result<Self, String> {
        if images_a.is_empty() || images_a.len() != images_b.len() {
            return Err(format!(
                "Cannot compare {} images with {} images",
                images_a.len(),
                images_b.len()
            ));
        }
        let resolution = images_a[0].resolution;
        if images_a.iter().chain(images_b.iter()).any(|img| img.resolution != resolution) {
            return Err("Images to compare differ in size".to_string());
        }

        let data = images_a
            .iter()
            .zip(images_b.iter())
            .map(|(a, b)| {
                let mse = image_mse(a, b)?;
                Ok(ImageStatisticsElem {
                    mse,
                    psnr: mse_to_psnr(&mse),
                    mssim: image_mssim(a, b)?,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self { data })
    }

    /// Evaluates a single image pair.
    ///
    /// * `a` - First image.
    /// * `b` - Second image.
    pub fn evaluate_pair(a: &RGBImage, b: &RGBImage) -> Result<Self, String> {
        Self::evaluate(std::slice::from_ref(a), std::slice::from_ref(b))
    }

    /// Returns the per-channel average over all pairs. The PSNR average is
    /// derived from the averaged MSE.
    pub fn average(&self) -> Option<ImageStatisticsElem> {
        if self.data.is_empty() {
            return None;
        }
        let n = self.data.len() as f64;
        let mut mse = [0.0; 3];
        let mut mssim = [0.0; 3];
        for e in self.data.iter() {
            for c in 0..3 {
                mse[c] += e.mse[c] / n;
                mssim[c] += e.mssim[c] / n;
            }
        }
        Some(ImageStatisticsElem {
            mse,
            psnr: mse_to_psnr(&mse),
            mssim,
        })
    }

    /// Writes `<prefix>mse.txt`, `<prefix>psnr.txt` and `<prefix>msssim.txt`
    /// into `dir`, one line `r g b` per image pair.
    ///
    /// * `dir`    - Output directory.
    /// * `prefix` - File name prefix.
    pub fn save_to_files(&self, dir: &str, prefix: &str) -> Result<(), String> {
        self.save_values(dir, &format!("{prefix}mse.txt"), |e| e.mse)?;
        self.save_values(dir, &format!("{prefix}psnr.txt"), |e| e.psnr)?;
        self.save_values(dir, &format!("{prefix}msssim.txt"), |e| e.mssim)
    }

    /// Writes one metric per line.
    ///
    /// * `dir`    - Output directory.
    /// * `name`   - File name.
    /// * `metric` - Selects the metric.
    fn save_values<F>(&self, dir: &str, name: &str, metric: F) -> Result<(), String>
    where
        F: Fn(&ImageStatisticsElem) -> ChannelValues,
    {
        let path = Path::new(dir).join(name);
        let file = File::create(&path).map_err(|e| format!("Unable to create {}: {e}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for e in self.data.iter() {
            let v = metric(e);
            writeln!(writer, "{} {} {}", v[0], v[1], v[2]).map_err(|e| format!("Unable to write {}: {e}", path.display()))?;
        }
        writer.flush().map_err(|e| format!("Unable to write {}: {e}", path.display()))
    }
}
