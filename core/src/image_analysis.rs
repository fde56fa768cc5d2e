//! Image analysis

use crate::image_io::*;
use crate::parallel::*;

/// One value per colour channel (red, green, blue).
pub type ChannelValues = [f64; 3];

/// Size of the Gaussian window used by the structural similarity index.
pub const SSIM_WINDOW: usize = 11;

/// Standard deviation of the Gaussian window.
pub const SSIM_SIGMA: f64 = 1.5;

/// Stabilizing constant `(0.01 L)^2` for a data range `L = 1`.
const SSIM_C1: f64 = 0.0001;

/// Stabilizing constant `(0.03 L)^2` for a data range `L = 1`.
const SSIM_C2: f64 = 0.0009;

/// Returns an error unless both images have the same non-zero resolution.
///
/// * `a` - First image.
/// * `b` - Second image.
fn check_same_size(a: &RGBImage, b: &RGBImage) -> Result<(), String> {
    if a.resolution != b.resolution {
        return Err(format!(
            "Image sizes differ: {} x {} and {} x {}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        ));
    }
    if a.pixels.is_empty() {
        return Err("Cannot compare empty images".to_string());
    }
    Ok(())
}

/// Returns the mean squared error per channel.
///
/// * `a` - First image.
/// * `b` - Second image.
pub fn image_mse(a: &RGBImage, b: &RGBImage) -> Result<ChannelValues, String> {
    check_same_size(a, b)?;
    let mut sse = [0.0; 3];
    for (pa, pb) in a.pixels.iter().zip(b.pixels.iter()) {
        for (c, s) in sse.iter_mut().enumerate() {
            let d = pa[c] as f64 - pb[c] as f64;
            *s += d * d;
        }
    }
    let n = a.pixels.len() as f64;
    Ok(sse.map(|s| s / n))
}

/// Converts mean squared errors to peak signal-to-noise ratios in dB for a
/// peak value of 1. A non-positive error maps to infinity.
///
/// * `mse` - Mean squared error per channel.
pub fn mse_to_psnr(mse: &ChannelValues) -> ChannelValues {
    mse.map(|m| if m <= 0.0 { f64::INFINITY } else { -10.0 * m.log10() })
}

/// Returns the peak signal-to-noise ratio per channel.
///
/// * `a` - First image.
/// * `b` - Second image.
pub fn image_psnr(a: &RGBImage, b: &RGBImage) -> Result<ChannelValues, String> {
    image_mse(a, b).map(|mse| mse_to_psnr(&mse))
}

/// Returns the normalized 1-D Gaussian kernel.
fn gaussian_kernel() -> [f64; SSIM_WINDOW] {
    let mut k = [0.0; SSIM_WINDOW];
    let r = (SSIM_WINDOW / 2) as f64;
    for (i, v) in k.iter_mut().enumerate() {
        let x = i as f64 - r;
        *v = (-x * x / (2.0 * SSIM_SIGMA * SSIM_SIGMA)).exp();
    }
    let sum: f64 = k.iter().sum();
    k.map(|v| v / sum)
}

/// Mirrors an index into `[0, n)` without repeating the border sample
/// (`-1 -> 1`, `n -> n - 2`).
///
/// * `i` - The index.
/// * `n` - Length of the axis.
fn reflect_101(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    if n == 1 {
        return 0;
    }
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        }
        if i >= n {
            i = 2 * n - 2 - i;
        }
    }
    i as usize
}

/// Separable Gaussian blur of a single channel plane.
///
/// * `plane`  - Values in row-major order.
/// * `width`  - Plane width.
/// * `height` - Plane height.
fn gaussian_blur(plane: &[f64], width: usize, height: usize) -> Vec<f64> {
    let kernel = gaussian_kernel();
    let r = (SSIM_WINDOW / 2) as isize;

    let mut horizontal = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            horizontal[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * plane[y * width + reflect_101(x as isize + k as isize - r, width)])
                .sum();
        }
    }

    let mut out = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * horizontal[reflect_101(y as isize + k as isize - r, height) * width + x])
                .sum();
        }
    }
    out
}

/// Returns the mean structural similarity per channel using an 11 x 11
/// Gaussian window with sigma 1.5.
///
/// * `a` - First image.
/// * `b` - Second image.
pub fn image_mssim(a: &RGBImage, b: &RGBImage) -> Result<ChannelValues, String> {
    check_same_size(a, b)?;
    let (width, height) = (a.width(), a.height());
    let n = a.pixels.len();

    let mut result = [0.0; 3];
    for (c, res) in result.iter_mut().enumerate() {
        let i1: Vec<f64> = a.pixels.iter().map(|p| p[c] as f64).collect();
        let i2: Vec<f64> = b.pixels.iter().map(|p| p[c] as f64).collect();
        let i1_2: Vec<f64> = i1.iter().map(|v| v * v).collect();
        let i2_2: Vec<f64> = i2.iter().map(|v| v * v).collect();
        let i1_i2: Vec<f64> = i1.iter().zip(i2.iter()).map(|(u, v)| u * v).collect();

        let mu1 = gaussian_blur(&i1, width, height);
        let mu2 = gaussian_blur(&i2, width, height);
        let s1 = gaussian_blur(&i1_2, width, height);
        let s2 = gaussian_blur(&i2_2, width, height);
        let s12 = gaussian_blur(&i1_i2, width, height);

        let mut sum = 0.0;
        for i in 0..n {
            let mu1_mu2 = mu1[i] * mu2[i];
            let mu1_sq = mu1[i] * mu1[i];
            let mu2_sq = mu2[i] * mu2[i];
            let sigma1_sq = s1[i] - mu1_sq;
            let sigma2_sq = s2[i] - mu2_sq;
            let sigma12 = s12[i] - mu1_mu2;
            let num = (2.0 * mu1_mu2 + SSIM_C1) * (2.0 * sigma12 + SSIM_C2);
            let den = (mu1_sq + mu2_sq + SSIM_C1) * (sigma1_sq + sigma2_sq + SSIM_C2);
            sum += num / den;
        }
        *res = sum / n as f64;
    }
    Ok(result)
}

/// Clamps every channel of every image to `[0, 1]` in parallel. All images
/// must share one non-zero resolution.
///
/// * `images`    - The images.
/// * `n_threads` - Number of worker threads.
pub fn clamp_images(images: &mut [RGBImage], n_threads: usize) -> Result<(), String> {
    let first = images.first().ok_or("No images to clamp")?;
    if first.pixels.is_empty() {
        return Err("Cannot clamp empty images".to_string());
    }
    let resolution = first.resolution;
    if images.iter().any(|img| img.resolution != resolution) {
        return Err("Images to clamp differ in size".to_string());
    }

    let shared: &[RGBImage] = images;
    let clamped = parallel_map(shared.len(), n_threads, |i| shared[i].clamped())?;
    for (img, c) in images.iter_mut().zip(clamped.into_iter()) {
        *img = c;
    }
    Ok(())
}
