//! Image I/O

use crate::base::*;
use crate::geometry::*;
use crate::spectrum::*;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use exr::prelude as exrs;
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::result::Result;
use std::sync::OnceLock;

/// Dense grid of linear RGB pixels stored in row-major order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RGBImage {
    /// The pixels.
    pub pixels: Vec<RGBSpectrum>,

    /// Image resolution.
    pub resolution: Point2<usize>,
}

impl RGBImage {
    /// Creates a new black `RGBImage`.
    ///
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, RGBSpectrum::ZERO)
    }

    /// Creates a new `RGBImage` where every pixel has the same colour.
    ///
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    /// * `colour` - The colour.
    pub fn filled(width: usize, height: usize, colour: RGBSpectrum) -> Self {
        Self {
            pixels: vec![colour; width * height],
            resolution: Point2::new(width, height),
        }
    }

    /// Creates a new `RGBImage` from pixel data.
    ///
    /// * `pixels` - RGB pixel data.
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn from_pixels(pixels: Vec<RGBSpectrum>, width: usize, height: usize) -> Result<Self, String> {
        if width * height != pixels.len() {
            return Err(format!(
                "Pixel count {} does not match resolution {width} x {height}",
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            resolution: Point2::new(width, height),
        })
    }

    /// Returns the width.
    #[inline]
    pub fn width(&self) -> usize {
        self.resolution.x
    }

    /// Returns the height.
    #[inline]
    pub fn height(&self) -> usize {
        self.resolution.y
    }

    /// Returns true if the image has the given resolution.
    ///
    /// * `width`  - Expected width.
    /// * `height` - Expected height.
    pub fn has_resolution(&self, width: usize, height: usize) -> bool {
        self.width() == width && self.height() == height
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> RGBSpectrum {
        self.pixels[y * self.resolution.x + x]
    }

    /// Replaces the pixel at `(x, y)`.
    ///
    /// * `x`      - Column.
    /// * `y`      - Row.
    /// * `colour` - The new value.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, colour: RGBSpectrum) {
        let offset = y * self.resolution.x + x;
        self.pixels[offset] = colour;
    }

    /// Returns the pixel data as interleaved RGB values.
    pub fn to_rgb_buffer(&self) -> Vec<Float> {
        self.pixels.iter().flat_map(|p| p.c).collect()
    }

    /// Returns a copy with every channel clamped to `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            pixels: self.pixels.iter().map(|p| p.clamp(0.0, 1.0)).collect(),
            resolution: self.resolution,
        }
    }
}

/// Read an image.
///
/// * `path` - Input file path.
pub fn read_image(path: &str) -> Result<RGBImage, String> {
    match get_extension_from_filename(path) {
        Some(".exr") => read_exr(path),
        Some(".pfm") => read_pfm(path),
        Some(_extension) => read_8_bit(path),
        None => Err(format!("Can't determine file type from suffix of filename {path}.")),
    }
}

/// Read a single layer OpenEXR file.
///
/// * `path` - Input file path.
fn read_exr(path: &str) -> Result<RGBImage, String> {
    let reader = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| RGBImage::new(resolution.width(), resolution.height()),
            |img, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                img.set(position.x(), position.y(), RGBSpectrum::from_rgb(r, g, b));
            },
        )
        .first_valid_layer()
        .all_attributes();

    match reader.from_file(path) {
        Ok(image) => {
            let img = image.layer_data.channel_data.pixels;
            debug!("Read EXR image {path} ({} x {})", img.width(), img.height());
            Ok(img)
        }
        Err(err) => Err(format!("Error reading EXR image {path}: {err}")),
    }
}

/// Returns true if the byte is a space, newline or tab.
///
/// * `c` - The byte to check.
#[inline(always)]
fn is_white_space(c: u8) -> bool {
    c == b' ' || c == b'\n' || c == b'\t' || c == b'\r'
}

/// Reads a whitespace terminated header token of at most `len` bytes.
///
/// * `reader` - The reader.
/// * `len`    - Maximum number of bytes to read.
fn read_pfm_word<R: Read>(reader: &mut R, len: usize) -> Result<String, String> {
    let mut s = String::new();

    let mut c = reader.read_u8().map_err(|e| format!("read_pfm_word(): {e}"))?;
    while !is_white_space(c) {
        if s.len() >= len {
            return Err("read_pfm_word(): filled buffer before finding whitespace.".to_string());
        }
        s.push(c as char);
        c = reader.read_u8().map_err(|e| format!("read_pfm_word(): {e}"))?;
    }

    Ok(s)
}

/// Read a PFM (Portable FloatMap) file.
///
/// * `path` - Input file path.
fn read_pfm(path: &str) -> Result<RGBImage, String> {
    let file = File::open(path).map_err(|e| format!("Error reading PFM file '{path}': {e}"))?;
    let mut reader = BufReader::new(file);

    let n_channels = match read_pfm_word(&mut reader, 2)?.as_str() {
        "Pf" => 1,
        "PF" => 3,
        s => return Err(format!("Invalid PFM type '{s}' in {path}")),
    };

    let width = read_pfm_word(&mut reader, 80)?
        .parse::<usize>()
        .map_err(|e| format!("Error parsing PFM width: {e}"))?;
    let height = read_pfm_word(&mut reader, 80)?
        .parse::<usize>()
        .map_err(|e| format!("Error parsing PFM height: {e}"))?;

    // Negative scale means little endian data.
    let scale = read_pfm_word(&mut reader, 80)?
        .parse::<f32>()
        .map_err(|e| format!("Error parsing PFM scale: {e}"))?;
    let file_little_endian = scale < 0.0;
    let scale = scale.abs();

    // Rows are stored bottom to top.
    let mut data = vec![0.0_f32; n_channels * width * height];
    for y in (0..height).rev() {
        let row = y * width * n_channels;
        for j in 0..width * n_channels {
            let f = if file_little_endian {
                reader.read_f32::<LittleEndian>()
            } else {
                reader.read_f32::<BigEndian>()
            }
            .map_err(|e| format!("Error reading PFM pixel data in {path} at y={y}: {e}"))?;
            data[row + j] = f * scale;
        }
    }

    let pixels: Vec<RGBSpectrum> = if n_channels == 1 {
        data.iter().map(|v| RGBSpectrum::new(*v)).collect()
    } else {
        data.chunks_exact(3)
            .map(|c| RGBSpectrum::from_rgb(c[0], c[1], c[2]))
            .collect()
    };

    debug!("Read PFM image {path} ({width} x {height} x {n_channels})");

    RGBImage::from_pixels(pixels, width, height)
}

/// Read an 8-bit image format and convert it to linear RGB.
///
/// * `path` - Input file path.
fn read_8_bit(path: &str) -> Result<RGBImage, String> {
    let img: RgbImage = match image::open(path) {
        Ok(i) => i.into_rgb8(),
        Err(err) => return Err(format!("Error reading image {path}: {err}")),
    };

    let width = img.width() as usize;
    let height = img.height() as usize;

    let pixels: Vec<RGBSpectrum> = img
        .pixels()
        .map(|rgb_u8| {
            RGBSpectrum::from_rgb(
                inv_gamma_correct(rgb_u8[0] as Float / 255.0),
                inv_gamma_correct(rgb_u8[1] as Float / 255.0),
                inv_gamma_correct(rgb_u8[2] as Float / 255.0),
            )
        })
        .collect();

    debug!("Read 8-bit image {path} ({width} x {height})");

    RGBImage::from_pixels(pixels, width, height)
}

/// Write an image to the given path. The format is chosen from the extension.
///
/// * `path`  - Output file path.
/// * `image` - The image.
pub fn write_image(path: &str, image: &RGBImage) -> Result<(), String> {
    if image.width() == 0 || image.height() == 0 {
        return Err(format!("Refusing to write empty image {path}"));
    }

    let rgb = image.to_rgb_buffer();
    let res_x = image.width() as u32;
    let res_y = image.height() as u32;

    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, &rgb, res_x, res_y),
        Some(".tga") => write_8_bit(path, &rgb, res_x, res_y, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, &rgb, res_x, res_y, ImageFormat::Png),
        Some(".pfm") => write_pfm(path, &rgb, res_x, res_y),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns the file name of the `index`-th image of a set, e.g. `0007.exr`.
///
/// * `index` - Index of the image.
pub fn image_set_filename(index: usize) -> String {
    format!("{index:04}.exr")
}

/// Reads exactly `count` images named `0000.exr`, `0001.exr`, ... from a
/// directory.
///
/// * `dir`   - The directory.
/// * `count` - Number of images.
pub fn read_image_set(dir: &str, count: usize) -> Result<Vec<RGBImage>, String> {
    (0..count)
        .map(|i| {
            let path = Path::new(dir).join(image_set_filename(i));
            read_image(&path.to_string_lossy())
        })
        .collect()
}

/// Writes images as `0000.exr`, `0001.exr`, ... into a directory, creating
/// it if necessary.
///
/// * `dir`    - The directory.
/// * `images` - The images.
pub fn write_image_set(dir: &str, images: &[RGBImage]) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Unable to create directory {dir}: {e}"))?;
    for (i, image) in images.iter().enumerate() {
        let path = Path::new(dir).join(image_set_filename(i));
        write_image(&path.to_string_lossy(), image)?;
    }
    Ok(())
}

/// Returns regular expression for extracting the file extension. This will
/// match the last occurrence of a period followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("valid extension regex"))
}

/// Retrieve the lowercase extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&'static str> {
    let ext = regex_file_ext()
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())?;
    match ext.as_str() {
        ".exr" => Some(".exr"),
        ".pfm" => Some(".pfm"),
        ".png" => Some(".png"),
        ".tga" => Some(".tga"),
        _ => Some(".other"),
    }
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_exr(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    debug!("Writing image {path} with resolution {res_x}x{res_y}");

    let size = Vec2(res_x as usize, res_y as usize);

    let layer = Layer::new(
        size,
        LayerAttributes::named("rgb"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * (res_x as usize) + pos.0);
            (rgb[offset], rgb[offset + 1], rgb[offset + 2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|err| format!("Error saving output image {path}: {err}"))
}

/// Writes the image in an 8-bit image format with sRGB gamma.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), String> {
    debug!("Writing image {path} with resolution {res_x}x{res_y}");

    let mut imgbuf = ImageBuffer::new(res_x, res_y);
    for (i, c) in rgb.chunks_exact(3).enumerate() {
        let x = i as u32 % res_x;
        let y = i as u32 / res_x;
        imgbuf.put_pixel(x, y, Rgb([clamp_byte(c[0]), clamp_byte(c[1]), clamp_byte(c[2])]));
    }

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

/// Writes the image in PFM (Portable FloatMap) format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_pfm(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    debug!("Writing image {path} with resolution {res_x}x{res_y}");

    let width = res_x as usize;
    let height = res_y as usize;

    let file = File::create(path).map_err(|e| format!("Error writing PFM file '{path}': {e}"))?;
    let mut writer = BufWriter::new(file);

    // The sign of the scale encodes endianness.
    let scale = if is_big_endian() { 1.0 } else { -1.0 };
    write!(writer, "PF\n{width} {height}\n{scale}\n").map_err(|e| format!("Error writing PFM header '{path}': {e}"))?;

    // Rows go bottom to top.
    for y in (0..height).rev() {
        for &f in &rgb[y * width * 3..(y + 1) * width * 3] {
            if is_big_endian() {
                writer.write_f32::<BigEndian>(f)
            } else {
                writer.write_f32::<LittleEndian>(f)
            }
            .map_err(|e| format!("Error writing PFM pixels '{path}': {e}"))?;
        }
    }

    writer.flush().map_err(|e| format!("Error writing PFM file '{path}': {e}"))
}

/// Clamp a gamma corrected floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}
