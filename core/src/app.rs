//! Application related stuff

use crate::base::*;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

/// Default tile size in pixels.
pub const DEFAULT_TILE_SIZE: usize = 16;

/// Default aperture radius of the focusing eye.
pub const DEFAULT_APERTURE_RADIUS: Float = 0.004;

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "Light-field projector display simulator", long_about = None)]
pub struct Options {
    /// Number of threads to use.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = num_cpus::get(),
        global = true,
        help = "Use specified number of threads for rendering and optimization."
    )]
    n_threads: usize,

    /// Tile size.
    #[clap(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = DEFAULT_TILE_SIZE,
        global = true,
        help = "Size in pixels of square tiles rendered per thread."
    )]
    pub tile_size: usize,

    /// Suppress all text output other than error messages.
    #[clap(long, global = true, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// The command to run.
    #[clap(subcommand)]
    pub command: Command,
}

/// Commands of the driver.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Render the image perceived by a viewer.
    Show(ShowArgs),

    /// Optimize projector images for a set of ground truth views.
    Optimize(OptimizeArgs),

    /// Compare two images.
    Compare(CompareArgs),
}

/// Arguments of the `show` command.
#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    /// Display configuration file.
    #[clap(value_name = "DISPLAY")]
    pub display: String,

    /// Directory containing `0000.exr`, `0001.exr`, ... one per projector.
    #[clap(value_name = "PROJECTOR_DIR")]
    pub projector_dir: String,

    /// Output image path.
    #[clap(value_name = "OUTFILE")]
    pub output: String,

    /// Viewer position.
    #[clap(long, value_name = "FLOAT", number_of_values = 3, allow_negative_numbers = true)]
    pub viewer: Option<Vec<Float>>,

    /// Output width; defaults to the projector width.
    #[clap(long, value_name = "NUM")]
    pub width: Option<usize>,

    /// Output height; defaults to the projector height.
    #[clap(long, value_name = "NUM")]
    pub height: Option<usize>,

    /// Strata per pixel axis.
    #[clap(long, value_name = "NUM", default_value_t = 3)]
    pub samples: usize,

    /// Depth of the in-focus plane; renders through a focusing eye when given.
    #[clap(long, value_name = "FLOAT")]
    pub focus: Option<Float>,

    /// Aperture radius of the focusing eye.
    #[clap(long, value_name = "FLOAT", default_value_t = DEFAULT_APERTURE_RADIUS)]
    pub aperture: Float,

    /// Aperture strata per axis of the focusing eye.
    #[clap(long = "aperture-samples", value_name = "NUM", default_value_t = 4)]
    pub aperture_samples: usize,
}

/// Arguments of the `optimize` command.
#[derive(Args, Clone, Debug)]
pub struct OptimizeArgs {
    /// Display configuration file.
    #[clap(value_name = "DISPLAY")]
    pub display: String,

    /// Directory containing one ground truth image per viewer position.
    #[clap(value_name = "GROUNDTRUE_DIR")]
    pub groundtrue_dir: String,

    /// Output directory.
    #[clap(value_name = "OUTDIR")]
    pub output_dir: String,

    /// Directory with the zero iteration; captured naively when absent.
    #[clap(long = "zero", value_name = "DIR")]
    pub zero_dir: Option<String>,

    /// Number of iterations.
    #[clap(long, value_name = "NUM", default_value_t = 10)]
    pub iterations: i32,

    /// First viewer position.
    #[clap(long = "viewer-start", value_name = "FLOAT", number_of_values = 3, allow_negative_numbers = true)]
    pub viewer_start: Option<Vec<Float>>,

    /// Offset between viewer positions.
    #[clap(long = "viewer-step", value_name = "FLOAT", number_of_values = 3, allow_negative_numbers = true)]
    pub viewer_step: Option<Vec<Float>>,

    /// Number of viewer positions.
    #[clap(long = "viewers", value_name = "NUM")]
    pub viewers: Option<usize>,
}

/// Arguments of the `compare` command.
#[derive(Args, Clone, Debug)]
pub struct CompareArgs {
    /// First image.
    #[clap(value_name = "FILE")]
    pub a: String,

    /// Second image.
    #[clap(value_name = "FILE")]
    pub b: String,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads 0, using 1");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the settings shared by rendering and optimization passes.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            n_threads: self.threads(),
            tile_size: self.tile_size,
            quiet: self.quiet,
        }
    }
}

/// Execution settings of a parallel pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Number of worker threads.
    pub n_threads: usize,

    /// Tile size in pixels.
    pub tile_size: usize,

    /// Hide progress bars.
    pub quiet: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(),
            tile_size: DEFAULT_TILE_SIZE,
            quiet: true,
        }
    }
}

/// Returns a progress bar for `len` steps that is hidden in quiet mode.
///
/// * `len`   - Number of steps.
/// * `quiet` - Hide the bar.
pub fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template("[{elapsed_precise}] {wide_bar:.cyan/blue} {pos:>5}/{len:5} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    let progress = ProgressBar::new(len);
    progress.set_style(style);
    progress
}
