#[macro_use]
extern crate log;

use cameras::*;
use clap::Parser;
use integrators::*;
use lfcore::app::*;
use lfcore::base::*;
use lfcore::camera::*;
use lfcore::display::*;
use lfcore::fileutil::*;
use lfcore::geometry::*;
use lfcore::image_io::*;
use lfcore::image_stats::*;
use lfcore::integrator::*;
use lfcore::observer::*;
use lfcore::sampler::*;
use optimizers::*;
use samplers::*;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    let settings = options.render_settings();

    let result = match &options.command {
        Command::Show(args) => show(args, &settings),
        Command::Optimize(args) => optimize(args, &settings),
        Command::Compare(args) => compare(args),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Converts a 3-value command line argument into a point.
///
/// * `name`   - Argument name for error messages.
/// * `values` - The values.
fn point_arg(name: &str, values: &[Float]) -> Result<Point3f, String> {
    match values {
        [x, y, z] => Ok(Point3f::new(*x, *y, *z)),
        _ => Err(format!("--{name} expects 3 values, got {}", values.len())),
    }
}

/// Renders the image a viewer perceives of a set of projector images.
///
/// * `args`     - Command arguments.
/// * `settings` - Render settings.
fn show(args: &ShowArgs, settings: &RenderSettings) -> Result<(), String> {
    let display = ProjectorDisplay::load(&args.display)?;
    let width = args.width.unwrap_or_else(|| display.width());
    let height = args.height.unwrap_or_else(|| display.height());
    let viewer = match &args.viewer {
        Some(v) => point_arg("viewer", v)?,
        None => Point3f::zero(),
    };

    let mut renderer = ProjectorsShow::new(display);
    renderer.load_scene(&args.projector_dir)?;

    let display = &renderer.display;
    let eye = Point2f::new(viewer.x, viewer.y);
    let camera: Box<dyn RayGenerator> = match args.focus {
        Some(in_focus_z) => {
            info!("Focusing eye at z = {in_focus_z}, aperture radius {}", args.aperture);
            Box::new(FocusEyeCamera::looking_at_screen(
                width,
                height,
                display.half_phys_size,
                display.viewer_distance,
                in_focus_z,
                args.aperture,
                eye,
            ))
        }
        None => Box::new(PinholeCamera::new(
            width,
            height,
            display.half_phys_size,
            display.viewer_distance,
            eye,
        )),
    };
    let sampler: BoxSampleGenerator = match args.focus {
        Some(_) => Box::new(DiskSampler::new(args.samples as Int, args.aperture_samples as Int)?),
        None => Box::new(UniformSampler::new(args.samples as Int, 1)?),
    };
    let accumulator = renderer.create_default_sample_accumulator(width, height)?;

    info!("Rendering {width}x{height} view from {:?}", viewer);
    renderer.render(camera.as_ref(), sampler.as_ref(), &accumulator, settings)?;

    write_image(&args.output, &accumulator.to_image())?;
    info!("Wrote '{}'", args.output);
    Ok(())
}

/// Returns the observer space from the command line, or the display's
/// default one.
///
/// * `args`    - Command arguments.
/// * `display` - The display.
fn observer_space(args: &OptimizeArgs, display: &ProjectorDisplay) -> Result<ObserverSpace, String> {
    match (&args.viewer_start, &args.viewer_step, args.viewers) {
        (Some(start), Some(step), Some(count)) => {
            let step = point_arg("viewer-step", step)?;
            Ok(ObserverSpace::new(
                point_arg("viewer-start", start)?,
                Vector3f::new(step.x, step.y, step.z),
                count,
            ))
        }
        (None, None, None) => display
            .observer_space()
            .ok_or_else(|| "No viewer positions given and the display has no observer".to_string()),
        _ => Err("--viewer-start, --viewer-step and --viewers must be given together".to_string()),
    }
}

/// Optimizes projector images and evaluates every iteration.
///
/// * `args`     - Command arguments.
/// * `settings` - Render settings.
fn optimize(args: &OptimizeArgs, settings: &RenderSettings) -> Result<(), String> {
    let display = ProjectorDisplay::load(&args.display)?;
    let observer = observer_space(args, &display)?;
    if observer.num_positions() == 0 {
        return Err("Observer space is empty".to_string());
    }

    if !is_dir(&args.groundtrue_dir) {
        return Err(format!("Ground truth directory '{}' not found", args.groundtrue_dir));
    }
    let groundtrue = read_image_set(&args.groundtrue_dir, observer.num_positions())?;

    let zero_iteration = match &args.zero_dir {
        Some(dir) => read_image_set(dir, display.num_projectors())?,
        None => capture_zero_iteration(&display, &observer, &groundtrue)?,
    };

    let optimization = ProjectorsOptimization::new(display.clone(), observer);
    let iterations = optimization.iterate(&groundtrue, &zero_iteration, args.iterations, settings)?;

    create_output_dir(&args.output_dir)?;
    let viewers = observer.positions();
    for (i, projector_images) in iterations.into_iter().enumerate() {
        let name = iteration_dir_name(i + 1);
        let dir = join_path(&args.output_dir, &name);
        create_output_dir(&dir)?;

        write_image_set(&dir, &projector_images)?;

        let renderer = ProjectorsShow::with_images(display.clone(), projector_images)?;
        let views = viewers
            .iter()
            .map(|viewer| renderer.render_view(viewer, display.width(), display.height(), settings))
            .collect::<Result<Vec<_>, String>>()?;
        write_image_set(&join_path(&dir, "views"), &views)?;

        let stats = ImageStatistics::evaluate(&views, &groundtrue)?;
        stats.save_to_files(&args.output_dir, &format!("{name}_"))?;
        if let Some(avg) = stats.average() {
            info!(
                "{name}: PSNR {:.2} {:.2} {:.2}, MSSIM {:.4} {:.4} {:.4}",
                avg.psnr[0], avg.psnr[1], avg.psnr[2], avg.mssim[0], avg.mssim[1], avg.mssim[2]
            );
        }
    }
    Ok(())
}

/// Prints the PSNR and MSSIM of two images.
///
/// * `args` - Command arguments.
fn compare(args: &CompareArgs) -> Result<(), String> {
    let a = read_image(&args.a)?;
    let b = read_image(&args.b)?;
    let stats = ImageStatistics::evaluate_pair(&a, &b)?;
    let e = stats.data[0];
    println!("PSNR:  {:.4} {:.4} {:.4}", e.psnr[0], e.psnr[1], e.psnr[2]);
    println!("MSSIM: {:.6} {:.6} {:.6}", e.mssim[0], e.mssim[1], e.mssim[2]);
    Ok(())
}
