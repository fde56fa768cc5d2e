//! Naive zero iteration

use cameras::*;
use lfcore::base::*;
use lfcore::camera::*;
use lfcore::display::*;
use lfcore::geometry::*;
use lfcore::image_io::*;
use lfcore::observer::*;

/// Captures a starting point for the optimizer. Every projector pixel takes
/// the ground truth colour seen by the viewer closest to where the pixel's
/// light is brightest on the viewer line.
///
/// * `display`    - The display.
/// * `observer`   - Viewer positions.
/// * `groundtrue` - One image per viewer position.
pub fn capture_zero_iteration(
    display: &ProjectorDisplay,
    observer: &ObserverSpace,
    groundtrue: &[RGBImage],
) -> Result<Vec<RGBImage>, String> {
    let (width, height) = (display.width(), display.height());
    if groundtrue.is_empty() || groundtrue.len() != observer.num_positions() {
        return Err(format!(
            "Got {} ground truth images for {} viewer positions",
            groundtrue.len(),
            observer.num_positions()
        ));
    }
    if let Some(i) = groundtrue.iter().position(|img| !img.has_resolution(width, height)) {
        return Err(format!(
            "Ground truth image {i} is {} x {}, expected {width} x {height}",
            groundtrue[i].width(),
            groundtrue[i].height()
        ));
    }

    info!("Capturing zero iteration for {} projectors", display.num_projectors());

    let mut images = Vec::with_capacity(display.num_projectors());
    for projector in display.projector_positions() {
        let camera = ProjectorCaptureCamera::new(display, projector);
        let mut image = RGBImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let raster = Point2f::new(x as Float + 0.5, y as Float + 0.5);
                let (ray, _) = camera.generate_ray(&raster, &Point2f::new(0.5, 0.5));
                let viewer = observer
                    .nearest_by_x(ray.o.x)
                    .ok_or_else(|| "Observer space is empty".to_string())?;
                image.set(x, y, groundtrue[viewer].get(x, y));
            }
        }
        debug!("Captured projector at {:?}", projector);
        images.push(image);
    }
    Ok(images)
}
