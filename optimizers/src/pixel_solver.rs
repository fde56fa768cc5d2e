//! Per-pixel projector value solver

use lfcore::base::*;
use lfcore::diffuser::*;
use lfcore::geometry::*;
use lfcore::spectrum::*;
use nalgebra::{DMatrix, DVector};

/// Values whose magnitude is below this are treated as zero by the solver.
pub const SOLVER_EPSILON: f64 = 1e-12;

/// Quadratic model of one screen pixel: the projector values `R` of a channel
/// minimize `R^T B R / 2 - beta^T R` subject to `0 <= R <= 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSystem {
    /// `B = mean_v(w_v w_v^T)`.
    pub b: DMatrix<f64>,

    /// `beta_c = mean_v(w_v gt_v[c])` per channel.
    pub beta: [DVector<f64>; 3],
}

/// Returns the normalized diffuser weights of every projector as seen from a
/// viewer through a screen point. Weights at or below `WEIGHT_EPSILON` are
/// dropped; if the rest sums to at most `WEIGHT_EPSILON` all weights are 0.
///
/// * `screen_point`        - Point on the screen.
/// * `projector_positions` - Projector positions.
/// * `viewer`              - Viewer position.
/// * `diffuser`            - Diffuser model.
pub fn viewer_weights(
    screen_point: &Point3f,
    projector_positions: &[Point3f],
    viewer: &Point3f,
    diffuser: &DiffuserModel,
) -> DVector<f64> {
    let mut w = DVector::from_iterator(
        projector_positions.len(),
        projector_positions.iter().map(|p| {
            let weight = diffuser.refracted_intensity(p, screen_point, viewer);
            if weight > WEIGHT_EPSILON {
                weight as f64
            } else {
                0.0
            }
        }),
    );

    let sum = w.sum();
    if sum > WEIGHT_EPSILON as f64 {
        w /= sum;
    } else {
        w.fill(0.0);
    }
    w
}

impl PixelSystem {
    /// Assembles the system of a screen pixel.
    ///
    /// * `screen_point`        - Centre of the pixel on the screen.
    /// * `projector_positions` - Projector positions.
    /// * `viewer_positions`    - Viewer positions.
    /// * `diffuser`            - Diffuser model.
    /// * `groundtrue`          - Ground truth colour of the pixel per viewer.
    pub fn assemble(
        screen_point: &Point3f,
        projector_positions: &[Point3f],
        viewer_positions: &[Point3f],
        diffuser: &DiffuserModel,
        groundtrue: &[RGBSpectrum],
    ) -> Self {
        let n = projector_positions.len();
        let mut b = DMatrix::zeros(n, n);
        let mut beta = [DVector::zeros(n), DVector::zeros(n), DVector::zeros(n)];

        for (viewer, gt) in viewer_positions.iter().zip(groundtrue.iter()) {
            let w = viewer_weights(screen_point, projector_positions, viewer, diffuser);
            b += &w * w.transpose();
            for (c, beta_c) in beta.iter_mut().enumerate() {
                *beta_c += &w * gt[c] as f64;
            }
        }

        let n_viewers = viewer_positions.len().max(1) as f64;
        b /= n_viewers;
        for beta_c in beta.iter_mut() {
            *beta_c /= n_viewers;
        }

        Self { b, beta }
    }

    /// Performs one projected descent step for a channel and returns the new
    /// projector values.
    ///
    /// * `channel` - Colour channel.
    /// * `r`       - Current projector values.
    pub fn descent_step(&self, channel: usize, r: &DVector<f64>) -> DVector<f64> {
        let gradient = &self.b * r - &self.beta[channel];

        // Jacobi scaled descent with the active bounds frozen.
        let descent = DVector::from_iterator(
            r.len(),
            gradient.iter().enumerate().map(|(i, g)| {
                let b_ii = self.b[(i, i)];
                let d = if b_ii.abs() < SOLVER_EPSILON { 0.0 } else { g / b_ii };
                if (d < 0.0 && r[i] >= 1.0) || (d > 0.0 && r[i] <= 0.0) {
                    0.0
                } else {
                    d
                }
            }),
        );

        let denom = descent.dot(&(&self.b * &descent));
        let lambda = if denom.abs() < SOLVER_EPSILON {
            0.0
        } else {
            descent.dot(&gradient) / denom
        };

        r - descent * lambda
    }
}

/// Optimizes the projector values of one screen pixel. Returns the unclamped
/// projector colours after every iteration, `result[iteration][projector]`.
///
/// * `screen_point`        - Centre of the pixel on the screen.
/// * `projector_positions` - Projector positions.
/// * `viewer_positions`    - Viewer positions.
/// * `diffuser`            - Diffuser model.
/// * `groundtrue`          - Ground truth colour of the pixel per viewer.
/// * `zero_iteration`      - Initial colour of the pixel per projector.
/// * `num_iterations`      - Number of iterations.
pub fn optimize_pixel(
    screen_point: &Point3f,
    projector_positions: &[Point3f],
    viewer_positions: &[Point3f],
    diffuser: &DiffuserModel,
    groundtrue: &[RGBSpectrum],
    zero_iteration: &[RGBSpectrum],
    num_iterations: usize,
) -> Vec<Vec<RGBSpectrum>> {
    let system = PixelSystem::assemble(screen_point, projector_positions, viewer_positions, diffuser, groundtrue);
    let n = projector_positions.len();

    let mut r: [DVector<f64>; 3] = [0, 1, 2].map(|c| DVector::from_iterator(n, zero_iteration.iter().map(|s| s[c] as f64)));

    let mut iterations = Vec::with_capacity(num_iterations);
    for _ in 0..num_iterations {
        for (c, r_c) in r.iter_mut().enumerate() {
            *r_c = system.descent_step(c, r_c);
        }
        iterations.push(
            (0..n)
                .map(|i| RGBSpectrum::from_rgb(r[0][i] as Float, r[1][i] as Float, r[2][i] as Float))
                .collect(),
        );
    }
    iterations
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn single(b: f64, beta: f64) -> PixelSystem {
        PixelSystem {
            b: DMatrix::from_element(1, 1, b),
            beta: [DVector::from_element(1, beta), DVector::from_element(1, beta), DVector::from_element(1, beta)],
        }
    }

    #[test]
    fn single_projector_reaches_minimum_in_one_step() {
        let system = single(0.64, 0.32);
        let r1 = system.descent_step(0, &DVector::from_element(1, 0.0));
        assert!(approx_eq!(f64, r1[0], 0.5, epsilon = 1e-12));
        let r2 = system.descent_step(0, &r1);
        assert!(approx_eq!(f64, r2[0], 0.5, epsilon = 1e-12));
    }

    #[test]
    fn active_bounds_are_frozen() {
        // The unconstrained minimum 2 lies above the upper bound.
        let system = single(0.5, 1.0);
        let r = system.descent_step(0, &DVector::from_element(1, 1.0));
        assert_eq!(r[0], 1.0);
        // The unconstrained minimum -1 lies below the lower bound.
        let system = single(0.5, -0.5);
        let r = system.descent_step(0, &DVector::from_element(1, 0.0));
        assert_eq!(r[0], 0.0);
    }

    #[test]
    fn degenerate_system_does_not_move() {
        let system = single(0.0, 0.0);
        let r = system.descent_step(0, &DVector::from_element(1, 0.7));
        assert_eq!(r[0], 0.7);
    }

    #[test]
    fn identity_like_system_converges_to_target() {
        let n = 4;
        let target = DVector::from_vec(vec![0.2, 0.4, 0.6, 0.8]);
        let system = PixelSystem {
            b: DMatrix::identity(n, n) / n as f64,
            beta: [0, 1, 2].map(|_| &target / n as f64),
        };
        let mut r = DVector::from_element(n, 0.5);
        for _ in 0..20 {
            r = system.descent_step(0, &r);
        }
        for i in 0..n {
            assert!(approx_eq!(f64, r[i], target[i], epsilon = 1e-6));
        }
    }

    #[test]
    fn weights_are_normalized_or_zero() {
        let diffuser = DiffuserModel::new(DiffuserType::Linear, [0.0, 0.0], 1.0);
        let projectors = [Point3f::new(-0.2, 0.0, 2.0), Point3f::new(0.2, 0.0, 2.0)];
        let screen = Point3f::new(0.0, 0.0, 1.0);
        let w = viewer_weights(&screen, &projectors, &Point3f::zero(), &diffuser);
        assert_eq!(w.as_slice(), &[0.5, 0.5]);

        let sharp = DiffuserModel::new(DiffuserType::Linear, [1.0e6, 0.0], 1.0);
        let w = viewer_weights(&screen, &projectors, &Point3f::new(0.5, 0.0, 0.0), &sharp);
        assert_eq!(w.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn system_averages_over_viewers() {
        let diffuser = DiffuserModel::new(DiffuserType::Linear, [0.0, 0.0], 1.0);
        let projectors = [Point3f::new(0.0, 0.0, 2.0)];
        let viewers = [Point3f::new(-0.1, 0.0, 0.0), Point3f::new(0.1, 0.0, 0.0)];
        let gt = [RGBSpectrum::from_rgb(0.2, 0.4, 0.6), RGBSpectrum::from_rgb(0.4, 0.4, 0.0)];
        let system = PixelSystem::assemble(&Point3f::new(0.0, 0.0, 1.0), &projectors, &viewers, &diffuser, &gt);
        assert_eq!(system.b[(0, 0)], 1.0);
        assert!(approx_eq!(f64, system.beta[0][0], 0.3, epsilon = 1e-6));
        assert!(approx_eq!(f64, system.beta[1][0], 0.4, epsilon = 1e-6));
        assert!(approx_eq!(f64, system.beta[2][0], 0.3, epsilon = 1e-6));
    }

    #[test]
    fn optimize_pixel_outputs_every_iteration() {
        let diffuser = DiffuserModel::new(DiffuserType::Linear, [0.0, 0.0], 1.0);
        let projectors = [Point3f::new(0.0, 0.0, 2.0)];
        let viewers = [Point3f::zero()];
        let gt = [RGBSpectrum::from_rgb(0.25, 0.5, 0.75)];
        let result = optimize_pixel(
            &Point3f::new(0.0, 0.0, 1.0),
            &projectors,
            &viewers,
            &diffuser,
            &gt,
            &[RGBSpectrum::new(0.5)],
            3,
        );
        assert_eq!(result.len(), 3);
        for iteration in result.iter() {
            assert_eq!(iteration.len(), 1);
            assert!(approx_eq!(f32, iteration[0][0], 0.25, epsilon = 1e-6));
            assert!(approx_eq!(f32, iteration[0][2], 0.75, epsilon = 1e-6));
        }
    }

    #[test]
    fn solver_keeps_values_outside_unit_range() {
        let diffuser = DiffuserModel::new(DiffuserType::Linear, [0.0, 0.0], 1.0);
        let result = optimize_pixel(
            &Point3f::new(0.0, 0.0, 1.0),
            &[Point3f::new(0.0, 0.0, 2.0)],
            &[Point3f::zero()],
            &diffuser,
            &[RGBSpectrum::new(1.5)],
            &[RGBSpectrum::new(0.5)],
            2,
        );
        // B = 1 and beta = 1.5, so the step lands on 1.5 and stays there.
        assert!(approx_eq!(f32, result[0][0][0], 1.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, result[1][0][0], 1.5, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn step_never_increases_objective(
            a in 0.1..1.0f64, c in -0.3..0.3f64, d in 0.1..1.0f64,
            b0 in -1.0..1.0f64, b1 in -1.0..1.0f64,
            r0 in 0.0..1.0f64, r1 in 0.0..1.0f64,
        ) {
            // Symmetric positive definite 2 x 2 system.
            let b = DMatrix::from_row_slice(2, 2, &[a, c * (a * d).sqrt(), c * (a * d).sqrt(), d]);
            let beta = DVector::from_vec(vec![b0, b1]);
            let system = PixelSystem { b: b.clone(), beta: [beta.clone(), beta.clone(), beta.clone()] };
            let objective = |r: &DVector<f64>| 0.5 * r.dot(&(&b * r)) - beta.dot(r);
            let r = DVector::from_vec(vec![r0, r1]);
            let next = system.descent_step(0, &r);
            prop_assert!(objective(&next) <= objective(&r) + 1e-12);
        }
    }
}
