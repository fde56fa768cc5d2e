//! Diffuser screen model

use crate::base::*;
use crate::geometry::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a direction is reduced to the angular coordinates `(rho, eta)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffuserType {
    /// `rho = dx / dz`, `eta = dy / dz`.
    Linear,

    /// `rho = sign(dz) dx / sqrt(dy^2 + dz^2)`, `eta = dy / dz`.
    Conical,
}

impl Default for DiffuserType {
    fn default() -> Self {
        Self::Conical
    }
}

impl fmt::Display for DiffuserType {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Conical => write!(f, "conical"),
        }
    }
}

/// Gaussian angular falloff model of a flat anisotropic diffuser screen.
///
/// The weight of a projector ray seen along a viewer ray through the same
/// screen point is `exp(-k_rho * drho^2) * exp(-k_eta * deta^2)` where
/// `(rho, eta)` are the angular coordinates of the two directions. Powers of
/// zero describe an ideal diffuser, large powers a near-specular screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiffuserModel {
    /// Depth of the screen plane.
    pub screen_z: Float,

    /// Scattering powers `(k_rho, k_eta)`.
    pub diffusion_power: [Float; 2],

    /// Angular reduction.
    pub diffuser_type: DiffuserType,
}

impl DiffuserModel {
    /// Create a new `DiffuserModel`.
    ///
    /// * `diffuser_type`   - Angular reduction.
    /// * `diffusion_power` - Scattering powers `(k_rho, k_eta)`.
    /// * `screen_z`        - Depth of the screen plane.
    pub fn new(diffuser_type: DiffuserType, diffusion_power: [Float; 2], screen_z: Float) -> Self {
        Self {
            screen_z,
            diffusion_power,
            diffuser_type,
        }
    }

    /// Returns the angular coordinates `(rho, eta)` of a direction. A zero
    /// `dz` yields non-finite values.
    ///
    /// * `d` - The direction.
    pub fn angular_coordinates(&self, d: &Vector3f) -> (Float, Float) {
        let eta = d.y / d.z;
        let rho = match self.diffuser_type {
            DiffuserType::Linear => d.x / d.z,
            DiffuserType::Conical => {
                let s = if d.z > 0.0 { 1.0 } else { -1.0 };
                s * d.x / (d.y * d.y + d.z * d.z).sqrt()
            }
        };
        (rho, eta)
    }

    /// Returns the relative intensity in `(0, 1]` that light arriving from
    /// `projector_pos` at `intersection` is scattered toward `viewer_pos`.
    ///
    /// * `projector_pos` - Position of the projector.
    /// * `intersection`  - Point on the screen.
    /// * `viewer_pos`    - Position of the viewer.
    pub fn refracted_intensity(&self, projector_pos: &Point3f, intersection: &Point3f, viewer_pos: &Point3f) -> Float {
        let (rho1, eta1) = self.angular_coordinates(&(*projector_pos - *intersection));
        let (rho2, eta2) = self.angular_coordinates(&(*viewer_pos - *intersection));

        let diff_rho = rho1 - rho2;
        let diff_eta = eta1 - eta2;
        let weight_rho = (-self.diffusion_power[0] * diff_rho * diff_rho).exp();
        let weight_eta = (-self.diffusion_power[1] * diff_eta * diff_eta).exp();
        weight_rho * weight_eta
    }

    /// Returns `X` such that a viewer at `(X, 0, 0)` sees the ray from
    /// `ray_origin` through `intersection` at its maximum intensity. Degenerate
    /// rays (`dz = 0`) yield non-finite values.
    ///
    /// * `ray_origin`   - Origin of the ray, usually a projector.
    /// * `intersection` - Point on the screen.
    pub fn find_max_on_viewer_line(&self, ray_origin: &Point3f, intersection: &Point3f) -> Float {
        let Point3 { x: x0, y: y0, z: z0 } = *intersection;
        let d = *intersection - *ray_origin;

        match self.diffuser_type {
            // Cone (x - x0)^2 = rho^2 ((y - y0)^2 + (z - z0)^2) cut by the viewer line.
            DiffuserType::Conical => {
                let rho = d.x / (d.y * d.y + d.z * d.z).sqrt();
                x0 + rho * (y0 * y0 + z0 * z0).sqrt()
            }
            // Line (x0, z0) + t (dx, dz) cut by z = 0.
            DiffuserType::Linear => x0 - z0 * d.x / d.z,
        }
    }
}
