//! Projector display configuration

use crate::base::*;
use crate::diffuser::*;
use crate::geometry::*;
use crate::observer::*;
use serde::{Deserialize, Serialize};
use std::fs;

/// 3-D coordinates as stored in the configuration file.
pub type Vec3Data = [Float; 3];

/// A line of equally spaced projectors.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct ProjectorLine {
    /// Position of the first projector.
    pub start: Vec3Data,

    /// Offset between consecutive projectors.
    pub step: Vec3Data,

    /// Number of projectors on the line.
    pub number: usize,
}

impl ProjectorLine {
    /// Returns the projector positions on the line.
    pub fn positions(&self) -> impl Iterator<Item = Point3f> + '_ {
        let start = Point3f::from(self.start);
        let step = Vector3f::from(self.step);
        (0..self.number).map(move |i| start + step * i as Float)
    }
}

/// Viewer positions stored in the configuration file.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct ObserverData {
    /// First viewer position.
    pub start: Vec3Data,

    /// Offset between consecutive viewer positions.
    pub step: Vec3Data,

    /// Number of viewer positions.
    pub count: usize,
}

/// A display made of projectors aimed at a flat diffuser screen.
///
/// Viewers live on the line `(x, 0, 0)`, the screen is the plane
/// `z = viewer_distance`, and every projector shares the same pixel grid on
/// the screen.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectorDisplay {
    /// Distance from the viewer line to the screen plane.
    pub viewer_distance: Float,

    /// Resolution `(width, height)` of every projector.
    pub resolution: [usize; 2],

    /// Half of the physical screen size `(x, y)`.
    pub half_phys_size: [Float; 2],

    /// Angular reduction of the diffuser.
    pub diffuser_type: DiffuserType,

    /// Diffuser scattering powers `(k_rho, k_eta)`.
    pub diffusion_power: [Float; 2],

    /// Default observer space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<ObserverData>,

    /// Projector lines, concatenated in order.
    #[serde(default)]
    pub projector_lines: Vec<ProjectorLine>,
}

impl Default for ProjectorDisplay {
    fn default() -> Self {
        Self {
            viewer_distance: 1.0,
            resolution: [1, 1],
            half_phys_size: [1.0, 1.0],
            diffuser_type: DiffuserType::Linear,
            diffusion_power: [100.0, 0.0],
            observer: None,
            projector_lines: vec![],
        }
    }
}

impl ProjectorDisplay {
    /// Loads and validates a display configuration file.
    ///
    /// * `path` - Path to the TOML file.
    pub fn load(path: &str) -> Result<Self, String> {
        let input = fs::read_to_string(path).map_err(|e| format!("Unable to read display file '{path}': {e}"))?;
        let display = Self::from_toml_str(&input).map_err(|e| format!("Invalid display file '{path}': {e}"))?;
        info!(
            "Loaded display '{path}': {} projectors at {}x{}, {} diffuser",
            display.num_projectors(),
            display.width(),
            display.height(),
            display.diffuser_type
        );
        Ok(display)
    }

    /// Parses and validates a display configuration.
    ///
    /// * `input` - TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        let display: Self = toml::from_str(input).map_err(|e| e.to_string())?;
        display.validate()?;
        Ok(display)
    }

    /// Returns the configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Unable to serialize display: {e}"))
    }

    /// Saves the configuration as a TOML file.
    ///
    /// * `path` - Output path.
    pub fn save(&self, path: &str) -> Result<(), String> {
        let output = self.to_toml_string()?;
        fs::write(path, output).map_err(|e| format!("Unable to write display file '{path}': {e}"))
    }

    /// Checks the invariants every consumer relies on.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewer_distance.is_finite() && self.viewer_distance != 0.0) {
            return Err(format!("Invalid viewer distance {}", self.viewer_distance));
        }
        if self.resolution[0] == 0 || self.resolution[1] == 0 {
            return Err(format!("Invalid resolution {} x {}", self.resolution[0], self.resolution[1]));
        }
        if !self.half_phys_size.iter().all(|v| *v > 0.0) {
            return Err(format!(
                "Invalid half size {} x {}",
                self.half_phys_size[0], self.half_phys_size[1]
            ));
        }
        if !self.diffusion_power.iter().all(|v| *v >= 0.0) {
            return Err(format!(
                "Invalid diffusion power ({}, {})",
                self.diffusion_power[0], self.diffusion_power[1]
            ));
        }
        Ok(())
    }

    /// Returns the projector width.
    pub fn width(&self) -> usize {
        self.resolution[0]
    }

    /// Returns the projector height.
    pub fn height(&self) -> usize {
        self.resolution[1]
    }

    /// Returns the positions of all projectors, line after line.
    pub fn projector_positions(&self) -> Vec<Point3f> {
        self.projector_lines.iter().flat_map(|line| line.positions()).collect()
    }

    /// Returns the total number of projectors.
    pub fn num_projectors(&self) -> usize {
        self.projector_lines.iter().map(|line| line.number).sum()
    }

    /// Returns the diffuser model of the screen.
    pub fn diffuser(&self) -> DiffuserModel {
        DiffuserModel::new(self.diffuser_type, self.diffusion_power, self.viewer_distance)
    }

    /// Returns the observer space stored in the file, if any.
    pub fn observer_space(&self) -> Option<ObserverSpace> {
        self.observer.map(|o| ObserverSpace::new(o.start.into(), o.step.into(), o.count))
    }

    /// Returns the centre of pixel `(x, y)` on the screen plane.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn screen_point(&self, x: usize, y: usize) -> Point3f {
        let w = self.width() as Float;
        let h = self.height() as Float;
        Point3f::new(
            self.half_phys_size[0] * (2.0 * (x as Float + 0.5) / w - 1.0),
            -self.half_phys_size[1] * (2.0 * (y as Float + 0.5) / h - 1.0),
            self.viewer_distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    const SAMPLE: &str = r#"
viewer_distance = 1.5
resolution = [640, 480]
half_phys_size = [0.5, 0.375]
diffuser_type = "linear"
diffusion_power = [100.0, 0.0]

[[projector_lines]]
start = [-0.2, 0.0, 2.0]
step = [0.1, 0.0, 0.0]
number = 5

[[projector_lines]]
start = [0.0, 0.5, 2.0]
step = [0.0, 0.0, 0.0]
number = 1
"#;

    #[test]
    fn load_sample_configuration() {
        let d = ProjectorDisplay::from_toml_str(SAMPLE).unwrap();
        assert_eq!(d.width(), 640);
        assert_eq!(d.height(), 480);
        assert_eq!(d.diffuser_type, DiffuserType::Linear);
        assert_eq!(d.num_projectors(), 6);
        assert!(d.observer.is_none());
    }

    #[test]
    fn projector_lines_are_concatenated_in_order() {
        let d = ProjectorDisplay::from_toml_str(SAMPLE).unwrap();
        let p = d.projector_positions();
        assert_eq!(p.len(), 6);
        assert!(approx_eq!(f32, p[0].x, -0.2, epsilon = 1e-6));
        assert!(approx_eq!(f32, p[4].x, 0.2, epsilon = 1e-6));
        assert_eq!(p[5], Point3f::new(0.0, 0.5, 2.0));
    }

    #[test]
    fn invalid_documents_are_rejected() {
        let bad = [
            SAMPLE.replace("\"linear\"", "\"spherical\""),
            SAMPLE.replace("[640, 480]", "[0, 480]"),
            SAMPLE.replace("[0.5, 0.375]", "[0.5, -0.375]"),
            SAMPLE.replace("[100.0, 0.0]", "[-1.0, 0.0]"),
            SAMPLE.replace("number = 5", "number = -5"),
            SAMPLE.replace("viewer_distance = 1.5", ""),
            "not toml at all [".to_string(),
        ];
        for doc in bad.iter() {
            assert!(ProjectorDisplay::from_toml_str(doc).is_err(), "accepted {doc}");
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ProjectorDisplay::load("/nonexistent/display.toml").is_err());
    }

    #[test]
    fn save_then_load_keeps_configuration() {
        let mut d = ProjectorDisplay::from_toml_str(SAMPLE).unwrap();
        d.observer = Some(ObserverData {
            start: [-0.5, 0.0, 0.0],
            step: [0.25, 0.0, 0.0],
            count: 5,
        });
        let path = std::env::temp_dir().join("lfcore-display-save.toml");
        let path = path.to_string_lossy().to_string();
        d.save(&path).unwrap();
        assert_eq!(ProjectorDisplay::load(&path).unwrap(), d);
        assert_eq!(d.observer_space().unwrap().num_positions(), 5);
    }

    #[test]
    fn screen_points_are_pixel_centres() {
        let mut d = ProjectorDisplay::default();
        d.resolution = [2, 2];
        assert_eq!(d.screen_point(0, 0), Point3f::new(-0.5, 0.5, 1.0));
        assert_eq!(d.screen_point(1, 1), Point3f::new(0.5, -0.5, 1.0));
    }
}
