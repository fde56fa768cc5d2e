//! Ray generators

#[macro_use]
extern crate log;

mod focus_eye_camera;
mod pinhole_camera;
mod projector_capture_camera;

// Re-export
pub use focus_eye_camera::*;
pub use pinhole_camera::*;
pub use projector_capture_camera::*;
