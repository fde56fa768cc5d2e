//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Linear RGB colour is the only colour representation used for rendering.
pub type Spectrum = RGBSpectrum;
