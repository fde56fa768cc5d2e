//! Integrators

#[macro_use]
extern crate log;

mod projectors_show;

// Re-export.
pub use projectors_show::*;
