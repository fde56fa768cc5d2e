//! Projector image optimizers

#[macro_use]
extern crate log;

mod pixel_solver;
mod projectors_optimization;
mod zero_iteration;

// Re-export.
pub use pixel_solver::*;
pub use projectors_optimization::*;
pub use zero_iteration::*;
