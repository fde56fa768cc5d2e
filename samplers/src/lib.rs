//! Sample generators

#[macro_use]
extern crate log;

mod disk;
mod uniform;

// Re-export.
pub use disk::*;
pub use uniform::*;
