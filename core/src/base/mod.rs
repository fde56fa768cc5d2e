//! Base types and numeric helpers

mod common;

// Re-export
pub use common::*;
