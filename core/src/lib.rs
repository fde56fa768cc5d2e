//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod base;
pub mod camera;
pub mod diffuser;
pub mod display;
pub mod fileutil;
pub mod film;
pub mod geometry;
pub mod image_analysis;
pub mod image_io;
pub mod image_stats;
pub mod integrator;
pub mod observer;
pub mod parallel;
pub mod sampler;
pub mod spectrum;
