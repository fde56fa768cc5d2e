//! File Utility Functions

use std::fs;
use std::path::Path;

/// Creates a directory and its parents if they do not exist yet.
///
/// * `path` - The directory.
pub fn create_output_dir(path: &str) -> Result<(), String> {
    fs::create_dir_all(path).map_err(|e| format!("Unable to create directory {}. {}.", path, e))
}

/// Returns `dir/name` as a string.
///
/// * `dir`  - The directory.
/// * `name` - File or directory name.
pub fn join_path(dir: &str, name: &str) -> String {
    Path::new(dir).join(name).to_string_lossy().to_string()
}

/// Returns the name of the output directory for an optimizer iteration,
/// `iteration_01`, `iteration_02`, ...
///
/// * `iteration` - Iteration number starting at 1.
pub fn iteration_dir_name(iteration: usize) -> String {
    format!("iteration_{:02}", iteration)
}

/// Returns `true` if `path` is an existing directory.
///
/// * `path` - The path.
pub fn is_dir(path: &str) -> bool {
    Path::new(path).is_dir()
}
