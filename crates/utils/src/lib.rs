//! Common utility for the rawtools crates
//!
//! These are left public for convenience.
//!
//! For example, finding the closest-named sibling file is useful anywhere a
//! dataset's companion files may have drifted out of naming sync.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod similarity;

// Flatten
pub use similarity::{closest_match, similarity_ratio};
