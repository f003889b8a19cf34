//! Module for working with image slice-stack datasets
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod convert;
mod error;
mod pointcloud;
mod slices;

pub mod paths;

// Inline anything important for a nice public API
#[doc(inline)]
pub use slices::{Metatype, Slices};

#[doc(inline)]
pub use error::{Error, Result};
