//! Module for working with `.raw` volumes and range scaling
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod convert;
mod error;
mod qc;
mod raw;

pub mod scale;

// Inline anything important for a nice public API
#[doc(inline)]
pub use raw::{Raw, SliceIter};

#[doc(inline)]
pub use convert::{array_to_image, Options};

#[doc(inline)]
pub use qc::Projection;

#[doc(inline)]
pub use error::{Error, Result};
