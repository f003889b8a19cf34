//! Grayscale PNG/TIFF codec for rawtools slice data
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod buffer;
mod codec;
mod error;
mod png;
mod tif;

// Inline anything important for a nice public API
#[doc(inline)]
pub use buffer::{Image, PixelBuffer};

#[doc(inline)]
pub use codec::{read_image, write_image};

#[doc(inline)]
pub use error::{Error, Result};
