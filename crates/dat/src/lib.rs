//! Module for working with NSI and Dragonfly `.dat` volume metadata
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod dat;
mod depth;
mod error;
mod reader;
mod writer;

pub mod parsers;

// Inline anything important for a nice public API
#[doc(inline)]
pub use dat::{Bitdepth, Dat, Dialect, StorageFormat};

#[doc(inline)]
pub use depth::determine_bit_depth;

#[doc(inline)]
pub use reader::read_dat;

#[doc(inline)]
pub use writer::{write_dat, write_json};

#[doc(inline)]
pub use error::{Error, Result};
