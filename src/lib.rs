//! `rawtools` is a semi-modular toolkit of conversion and quality control
//! utilities for volumetric X-ray scan data
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use rawtools_utils as utils;

#[cfg(feature = "dat")]
#[cfg_attr(docsrs, doc(cfg(feature = "dat")))]
#[doc(inline)]
pub use rawtools_dat as dat;

#[cfg(feature = "image")]
#[cfg_attr(docsrs, doc(cfg(feature = "image")))]
#[doc(inline)]
pub use rawtools_image as image;

#[cfg(feature = "slices")]
#[cfg_attr(docsrs, doc(cfg(feature = "slices")))]
#[doc(inline)]
pub use rawtools_slices as slices;

#[cfg(feature = "volume")]
#[cfg_attr(docsrs, doc(cfg(feature = "volume")))]
#[doc(inline)]
pub use rawtools_volume as volume;
