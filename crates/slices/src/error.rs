//! Result and Error types for the slices module

use crate::slices::Metatype;
use rawtools_dat::Bitdepth;

/// Type alias for `Result<T, slices::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `rawtools-slices`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Error raised by the metadata codec
    #[error("metadata error")]
    DatError(#[from] rawtools_dat::Error),

    /// Error raised by the image codec
    #[error("image codec error")]
    ImageError(#[from] rawtools_image::Error),

    /// Error raised by the shared conversion pipeline
    #[error("conversion error")]
    VolumeError(#[from] rawtools_volume::Error),

    /// Slice stacks are directories
    #[error("\"{0}\" is not a directory")]
    NotADirectory(String),

    /// Nothing in the directory followed the slice naming convention
    #[error("no valid slices were found in \"{0}\"")]
    NoSlices(String),

    /// A member slice decodes to a different bit-depth than the stack
    #[error(
        "\"{path}\" is {found} data in a {expected} stack; mixed bit-depths in one directory are ambiguous"
    )]
    InconsistentBitdepth {
        /// Offending slice
        path: String,
        /// Bit-depth of the stack's first slice
        expected: Bitdepth,
        /// Bit-depth of the offending slice
        found: Bitdepth,
    },

    /// A member slice has different pixel dimensions than the stack
    #[error("\"{path}\" does not match the stack's {width}x{height} slice shape")]
    InconsistentDimensions {
        /// Offending slice
        path: String,
        /// Stack width
        width: usize,
        /// Stack height
        height: usize,
    },

    /// Every sampled slice holds a single value; the data is unusable
    #[error(
        "all slices sampled from \"{0}\" contain a single value; visually inspect the sample for invalid data"
    )]
    DegenerateSlices(String),

    /// Point clouds only make sense for voxel (binary) data
    #[error(
        "'{0}' data cannot be converted to a point-cloud format; only a voxel-like datatype can be converted to a point cloud"
    )]
    NotVoxelData(Metatype),

    /// Extension is not a recognised point-cloud format
    #[error("\"{0}\" is not a supported point cloud format")]
    UnsupportedPointCloudFormat(String),
}
