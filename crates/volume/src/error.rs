//! Result and Error types for the volume module

/// Type alias for `Result<T, volume::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `rawtools-volume`
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

    /// Volume data did not fill the declared dimensions
    #[error("array shape error")]
    ShapeError(#[from] ndarray::ShapeError),

    /// No same-stem `.dat` and no close-enough name among the siblings
    #[error("no .dat companion found for \"{0}\"")]
    MissingDat(String),

    /// Scaling with a zero-width source range divides by zero
    #[error("scaling range is degenerate (min == max == {0}); bounds must span the data")]
    DegenerateRange(f64),

    /// Requested slice index does not exist in the volume
    #[error("slice index {index} is out of bounds; slices are indexed 0 to {limit} inclusive")]
    SliceIndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Largest valid index
        limit: usize,
    },

    /// Resampling to a zero-sized grid
    #[error("resample shape must be positive in every axis, found {0:?}")]
    InvalidResampleShape([usize; 3]),
}
