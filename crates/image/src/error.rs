//! Result and Error types for the image module

use rawtools_dat::Bitdepth;

/// Type alias for `Result<T, image::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `rawtools-image`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Error raised by the PNG codec
    #[error("png codec error")]
    PngError(#[from] image::ImageError),

    /// Error raised by the TIFF codec
    #[error("tiff codec error")]
    TiffError(#[from] tiff::TiffError),

    /// File extension is not a supported slice format
    #[error("\"{0}\" is not a supported slice image format")]
    UnsupportedExtension(String),

    /// Value type cannot be represented in the requested format
    #[error("{bitdepth} slices cannot be written as \"{extension}\"")]
    UnsupportedBitdepth {
        /// Requested container extension
        extension: String,
        /// Value type of the pixel data
        bitdepth: Bitdepth,
    },

    /// Decoded data did not have the promised shape or sample type
    #[error("malformed image data: {0}")]
    MalformedImage(String),
}
