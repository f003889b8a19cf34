//! Result and Error types for the dat module

/// Type alias for `Result<T, dat::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `rawtools-dat`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// One or more required metadata fields could not be extracted
    #[error("unable to parse \"{0}\"")]
    UnparsableDat(String),

    /// Token is not one of uint8/uint16/float32 or an accepted alias
    #[error("\"{0}\" is not a known bitdepth")]
    UnknownBitdepth(String),

    /// Token is not one of UCHAR/USHORT/FLOAT
    #[error("\"{0}\" is not a known format")]
    UnknownFormat(String),

    /// File is larger than any valid interpretation of the dimensions
    #[error(
        "unable to determine bit-depth of volume \"{path}\" (expected at most {expected} bytes, found {found}); double check the file's format against its .dat"
    )]
    UndeterminableBitdepth {
        /// Path of the offending volume
        path: String,
        /// Largest valid size for the declared dimensions (float32)
        expected: u64,
        /// Actual size on disk
        found: u64,
    },

    /// Zero-voxel volumes cannot exist on disk
    #[error("dimensions must all be positive, found {0:?}")]
    InvalidDimensions([usize; 3]),
}
