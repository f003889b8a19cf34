//! Bit-depth inference from file size

// standard library
use std::path::Path;

// crate modules
use crate::dat::Bitdepth;
use crate::error::{Error, Result};

// external crates
use log::{debug, warn};

/// Determine the storage format of a `.raw` volume from its size on disk
///
/// With `minimum = x * y * z` voxels, an exact size of `minimum`,
/// `minimum * 2`, or `minimum * 4` bytes identifies uint8, uint16, or
/// float32 respectively.
///
/// Truncated files are bucketed by the boundary they fall short of, with a
/// logged corruption warning: anything below the uint8 boundary defaults to
/// uint8, between the uint8 and uint16 boundaries to uint16, and between
/// the uint16 and float32 boundaries to float32.
///
/// A file *larger* than any valid interpretation means the dimensions are
/// wrong or the file does not belong to this metadata; that is
/// [Error::UndeterminableBitdepth] rather than a guess.
///
/// This inference — not the `.dat`'s declared `Format` field — is what
/// governs how the volume's bytes are actually decoded.
///
/// ```rust, no_run
/// # use rawtools_dat::{determine_bit_depth, Bitdepth};
/// let bitdepth = determine_bit_depth("./scan_104.raw", [1893, 1893, 2363]).unwrap();
/// assert_eq!(bitdepth, Bitdepth::Uint16);
/// ```
pub fn determine_bit_depth<P: AsRef<Path>>(path: P, dims: [usize; 3]) -> Result<Bitdepth> {
    let path = path.as_ref();
    let filesize = std::fs::metadata(path)?.len();
    let minimum_size = dims.iter().product::<usize>() as u64;
    debug!(
        "minimum calculated size of '{}' is {} bytes",
        path.display(),
        minimum_size
    );

    let expected_uint8 = minimum_size;
    let expected_uint16 = minimum_size * 2;
    let expected_float32 = minimum_size * 4;

    if filesize < expected_uint8 {
        warn!(
            "possible data corruption: '{}' is smaller than expected (expected {} bytes, found {}); defaulting to unsigned 8-bit",
            path.display(),
            expected_uint8,
            filesize
        );
        Ok(Bitdepth::Uint8)
    } else if filesize == expected_uint8 {
        Ok(Bitdepth::Uint8)
    } else if filesize == expected_uint16 {
        Ok(Bitdepth::Uint16)
    } else if filesize == expected_float32 {
        Ok(Bitdepth::Float32)
    } else if filesize < expected_uint16 {
        warn!(
            "possible data corruption: '{}' is smaller than expected (expected {} bytes, found {}); defaulting to unsigned 16-bit",
            path.display(),
            expected_uint16,
            filesize
        );
        Ok(Bitdepth::Uint16)
    } else if filesize < expected_float32 {
        warn!(
            "possible data corruption: '{}' is smaller than expected (expected {} bytes, found {}); defaulting to 32-bit float",
            path.display(),
            expected_float32,
            filesize
        );
        Ok(Bitdepth::Float32)
    } else {
        Err(Error::UndeterminableBitdepth {
            path: path.display().to_string(),
            expected: expected_float32,
            found: filesize,
        })
    }
}
