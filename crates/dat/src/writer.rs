//! Write operations for `.dat` metadata files

// standard library
use std::fs;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use crate::dat::{Bitdepth, Dat};
use crate::error::{Error, Result};

// rawtools modules
use rawtools_utils::f;

// external crates
use log::{debug, error};

/// Write a `.dat` metadata file in the NSI dialect
///
/// The `ObjectFileName` field is derived from the target path's stem plus
/// `.raw`. The NSI five-line layout is always emitted, regardless of which
/// dialect any source metadata was read from.
///
/// Dimensions are validated before any I/O happens; a failed write never
/// leaves a partial file behind for invalid input. I/O errors raised
/// mid-write (e.g. disk full) are surfaced unchanged.
///
/// ```rust, no_run
/// # use rawtools_dat::{write_dat, Bitdepth};
/// write_dat(
///     "./scan_104.dat",
///     [1893, 1893, 2363],
///     [0.104, 0.104, 0.104],
///     Bitdepth::Uint16,
///     "DENSITY",
/// )
/// .unwrap();
/// ```
pub fn write_dat<P: AsRef<Path>>(
    path: P,
    dimensions: [usize; 3],
    thickness: [f64; 3],
    bitdepth: Bitdepth,
    model: &str,
) -> Result<()> {
    let path = path.as_ref();

    if dimensions.iter().any(|&dim| dim == 0) {
        return Err(Error::InvalidDimensions(dimensions));
    }

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let object_filename = f!("{stem}.raw");
    let format = bitdepth.format();

    debug!("ObjectFileName: '{object_filename}'");
    debug!(
        "Resolution: {} {} {}",
        dimensions[0], dimensions[1], dimensions[2]
    );
    debug!(
        "SliceThickness: {} {} {}",
        thickness[0], thickness[1], thickness[2]
    );
    debug!("Format: {format}");
    debug!("ObjectModel: {model}");

    let contents = f!(
        "ObjectFileName: {object_filename}\n\
         Resolution:     {} {} {}\n\
         SliceThickness: {} {} {}\n\
         Format:         {format}\n\
         ObjectModel:    {model}\n",
        dimensions[0],
        dimensions[1],
        dimensions[2],
        decimal(thickness[0]),
        decimal(thickness[1]),
        decimal(thickness[2]),
    );

    if let Err(err) = fs::write(path, contents) {
        error!("'{}' could not be created", path.display());
        return Err(err.into());
    }

    debug!("'{}' was successfully created", path.display());
    Ok(())
}

/// Write [Dat] metadata to a JSON file
///
/// A direct serialization of the parsed metadata, handy for inspection or
/// for feeding pipelines that would rather not learn either `.dat` dialect.
pub fn write_json<P: AsRef<Path>>(dat: &Dat, path: P) -> Result<()> {
    let writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(writer, dat)?;
    Ok(())
}

/// Render a thickness value so it always re-parses as a decimal
///
/// The NSI thickness pattern requires a decimal point, and Display drops it
/// for whole numbers.
fn decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        f!("{value:.1}")
    } else {
        f!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_thickness_keeps_decimal_point() {
        assert_eq!(decimal(1.0), "1.0");
        assert_eq!(decimal(0.104), "0.104");
        assert_eq!(decimal(12.5), "12.5");
    }
}
