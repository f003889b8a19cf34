//! Read operations for `.dat` metadata files

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// crate modules
use crate::dat::{Dat, Dialect, StorageFormat};
use crate::error::{Error, Result};
use crate::parsers;

// external crates
use log::debug;

/// Parse a `.dat` metadata file
///
/// The file is scanned line by line. Fields may appear in any order and the
/// last occurrence of a duplicated field wins. A line matching the
/// `<?xml version="1.0"?>` declaration switches field extraction to the
/// Dragonfly dialect for the remainder of the file; otherwise the NSI
/// dialect is assumed throughout.
///
/// Dragonfly spacing values are stored in meters and are normalised to the
/// NSI millimeter convention on the way in.
///
/// Fails with [Error::UnparsableDat] if any of the six required fields is
/// still missing once every line has been seen — partial metadata is a
/// parse error, not a partial result.
///
/// ```rust, no_run
/// # use rawtools_dat::read_dat;
/// let dat = read_dat("./scan_104.dat").unwrap();
///
/// // Print a summary of the metadata
/// println!("{dat}");
/// ```
pub fn read_dat<P: AsRef<Path>>(path: P) -> Result<Dat> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut dialect = Dialect::Nsi;
    let mut object_filename: Option<String> = None;
    let mut dimensions: Option<[usize; 3]> = None;
    let mut thickness: Option<[f64; 3]> = None;
    let mut format: Option<StorageFormat> = None;
    let mut model: Option<String> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if parsers::is_xml_declaration(line) {
            debug!("dragonfly dialect detected in '{}'", path.display());
            dialect = Dialect::Dragonfly;
        }

        match dialect {
            Dialect::Nsi => {
                if let Ok((_, name)) = parsers::nsi_object_filename(line) {
                    object_filename = Some(name.to_string());
                }
                if let Ok((_, dims)) = parsers::nsi_resolution(line) {
                    dimensions = Some(dims);
                } else if let Ok((_, dims)) = parsers::xml_resolution(line) {
                    // legacy NSI files wrote the XML-attribute tag instead
                    dimensions = Some(dims);
                }
                if let Ok((_, values)) = parsers::nsi_slice_thickness(line) {
                    thickness = Some(values);
                }
                if let Ok((_, token)) = parsers::nsi_format(line) {
                    format = Some(token.parse()?);
                }
                if let Ok((_, token)) = parsers::nsi_object_model(line) {
                    model = Some(token.to_string());
                }
            }
            Dialect::Dragonfly => {
                if let Ok((_, name)) = parsers::dragonfly_object_filename(line) {
                    object_filename = Some(name.to_string());
                }
                if let Ok((_, dims)) = parsers::xml_resolution(line) {
                    dimensions = Some(dims);
                }
                if let Ok((_, meters)) = parsers::dragonfly_spacing(line) {
                    // Dragonfly stores spacing in meters, internal unit is mm
                    thickness = Some(meters.map(|th| th * 1000.0));
                }
                if let Ok((_, token)) = parsers::dragonfly_format(line) {
                    format = Some(token.parse()?);
                }
                if let Ok((_, token)) = parsers::dragonfly_unit(line) {
                    model = Some(token.to_string());
                }
            }
        }
    }

    // every field must have been assigned a value by now
    let (Some(object_filename), Some(dimensions), Some(thickness), Some(format), Some(model)) =
        (object_filename, dimensions, thickness, format, model)
    else {
        return Err(Error::UnparsableDat(path.display().to_string()));
    };

    if dimensions.iter().any(|&dim| dim == 0) {
        return Err(Error::InvalidDimensions(dimensions));
    }

    Ok(Dat {
        object_filename,
        dimensions,
        thickness,
        format,
        model,
        dialect,
    })
}
