//! Library of parser functions for `.dat` metadata lines
//!
//! Every parser operates on a single pre-trimmed line. Field patterns are
//! case-insensitive and dialect-specific; the reader decides which set to
//! apply based on whether an XML declaration has been seen.

// nom parser combinators
use nom::bytes::complete::{tag, tag_no_case, take_till1, take_while1};
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::{eof, map_res, recognize};
use nom::error::{Error, ErrorKind};
use nom::number::complete::double;
use nom::sequence::{delimited, tuple};
use nom::{Err, IResult};

// ! Boolean checks

/// Check for the `<?xml version="1.0"?>` declaration marking Dragonfly files
pub fn is_xml_declaration(i: &str) -> bool {
    xml_declaration(i).is_ok()
}

/// Recognise the XML declaration line
fn xml_declaration(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
        space0,
        tag_no_case("<?xml"),
        space1,
        tag_no_case("version=\"1.0\"?>"),
    )))(i)
}

// ! Parser combinators

/// Sequence of alphanumeric/underscore characters (regex `\w+`)
fn word(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(i)
}

/// Unsigned integer
fn integer(i: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(i)
}

/// Decimal number that must carry a decimal point (regex `\d+\.\d+`)
///
/// Bare integers are deliberately rejected so that thickness lines are never
/// confused with resolution lines.
fn strict_decimal(i: &str) -> IResult<&str, f64> {
    map_res(recognize(tuple((digit1, char('.'), digit1))), str::parse)(i)
}

/// XML-style `NAME="<integer>"` attribute
fn attribute_usize<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, usize> {
    map_res(
        delimited(
            tuple((tag_no_case(name), char('='), char('"'))),
            digit1,
            char('"'),
        ),
        str::parse,
    )
}

/// XML-style `NAME="<float>"` attribute
fn attribute_f64<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, f64> {
    delimited(
        tuple((tag_no_case(name), char('='), char('"'))),
        double,
        char('"'),
    )
}

/// Fail the surrounding parser unless the name ends in `.raw`
fn require_raw_extension<'a>(i: &'a str, name: &'a str) -> Result<&'a str, Err<Error<&'a str>>> {
    let name = name.trim_end();
    if name.to_ascii_lowercase().ends_with(".raw") {
        Ok(name)
    } else {
        Err(Err::Error(Error::new(i, ErrorKind::Verify)))
    }
}

// ! NSI dialect

/// `ObjectFileName: <name>.raw`
pub fn nsi_object_filename(i: &str) -> IResult<&str, &str> {
    let (rest, _) = tuple((tag_no_case("ObjectFileName:"), space1))(i)?;
    let name = require_raw_extension(i, rest)?;
    Ok(("", name))
}

/// `Resolution: <x> <y> <z>` with three whitespace-separated integers
pub fn nsi_resolution(i: &str) -> IResult<&str, [usize; 3]> {
    let (i, _) = tuple((tag_no_case("Resolution:"), space1))(i)?;
    let (i, x) = integer(i)?;
    let (i, _) = space1(i)?;
    let (i, y) = integer(i)?;
    let (i, _) = space1(i)?;
    let (i, z) = integer(i)?;
    Ok((i, [x, y, z]))
}

/// `<Resolution X=".." Y=".." Z=".."` XML-attribute tag
///
/// Serves both the Dragonfly resolution line and the legacy NSI sub-dialect
/// that wrote the same tag; the two patterns are identical.
pub fn xml_resolution(i: &str) -> IResult<&str, [usize; 3]> {
    let (i, _) = tuple((space0, tag_no_case("<Resolution"), space1))(i)?;
    let (i, x) = attribute_usize("X")(i)?;
    let (i, _) = space1(i)?;
    let (i, y) = attribute_usize("Y")(i)?;
    let (i, _) = space1(i)?;
    let (i, z) = attribute_usize("Z")(i)?;
    Ok((i, [x, y, z]))
}

/// `<tag>: <x> <y> <z>` with three decimal-point values
///
/// The tag is any word, not just `SliceThickness`. NSI exports have never
/// been consistent about it, so any colon-tagged triple of decimals counts.
pub fn nsi_slice_thickness(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, _) = tuple((word, char(':'), space1))(i)?;
    let (i, x) = strict_decimal(i)?;
    let (i, _) = space1(i)?;
    let (i, y) = strict_decimal(i)?;
    let (i, _) = space1(i)?;
    let (i, z) = strict_decimal(i)?;
    Ok((i, [x, y, z]))
}

/// `Format: <token>`, anchored to the end of the line
pub fn nsi_format(i: &str) -> IResult<&str, &str> {
    let (i, _) = tuple((tag_no_case("Format:"), space1))(i)?;
    let (i, token) = word(i)?;
    let (i, _) = eof(i)?;
    Ok((i, token))
}

/// `ObjectModel: <token>`, anchored to the end of the line
pub fn nsi_object_model(i: &str) -> IResult<&str, &str> {
    let (i, _) = tuple((tag_no_case("ObjectModel:"), space1))(i)?;
    let (i, token) = word(i)?;
    let (i, _) = eof(i)?;
    Ok((i, token))
}

// ! Dragonfly dialect

/// `<ObjectFileName>name.raw</ObjectFileName>`
pub fn dragonfly_object_filename(i: &str) -> IResult<&str, &str> {
    let (rest, _) = tuple((space0, tag_no_case("<ObjectFileName>"), space0))(i)?;
    let (rest, name) = take_till1(|c| c == '<')(rest)?;
    let (rest, _) = tag_no_case("</ObjectFileName>")(rest)?;
    let name = require_raw_extension(i, name)?;
    Ok((rest, name))
}

/// `<Spacing X=".." Y=".." Z=".." />` with values in meters
///
/// Unit conversion to millimeters is the reader's responsibility; this
/// parser returns the values exactly as written.
pub fn dragonfly_spacing(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, _) = tuple((space0, tag_no_case("<Spacing"), space1))(i)?;
    let (i, x) = attribute_f64("X")(i)?;
    let (i, _) = space1(i)?;
    let (i, y) = attribute_f64("Y")(i)?;
    let (i, _) = space1(i)?;
    let (i, z) = attribute_f64("Z")(i)?;
    let (i, _) = tuple((space1, tag("/>")))(i)?;
    Ok((i, [x, y, z]))
}

/// `<Format>token</Format>`
pub fn dragonfly_format(i: &str) -> IResult<&str, &str> {
    delimited(
        tuple((space0, tag_no_case("<Format>"))),
        word,
        tag_no_case("</Format>"),
    )(i)
}

/// `<Unit>token</Unit>`, the Dragonfly name for the object model
pub fn dragonfly_unit(i: &str) -> IResult<&str, &str> {
    delimited(
        tuple((space0, tag_no_case("<Unit>"))),
        word,
        tag_no_case("</Unit>"),
    )(i)
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_xml_declaration() {
        assert!(is_xml_declaration("<?xml version=\"1.0\"?>"));
        assert!(is_xml_declaration("<?XML version=\"1.0\"?>"));
        assert!(!is_xml_declaration("ObjectFileName: a.raw"));
        assert!(!is_xml_declaration("<Resolution X=\"1\" Y=\"2\" Z=\"3\"/>"));
    }

    #[test]
    fn test_nsi_object_filename() {
        assert_eq!(
            nsi_object_filename("ObjectFileName: scan_104.raw"),
            Ok(("", "scan_104.raw"))
        );
        assert_eq!(
            nsi_object_filename("objectfilename: SCAN.RAW"),
            Ok(("", "SCAN.RAW"))
        );
        // extension is not negotiable
        assert!(nsi_object_filename("ObjectFileName: scan_104.dat").is_err());
        assert!(nsi_object_filename("ObjectFileName:scan.raw").is_err());
    }

    #[test]
    fn test_nsi_resolution() {
        assert_eq!(
            nsi_resolution("Resolution:     1893 1893 2363"),
            Ok(("", [1893, 1893, 2363]))
        );
        assert!(nsi_resolution("Resolution: 1893 1893").is_err());
        assert!(nsi_resolution("SliceThickness: 0.1 0.1 0.1").is_err());
    }

    #[test]
    fn test_xml_resolution() {
        assert_eq!(
            xml_resolution("<Resolution X=\"10\" Y=\"11\" Z=\"12\"/>"),
            Ok(("/>", [10, 11, 12]))
        );
        assert_eq!(
            xml_resolution("  <Resolution X=\"10\" Y=\"11\" Z=\"12\" />"),
            Ok((" />", [10, 11, 12]))
        );
        assert!(xml_resolution("<Resolution X=\"10\" Y=\"11\"/>").is_err());
    }

    #[test]
    fn test_nsi_slice_thickness() {
        assert_eq!(
            nsi_slice_thickness("SliceThickness: 0.104 0.104 0.104"),
            Ok(("", [0.104, 0.104, 0.104]))
        );
        // any word tag is accepted
        assert_eq!(
            nsi_slice_thickness("Spacing: 1.0 1.0 1.0"),
            Ok(("", [1.0, 1.0, 1.0]))
        );
        // integers are never thickness
        assert!(nsi_slice_thickness("Resolution: 10 11 12").is_err());
    }

    #[test]
    fn test_nsi_format() {
        assert_eq!(nsi_format("Format:         USHORT"), Ok(("", "USHORT")));
        // anchored to end of line
        assert!(nsi_format("Format: USHORT extra").is_err());
    }

    #[test]
    fn test_nsi_object_model() {
        assert_eq!(nsi_object_model("ObjectModel:    DENSITY"), Ok(("", "DENSITY")));
        assert!(nsi_object_model("ObjectModel:").is_err());
    }

    #[test]
    fn test_dragonfly_object_filename() {
        assert_eq!(
            dragonfly_object_filename("<ObjectFileName>scan.raw</ObjectFileName>"),
            Ok(("", "scan.raw"))
        );
        assert!(dragonfly_object_filename("<ObjectFileName>scan.tif</ObjectFileName>").is_err());
    }

    #[test]
    fn test_dragonfly_spacing() {
        assert_eq!(
            dragonfly_spacing("<Spacing X=\"0.000104\" Y=\"0.000104\" Z=\"0.000104\" />"),
            Ok(("", [0.000104, 0.000104, 0.000104]))
        );
        assert_eq!(
            dragonfly_spacing("<Spacing X=\"1.0e-5\" Y=\"1.0e-5\" Z=\"1.0e-5\" />"),
            Ok(("", [1.0e-5, 1.0e-5, 1.0e-5]))
        );
    }

    #[test]
    fn test_dragonfly_format_and_unit() {
        assert_eq!(
            dragonfly_format("<Format>FLOAT</Format>"),
            Ok(("", "FLOAT"))
        );
        assert_eq!(dragonfly_unit("<Unit>Density</Unit>"), Ok(("", "Density")));
    }
}
