//! Integration tests for the .dat codec and bit-depth inference

use rawtools_dat::{
    determine_bit_depth, read_dat, write_dat, Bitdepth, Dialect, Error, StorageFormat,
};
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A file of exactly `size` bytes, for oracle tests
fn sized_fixture(dir: &TempDir, name: &str, size: usize) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, vec![0u8; size]).unwrap();
    path
}

#[rstest]
#[case([10, 11, 12], [0.1, 0.2, 0.3], Bitdepth::Uint8)] // case 1
#[case([1893, 1893, 2363], [0.104, 0.104, 0.104], Bitdepth::Uint16)] // case 2
#[case([1, 1, 1], [1.0, 1.0, 1.0], Bitdepth::Float32)] // case 3
fn roundtrip_recovers_metadata(
    #[case] dimensions: [usize; 3],
    #[case] thickness: [f64; 3],
    #[case] bitdepth: Bitdepth,
) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.dat");

    write_dat(&path, dimensions, thickness, bitdepth, "DENSITY").unwrap();
    let dat = read_dat(&path).unwrap();

    assert_eq!(dat.dimensions, dimensions);
    assert_eq!(dat.thickness, thickness);
    assert_eq!(dat.format, bitdepth.format());
    assert_eq!(dat.model, "DENSITY");
    assert_eq!(dat.object_filename, "sample.raw");
    assert_eq!(dat.dialect, Dialect::Nsi);
}

#[test]
fn written_layout_matches_nsi_convention() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan_104.dat");

    write_dat(&path, [10, 11, 12], [1.0, 1.0, 1.0], Bitdepth::Uint16, "DENSITY").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let expected = "ObjectFileName: scan_104.raw\n\
                    Resolution:     10 11 12\n\
                    SliceThickness: 1.0 1.0 1.0\n\
                    Format:         USHORT\n\
                    ObjectModel:    DENSITY\n";
    assert_eq!(contents, expected);
}

#[test]
fn zero_dimension_is_rejected_before_any_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.dat");

    let result = write_dat(&path, [10, 0, 12], [1.0, 1.0, 1.0], Bitdepth::Uint8, "DENSITY");

    assert!(matches!(result, Err(Error::InvalidDimensions(_))));
    assert!(!path.exists());
}

#[test]
fn dialects_parse_to_identical_metadata() {
    let dir = TempDir::new().unwrap();

    let nsi = write_fixture(
        &dir,
        "nsi.dat",
        "ObjectFileName: scan.raw\n\
         Resolution:     10 11 12\n\
         SliceThickness: 0.104 0.104 0.104\n\
         Format:         USHORT\n\
         ObjectModel:    DENSITY\n",
    );

    // spacing in meters, 1000x smaller than the NSI values
    let dragonfly = write_fixture(
        &dir,
        "dragonfly.dat",
        "<?xml version=\"1.0\"?>\n\
         <!DOCTYPE V3RawMetaData>\n\
         <ObjectFileName>scan.raw</ObjectFileName>\n\
         <Resolution X=\"10\" Y=\"11\" Z=\"12\"/>\n\
         <Spacing X=\"0.000104\" Y=\"0.000104\" Z=\"0.000104\" />\n\
         <Format>USHORT</Format>\n\
         <Unit>DENSITY</Unit>\n",
    );

    let a = read_dat(&nsi).unwrap();
    let b = read_dat(&dragonfly).unwrap();

    assert_eq!(a.dialect, Dialect::Nsi);
    assert_eq!(b.dialect, Dialect::Dragonfly);

    // identical apart from the dialect tag itself
    assert_eq!(a.object_filename, b.object_filename);
    assert_eq!(a.dimensions, b.dimensions);
    assert_eq!(a.format, b.format);
    assert_eq!(a.model, b.model);
    for (left, right) in a.thickness.iter().zip(b.thickness.iter()) {
        assert!((left - right).abs() < 1e-9);
    }
}

#[test]
fn fields_parse_in_any_order_and_last_wins() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "scrambled.dat",
        "ObjectModel:    DENSITY\n\
         Format:         UCHAR\n\
         SliceThickness: 0.5 0.5 0.5\n\
         Resolution:     1 2 3\n\
         Resolution:     10 11 12\n\
         ObjectFileName: scrambled.raw\n",
    );

    let dat = read_dat(&path).unwrap();
    assert_eq!(dat.dimensions, [10, 11, 12]);
    assert_eq!(dat.format, StorageFormat::Uchar);
}

#[test]
fn legacy_xml_resolution_tag_is_accepted_in_nsi_files() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "legacy.dat",
        "ObjectFileName: legacy.raw\n\
         <Resolution X=\"20\" Y=\"21\" Z=\"22\">\n\
         SliceThickness: 0.104 0.104 0.104\n\
         Format:         FLOAT\n\
         ObjectModel:    DENSITY\n",
    );

    let dat = read_dat(&path).unwrap();
    assert_eq!(dat.dialect, Dialect::Nsi);
    assert_eq!(dat.dimensions, [20, 21, 22]);
    assert_eq!(dat.format, StorageFormat::Float);
}

#[test]
fn missing_field_is_a_hard_parse_error() {
    let dir = TempDir::new().unwrap();
    // no SliceThickness line
    let path = write_fixture(
        &dir,
        "partial.dat",
        "ObjectFileName: partial.raw\n\
         Resolution:     10 11 12\n\
         Format:         USHORT\n\
         ObjectModel:    DENSITY\n",
    );

    assert!(matches!(read_dat(&path), Err(Error::UnparsableDat(_))));
}

#[test]
fn unknown_format_token_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "garbage.dat",
        "ObjectFileName: garbage.raw\n\
         Resolution:     10 11 12\n\
         SliceThickness: 0.1 0.1 0.1\n\
         Format:         DOUBLE\n\
         ObjectModel:    DENSITY\n",
    );

    assert!(matches!(read_dat(&path), Err(Error::UnknownFormat(_))));
}

#[rstest]
#[case("uint8", Bitdepth::Uint8)] // case 1
#[case("uint16", Bitdepth::Uint16)] // case 2
#[case("float32", Bitdepth::Float32)] // case 3
#[case("float", Bitdepth::Float32)] // case 4
#[case("8", Bitdepth::Uint8)] // case 5
#[case("16", Bitdepth::Uint16)] // case 6
#[case("32", Bitdepth::Float32)] // case 7
fn bitdepth_tokens_parse(#[case] token: &str, #[case] expected: Bitdepth) {
    assert_eq!(token.parse::<Bitdepth>().unwrap(), expected);
}

#[test]
fn unknown_tokens_never_fall_back_silently() {
    assert!(matches!(
        "int64".parse::<Bitdepth>(),
        Err(Error::UnknownBitdepth(_))
    ));
    assert!(matches!(
        "DOUBLE".parse::<StorageFormat>(),
        Err(Error::UnknownFormat(_))
    ));
}

#[rstest]
#[case(1, 0, Bitdepth::Uint8)] // case 1: exact uint8
#[case(2, 0, Bitdepth::Uint16)] // case 2: exact uint16
#[case(4, 0, Bitdepth::Float32)] // case 3: exact float32
#[case(1, -1, Bitdepth::Uint8)] // case 4: truncated uint8
#[case(1, 1, Bitdepth::Uint16)] // case 5: between uint8 and uint16
#[case(2, -1, Bitdepth::Uint16)] // case 6: truncated uint16
#[case(2, 1, Bitdepth::Float32)] // case 7: between uint16 and float32
#[case(4, -1, Bitdepth::Float32)] // case 8: truncated float32
fn oracle_buckets_by_file_size(
    #[case] multiplier: i64,
    #[case] offset: i64,
    #[case] expected: Bitdepth,
) {
    let dims = [10, 11, 12];
    let voxels: i64 = dims.iter().product::<usize>() as i64;
    let size = (voxels * multiplier + offset) as usize;

    let dir = TempDir::new().unwrap();
    let path = sized_fixture(&dir, "volume.raw", size);

    assert_eq!(determine_bit_depth(&path, dims).unwrap(), expected);
}

#[test]
fn oracle_refuses_oversized_files() {
    let dims = [10, 11, 12];
    let voxels: usize = dims.iter().product();

    let dir = TempDir::new().unwrap();
    let path = sized_fixture(&dir, "volume.raw", voxels * 4 + 1);

    assert!(matches!(
        determine_bit_depth(&path, dims),
        Err(Error::UndeterminableBitdepth { .. })
    ));
}

#[test]
fn oracle_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nothing.raw");

    assert!(matches!(
        determine_bit_depth(&path, [10, 11, 12]),
        Err(Error::IOError(_))
    ));
}

#[test]
fn json_export_roundtrips_through_serde() {
    let dir = TempDir::new().unwrap();
    let dat_path = dir.path().join("sample.dat");
    write_dat(&dat_path, [10, 11, 12], [0.104, 0.104, 0.104], Bitdepth::Uint8, "DENSITY")
        .unwrap();

    let dat = read_dat(&dat_path).unwrap();
    let json_path = dir.path().join("sample.json");
    rawtools_dat::write_json(&dat, &json_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["dimensions"][2], 12);
    assert_eq!(value["format"], "Uchar");
}
