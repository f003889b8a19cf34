//! Slice filename conventions
//!
//! Slice stacks follow a strict naming scheme: every member starts with its
//! directory's basename and ends in a numeric index before the extension.
//! Scan archives also encode voxel size in the dataset name as a trailing
//! `_<N>u` micrometer token, which is worth recovering when no `.dat` is
//! around to say otherwise.

// standard library
use std::path::Path;

/// Image extensions accepted as slices
const SLICE_EXTENSIONS: [&str; 3] = ["png", "tif", "tiff"];

/// Check a filename against the strict slice convention for a directory
///
/// The name must start with `prefix` (the directory basename), continue
/// with at least one more character, and end with digits before a short
/// extension — `scan_104_0001.png` inside `scan_104/`.
///
/// ```rust
/// # use rawtools_slices::paths::is_slice_name;
/// assert!(is_slice_name("scan_104_0001.png", "scan_104"));
/// assert!(!is_slice_name("scan_104.png", "scan_104"));
/// assert!(!is_slice_name("other_0001.png", "scan_104"));
/// ```
pub fn is_slice_name(name: &str, prefix: &str) -> bool {
    let Some(stem) = name.strip_suffix_extension(SLICE_EXTENSIONS) else {
        return false;
    };
    let Some(rest) = stem.strip_prefix(prefix) else {
        return false;
    };

    // at least one character followed by at least one trailing digit
    rest.chars().last().is_some_and(|c| c.is_ascii_digit()) && rest.chars().count() >= 2
}

/// Trailing numeric index of a slice filename, `-1` when absent
///
/// Sort key for ordering a stack: `scan_2.png` sorts before `scan_10.png`,
/// which lexicographic ordering gets wrong.
///
/// ```rust
/// # use rawtools_slices::paths::slice_index;
/// assert_eq!(slice_index("scan_104_0012.png"), 12);
/// assert_eq!(slice_index("scan.png"), -1);
/// ```
pub fn slice_index(name: &str) -> i64 {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name);

    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    // indices longer than an i64 do not occur in the wild
    if digits.is_empty() || digits.len() == stem.len() {
        -1
    } else {
        digits.parse().unwrap_or(-1)
    }
}

/// Voxel thickness encoded in a dataset name, in millimeters per axis
///
/// Dataset names conventionally end in a `_<N>u` token giving the voxel
/// pitch in micrometers. Absent that token, thickness defaults to a
/// unitless 1.0 per axis.
///
/// ```rust
/// # use rawtools_slices::paths::infer_slice_thickness;
/// assert_eq!(infer_slice_thickness("2020_UIUC_Example_100-4_102u.raw"), [0.102; 3]);
/// assert_eq!(infer_slice_thickness("2023_Planthaven_Example_102-1.raw"), [1.0; 3]);
/// ```
pub fn infer_slice_thickness(name: &str) -> [f64; 3] {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name);

    let Some(token) = stem.rsplit('_').next() else {
        return [1.0; 3];
    };
    let Some(micrometers) = token.strip_suffix('u') else {
        return [1.0; 3];
    };
    if micrometers.is_empty() || !micrometers.chars().all(|c| c.is_ascii_digit()) {
        return [1.0; 3];
    }

    match micrometers.parse::<f64>() {
        Ok(value) => [value / 1000.0; 3],
        Err(_) => [1.0; 3],
    }
}

/// Small helper: strip a known extension, case-insensitively
trait StripExtension {
    fn strip_suffix_extension(&self, extensions: [&str; 3]) -> Option<&str>;
}

impl StripExtension for str {
    fn strip_suffix_extension(&self, extensions: [&str; 3]) -> Option<&str> {
        let (stem, ext) = self.rsplit_once('.')?;
        extensions
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
            .then_some(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("scan_104_0001.png", "scan_104", true)] // case 1
    #[case("scan_104_0001.tif", "scan_104", true)] // case 2
    #[case("scan_104_0001.TIFF", "scan_104", true)] // case 3
    #[case("scan_104.png", "scan_104", false)] // case 4: no index
    #[case("other_0001.png", "scan_104", false)] // case 5: wrong prefix
    #[case("scan_104_0001.txt", "scan_104", false)] // case 6: not an image
    #[case("scan_104_final.png", "scan_104", false)] // case 7: no digits
    fn slice_name_convention(#[case] name: &str, #[case] prefix: &str, #[case] expected: bool) {
        assert_eq!(is_slice_name(name, prefix), expected);
    }

    #[rstest]
    #[case("scan_2.png", 2)] // case 1
    #[case("scan_10.png", 10)] // case 2
    #[case("scan_0012.png", 12)] // case 3
    #[case("scan.png", -1)] // case 4
    #[case("12345.png", -1)] // case 5: all digits is no index
    fn numeric_suffix_ordering(#[case] name: &str, #[case] expected: i64) {
        assert_eq!(slice_index(name), expected);
    }

    #[rstest]
    #[case("2023_Planthaven-D2_Example_102-1.raw", [1.0, 1.0, 1.0])] // case 1
    #[case("2020_UIUC_ValidExample_100-4_102u.raw", [0.102, 0.102, 0.102])] // case 2
    #[case("2027_FutureFarm_Example_999-6_7bh_45u", [0.045, 0.045, 0.045])] // case 3
    fn thickness_from_name(#[case] name: &str, #[case] expected: [f64; 3]) {
        assert_eq!(infer_slice_thickness(name), expected);
    }
}
