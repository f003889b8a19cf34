//! String similarity matching for near-miss file names

/// Matches below this ratio are not considered close
///
/// Same threshold as python's `difflib.get_close_matches`, which historically
/// decided which `.dat` sidecars were acceptable stand-ins.
const CUTOFF: f64 = 0.6;

/// Similarity of two strings as a ratio in `0.0..=1.0`
///
/// Computed as `2*M / T`, where `M` is the total length of all matching
/// blocks found by recursive longest-common-substring matching and `T` is
/// the combined length of both inputs. Identical strings give `1.0`,
/// strings with nothing in common give `0.0`.
///
/// ```rust
/// # use rawtools_utils::similarity_ratio;
/// assert_eq!(similarity_ratio("abcd", "abcd"), 1.0);
/// assert_eq!(similarity_ratio("abcd", "wxyz"), 0.0);
/// assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
/// ```
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_length(&a, &b) as f64 / total as f64
}

/// Best match for `target` among `candidates`, if any are close enough
///
/// Candidates are ranked by [similarity_ratio] against the target and the
/// highest scoring one at or above the 0.6 cutoff is returned. Ties keep
/// the earlier candidate, so pre-sorted inputs behave predictably.
///
/// ```rust
/// # use rawtools_utils::closest_match;
/// let candidates = ["scan_104.dat", "notes.txt"];
/// assert_eq!(closest_match("scan_104b.dat", &candidates), Some("scan_104.dat"));
/// assert_eq!(closest_match("qqqq", &candidates), None);
/// ```
pub fn closest_match<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let ratio = similarity_ratio(target, candidate);
        if ratio >= CUTOFF && best.map_or(true, |(_, r)| ratio > r) {
            best = Some((candidate, ratio));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Total length of all common blocks between two character slices
///
/// Finds the longest common substring, then recurses into the unmatched
/// regions either side of it.
fn matching_length(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_length(&a[..i], &b[..j])
        + matching_length(&a[i + size..], &b[j + size..])
}

/// Position and length of the longest common substring of `a` and `b`
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);

    // lengths of common suffixes ending at the previous row of b
    let mut previous = vec![0_usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut current = vec![0_usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let size = previous[j] + 1;
                current[j + 1] = size;
                if size > best.2 {
                    best = (i + 1 - size, j + 1 - size, size);
                }
            }
        }
        previous = current;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_symmetric_enough_for_filenames() {
        let a = "398-1_CML247_104um.dat";
        let b = "398-1_CML247_104um_uint8.dat";
        assert!(similarity_ratio(a, b) > 0.8);
    }

    #[test]
    fn empty_strings_are_identical() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("a", ""), 0.0);
    }

    #[test]
    fn best_of_several_candidates_wins() {
        let candidates = ["scan_104.dat", "scan_204.dat", "scan_104-old.dat"];
        assert_eq!(
            closest_match("scan_104.dat.bak", &candidates),
            Some("scan_104.dat")
        );
    }

    #[test]
    fn no_candidates_above_cutoff() {
        assert_eq!(closest_match("abcdef", &["uvwxyz"]), None);
        assert_eq!(closest_match("abcdef", &[]), None);
    }
}
