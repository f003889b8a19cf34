//! Linear range remapping between voxel value types
//!
//! Every conversion in the toolkit funnels through these functions: slices
//! are decoded to f64, remapped from the source range onto the destination
//! range, and packed back into the destination value type.
//!
//! Integer packing floors and then truncates through an i64 intermediate.
//! Values outside the destination type therefore wrap rather than saturate
//! (300.7 packed as u8 is 44). This reproduces the historical pipeline
//! exactly and is asserted by the test suite; callers who do not want
//! wraparound must supply bounds that actually cover their data.

// crate modules
use crate::error::{Error, Result};

// external crates
use rawtools_dat::Bitdepth;
use rawtools_image::PixelBuffer;

/// Map `x` from the range `[in_min, in_max]` onto `[out_min, out_max]`
///
/// No clamping is performed: an input outside its stated range legitimately
/// lands outside the output range. The caller is responsible for supplying
/// the true data bounds, and for never passing `in_min == in_max` (division
/// by zero; the slice-level entry points check this and fail instead).
///
/// ```rust
/// # use rawtools_volume::scale::scale;
/// assert_eq!(scale(0.0, 0.0, 65535.0, 0.0, 255.0), 0.0);
/// assert_eq!(scale(65535.0, 0.0, 65535.0, 0.0, 255.0), 255.0);
/// assert_eq!(scale(32767.0, 0.0, 65535.0, 0.0, 255.0).floor(), 127.0);
/// ```
pub fn scale(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) / (in_max - in_min) * (out_max - out_min) + out_min
}

/// Remap a whole slice of values in place
///
/// Identical source and destination ranges short-circuit to a no-op so that
/// same-type copies stay bit-exact. A zero-width source range is a
/// [Error::DegenerateRange] failure, checked once before any arithmetic.
pub fn scale_slice(values: &mut [f64], from: (f64, f64), to: (f64, f64)) -> Result<()> {
    let (in_min, in_max) = from;
    let (out_min, out_max) = to;

    if in_min == in_max {
        return Err(Error::DegenerateRange(in_min));
    }
    if from == to {
        return Ok(());
    }

    for value in values.iter_mut() {
        *value = scale(*value, in_min, in_max, out_min, out_max);
    }
    Ok(())
}

/// Pack f64 values into a pixel buffer of the requested type
///
/// Integer targets floor first, then truncate via i64, wrapping on
/// overflow as documented at the module level. Float targets narrow to f32
/// without flooring.
pub fn to_pixels(values: &[f64], bitdepth: Bitdepth) -> PixelBuffer {
    match bitdepth {
        Bitdepth::Uint8 => {
            PixelBuffer::U8(values.iter().map(|&v| (v.floor() as i64) as u8).collect())
        }
        Bitdepth::Uint16 => {
            PixelBuffer::U16(values.iter().map(|&v| (v.floor() as i64) as u16).collect())
        }
        Bitdepth::Float32 => PixelBuffer::F32(values.iter().map(|&v| v as f32).collect()),
    }
}

/// Pack f64 values straight into the `.raw` on-disk byte layout
pub fn pack(values: &[f64], bitdepth: Bitdepth) -> Vec<u8> {
    to_pixels(values, bitdepth).to_le_bytes()
}

/// Full representable range of the destination type
///
/// Type-implied bounds for the integer types, the IEEE f32 extremes for
/// floats (which have no narrower meaningful choice).
pub fn destination_bounds(bitdepth: Bitdepth) -> (f64, f64) {
    bitdepth
        .integer_bounds()
        .unwrap_or((f32::MIN as f64, f32::MAX as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ranges_leave_values_untouched() {
        let mut values = vec![0.0, 41.5, 255.0];
        scale_slice(&mut values, (0.0, 255.0), (0.0, 255.0)).unwrap();
        assert_eq!(values, vec![0.0, 41.5, 255.0]);
    }

    #[test]
    fn identity_holds_for_exact_ranges() {
        // power-of-two span keeps the arithmetic exact
        for x in [0.0, 1.0, 100.0, 255.0, 256.0] {
            assert_eq!(scale(x, 0.0, 256.0, 0.0, 256.0), x);
        }
    }

    #[test]
    fn degenerate_range_is_fatal() {
        let mut values = vec![1.0];
        assert!(matches!(
            scale_slice(&mut values, (5.0, 5.0), (0.0, 255.0)),
            Err(Error::DegenerateRange(_))
        ));
    }

    #[test]
    fn uint16_to_uint8_known_values() {
        let mut values = vec![0.0, 32767.0, 65535.0];
        scale_slice(&mut values, (0.0, 65535.0), (0.0, 255.0)).unwrap();
        let PixelBuffer::U8(pixels) = to_pixels(&values, Bitdepth::Uint8) else {
            unreachable!()
        };
        assert_eq!(pixels, vec![0, 127, 255]);
    }

    #[test]
    fn flooring_truncates_toward_zero() {
        let PixelBuffer::U8(pixels) = to_pixels(&[254.9], Bitdepth::Uint8) else {
            unreachable!()
        };
        assert_eq!(pixels, vec![254]);
    }

    #[test]
    fn overflow_wraps_instead_of_saturating() {
        // documented historical behavior, not a mistake in this test
        let PixelBuffer::U8(pixels) = to_pixels(&[300.7, -1.5, 256.0], Bitdepth::Uint8) else {
            unreachable!()
        };
        assert_eq!(pixels, vec![44, 254, 0]);

        let PixelBuffer::U16(pixels) = to_pixels(&[65536.0, 70000.5], Bitdepth::Uint16) else {
            unreachable!()
        };
        assert_eq!(pixels, vec![0, 4464]);
    }

    #[test]
    fn no_clamping_outside_the_input_range() {
        // 131070 is twice the stated maximum, so it maps to twice the output max
        assert_eq!(scale(131070.0, 0.0, 65535.0, 0.0, 255.0), 510.0);
    }

    #[test]
    fn packed_bytes_are_little_endian() {
        assert_eq!(pack(&[258.0], Bitdepth::Uint16), vec![2, 1]);
        assert_eq!(pack(&[1.0], Bitdepth::Float32), 1.0_f32.to_le_bytes().to_vec());
    }
}
