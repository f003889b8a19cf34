// external crates
use rawtools_dat::Bitdepth;

/// Pixel samples of a single grayscale slice, in their native value type
///
/// The three variants correspond one-to-one with the voxel storage formats
/// of a `.raw` volume, so slices round-trip between representations without
/// value coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// 8-bit unsigned samples
    U8(Vec<u8>),
    /// 16-bit unsigned samples
    U16(Vec<u16>),
    /// 32-bit float samples
    F32(Vec<f32>),
}

impl PixelBuffer {
    /// Value type of the samples
    pub const fn bitdepth(&self) -> Bitdepth {
        match self {
            PixelBuffer::U8(_) => Bitdepth::Uint8,
            PixelBuffer::U16(_) => Bitdepth::Uint16,
            PixelBuffer::F32(_) => Bitdepth::Float32,
        }
    }

    /// Number of samples in the buffer
    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::U8(values) => values.len(),
            PixelBuffer::U16(values) => values.len(),
            PixelBuffer::F32(values) => values.len(),
        }
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples widened to f64 for arithmetic
    ///
    /// Every supported sample type is exactly representable in an f64, so
    /// this widening is lossless.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            PixelBuffer::U8(values) => values.iter().map(|&v| v as f64).collect(),
            PixelBuffer::U16(values) => values.iter().map(|&v| v as f64).collect(),
            PixelBuffer::F32(values) => values.iter().map(|&v| v as f64).collect(),
        }
    }

    /// Samples as little-endian bytes, the `.raw` on-disk layout
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            PixelBuffer::U8(values) => values.clone(),
            PixelBuffer::U16(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            PixelBuffer::F32(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }
}

/// A single decoded grayscale slice
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Pixels in row-major order
    pub pixels: PixelBuffer,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Image {
    /// Value type of the pixel data
    pub const fn bitdepth(&self) -> Bitdepth {
        self.pixels.bitdepth()
    }
}
