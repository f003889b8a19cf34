//! Extension-dispatched image read/write

// standard library
use std::path::Path;

// crate modules
use crate::buffer::Image;
use crate::error::{Error, Result};
use crate::{png, tif};

/// Read a single grayscale slice image
///
/// The container format is chosen by extension: `png` via the PNG codec,
/// `tif`/`tiff` via the TIFF codec. The returned [Image] carries its pixel
/// data in the native sample type of the file.
///
/// ```rust, no_run
/// # use rawtools_image::read_image;
/// # use rawtools_dat::Bitdepth;
/// let slice = read_image("./scan_104/scan_104_0001.png").unwrap();
/// assert_eq!(slice.bitdepth(), Bitdepth::Uint16);
/// ```
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    match extension(path)?.as_str() {
        "png" => png::read_png(path),
        "tif" | "tiff" => tif::read_tiff(path),
        other => Err(Error::UnsupportedExtension(other.to_string())),
    }
}

/// Write a single grayscale slice image
///
/// Dispatches on the target extension like [read_image]. Requesting a
/// format that cannot represent the buffer's sample type (float PNG) is an
/// error raised before the file is created.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Image) -> Result<()> {
    let path = path.as_ref();
    match extension(path)?.as_str() {
        "png" => png::write_png(path, image),
        "tif" | "tiff" => tif::write_tiff(path, image),
        other => Err(Error::UnsupportedExtension(other.to_string())),
    }
}

/// Lowercased file extension, or an error for extensionless paths
fn extension(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::UnsupportedExtension(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use tempfile::TempDir;

    #[test]
    fn png_u8_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.png");

        let image = Image {
            pixels: PixelBuffer::U8(vec![0, 64, 128, 255]),
            width: 2,
            height: 2,
        };
        write_image(&path, &image).unwrap();

        assert_eq!(read_image(&path).unwrap(), image);
    }

    #[test]
    fn png_u16_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.png");

        let image = Image {
            pixels: PixelBuffer::U16(vec![0, 1024, 32767, 65535]),
            width: 4,
            height: 1,
        };
        write_image(&path, &image).unwrap();

        assert_eq!(read_image(&path).unwrap(), image);
    }

    #[test]
    fn tiff_f32_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.tif");

        let image = Image {
            pixels: PixelBuffer::F32(vec![-1.5, 0.0, 0.25, 1234.5]),
            width: 2,
            height: 2,
        };
        write_image(&path, &image).unwrap();

        assert_eq!(read_image(&path).unwrap(), image);
    }

    #[test]
    fn float_png_is_refused_before_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.png");

        let image = Image {
            pixels: PixelBuffer::F32(vec![0.0; 4]),
            width: 2,
            height: 2,
        };

        assert!(matches!(
            write_image(&path, &image),
            Err(Error::UnsupportedBitdepth { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_extension_is_refused() {
        assert!(matches!(
            read_image("./slice.bmp"),
            Err(Error::UnsupportedExtension(_))
        ));
    }
}
