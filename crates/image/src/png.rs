//! PNG read/write via the `image` crate

// standard library
use std::path::Path;

// crate modules
use crate::buffer::{Image, PixelBuffer};
use crate::error::{Error, Result};

// external crates
use image::{DynamicImage, ImageBuffer, Luma};
use log::debug;

pub(crate) fn read_png(path: &Path) -> Result<Image> {
    let decoded = image::open(path)?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);

    let pixels = match decoded {
        DynamicImage::ImageLuma8(buffer) => PixelBuffer::U8(buffer.into_raw()),
        DynamicImage::ImageLuma16(buffer) => PixelBuffer::U16(buffer.into_raw()),
        // anything else collapses to 8-bit grayscale
        other => {
            debug!("'{}' is not stored as grayscale, converting", path.display());
            PixelBuffer::U8(other.into_luma8().into_raw())
        }
    };

    Ok(Image {
        pixels,
        width,
        height,
    })
}

pub(crate) fn write_png(path: &Path, image: &Image) -> Result<()> {
    let (width, height) = (image.width as u32, image.height as u32);

    match &image.pixels {
        PixelBuffer::U8(values) => {
            let buffer: ImageBuffer<Luma<u8>, _> =
                ImageBuffer::from_raw(width, height, values.clone()).ok_or_else(|| {
                    Error::MalformedImage(format!(
                        "{} samples do not fill {width}x{height}",
                        values.len()
                    ))
                })?;
            buffer.save(path)?;
        }
        PixelBuffer::U16(values) => {
            let buffer: ImageBuffer<Luma<u16>, _> =
                ImageBuffer::from_raw(width, height, values.clone()).ok_or_else(|| {
                    Error::MalformedImage(format!(
                        "{} samples do not fill {width}x{height}",
                        values.len()
                    ))
                })?;
            buffer.save(path)?;
        }
        // no 32-bit float representation exists for PNG
        PixelBuffer::F32(_) => {
            return Err(Error::UnsupportedBitdepth {
                extension: "png".to_string(),
                bitdepth: image.bitdepth(),
            })
        }
    }

    debug!("'{}' was successfully written", path.display());
    Ok(())
}
