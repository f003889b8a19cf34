//! TIFF read/write via the `tiff` crate

// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use crate::buffer::{Image, PixelBuffer};
use crate::error::{Error, Result};

// external crates
use log::debug;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};

pub(crate) fn read_tiff(path: &Path) -> Result<Image> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;

    let pixels = match decoder.read_image()? {
        DecodingResult::U8(values) => PixelBuffer::U8(values),
        DecodingResult::U16(values) => PixelBuffer::U16(values),
        DecodingResult::F32(values) => PixelBuffer::F32(values),
        _ => {
            return Err(Error::MalformedImage(format!(
                "'{}' does not hold u8/u16/f32 grayscale samples",
                path.display()
            )))
        }
    };

    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(Error::MalformedImage(format!(
            "'{}' holds {} samples, expected {expected}; multi-channel data is not slice data",
            path.display(),
            pixels.len()
        )));
    }

    Ok(Image {
        pixels,
        width: width as usize,
        height: height as usize,
    })
}

pub(crate) fn write_tiff(path: &Path, image: &Image) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(writer)?;
    let (width, height) = (image.width as u32, image.height as u32);

    match &image.pixels {
        PixelBuffer::U8(values) => {
            encoder.write_image::<colortype::Gray8>(width, height, values)?
        }
        PixelBuffer::U16(values) => {
            encoder.write_image::<colortype::Gray16>(width, height, values)?
        }
        PixelBuffer::F32(values) => {
            encoder.write_image::<colortype::Gray32Float>(width, height, values)?
        }
    }

    debug!("'{}' was successfully written", path.display());
    Ok(())
}
