//! Exports from a slice stack back to volumes or re-rendered stacks

// standard library
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::paths::infer_slice_thickness;
use crate::slices::Slices;

// rawtools modules
use rawtools_utils::f;

// external crates
use log::info;
use rawtools_dat::{write_dat, Bitdepth};
use rawtools_volume::scale;
use rawtools_volume::{array_to_image, Options};

impl Slices {
    /// Scaling bounds for an export, or `None` for a same-type pass-through
    fn export_bounds(&self, bitdepth: Bitdepth) -> Result<Option<((f64, f64), (f64, f64))>> {
        if bitdepth == self.bitdepth() {
            return Ok(None);
        }
        Ok(Some((
            self.source_bounds()?,
            scale::destination_bounds(bitdepth),
        )))
    }

    /// Bind the stack into one `.raw` + `.dat` volume pair
    ///
    /// Slice pixel bytes are concatenated in stack order. A `bitdepth` of
    /// `None` keeps the stack's own value type and copies bytes untouched;
    /// a different type runs every slice through the range scaler first,
    /// so the written `.dat` always describes the bytes beside it.
    ///
    /// `thickness` falls back to the `_<N>u` micrometer token in the
    /// directory name, and to a unitless 1.0 per axis after that.
    pub fn to_raw<P: AsRef<Path>>(
        &self,
        path: P,
        bitdepth: Option<Bitdepth>,
        thickness: Option<[f64; 3]>,
        options: Options,
    ) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !options.force {
            info!("file already exists, skipping '{}'", path.display());
            return Ok(());
        }

        let bitdepth = bitdepth.unwrap_or(self.bitdepth());
        let bounds = self.export_bounds(bitdepth)?;
        let thickness = thickness.unwrap_or_else(|| {
            infer_slice_thickness(
                self.path()
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or_default(),
            )
        });

        if options.dryrun {
            info!("dryrun: would write '{}'", path.display());
            return Ok(());
        }

        let mut writer = BufWriter::new(File::create(path)?);
        for image in self.images() {
            let image = image?;
            match bounds {
                // same type: the decoded bytes pass through unchanged
                None => writer.write_all(&image.pixels.to_le_bytes())?,
                Some((from, to)) => {
                    let mut values = image.pixels.to_f64();
                    scale::scale_slice(&mut values, from, to)?;
                    writer.write_all(&scale::pack(&values, bitdepth))?;
                }
            }
        }
        writer.flush()?;

        write_dat(
            path.with_extension("dat"),
            self.dims(),
            thickness,
            bitdepth,
            "DENSITY",
        )?;

        Ok(())
    }

    /// Re-export the stack as a fresh slice directory
    ///
    /// Same contract as [Raw::to_slices](rawtools_volume::Raw::to_slices):
    /// one `{dirname}_{index}.{ext}` image per slice with the index
    /// zero-padded to the digit count of the slice total, scaling through
    /// the shared range pipeline when the value type changes.
    pub fn to_slices<P: AsRef<Path>>(
        &self,
        dir: P,
        ext: &str,
        bitdepth: Option<Bitdepth>,
        options: Options,
    ) -> Result<()> {
        let dir = dir.as_ref();
        let bitdepth = bitdepth.unwrap_or(self.bitdepth());
        let bounds = self.export_bounds(bitdepth)?;

        if !dir.exists() {
            if options.dryrun {
                info!("dryrun: would create '{}'", dir.display());
            } else {
                fs::create_dir_all(dir)?;
            }
        }

        let basename = dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let digits = self.count().to_string().len();

        for (index, image) in self.images().enumerate() {
            let image = image?;
            let path = dir.join(f!("{basename}_{index:0digits$}.{ext}"));
            if path.exists() && !options.force {
                info!("file already exists, skipping '{}'", path.display());
                continue;
            }
            array_to_image(
                &path,
                &image.pixels.to_f64(),
                image.width,
                image.height,
                bitdepth,
                bounds,
                options,
            )?;
        }

        Ok(())
    }
}
