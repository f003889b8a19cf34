//! Quality control extraction for [Raw] volumes
//!
//! A full slice export is overkill when all anyone wants to know is whether
//! a scan came out. These helpers pull a single side-view slice or collapse
//! the volume into a brightest-value projection, the two artifacts the
//! scanning workflow eyeballs before committing to a conversion.

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::convert::Options;
use crate::error::Result;
use crate::raw::Raw;
use crate::scale;

// rawtools modules
use rawtools_utils::f;

// external crates
use log::{info, warn};
use rawtools_image::{write_image, Image};

/// Axis a projection collapses along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Profile view: brightest value down each slice column, one row per slice
    Side,
    /// Top-down view: brightest value through the whole stack per pixel
    Top,
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Projection::Side => write!(f, "side"),
            Projection::Top => write!(f, "top"),
        }
    }
}

impl Raw {
    /// Extract one side-view slice as a `(z, x)`-shaped image
    ///
    /// `index` selects a row of each z-slice; the default is the midslice
    /// at `floor(x / 2)`. Valid indices run `0..y`; anything else is a
    /// descriptive error naming the bounds.
    ///
    /// Pixels keep the volume's own value type, so a float volume must be
    /// written as TIFF rather than PNG.
    pub fn midslice(&self, index: Option<usize>) -> Result<Image> {
        let [x, _, z] = self.dims();
        let index = match index {
            Some(index) => index,
            None => {
                let midslice = self.x() / 2;
                info!("slice index not specified, using midslice {midslice}");
                midslice
            }
        };
        self.validate_row_index(index)?;

        let mut rows = Vec::with_capacity(z * x);
        for slice in self.slices()? {
            let slice = slice?;
            rows.extend_from_slice(&slice[index * x..(index + 1) * x]);
        }

        Ok(Image {
            pixels: scale::to_pixels(&rows, self.bitdepth()),
            width: x,
            height: z,
        })
    }

    /// Collapse the volume into a brightest-value projection image
    ///
    /// [Projection::Side] keeps the maximum down each column of every
    /// slice, producing a `(z, x)` profile. [Projection::Top] keeps the
    /// running elementwise maximum through the stack, producing a `(y, x)`
    /// plan view.
    pub fn projection(&self, axis: Projection) -> Result<Image> {
        let [x, y, z] = self.dims();

        match axis {
            Projection::Side => {
                let mut rows = Vec::with_capacity(z * x);
                for slice in self.slices()? {
                    let slice = slice?;
                    // brightest value down each column of this slice
                    for i in 0..x {
                        let mut brightest = f64::NEG_INFINITY;
                        for j in 0..y {
                            brightest = brightest.max(slice[j * x + i]);
                        }
                        rows.push(brightest);
                    }
                }
                Ok(Image {
                    pixels: scale::to_pixels(&rows, self.bitdepth()),
                    width: x,
                    height: z,
                })
            }
            Projection::Top => {
                let mut brightest = vec![f64::NEG_INFINITY; x * y];
                for slice in self.slices()? {
                    for (best, value) in brightest.iter_mut().zip(slice?) {
                        *best = best.max(value);
                    }
                }
                Ok(Image {
                    pixels: scale::to_pixels(&brightest, self.bitdepth()),
                    width: x,
                    height: y,
                })
            }
        }
    }

    /// Extract a side-view slice and write it next to the volume
    ///
    /// Output is `{stem}.s{index:05}.png` in `output_dir`. An existing file
    /// is skipped unless [Options::force] is set, in which case the
    /// overwrite is logged.
    pub fn write_midslice<P: AsRef<Path>>(
        &self,
        output_dir: P,
        index: Option<usize>,
        options: Options,
    ) -> Result<PathBuf> {
        let index = index.unwrap_or(self.x() / 2);
        let path = output_dir
            .as_ref()
            .join(f!("{}.s{index:05}.png", self.stem()));

        if self.skip_existing(&path, options) {
            return Ok(path);
        }

        let image = self.midslice(Some(index))?;
        if !options.dryrun {
            write_image(&path, &image)?;
        }
        Ok(path)
    }

    /// Render a projection and write it next to the volume
    ///
    /// Output is `{stem}-projection-{side,top}.png` in `output_dir`, with
    /// the same overwrite handling as [write_midslice](Raw::write_midslice).
    pub fn write_projection<P: AsRef<Path>>(
        &self,
        output_dir: P,
        axis: Projection,
        options: Options,
    ) -> Result<PathBuf> {
        let path = output_dir
            .as_ref()
            .join(f!("{}-projection-{axis}.png", self.stem()));

        if self.skip_existing(&path, options) {
            return Ok(path);
        }

        let image = self.projection(axis)?;
        if !options.dryrun {
            write_image(&path, &image)?;
        }
        Ok(path)
    }

    /// Filename stem of the `.raw`
    fn stem(&self) -> String {
        self.path()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Existing-output policy: skip quietly, or warn before overwriting
    fn skip_existing(&self, path: &Path, options: Options) -> bool {
        if path.exists() {
            if !options.force {
                info!("file already exists, skipping '{}'", path.display());
                return true;
            }
            warn!("'{}' exists and will be overwritten", path.display());
        }
        false
    }

    /// Midslice row indices run over the slice height
    fn validate_row_index(&self, index: usize) -> Result<()> {
        let limit = self.y() - 1;
        if index > limit {
            return Err(crate::error::Error::SliceIndexOutOfBounds { index, limit });
        }
        Ok(())
    }
}
