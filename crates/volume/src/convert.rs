//! Format-converting exports for [Raw] volumes

// standard library
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::raw::Raw;
use crate::scale;

// rawtools modules
use rawtools_utils::f;

// external crates
use log::info;
use ndarray::{s, Array3, ArrayView3};
use rawtools_dat::{write_dat, Bitdepth};
use rawtools_image::{write_image, Image};

/// Behaviour switches shared by every export operation
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Log what would be written without touching disk
    pub dryrun: bool,
    /// Overwrite outputs that already exist instead of skipping them
    pub force: bool,
}

/// Scale one slice onto a destination range and write it as an image
///
/// `bounds` is `Some((source, destination))` when the slice needs remapping
/// into the target type, or `None` when the data is already in the target
/// type and must pass through untouched. Integer targets floor before the
/// cast; see [scale](crate::scale) for the overflow contract.
#[allow(clippy::too_many_arguments)]
pub fn array_to_image<P: AsRef<Path>>(
    path: P,
    values: &[f64],
    width: usize,
    height: usize,
    bitdepth: Bitdepth,
    bounds: Option<((f64, f64), (f64, f64))>,
    options: Options,
) -> Result<()> {
    let path = path.as_ref();

    let mut values = values.to_vec();
    if let Some((from, to)) = bounds {
        scale::scale_slice(&mut values, from, to)?;
    }

    if options.dryrun {
        info!("dryrun: would write '{}'", path.display());
        return Ok(());
    }

    let image = Image {
        pixels: scale::to_pixels(&values, bitdepth),
        width,
        height,
    };
    write_image(path, &image)?;
    Ok(())
}

impl Raw {
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

    /// Export the volume as a directory of 2-D image slices
    ///
    /// One image per z-index, named `{dirname}_{index}.{ext}` with the
    /// index zero-padded to the digit count of the slice total, so a 15
    /// slice volume produces `…_00` through `…_14`.
    ///
    /// The source range is the type-implied bounds for integer volumes and
    /// the measured [minmax](Raw::minmax) for float volumes; the
    /// destination range is the full span of the output type. The output
    /// directory is created if absent. Existing slice files are skipped
    /// unless [Options::force] is set.
    pub fn to_slices<P: AsRef<Path>>(
        &self,
        dir: P,
        ext: &str,
        bitdepth: Bitdepth,
        options: Options,
    ) -> Result<()> {
        let dir = dir.as_ref();
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
        let digits = self.z().to_string().len();

        for (index, slice) in self.slices()?.enumerate() {
            let slice = slice?;
            let path = dir.join(f!("{basename}_{index:0digits$}.{ext}"));
            if path.exists() && !options.force {
                info!("file already exists, skipping '{}'", path.display());
                continue;
            }
            array_to_image(&path, &slice, self.x(), self.y(), bitdepth, bounds, options)?;
        }

        Ok(())
    }

    /// Export the volume as another `.raw`, converting value type and
    /// optionally resampling to a new grid
    ///
    /// Without `shape`, slices stream through the scaler one at a time and
    /// the companion `.dat` keeps the source dimensions and thickness.
    ///
    /// With `shape`, the entire volume is loaded, resampled by local mean
    /// onto the new grid, and written whole; the `.dat` thickness is
    /// adjusted per axis by the resize ratio so physical extent is
    /// preserved. This path is memory-bound by design — resampling needs
    /// the whole volume.
    pub fn to_raw<P: AsRef<Path>>(
        &self,
        path: P,
        bitdepth: Bitdepth,
        shape: Option<[usize; 3]>,
        options: Options,
    ) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !options.force {
            info!("file already exists, skipping '{}'", path.display());
            return Ok(());
        }
        let dat_path = path.with_extension("dat");

        match shape {
            None => {
                let bounds = self.export_bounds(bitdepth)?;

                if options.dryrun {
                    info!("dryrun: would write '{}'", path.display());
                } else {
                    let mut writer = BufWriter::new(File::create(path)?);
                    for slice in self.slices()? {
                        let mut slice = slice?;
                        if let Some((from, to)) = bounds {
                            scale::scale_slice(&mut slice, from, to)?;
                        }
                        writer.write_all(&scale::pack(&slice, bitdepth))?;
                    }
                    writer.flush()?;

                    write_dat(
                        &dat_path,
                        self.dims(),
                        self.thickness(),
                        bitdepth,
                        &self.metadata().model,
                    )?;
                }
            }
            Some(new_dims) => {
                if new_dims.iter().any(|&dim| dim == 0) {
                    return Err(Error::InvalidResampleShape(new_dims));
                }

                let [x, y, z] = self.dims();
                let [new_x, new_y, new_z] = new_dims;

                let volume = self.to_array()?;
                let resampled = resample_local_mean(volume.view(), (new_z, new_y, new_x));

                let mut values: Vec<f64> = resampled.iter().copied().collect();
                if let Some((from, to)) = self.export_bounds(bitdepth)? {
                    scale::scale_slice(&mut values, from, to)?;
                }

                // stretch the voxel size so the physical extent is unchanged
                let [xth, yth, zth] = self.thickness();
                let thickness = [
                    xth * x as f64 / new_x as f64,
                    yth * y as f64 / new_y as f64,
                    zth * z as f64 / new_z as f64,
                ];

                if options.dryrun {
                    info!("dryrun: would write '{}'", path.display());
                } else {
                    let mut writer = BufWriter::new(File::create(path)?);
                    writer.write_all(&scale::pack(&values, bitdepth))?;
                    writer.flush()?;

                    write_dat(
                        &dat_path,
                        new_dims,
                        thickness,
                        bitdepth,
                        &self.metadata().model,
                    )?;
                }
            }
        }

        Ok(())
    }

    /// The whole volume as an `(z, y, x)` array of f64 values
    ///
    /// Loads everything into memory; only the operations that genuinely
    /// need global context should reach for this.
    pub fn to_array(&self) -> Result<Array3<f64>> {
        let [x, y, z] = self.dims();
        let mut data = Vec::with_capacity(x * y * z);
        for slice in self.slices()? {
            data.extend(slice?);
        }
        Ok(Array3::from_shape_vec((z, y, x), data)?)
    }

    /// Write an in-memory volume to disk as a `.raw` + `.dat` pair
    ///
    /// The inverse constructor: `array` uses the `(z, y, x)` axis order of
    /// [to_array](Raw::to_array) and its values are assumed to already be
    /// in range for `bitdepth` (integer targets floor on the way out). An
    /// array carries no physical units, so the caller supplies thickness —
    /// `[1.0, 1.0, 1.0]` when there is nothing better to claim.
    pub fn from_array<P: AsRef<Path>>(
        path: P,
        array: ArrayView3<'_, f64>,
        bitdepth: Bitdepth,
        thickness: [f64; 3],
    ) -> Result<Raw> {
        let path = path.as_ref();
        let (z, y, x) = array.dim();

        let mut writer = BufWriter::new(File::create(path)?);
        for slice in array.outer_iter() {
            let values: Vec<f64> = slice.iter().copied().collect();
            writer.write_all(&scale::pack(&values, bitdepth))?;
        }
        writer.flush()?;

        write_dat(
            path.with_extension("dat"),
            [x, y, z],
            thickness,
            bitdepth,
            "DENSITY",
        )?;

        Raw::new(path)
    }
}

/// Resample a volume onto a new grid by averaging source voxel boxes
///
/// Each output voxel covers a box of source voxels (at least one); its
/// value is the mean of that box. Axis order is `(z, y, x)` on both sides.
fn resample_local_mean(volume: ArrayView3<'_, f64>, shape: (usize, usize, usize)) -> Array3<f64> {
    let (nz, ny, nx) = volume.dim();
    let (tz, ty, tx) = shape;

    // source index window covered by output index `i` along an axis
    let window = |i: usize, source: usize, target: usize| -> (usize, usize) {
        let start = i * source / target;
        let end = ((i + 1) * source).div_ceil(target).min(source);
        (start, end.max(start + 1))
    };

    Array3::from_shape_fn(shape, |(k, j, i)| {
        let (z0, z1) = window(k, nz, tz);
        let (y0, y1) = window(j, ny, ty);
        let (x0, x1) = window(i, nx, tx);
        volume
            .slice(s![z0..z1, y0..y1, x0..x1])
            .mean()
            .unwrap_or(0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn downsample_by_two_averages_boxes() {
        // 2x2x2 volume of distinct values collapses to its mean
        let volume = Array3::from_shape_vec(
            (2, 2, 2),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0],
        )
        .unwrap();

        let resampled = resample_local_mean(volume.view(), (1, 1, 1));
        assert_eq!(resampled[(0, 0, 0)], 7.0);
    }

    #[test]
    fn upsample_repeats_source_voxels() {
        let volume = Array3::from_shape_vec((1, 1, 2), vec![3.0, 9.0]).unwrap();

        let resampled = resample_local_mean(volume.view(), (1, 1, 4));
        assert_eq!(
            resampled.iter().copied().collect::<Vec<_>>(),
            vec![3.0, 3.0, 9.0, 9.0]
        );
    }
}
