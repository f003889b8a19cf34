//! Point-cloud export for voxel-type slice stacks
//!
//! Segmented stacks reduce to the coordinates of their nonzero pixels.
//! Three sibling text formats carry them:
//!
//! - `out` — two header lines (a constant `0.15` and the point count)
//!   followed by whitespace-delimited coordinate rows
//! - `obj` — Wavefront vertices, each row prefixed with `v`
//! - `xyz` — bare coordinate rows with six decimal places
//!
//! Rows are written `y x z`, the coordinate order the downstream root
//! phenotyping tools expect.

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::slices::{Metatype, Slices};

// external crates
use log::info;
use rawtools_volume::Options;

impl Slices {
    /// Export the stack as a point cloud, dispatching on the extension
    ///
    /// Supported extensions are `obj`, `out`, and `xyz`. Only a
    /// [Metatype::Voxel] stack can leave this way; grayscale data fails
    /// with a descriptive error before any output exists.
    pub fn to_pcd<P: AsRef<Path>>(&self, path: P, options: Options) -> Result<()> {
        let path = path.as_ref();

        // the guard runs before extension dispatch, so grayscale data gets
        // the metatype error no matter what was asked for
        let metatype = self.metatype()?;
        if metatype != Metatype::Voxel {
            return Err(Error::NotVoxelData(metatype));
        }

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "obj" => self.to_obj(path, options),
            "out" => self.to_out(path, options),
            "xyz" => self.to_xyz(path, options),
            other => Err(Error::UnsupportedPointCloudFormat(other.to_string())),
        }
    }

    /// Write nonzero-pixel coordinates as Wavefront OBJ vertices
    pub fn to_obj<P: AsRef<Path>>(&self, path: P, options: Options) -> Result<()> {
        let coordinates = self.voxel_coordinates()?;
        self.write_pointcloud(path.as_ref(), options, |writer| {
            for [z, y, x] in &coordinates {
                writeln!(writer, "v {y} {x} {z}")?;
            }
            Ok(())
        })
    }

    /// Write nonzero-pixel coordinates in the OUT layout
    pub fn to_out<P: AsRef<Path>>(&self, path: P, options: Options) -> Result<()> {
        let coordinates = self.voxel_coordinates()?;
        self.write_pointcloud(path.as_ref(), options, |writer| {
            writeln!(writer, "0.15")?;
            writeln!(writer, "{}", coordinates.len())?;
            for [z, y, x] in &coordinates {
                writeln!(writer, "{y} {x} {z}")?;
            }
            Ok(())
        })
    }

    /// Write nonzero-pixel coordinates as meshlab-compatible XYZ rows
    pub fn to_xyz<P: AsRef<Path>>(&self, path: P, options: Options) -> Result<()> {
        let coordinates = self.voxel_coordinates()?;
        self.write_pointcloud(path.as_ref(), options, |writer| {
            for [z, y, x] in &coordinates {
                writeln!(
                    writer,
                    "{:.6} {:.6} {:.6}",
                    *y as f64, *x as f64, *z as f64
                )?;
            }
            Ok(())
        })
    }

    /// `(z, y, x)` indices of every nonzero pixel, in stack order
    ///
    /// Guarded: only voxel-type stacks have meaningful nonzero sets.
    fn voxel_coordinates(&self) -> Result<Vec<[usize; 3]>> {
        let metatype = self.metatype()?;
        if metatype != Metatype::Voxel {
            return Err(Error::NotVoxelData(metatype));
        }

        let mut coordinates = Vec::new();
        for (z, image) in self.images().enumerate() {
            let image = image?;
            for (i, value) in image.pixels.to_f64().iter().enumerate() {
                if *value != 0.0 {
                    coordinates.push([z, i / image.width, i % image.width]);
                }
            }
        }
        Ok(coordinates)
    }

    /// Shared overwrite/dryrun handling around a point-cloud writer
    fn write_pointcloud<F>(&self, path: &Path, options: Options, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        if path.exists() && !options.force {
            info!("file already exists, skipping '{}'", path.display());
            return Ok(());
        }
        if options.dryrun {
            info!("dryrun mode, not generating '{}'", path.display());
            return Ok(());
        }

        let mut writer = BufWriter::new(File::create(path)?);
        write(&mut writer)?;
        writer.flush()?;

        info!("created point-cloud data file '{}'", path.display());
        Ok(())
    }
}
