//! The slice-stack dataset

// standard library
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::paths::{is_slice_name, slice_index};

// external crates
use itertools::{Itertools, MinMaxResult};
use log::debug;
use rawtools_dat::Bitdepth;
use rawtools_image::{read_image, Image, PixelBuffer};

/// Fundamental kind of the data held in a stack
///
/// Sampled from pixel values rather than declared anywhere: segmentation
/// masks are (near-)binary, real scans are grayscale. The distinction
/// gates point-cloud export, which is meaningless for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metatype {
    /// Grayscale intensity data
    Volume,
    /// Binary/segmented data
    Voxel,
}

impl std::fmt::Display for Metatype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Metatype::Volume => write!(f, "volume"),
            Metatype::Voxel => write!(f, "voxel"),
        }
    }
}

/// A directory of 2-D image slices treated as one logical volume
///
/// Members must follow the `{directory}…<digits>.<ext>` convention and are
/// ordered by their trailing numeric index. The first slice fixes the
/// stack's width, height, and bit-depth; any member that later decodes to
/// a different shape or depth is a fatal inconsistency, not something to
/// coerce.
///
/// ```rust, no_run
/// # use rawtools_slices::Slices;
/// let stack = Slices::new("./scan_104").unwrap();
/// println!("{} slices of {}x{}", stack.count(), stack.width(), stack.height());
/// ```
#[derive(Debug)]
pub struct Slices {
    path: PathBuf,
    paths: Vec<PathBuf>,
    width: usize,
    height: usize,
    bitdepth: Bitdepth,
    // computed on demand, owned by this instance
    minmax: OnceCell<(f64, f64)>,
    metatype: OnceCell<Metatype>,
}

impl Slices {
    /// Open a slice stack from its directory path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Slices> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(Error::NotADirectory(path.display().to_string()));
        }

        let prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        // members matching the naming convention, in numeric order
        let mut members: Vec<(i64, String)> = fs::read_dir(&path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| is_slice_name(name, &prefix))
            .map(|name| (slice_index(&name), name))
            .collect();
        members.sort();

        let paths: Vec<PathBuf> = members.into_iter().map(|(_, name)| path.join(name)).collect();
        if paths.is_empty() {
            return Err(Error::NoSlices(path.display().to_string()));
        }
        debug!("found {} slices in '{}'", paths.len(), path.display());

        // the top slice fixes the stack's geometry and depth
        let top = read_image(&paths[0])?;

        Ok(Slices {
            path,
            paths,
            width: top.width,
            height: top.height,
            bitdepth: top.bitdepth(),
            minmax: OnceCell::new(),
            metatype: OnceCell::new(),
        })
    }

    /// Path of the stack's directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Member slice paths in stack order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Slice width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Slice height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of slices in the stack
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Voxel counts as x, y, z
    pub fn dims(&self) -> [usize; 3] {
        [self.width, self.height, self.count()]
    }

    /// Pixel value type shared by every slice
    pub const fn bitdepth(&self) -> Bitdepth {
        self.bitdepth
    }

    /// Iterate over the decoded slices in stack order
    ///
    /// Every slice is checked against the stack's shape and bit-depth as
    /// it is read; a mismatch surfaces as a fatal error at the offending
    /// slice.
    pub fn images(&self) -> impl Iterator<Item = Result<Image>> + '_ {
        self.paths.iter().map(move |path| self.read_checked(path))
    }

    /// Smallest and largest pixel values across the whole stack
    ///
    /// Scanned on first call and cached for the lifetime of this instance.
    pub fn minmax(&self) -> Result<(f64, f64)> {
        if let Some(&bounds) = self.minmax.get() {
            return Ok(bounds);
        }

        let mut lowest = f64::INFINITY;
        let mut greatest = f64::NEG_INFINITY;
        for image in self.images() {
            let values = image?.pixels.to_f64();
            match values.iter().minmax_by(|a, b| a.total_cmp(b)) {
                MinMaxResult::NoElements => {}
                MinMaxResult::OneElement(&value) => {
                    lowest = lowest.min(value);
                    greatest = greatest.max(value);
                }
                MinMaxResult::MinMax(&low, &high) => {
                    lowest = lowest.min(low);
                    greatest = greatest.max(high);
                }
            }
        }

        Ok(*self.minmax.get_or_init(|| (lowest, greatest)))
    }

    /// Smallest pixel value in the stack
    pub fn min(&self) -> Result<f64> {
        Ok(self.minmax()?.0)
    }

    /// Largest pixel value in the stack
    pub fn max(&self) -> Result<f64> {
        Ok(self.minmax()?.1)
    }

    /// Source range for scaling: type bounds for integers, measured for floats
    pub fn source_bounds(&self) -> Result<(f64, f64)> {
        match self.bitdepth.integer_bounds() {
            Some(bounds) => Ok(bounds),
            None => self.minmax(),
        }
    }

    /// Classify the stack by sampling first, median, and last slices
    ///
    /// More than two distinct values in any sample means grayscale
    /// [Metatype::Volume]; at most two everywhere means segmented
    /// [Metatype::Voxel]. Every sample holding a single value is a
    /// degenerate stack and an error — an all-black scan is nothing at all.
    pub fn metatype(&self) -> Result<Metatype> {
        if let Some(&metatype) = self.metatype.get() {
            return Ok(metatype);
        }

        let count = self.count();
        let sample_indices = [0, count / 2, count - 1];

        let mut unique_counts = Vec::with_capacity(sample_indices.len());
        for index in sample_indices {
            let image = self.read_checked(&self.paths[index])?;
            unique_counts.push(unique_values(&image.pixels));
        }

        let metatype = if unique_counts.iter().all(|&n| n == 1) {
            return Err(Error::DegenerateSlices(self.path.display().to_string()));
        } else if unique_counts.iter().any(|&n| n > 2) {
            Metatype::Volume
        } else {
            Metatype::Voxel
        };

        Ok(*self.metatype.get_or_init(|| metatype))
    }

    /// Decode a member slice, enforcing the stack's shape and depth
    pub(crate) fn read_checked(&self, path: &Path) -> Result<Image> {
        let image = read_image(path)?;

        if image.bitdepth() != self.bitdepth {
            return Err(Error::InconsistentBitdepth {
                path: path.display().to_string(),
                expected: self.bitdepth,
                found: image.bitdepth(),
            });
        }
        if image.width != self.width || image.height != self.height {
            return Err(Error::InconsistentDimensions {
                path: path.display().to_string(),
                width: self.width,
                height: self.height,
            });
        }

        Ok(image)
    }
}

/// Number of distinct sample values in a pixel buffer
fn unique_values(pixels: &PixelBuffer) -> usize {
    match pixels {
        PixelBuffer::U8(values) => values.iter().unique().count(),
        PixelBuffer::U16(values) => values.iter().unique().count(),
        PixelBuffer::F32(values) => values.iter().map(|v| v.to_bits()).unique().count(),
    }
}
