//! The `.raw` + `.dat` volume dataset

// standard library
use std::cell::OnceCell;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// rawtools modules
use rawtools_utils::{closest_match, f};

// external crates
use itertools::{Itertools, MinMaxResult};
use log::warn;
use rawtools_dat::{determine_bit_depth, read_dat, Bitdepth, Dat, StorageFormat};

/// A binary `.raw` volume bound to its parsed `.dat` metadata
///
/// Construction locates the companion metadata, parses it, and
/// cross-validates the declared storage format against the file's actual
/// size. When the two disagree, the size-inferred format wins and governs
/// every subsequent read; the mismatch itself is only a logged warning. A
/// file too large for any interpretation of the declared dimensions fails
/// construction outright.
///
/// All read operations stream the volume slice by slice rather than
/// loading it whole.
///
/// ```rust, no_run
/// # use rawtools_volume::Raw;
/// let volume = Raw::new("./scan_104.raw").unwrap();
/// println!("{:?} voxels of {}", volume.dims(), volume.bitdepth());
/// ```
#[derive(Debug)]
pub struct Raw {
    path: PathBuf,
    dat_path: PathBuf,
    metadata: Dat,
    bitdepth: Bitdepth,
    filesize: u64,
    // computed on demand, owned by this instance, never shared across files
    minmax: OnceCell<(f64, f64)>,
}

impl Raw {
    /// Open a volume from the path of its `.raw` file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Raw> {
        let path = path.as_ref().to_path_buf();
        let dat_path = find_dat(&path)?;
        let metadata = read_dat(&dat_path)?;

        // the file size has the final say on how bytes are decoded
        let declared = metadata.bitdepth();
        let inferred = determine_bit_depth(&path, metadata.dimensions)?;
        if inferred != declared {
            warn!(
                "'{}' declares {declared} data but holds {inferred} data; trusting the file",
                path.display()
            );
        }

        let filesize = fs::metadata(&path)?.len();

        Ok(Raw {
            path,
            dat_path,
            metadata,
            bitdepth: inferred,
            filesize,
            minmax: OnceCell::new(),
        })
    }

    /// Path of the `.raw` file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `.dat` metadata sidecar actually used
    pub fn dat_path(&self) -> &Path {
        &self.dat_path
    }

    /// The parsed metadata
    pub fn metadata(&self) -> &Dat {
        &self.metadata
    }

    /// Voxel counts along x, y, z
    pub fn dims(&self) -> [usize; 3] {
        self.metadata.dimensions
    }

    /// Physical voxel size along x, y, z in millimeters
    pub fn thickness(&self) -> [f64; 3] {
        self.metadata.thickness
    }

    /// Voxel count along x
    pub fn x(&self) -> usize {
        self.metadata.dimensions[0]
    }

    /// Voxel count along y
    pub fn y(&self) -> usize {
        self.metadata.dimensions[1]
    }

    /// Voxel count along z, the number of slices
    pub fn z(&self) -> usize {
        self.metadata.dimensions[2]
    }

    /// Storage format governing reads, as inferred from the file size
    pub const fn bitdepth(&self) -> Bitdepth {
        self.bitdepth
    }

    /// The `.dat` token for the governing storage format
    pub const fn format(&self) -> StorageFormat {
        self.bitdepth.format()
    }

    /// Actual size of the `.raw` file in bytes
    pub const fn filesize(&self) -> u64 {
        self.filesize
    }

    /// Size the file should be for its dimensions and governing format
    pub fn expected_filesize(&self) -> u64 {
        (self.metadata.voxel_count() * self.bitdepth.byte_count()) as u64
    }

    /// Bytes occupied by one z-slice
    pub(crate) fn slice_byte_count(&self) -> usize {
        self.x() * self.y() * self.bitdepth.byte_count()
    }

    /// Smallest and largest voxel values in the volume
    ///
    /// Scanned slice by slice on first call and cached for the lifetime of
    /// this instance. Integer volumes rarely need this (their type implies
    /// a range); float volumes always do.
    pub fn minmax(&self) -> Result<(f64, f64)> {
        if let Some(&bounds) = self.minmax.get() {
            return Ok(bounds);
        }

        let mut lowest = f64::INFINITY;
        let mut greatest = f64::NEG_INFINITY;
        for slice in self.slices()? {
            match slice?.iter().minmax_by(|a, b| a.total_cmp(b)) {
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

    /// Smallest voxel value in the volume
    pub fn min(&self) -> Result<f64> {
        Ok(self.minmax()?.0)
    }

    /// Largest voxel value in the volume
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

    /// One z-slice decoded to f64, in row-major order
    ///
    /// Random access: reads exactly one slice's bytes at its offset.
    pub fn read_slice(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.z() {
            return Err(Error::SliceIndexOutOfBounds {
                index,
                limit: self.z().saturating_sub(1),
            });
        }

        let chunk = self.slice_byte_count();
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start((index * chunk) as u64))?;

        let mut buffer = vec![0u8; chunk];
        file.read_exact(&mut buffer)?;
        Ok(decode(&buffer, self.bitdepth))
    }

    /// Lazy iterator over all z-slices in increasing index order
    ///
    /// Each call opens a fresh reader, so the sequence is restartable.
    pub fn slices(&self) -> Result<SliceIter<'_>> {
        Ok(SliceIter {
            raw: self,
            reader: BufReader::new(File::open(&self.path)?),
            index: 0,
        })
    }
}

/// Streaming iterator over the z-slices of a [Raw] volume
pub struct SliceIter<'a> {
    raw: &'a Raw,
    reader: BufReader<File>,
    index: usize,
}

impl std::fmt::Debug for SliceIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SliceIter({}/{})", self.index, self.raw.z())
    }
}

impl Iterator for SliceIter<'_> {
    type Item = Result<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.raw.z() {
            return None;
        }
        self.index += 1;

        let mut buffer = vec![0u8; self.raw.slice_byte_count()];
        match self.reader.read_exact(&mut buffer) {
            Ok(()) => Some(Ok(decode(&buffer, self.raw.bitdepth))),
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// Decode little-endian voxel bytes into f64 values
pub(crate) fn decode(bytes: &[u8], bitdepth: Bitdepth) -> Vec<f64> {
    match bitdepth {
        Bitdepth::Uint8 => bytes.iter().map(|&b| b as f64).collect(),
        Bitdepth::Uint16 => bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) as f64)
            .collect(),
        Bitdepth::Float32 => bytes
            .chunks_exact(4)
            .map(|quad| f32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]) as f64)
            .collect(),
    }
}

/// Locate the `.dat` companion for a `.raw` path
///
/// Same stem, same directory first. Failing that, the directory's `.dat`
/// files are ranked by name similarity and the closest acceptable match is
/// adopted with a warning. Real-world archives mismatch these stems all the
/// time, which is why this is not simply an error.
fn find_dat(path: &Path) -> Result<PathBuf> {
    let dirname = path.parent().unwrap_or(Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let dat_path = dirname.join(f!("{stem}.dat"));
    if dat_path.exists() {
        return Ok(dat_path);
    }

    // rank every sibling .dat by similarity to the name we wanted
    let mut candidates: Vec<String> = fs::read_dir(dirname)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".dat"))
        .collect();
    candidates.sort();

    let target = f!("{stem}.dat");
    let names: Vec<&str> = candidates.iter().map(String::as_str).collect();
    match closest_match(&target, &names) {
        Some(best) => {
            warn!(
                "'{}' does not exist or is inaccessible, using close match '{best}'",
                dat_path.display()
            );
            Ok(dirname.join(best))
        }
        None => Err(Error::MissingDat(dat_path.display().to_string())),
    }
}
