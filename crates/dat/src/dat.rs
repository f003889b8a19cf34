// crate modules
use crate::error::Error;

// rawtools modules
use rawtools_utils::f;

// external crates
use serde::Serialize;

/// Storage format tokens as they appear in `.dat` metadata
///
/// Each variant corresponds one-to-one with a [Bitdepth]. The tokens are
/// matched exactly as the NSI software writes them; an unrecognised token is
/// an [Error::UnknownFormat], never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageFormat {
    /// 8-bit unsigned voxels (`UCHAR`)
    Uchar,
    /// 16-bit unsigned voxels (`USHORT`)
    Ushort,
    /// 32-bit IEEE float voxels (`FLOAT`)
    Float,
}

impl StorageFormat {
    /// The in-memory value type this storage format decodes to
    ///
    /// ```rust
    /// # use rawtools_dat::{Bitdepth, StorageFormat};
    /// assert_eq!(StorageFormat::Ushort.bitdepth(), Bitdepth::Uint16);
    /// ```
    pub const fn bitdepth(&self) -> Bitdepth {
        match self {
            StorageFormat::Uchar => Bitdepth::Uint8,
            StorageFormat::Ushort => Bitdepth::Uint16,
            StorageFormat::Float => Bitdepth::Float32,
        }
    }
}

impl std::str::FromStr for StorageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UCHAR" => Ok(StorageFormat::Uchar),
            "USHORT" => Ok(StorageFormat::Ushort),
            "FLOAT" => Ok(StorageFormat::Float),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            StorageFormat::Uchar => "UCHAR",
            StorageFormat::Ushort => "USHORT",
            StorageFormat::Float => "FLOAT",
        };
        write!(f, "{token}")
    }
}

/// Numeric type used to encode each voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bitdepth {
    /// 8-bit unsigned
    Uint8,
    /// 16-bit unsigned
    Uint16,
    /// 32-bit IEEE float
    Float32,
}

impl Bitdepth {
    /// The `.dat` storage token for this value type
    pub const fn format(&self) -> StorageFormat {
        match self {
            Bitdepth::Uint8 => StorageFormat::Uchar,
            Bitdepth::Uint16 => StorageFormat::Ushort,
            Bitdepth::Float32 => StorageFormat::Float,
        }
    }

    /// Bytes per voxel
    ///
    /// ```rust
    /// # use rawtools_dat::Bitdepth;
    /// assert_eq!(Bitdepth::Uint8.byte_count(), 1);
    /// assert_eq!(Bitdepth::Uint16.byte_count(), 2);
    /// assert_eq!(Bitdepth::Float32.byte_count(), 4);
    /// ```
    pub const fn byte_count(&self) -> usize {
        match self {
            Bitdepth::Uint8 => 1,
            Bitdepth::Uint16 => 2,
            Bitdepth::Float32 => 4,
        }
    }

    /// Full representable range for integer types, `None` for floats
    ///
    /// Float volumes have no type-implied data range; their true bounds must
    /// be measured from the data itself.
    pub fn integer_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Bitdepth::Uint8 => Some((u8::MIN as f64, u8::MAX as f64)),
            Bitdepth::Uint16 => Some((u16::MIN as f64, u16::MAX as f64)),
            Bitdepth::Float32 => None,
        }
    }
}

impl std::str::FromStr for Bitdepth {
    type Err = Error;

    // Aliases accepted for historical reasons: bare bit counts and "float"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" | "8" => Ok(Bitdepth::Uint8),
            "uint16" | "16" => Ok(Bitdepth::Uint16),
            "float32" | "float" | "32" => Ok(Bitdepth::Float32),
            _ => Err(Error::UnknownBitdepth(s.to_string())),
        }
    }
}

impl std::fmt::Display for Bitdepth {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Bitdepth::Uint8 => "uint8",
            Bitdepth::Uint16 => "uint16",
            Bitdepth::Float32 => "float32",
        };
        write!(f, "{name}")
    }
}

/// Textual convention of a `.dat` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Dialect {
    /// Line-based, colon-delimited NSI layout
    #[default]
    Nsi,
    /// XML-like layout written by Dragonfly, spacing in meters
    Dragonfly,
}

/// Contents of a `.dat` metadata file
///
/// All six logical fields must be present in a file for parsing to succeed;
/// partial metadata is a hard parse error rather than a partial result.
///
/// Thickness is always stored in millimeters internally. Dragonfly files
/// declare spacing in meters and are converted on read, so a [Dat] compares
/// equal across dialects when it describes the same physical volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dat {
    /// Filename of the binary volume this metadata describes
    ///
    /// Informational only. Locating the actual `.raw` is always done by
    /// same-stem lookup, never by trusting this field.
    pub object_filename: String,
    /// Voxel counts along x, y, z
    pub dimensions: [usize; 3],
    /// Physical size of one voxel along x, y, z in millimeters
    pub thickness: [f64; 3],
    /// Declared voxel storage format
    pub format: StorageFormat,
    /// Free-text density model label, historically always `DENSITY`
    pub model: String,
    /// Which textual convention the file used
    pub dialect: Dialect,
}

impl Dat {
    /// The in-memory value type declared by this metadata
    pub const fn bitdepth(&self) -> Bitdepth {
        self.format.bitdepth()
    }

    /// Total number of voxels in the described volume
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Expected size of the described `.raw` file in bytes
    pub fn expected_byte_count(&self) -> usize {
        self.voxel_count() * self.bitdepth().byte_count()
    }
}

impl std::fmt::Display for Dat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Dat {\n".to_string();
        s += &f!("    object: {}\n", self.object_filename);
        s += &f!(
            "    dimensions: {}x{}x{} ({} voxels)\n",
            self.dimensions[0],
            self.dimensions[1],
            self.dimensions[2],
            self.voxel_count()
        );
        s += &f!(
            "    thickness: {} {} {} mm\n",
            self.thickness[0],
            self.thickness[1],
            self.thickness[2]
        );
        s += &f!("    format: {} ({})\n", self.format, self.bitdepth());
        s += &f!("    model: {}\n}}", self.model);
        write!(f, "{}", s)
    }
}
