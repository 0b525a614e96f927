//! Error types for `RscText`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `RscText` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Legacy Archive Errors ====================
    /// The archive index is shorter than its declared length or is not
    /// terminated by the `0xFFFF` sentinel entry.
    #[error("invalid RSC index: {message}")]
    InvalidRscIndex {
        /// Description of what is invalid.
        message: String,
    },

    /// A record offset in the index points outside the archive.
    #[error("record {id} offset {offset} is outside the archive ({len} bytes)")]
    RecordOffsetOutOfBounds {
        /// The record ID.
        id: u16,
        /// The offset stored in the index.
        offset: u32,
        /// Length of the archive in bytes.
        len: usize,
    },

    /// The legacy archive file does not exist.
    #[error("archive not found: {path}")]
    ArchiveNotFound {
        /// The expected archive path.
        path: PathBuf,
    },

    /// A record ID does not fit into the archive's 16-bit index.
    #[error("record ID {0} cannot be stored in an RSC archive")]
    RecordIdOutOfRange(u32),

    // ==================== String Table Errors ====================
    /// The file is not a valid string table (missing STBL magic).
    #[error("invalid string table magic: expected STBL, found {0:?}")]
    InvalidTableMagic([u8; 4]),

    /// A string table key is longer than the fixed key field.
    #[error("string table key too long ({len} bytes, max {max}): {key}")]
    TableKeyTooLong {
        /// The offending key.
        key: String,
        /// Its length in bytes.
        len: usize,
        /// The maximum key length.
        max: usize,
    },

    // ==================== Variant Selection Errors ====================
    /// The selected run is empty and there is no earlier run to fall back to.
    #[error("variant {index} is empty and has no preceding variant to fall back to")]
    DegenerateVariantSplit {
        /// The selected run index.
        index: usize,
    },

    /// A variant index past the end of the variant group.
    #[error("variant index {index} out of range ({count} variants)")]
    VariantIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of runs in the group.
        count: usize,
    },

    // ==================== Parsing Errors ====================
    /// TOML configuration parse error.
    #[error("config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// Malformed line in a delimited (TSV/CSV) file.
    #[error("malformed line {line}: {message}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `RscText` operations.
pub type Result<T> = std::result::Result<T, Error>;
