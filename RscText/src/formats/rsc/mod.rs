//! Legacy `TEXT.RSC` archive
//!
//! A flat archive of text records keyed by 16-bit ID:
//!
//! ```text
//! u16            index length in bytes
//! [u16 id, u32 offset] * n   index entries, last one has id 0xFFFF
//! record bodies
//! ```
//!
//! Each record runs from its offset up to the next greater offset in the
//! index, or to the end of the file. Record bodies are byte streams of
//! Latin-1 text mixed with formatting codes (see [`decoder`]).

pub mod decoder;
mod reader;
mod writer;

pub use decoder::{StopAt, decode_record, encode_record};
pub use reader::{ByteStore, RscArchive};
pub use writer::{RscWriter, write_rsc};

/// Default archive file name
pub const DEFAULT_ARCHIVE_NAME: &str = "TEXT.RSC";

/// ID of the sentinel entry closing the index
pub const INDEX_SENTINEL: u16 = 0xFFFF;

/// Size of each index entry (2 + 4 bytes)
pub const INDEX_ENTRY_SIZE: usize = 6;

/// Size of the leading index-length field
pub const HEADER_SIZE: usize = 2;
