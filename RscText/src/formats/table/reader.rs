//! `.stbl` reading

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{KEY_SIZE, StringTable, TABLE_MAGIC};
use crate::error::{Error, Result};

/// Read a string table from disk
///
/// The collection name is the file stem.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::InvalidTableMagic`] if it is not a string table.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<StringTable> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;

    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_table_bytes(name, &buffer)
}

/// Parse a string table from bytes
///
/// # Errors
///
/// Returns [`Error::InvalidTableMagic`] on a bad header and [`Error::Io`] on
/// truncated data.
pub fn parse_table_bytes(name: &str, data: &[u8]) -> Result<StringTable> {
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != TABLE_MAGIC {
        return Err(Error::InvalidTableMagic(magic));
    }

    let num_entries = cursor.read_u32::<LittleEndian>()? as usize;
    let texts_offset = u64::from(cursor.read_u32::<LittleEndian>()?);

    let mut metadata = Vec::with_capacity(num_entries.min(data.len() / super::ENTRY_SIZE));
    for _ in 0..num_entries {
        let mut key_bytes = [0u8; KEY_SIZE];
        cursor.read_exact(&mut key_bytes)?;
        let key_len = key_bytes.iter().position(|&b| b == 0).unwrap_or(KEY_SIZE);
        let key = String::from_utf8_lossy(&key_bytes[..key_len]).into_owned();

        let version = cursor.read_u16::<LittleEndian>()?;
        let length = cursor.read_u32::<LittleEndian>()? as usize;
        metadata.push((key, version, length));
    }

    cursor.seek(SeekFrom::Start(texts_offset))?;

    let mut table = StringTable::new(name);
    for (key, version, length) in metadata {
        let text = if length > 0 {
            let mut text_bytes = vec![0u8; length - 1];
            cursor.read_exact(&mut text_bytes)?;
            cursor.read_u8()?;
            String::from_utf8_lossy(&text_bytes).into_owned()
        } else {
            String::new()
        };
        table.insert_with_version(key, text, version);
    }

    Ok(table)
}
