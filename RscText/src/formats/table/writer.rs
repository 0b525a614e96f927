//! `.stbl` writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{ENTRY_SIZE, KEY_SIZE, StringTable, TABLE_MAGIC};
use crate::error::{Error, Result};

/// Header size in bytes
const HEADER_SIZE: u32 = 12;

/// Write a string table to disk
///
/// # Errors
///
/// Returns [`Error::TableKeyTooLong`] if a key does not fit the key field, or
/// an IO error.
pub fn write_table<P: AsRef<Path>>(path: P, table: &StringTable) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_table_to(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a string table to bytes
pub fn table_to_bytes(table: &StringTable) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_table_to(&mut out, table)?;
    Ok(out)
}

fn write_table_to<W: Write>(writer: &mut W, table: &StringTable) -> Result<()> {
    if let Some((key, _)) = table.iter().find(|(key, _)| key.len() > KEY_SIZE) {
        return Err(Error::TableKeyTooLong {
            key: key.to_string(),
            len: key.len(),
            max: KEY_SIZE,
        });
    }

    let num_entries = table.len() as u32;
    let texts_offset = HEADER_SIZE + (ENTRY_SIZE as u32) * num_entries;

    writer.write_all(&TABLE_MAGIC)?;
    writer.write_u32::<LittleEndian>(num_entries)?;
    writer.write_u32::<LittleEndian>(texts_offset)?;

    for (key, entry) in table.iter() {
        let mut key_buf = [0u8; KEY_SIZE];
        key_buf[..key.len()].copy_from_slice(key.as_bytes());
        writer.write_all(&key_buf)?;
        writer.write_u16::<LittleEndian>(entry.version)?;

        let length = if entry.text.is_empty() {
            0
        } else {
            entry.text.len() as u32 + 1 // +1 for NUL
        };
        writer.write_u32::<LittleEndian>(length)?;
    }

    for (_, entry) in table.iter() {
        if !entry.text.is_empty() {
            writer.write_all(entry.text.as_bytes())?;
            writer.write_u8(0)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::table::read_table;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Quests.stbl");

        let mut table = StringTable::new("ignored");
        table.insert("7", "Seek the [/center]Oracle");
        write_table(&path, &table).unwrap();

        let read = read_table(&path).unwrap();
        assert_eq!(read.name, "Quests");
        assert_eq!(read.text("7"), Some("Seek the [/center]Oracle"));
    }

    #[test]
    fn test_key_too_long() {
        let mut table = StringTable::new("x");
        table.insert("k".repeat(KEY_SIZE + 1), "text");
        assert!(matches!(
            table_to_bytes(&table),
            Err(Error::TableKeyTooLong { len: 65, .. })
        ));
    }
}
