//! `TEXT.RSC` reading

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::ops::Range;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{HEADER_SIZE, INDEX_ENTRY_SIZE, INDEX_SENTINEL};
use crate::error::{Error, Result};

/// Source of raw record bytes keyed by resource ID
pub trait ByteStore: Send + Sync {
    /// Raw bytes for `id`, or `None` if the store has no such record
    fn fetch(&self, id: u32) -> Option<&[u8]>;
}

/// An in-memory legacy text archive
#[derive(Debug, Clone)]
pub struct RscArchive {
    data: Vec<u8>,
    records: BTreeMap<u16, Range<usize>>,
}

impl RscArchive {
    /// Open `name` inside directory `dir`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArchiveNotFound`] if the file does not exist, or a
    /// parse error from [`RscArchive::from_bytes`].
    pub fn open<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self> {
        Self::read(dir.as_ref().join(name))
    }

    /// Read an archive from a file path
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ArchiveNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let archive = Self::from_bytes(buffer)?;
        tracing::debug!(
            "Opened {} ({} records)",
            path.display(),
            archive.records.len()
        );
        Ok(archive)
    }

    /// Parse an archive held in memory
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRscIndex`] if the index is truncated or lacks
    /// its sentinel, and [`Error::RecordOffsetOutOfBounds`] if an entry points
    /// past the end of the data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = Cursor::new(data.as_slice());
        let index_len = usize::from(
            cursor
                .read_u16::<LittleEndian>()
                .map_err(|_| invalid_index("missing index length"))?,
        );

        if HEADER_SIZE + index_len > data.len() {
            return Err(invalid_index(format!(
                "index length {index_len} exceeds archive size {}",
                data.len()
            )));
        }

        let mut entries = Vec::with_capacity(index_len / INDEX_ENTRY_SIZE);
        let mut terminated = false;
        while (cursor.position() as usize) + INDEX_ENTRY_SIZE <= HEADER_SIZE + index_len {
            let id = cursor.read_u16::<LittleEndian>()?;
            let offset = cursor.read_u32::<LittleEndian>()?;
            if id == INDEX_SENTINEL {
                terminated = true;
                break;
            }
            if offset as usize > data.len() {
                return Err(Error::RecordOffsetOutOfBounds {
                    id,
                    offset,
                    len: data.len(),
                });
            }
            entries.push((id, offset as usize));
        }

        if !terminated {
            return Err(invalid_index("index is not terminated by 0xFFFF"));
        }

        // Record ends are the next greater offset, whatever order the index uses
        let mut starts: Vec<usize> = entries.iter().map(|&(_, offset)| offset).collect();
        starts.sort_unstable();
        starts.dedup();

        let records = entries
            .into_iter()
            .map(|(id, start)| {
                let next = starts.partition_point(|&s| s <= start);
                let end = starts.get(next).copied().unwrap_or(data.len());
                (id, start..end)
            })
            .collect();

        Ok(Self {
            data,
            records,
        })
    }

    /// Record IDs in ascending order
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.records.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ByteStore for RscArchive {
    fn fetch(&self, id: u32) -> Option<&[u8]> {
        let id = u16::try_from(id).ok()?;
        let range = self.records.get(&id)?;
        self.data.get(range.clone())
    }
}

fn invalid_index(message: impl Into<String>) -> Error {
    Error::InvalidRscIndex {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built archive: records 7 and 3, stored out of ID order
    fn sample() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&18u16.to_le_bytes());
        data.extend_from_slice(&7u16.to_le_bytes());
        data.extend_from_slice(&20u32.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&24u32.to_le_bytes());
        data.extend_from_slice(&0xFFFFu16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(b"abc\xFE");
        data.extend_from_slice(b"xy\xFE");
        data
    }

    #[test]
    fn test_parse_and_fetch() {
        let archive = RscArchive::from_bytes(sample()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.ids().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(archive.fetch(7), Some(&b"abc\xFE"[..]));
        assert_eq!(archive.fetch(3), Some(&b"xy\xFE"[..]));
        assert_eq!(archive.fetch(4), None);
        assert_eq!(archive.fetch(70_000), None);
    }

    #[test]
    fn test_missing_sentinel() {
        let mut data = Vec::new();
        data.extend_from_slice(&6u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        data.push(b'a');
        assert!(matches!(
            RscArchive::from_bytes(data),
            Err(Error::InvalidRscIndex { .. })
        ));
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let mut data = sample();
        data[4..8].copy_from_slice(&500u32.to_le_bytes());
        assert!(matches!(
            RscArchive::from_bytes(data),
            Err(Error::RecordOffsetOutOfBounds { id: 7, offset: 500, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(RscArchive::from_bytes(Vec::new()).is_err());
    }
}
