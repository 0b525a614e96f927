//! `TEXT.RSC` writing

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::decoder::encode_record;
use super::{HEADER_SIZE, INDEX_ENTRY_SIZE, INDEX_SENTINEL};
use crate::error::{Error, Result};
use crate::formats::token::Token;

/// Collects records and serializes them as an archive
#[derive(Debug, Clone, Default)]
pub struct RscWriter {
    records: BTreeMap<u16, Vec<u8>>,
}

impl RscWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record from tokens
    ///
    /// Returns `true` if the ID was new.
    pub fn add_tokens(&mut self, id: u32, tokens: &[Token]) -> Result<bool> {
        self.add_raw(id, encode_record(tokens))
    }

    /// Add or replace a record from an already encoded body
    pub fn add_raw(&mut self, id: u32, body: Vec<u8>) -> Result<bool> {
        let id = u16::try_from(id)
            .ok()
            .filter(|&id| id != INDEX_SENTINEL)
            .ok_or(Error::RecordIdOutOfRange(id))?;
        Ok(self.records.insert(id, body).is_none())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize into any writer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRscIndex`] if the index would not fit the
    /// 16-bit length field, or an IO error from `out`.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        let index_len = (self.records.len() + 1) * INDEX_ENTRY_SIZE;
        let index_len_field = u16::try_from(index_len).map_err(|_| Error::InvalidRscIndex {
            message: format!("{} records do not fit a 16-bit index", self.records.len()),
        })?;
        out.write_u16::<LittleEndian>(index_len_field)?;

        let mut offset = HEADER_SIZE + index_len;
        for (&id, body) in &self.records {
            out.write_u16::<LittleEndian>(id)?;
            out.write_u32::<LittleEndian>(offset as u32)?;
            offset += body.len();
        }
        out.write_u16::<LittleEndian>(INDEX_SENTINEL)?;
        out.write_u32::<LittleEndian>(0)?;

        for body in self.records.values() {
            out.write_all(body)?;
        }
        Ok(())
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Write the archive to disk
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Write token records to an archive file
pub fn write_rsc<P, I>(path: P, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (u32, Vec<Token>)>,
{
    let mut writer = RscWriter::new();
    for (id, tokens) in records {
        writer.add_tokens(id, &tokens)?;
    }
    writer.write(path)?;
    Ok(writer.len())
}
