//! `.stbl` string table format
//!
//! A string table is one localized collection: string keys mapped to
//! versioned text. Record text uses the inline markup described in
//! [`crate::formats::markup`].
//!
//! ```text
//! "STBL"          magic
//! u32             entry count
//! u32             offset of the text section
//! entry * n       64-byte NUL-padded key, u16 version, u32 text length (incl. NUL, 0 if empty)
//! texts           NUL-terminated UTF-8 strings in entry order
//! ```

mod legacy;
mod reader;
mod translation;
mod writer;

use indexmap::IndexMap;

pub use legacy::export_archive_to_table;
pub use reader::{parse_table_bytes, read_table};
pub use translation::{
    DelimitedFormat, ImportResult, export_table, import_into_table, table_from_delimited,
};
pub use writer::{table_to_bytes, write_table};

/// "STBL" magic signature
pub const TABLE_MAGIC: [u8; 4] = *b"STBL";

/// Size of each entry in the entry table (64 + 2 + 4 bytes)
pub const ENTRY_SIZE: usize = 70;

/// Size of the key field in each entry
pub const KEY_SIZE: usize = 64;

/// File extension of string tables
pub const TABLE_EXTENSION: &str = "stbl";

/// A single localized entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Version number, bumped by translators on edit
    pub version: u16,
    /// Text with inline markup
    pub text: String,
}

/// A named collection of localized entries
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    /// Collection name
    pub name: String,
    entries: IndexMap<String, TableEntry>,
}

impl StringTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Insert or replace an entry with version 1
    ///
    /// Returns `true` if the key was new.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> bool {
        self.insert_with_version(key, text, 1)
    }

    /// Insert or replace an entry with a specific version
    pub fn insert_with_version(
        &mut self,
        key: impl Into<String>,
        text: impl Into<String>,
        version: u16,
    ) -> bool {
        self.entries
            .insert(
                key.into(),
                TableEntry {
                    version,
                    text: text.into(),
                },
            )
            .is_none()
    }

    /// Replace an existing entry's text and bump its version
    ///
    /// Returns `false` if the key does not exist.
    pub fn update(&mut self, key: &str, text: impl Into<String>) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.text = text.into();
                entry.version = entry.version.saturating_add(1);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TableEntry> {
        self.entries.get(key)
    }

    /// Text for `key`
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.text.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy entries from `other`
    ///
    /// Existing keys are only replaced when `overwrite` is set. Returns the
    /// number of entries added or replaced.
    pub fn merge(&mut self, other: &StringTable, overwrite: bool) -> usize {
        let mut affected = 0;
        for (key, entry) in &other.entries {
            if overwrite || !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), entry.clone());
                affected += 1;
            }
        }
        affected
    }
}
