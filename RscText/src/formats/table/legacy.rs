//! Seeding a string table from a legacy archive

use super::StringTable;
use crate::formats::markup::tokens_to_string;
use crate::formats::rsc::{ByteStore, RscArchive, StopAt, decode_record};

/// Convert every archive record into a markup entry keyed by its decimal ID.
///
/// The result is a starting point for translation: exported, translated, and
/// loaded back as the archive's localized collection.
#[must_use]
pub fn export_archive_to_table(archive: &RscArchive, collection: &str) -> StringTable {
    let mut table = StringTable::new(collection);
    for id in archive.ids() {
        let Some(bytes) = archive.fetch(u32::from(id)) else {
            continue;
        };
        let tokens = decode_record(bytes, 0, StopAt::EndOfRecord);
        table.insert(id.to_string(), tokens_to_string(tokens.tokens()));
    }
    tracing::info!(
        "Exported {} legacy records into collection {collection}",
        table.len()
    );
    table
}
