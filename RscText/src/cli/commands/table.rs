//! CLI commands for moving text between archives and string tables

use std::path::Path;

use anyhow::Context;

use super::definitions::ResolverArgs;
use crate::formats::markup::string_to_tokens;
use crate::formats::rsc::{RscArchive, write_rsc};
use crate::formats::table::{
    DelimitedFormat, TABLE_EXTENSION, export_archive_to_table, export_table, table_from_delimited,
    write_table,
};

/// Export the legacy archive as a string table or translation file
pub fn export(args: &ResolverArgs, output: &Path) -> anyhow::Result<()> {
    let path = args.archive_path()?;
    let archive = RscArchive::read(&path)
        .with_context(|| format!("Failed to read archive: {}", path.display()))?;
    let config = args.config()?;
    let table = export_archive_to_table(&archive, &config.collection);

    let is_table = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
    if is_table {
        write_table(output, &table)
            .with_context(|| format!("Failed to write table: {}", output.display()))?;
    } else {
        export_table(&table, output, DelimitedFormat::from_path(output))
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    println!("Exported {} records to {}", table.len(), output.display());
    Ok(())
}

/// Build a legacy archive from a translation file
///
/// Row keys must be numeric record IDs. Rows use their translation, or the
/// original text when untranslated.
pub fn pack(source: &Path, archive: &Path) -> anyhow::Result<()> {
    let name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records");
    let table = table_from_delimited(name, source, DelimitedFormat::from_path(source))
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0;
    for (key, entry) in table.iter() {
        let Ok(id) = key.parse::<u32>() else {
            tracing::warn!("Skipping non-numeric key '{key}'");
            skipped += 1;
            continue;
        };
        records.push((id, string_to_tokens(&entry.text).tokens().to_vec()));
    }

    let count = write_rsc(archive, records)
        .with_context(|| format!("Failed to write archive: {}", archive.display()))?;

    println!("Packed {count} records into {}", archive.display());
    if skipped > 0 {
        println!("Skipped {skipped} rows with non-numeric keys");
    }
    Ok(())
}
