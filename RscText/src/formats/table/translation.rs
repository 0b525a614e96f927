//! Translation workflow support
//!
//! Export a string table to TSV/CSV for translators and import the filled-in
//! file back.
//!
//! Columns:
//! 1. Key (decimal record ID for legacy text)
//! 2. Version
//! 3. Original text
//! 4. Translation (empty on export)
//!
//! Line breaks inside text are written as `[/newline]` so every entry stays
//! on one line; fields containing the delimiter or quotes are quoted.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::StringTable;
use crate::error::{Error, Result};

/// Delimited file flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimitedFormat {
    /// Tab-separated values
    #[default]
    Tsv,
    /// Comma-separated values
    Csv,
}

impl DelimitedFormat {
    /// Pick the format from a file extension, defaulting to TSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Tsv,
        }
    }

    #[must_use]
    pub fn delimiter(self) -> char {
        match self {
            Self::Tsv => '\t',
            Self::Csv => ',',
        }
    }
}

/// Result of importing translations
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Entries updated with a translation
    pub translated: usize,
    /// Rows with an empty translation column
    pub skipped: usize,
    /// Keys in the file that the table does not contain
    pub missing_keys: Vec<String>,
}

/// Export a table for translation
///
/// Returns the number of rows written.
pub fn export_table<P: AsRef<Path>>(
    table: &StringTable,
    path: P,
    format: DelimitedFormat,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let delimiter = format.delimiter();

    writeln!(writer, "Key{delimiter}Version{delimiter}Original{delimiter}Translation")?;
    for (key, entry) in table.iter() {
        writeln!(
            writer,
            "{}{delimiter}{}{delimiter}{}{delimiter}",
            escape_field(key, delimiter),
            entry.version,
            escape_field(&entry.text, delimiter)
        )?;
    }

    writer.flush()?;
    Ok(table.len())
}

/// Apply the translation column of a delimited file to `table`
///
/// Translated entries get their version bumped. Rows whose key is not in the
/// table are reported, not added.
pub fn import_into_table<P: AsRef<Path>>(
    table: &mut StringTable,
    path: P,
    format: DelimitedFormat,
) -> Result<ImportResult> {
    let mut result = ImportResult::default();
    for row in read_rows(path.as_ref(), format)? {
        if row.translation.is_empty() {
            result.skipped += 1;
        } else if table.update(&row.key, row.translation) {
            result.translated += 1;
        } else {
            result.missing_keys.push(row.key);
        }
    }
    Ok(result)
}

/// Build a new table from a delimited file
///
/// Each row contributes its translation, or its original text when the
/// translation column is empty.
pub fn table_from_delimited<P: AsRef<Path>>(
    name: &str,
    path: P,
    format: DelimitedFormat,
) -> Result<StringTable> {
    let mut table = StringTable::new(name);
    for row in read_rows(path.as_ref(), format)? {
        let text = if row.translation.is_empty() {
            row.original
        } else {
            row.translation
        };
        table.insert_with_version(row.key, text, row.version);
    }
    Ok(table)
}

struct Row {
    key: String,
    version: u16,
    original: String,
    translation: String,
}

fn read_rows(path: &Path, format: DelimitedFormat) -> Result<Vec<Row>> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    let delimiter = format.delimiter();
    let mut rows = Vec::new();

    // Line 1 is the header
    for (index, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = split_fields(&line, delimiter).into_iter();
        let key = fields.next().unwrap_or_default();
        if key.is_empty() {
            return Err(Error::MalformedLine {
                line: index + 1,
                message: "missing key".to_string(),
            });
        }
        let version = fields
            .next()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);
        let original = fields.next().unwrap_or_default();
        let translation = fields.next().unwrap_or_default();

        rows.push(Row {
            key,
            version,
            original,
            translation,
        });
    }

    Ok(rows)
}

fn escape_field(text: &str, delimiter: char) -> String {
    let text = text.replace("\r\n", "\n").replace('\n', "[/newline]");
    if text.contains(delimiter) || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}

/// Split one line into fields, honouring double-quoted fields
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if in_quotes => in_quotes = false,
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}
