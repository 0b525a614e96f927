pub mod definitions;
mod execute;
pub mod names;
pub mod table;
pub mod text;

use clap::Subcommand;
use std::path::PathBuf;

use crate::names::MaterialKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the first text segment of a record
    Get {
        /// Record ID
        id: u32,

        /// Print the whole record as plain text
        #[arg(short, long)]
        full: bool,
    },

    /// Print one randomly chosen variant of a record
    Random {
        /// Record ID
        id: u32,

        /// Use the legacy game generator
        #[arg(short, long)]
        legacy: bool,

        /// Seed for the legacy generator (implies --legacy)
        #[arg(short, long)]
        seed: Option<u32>,
    },

    /// Show the token sequence of a record
    Tokens {
        /// Record ID
        id: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List records in the legacy archive
    List {
        /// Maximum records to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show count of records
        #[arg(long)]
        count: bool,
    },

    /// Export the legacy archive as a string table (.stbl, .tsv, or .csv)
    Export {
        /// Output table file
        output: PathBuf,
    },

    /// Build a legacy archive from a translation file (.tsv or .csv)
    Pack {
        /// Source translation file
        source: PathBuf,

        /// Output archive file
        archive: PathBuf,
    },

    /// Display name of a material code
    Material {
        /// Material kind (weapon, armor)
        kind: MaterialKind,

        /// Material code (decimal or 0x-prefixed hex)
        #[arg(value_parser = definitions::parse_code)]
        code: i32,
    },

    /// Display name of a skill code
    Skill {
        /// Skill code, or `all` to list every skill
        code: definitions::CodeArg,
    },

    /// Display name, abbreviation, and description record of a stat code
    Stat {
        /// Stat code, or `all` to list every stat
        code: definitions::CodeArg,
    },
}
