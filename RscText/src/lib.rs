//! # rsctext
//!
//! Game text resolution for legacy `TEXT.RSC` archives with localized
//! string-table overrides.
//!
//! ## Features
//!
//! - **Resolution** - localized-first lookup keyed by resource ID, falling
//!   back to the legacy archive, which is opened once on first use
//! - **Tokens** - records as typed sequences of text and layout markers
//! - **Variants** - random selection among a record's alternative texts,
//!   with the legacy game's generator available for reproducible picks
//! - **String tables** - `.stbl` collections and TSV/CSV translation files
//! - **Display names** - skills, stats, and self-correcting material codes
//!
//! ## Quick Start
//!
//! ### Resolving Text
//!
//! ```no_run
//! use rsctext::prelude::*;
//!
//! let tables = StringTables::new();
//! tables.load_path("Text/Localization")?;
//!
//! let resolver = TextResolver::lazy("/games/arena", "TEXT.RSC").with_lookup(tables);
//! println!("{}", resolver.get_text(1001));
//! println!("{:?}", resolver.get_random_tokens(1001, true));
//! # Ok::<(), rsctext::Error>(())
//! ```
//!
//! ### Building Tokens
//!
//! ```
//! use rsctext::prelude::*;
//!
//! let tokens = build_tokens(TokenKind::NewLine, ["x", "y"]);
//! assert_eq!(tokens.to_plain_text(), "x\ny");
//! ```
//!
//! ### Display Names
//!
//! ```
//! use rsctext::names::{MaterialKind, material_display_name, skill_display_name};
//!
//! assert_eq!(material_display_name(MaterialKind::Armor, 0x0103), "Chain");
//! assert_eq!(skill_display_name(0), "Medical");
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `rsctext` command-line binary

pub mod config;
pub mod error;
pub mod formats;
pub mod localization;
pub mod names;
pub mod resolver;
pub mod variant;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{LocalizedWait, ResolverConfig};
    pub use crate::error::{Error, Result};
    pub use crate::formats::markup::{string_to_tokens, tokens_to_string};
    pub use crate::formats::rsc::{ByteStore, RscArchive, RscWriter, StopAt, decode_record};
    pub use crate::formats::table::{StringTable, export_archive_to_table, read_table, write_table};
    pub use crate::formats::token::{Token, TokenKind, TokenSequence, build_tokens};
    pub use crate::localization::{LocalizedLookup, Lookup, PendingLookup, StringTables};
    pub use crate::names::{
        MaterialKind, abbreviated_stat_name, material_display_name, skill_display_name,
        stat_description_id, stat_display_name,
    };
    pub use crate::resolver::TextResolver;
    pub use crate::variant::{
        LegacyRng, VariantGroup, select_first_text, select_random_text_line, select_variant,
        select_variant_legacy,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
