//! Text formats: tokens, the legacy RSC archive, and localized string tables

pub mod markup;
pub mod rsc;
pub mod table;
pub mod token;

// Re-export main types
pub use markup::{string_to_tokens, tokens_to_string};
pub use rsc::{ByteStore, RscArchive, RscWriter, StopAt, decode_record};
pub use table::{StringTable, TableEntry, read_table, write_table};
pub use token::{Token, TokenKind, TokenSequence, build_tokens};
