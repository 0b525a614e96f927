//! Command execution implementations

use super::Commands;
use super::definitions::ResolverArgs;
use super::{names, table, text};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, args: &ResolverArgs) -> anyhow::Result<()> {
        match self {
            Commands::Get { id, full } => text::get(args, *id, *full),
            Commands::Random { id, legacy, seed } => text::random(args, *id, *legacy, *seed),
            Commands::Tokens { id, json } => text::tokens(args, *id, *json),
            Commands::List { limit, count } => text::list(args, *limit, *count),
            Commands::Export { output } => table::export(args, output),
            Commands::Pack { source, archive } => table::pack(source, archive),
            Commands::Material { kind, code } => {
                names::material(*kind, *code);
                Ok(())
            }
            Commands::Skill { code } => {
                names::skill(*code);
                Ok(())
            }
            Commands::Stat { code } => {
                names::stat(*code);
                Ok(())
            }
        }
    }
}
