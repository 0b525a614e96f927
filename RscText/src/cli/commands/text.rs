//! CLI commands for resolving records

use anyhow::Context;

use super::definitions::ResolverArgs;
use crate::formats::rsc::{ByteStore, RscArchive, StopAt, decode_record};
use crate::formats::token::Token;

/// Print the first text segment of a record, or the whole record
pub fn get(args: &ResolverArgs, id: u32, full: bool) -> anyhow::Result<()> {
    let resolver = args.resolver()?;

    if full {
        let tokens = resolver
            .get_tokens(id)
            .with_context(|| format!("Record {id} not found"))?;
        println!("{}", tokens.to_plain_text());
    } else {
        let text = resolver.get_text(id);
        if text.is_empty() {
            anyhow::bail!("Record {id} has no text");
        }
        println!("{text}");
    }

    Ok(())
}

/// Print one variant of a record
pub fn random(args: &ResolverArgs, id: u32, legacy: bool, seed: Option<u32>) -> anyhow::Result<()> {
    let resolver = args.resolver()?;
    if let Some(seed) = seed {
        resolver.seed_legacy_rng(seed);
    }

    let run = resolver.get_random_tokens(id, legacy || seed.is_some());
    if run.is_empty() {
        anyhow::bail!("Record {id} not found");
    }
    println!("{}", run.to_plain_text());
    Ok(())
}

/// Show the token sequence of a record
pub fn tokens(args: &ResolverArgs, id: u32, json: bool) -> anyhow::Result<()> {
    let resolver = args.resolver()?;
    let tokens = resolver
        .get_tokens(id)
        .with_context(|| format!("Record {id} not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Text(text) => println!("{index:4}  Text           {text:?}"),
            marker => println!("{index:4}  {:?}", marker.kind()),
        }
    }
    Ok(())
}

/// List records in the legacy archive
pub fn list(args: &ResolverArgs, limit: Option<usize>, count: bool) -> anyhow::Result<()> {
    let path = args.archive_path()?;
    let archive = RscArchive::read(&path)
        .with_context(|| format!("Failed to read archive: {}", path.display()))?;

    if count {
        println!("{}", archive.len());
        return Ok(());
    }

    println!("{} ({} records)", path.display(), archive.len());
    println!();

    let limit = limit.unwrap_or(usize::MAX);
    for id in archive.ids().take(limit) {
        let Some(bytes) = archive.fetch(u32::from(id)) else {
            continue;
        };
        let preview = decode_record(bytes, 0, StopAt::EndOfRecord).to_plain_text();
        let preview = preview.replace('\n', "\\n");

        // Truncate long text for display
        let preview = if preview.chars().count() > 80 {
            format!("{}...", preview.chars().take(77).collect::<String>())
        } else {
            preview
        };
        println!("{id:5}  {preview}");
    }

    if archive.len() > limit {
        println!();
        println!("... and {} more", archive.len() - limit);
    }
    Ok(())
}
