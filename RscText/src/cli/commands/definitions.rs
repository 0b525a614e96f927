//! Shared argument definitions for CLI

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ResolverConfig;
use crate::localization::StringTables;
use crate::resolver::TextResolver;

/// Options that locate the text sources
#[derive(Args)]
pub struct ResolverArgs {
    /// Resolver configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing the legacy archive
    #[arg(short, long, global = true)]
    pub archive_dir: Option<PathBuf>,

    /// Legacy archive file name
    #[arg(long, global = true)]
    pub archive_name: Option<String>,

    /// String table file or directory (repeatable)
    #[arg(short, long, global = true)]
    pub table: Vec<PathBuf>,

    /// Localized collection name
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Log every resolution step
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl ResolverArgs {
    /// Configuration file merged with command-line overrides
    pub fn config(&self) -> anyhow::Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ResolverConfig::default(),
        };

        if let Some(dir) = &self.archive_dir {
            config.archive_dir = Some(dir.clone());
        }
        if let Some(name) = &self.archive_name {
            config.archive_name.clone_from(name);
        }
        if let Some(collection) = &self.collection {
            config.collection.clone_from(collection);
        }
        config.string_tables.extend(self.table.iter().cloned());
        config.debug_logging |= self.verbose;
        Ok(config)
    }

    /// Build a resolver, loading string tables before returning.
    pub fn resolver(&self) -> anyhow::Result<TextResolver> {
        let config = self.config()?;

        let tables = StringTables::new();
        for path in &config.string_tables {
            let count = tables
                .load_path(path)
                .with_context(|| format!("Failed to load string tables: {}", path.display()))?;
            tracing::debug!("Loaded {count} tables from {}", path.display());
        }

        let resolver = match &config.archive_dir {
            Some(dir) => TextResolver::lazy(dir, &config.archive_name),
            None => TextResolver::without_archive(),
        }
        .with_lookup(tables)
        .with_collection(config.collection.clone())
        .with_localized_wait(config.localized_wait());
        resolver.set_debug_logging(config.debug_logging);
        Ok(resolver)
    }

    /// Legacy archive path from configuration
    pub fn archive_path(&self) -> anyhow::Result<PathBuf> {
        let config = self.config()?;
        let dir = config
            .archive_dir
            .context("No archive directory given. Use --archive-dir or set archive_dir in the config")?;
        Ok(dir.join(config.archive_name))
    }
}

/// A single code or every code
#[derive(Debug, Clone, Copy)]
pub enum CodeArg {
    All,
    Code(i32),
}

impl FromStr for CodeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CodeArg::All);
        }
        parse_code(s).map(CodeArg::Code)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal code
pub fn parse_code(s: &str) -> Result<i32, String> {
    let trimmed = s.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| format!("Invalid code '{s}'. Use a decimal or 0x-prefixed hex number"))?;

    let value = if negative { -value } else { value };
    i32::try_from(value).map_err(|_| format!("Code '{s}' is out of range"))
}
