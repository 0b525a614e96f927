//! Collection-keyed string tables
//!
//! [`StringTables`] answers lookups from loaded [`StringTable`]s. Tables can
//! be loaded on a background thread; lookups issued meanwhile return
//! [`Lookup::Pending`] and are answered once loading finishes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use walkdir::WalkDir;

use super::{LocalizedLookup, Lookup, PendingAnswer, PendingLookup};
use crate::error::{Error, Result};
use crate::formats::table::{
    DelimitedFormat, StringTable, TABLE_EXTENSION, read_table, table_from_delimited,
};

#[derive(Debug)]
struct Waiter {
    collection: String,
    key: String,
    answer: PendingAnswer,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, StringTable>,
    /// Set while a background load is running
    loading: bool,
    waiters: Vec<Waiter>,
}

impl State {
    fn text(&self, collection: &str, key: &str) -> Option<String> {
        self.tables
            .get(collection)
            .and_then(|t| t.text(key))
            .map(str::to_string)
    }

    fn add(&mut self, table: StringTable) {
        match self.tables.get_mut(&table.name) {
            Some(existing) => {
                existing.merge(&table, true);
            }
            None => {
                self.tables.insert(table.name.clone(), table);
            }
        }
    }
}

/// Finishes a background load when dropped, including on panic, so waiters
/// are always answered
struct LoadGuard {
    tables: Arc<StringTables>,
    loaded: Vec<StringTable>,
}

impl LoadGuard {
    fn new(tables: Arc<StringTables>) -> Self {
        Self {
            tables,
            loaded: Vec::new(),
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!("String table loader panicked, finishing with partial results");
        }
        self.tables.finish_loading(std::mem::take(&mut self.loaded));
    }
}

/// Thread-safe set of localized string tables
#[derive(Debug, Default)]
pub struct StringTables {
    state: Mutex<State>,
}

impl StringTables {
    /// Create an empty, ready set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ready set from already loaded tables
    #[must_use]
    pub fn from_tables(tables: impl IntoIterator<Item = StringTable>) -> Self {
        let this = Self::new();
        for table in tables {
            this.insert_table(table);
        }
        this
    }

    /// Start loading `paths` on a background thread.
    ///
    /// Each path may be a `.stbl` file, a `.tsv`/`.csv` file, or a directory
    /// searched recursively for `.stbl` files. Lookups return
    /// [`Lookup::Pending`] until every path has been processed; paths that
    /// fail to load are logged and skipped.
    pub fn load_in_background(paths: Vec<PathBuf>) -> Arc<Self> {
        let this = Self::loading();

        let guard = LoadGuard::new(Arc::clone(&this));
        thread::spawn(move || {
            let mut guard = guard;
            for path in &paths {
                match load_path(path) {
                    Ok(tables) => guard.loaded.extend(tables),
                    Err(e) => tracing::warn!("Failed to load string tables from {}: {e}", path.display()),
                }
            }
        });

        this
    }

    fn loading() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                loading: true,
                ..State::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish_loading(&self, tables: Vec<StringTable>) {
        let mut state = self.lock();
        for table in tables {
            state.add(table);
        }
        state.loading = false;

        let waiters = std::mem::take(&mut state.waiters);
        tracing::info!(
            "String tables loaded: {} collections, {} deferred lookups",
            state.tables.len(),
            waiters.len()
        );
        for waiter in waiters {
            let text = state.text(&waiter.collection, &waiter.key);
            if !waiter.answer.send(text) {
                tracing::debug!(
                    "Deferred lookup {}:{} was abandoned by its caller",
                    waiter.collection,
                    waiter.key
                );
            }
        }
    }

    /// Add a table, merging into an existing collection of the same name
    pub fn insert_table(&self, table: StringTable) {
        self.lock().add(table);
    }

    /// Load one path synchronously (see [`StringTables::load_in_background`]
    /// for accepted paths). Returns the number of tables added.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let tables = load_path(path.as_ref())?;
        let count = tables.len();
        let mut state = self.lock();
        for table in tables {
            state.add(table);
        }
        Ok(count)
    }

    /// Whether a background load is still running
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Names of loaded collections, sorted
    #[must_use]
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lock().tables.keys().cloned().collect();
        names.sort();
        names
    }
}

impl LocalizedLookup for StringTables {
    fn try_get(&self, collection: &str, key: &str) -> Lookup {
        let mut state = self.lock();
        if state.loading {
            let (answer, pending) = PendingLookup::channel();
            state.waiters.push(Waiter {
                collection: collection.to_string(),
                key: key.to_string(),
                answer,
            });
            return Lookup::Pending(pending);
        }
        state
            .text(collection, key)
            .map_or(Lookup::Missing, Lookup::Found)
    }
}

fn load_path(path: &Path) -> Result<Vec<StringTable>> {
    if path.is_dir() {
        let mut tables = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let is_table = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
            if entry.file_type().is_file() && is_table {
                tables.push(read_table(entry.path())?);
            }
        }
        tracing::debug!("Found {} string tables in {}", tables.len(), path.display());
        return Ok(tables);
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("tsv" | "csv") => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
            Ok(vec![table_from_delimited(name, path, DelimitedFormat::from_path(path))?])
        }
        _ => Ok(vec![read_table(path)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::table::write_table;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn table(name: &str, entries: &[(&str, &str)]) -> StringTable {
        let mut table = StringTable::new(name);
        for (key, text) in entries {
            table.insert(*key, *text);
        }
        table
    }

    #[test]
    fn test_lookup_ready() {
        let tables = StringTables::from_tables([table("Internal_RSC", &[("1", "one")])]);
        assert_eq!(tables.try_get("Internal_RSC", "1").ready(), Some("one".to_string()));
        assert!(matches!(tables.try_get("Internal_RSC", "2"), Lookup::Missing));
        assert!(matches!(tables.try_get("Other", "1"), Lookup::Missing));
    }

    #[test]
    fn test_same_collection_merges() {
        let tables = StringTables::new();
        tables.insert_table(table("C", &[("1", "a"), ("2", "b")]));
        tables.insert_table(table("C", &[("2", "B")]));
        assert_eq!(tables.try_get("C", "1").ready(), Some("a".to_string()));
        assert_eq!(tables.try_get("C", "2").ready(), Some("B".to_string()));
        assert_eq!(tables.collections(), vec!["C".to_string()]);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();
        write_table(dir.path().join("A.stbl"), &table("A", &[("1", "x")])).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_table(dir.path().join("nested/B.stbl"), &table("B", &[("2", "y")])).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tables = StringTables::new();
        assert_eq!(tables.load_path(dir.path()).unwrap(), 2);
        assert_eq!(tables.collections(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_background_load_answers_pending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Internal_RSC.stbl");
        write_table(&path, &table("Internal_RSC", &[("5", "five")])).unwrap();

        let tables = StringTables::load_in_background(vec![path]);
        // The lookup is either pending (answered later) or already ready
        let text = match tables.try_get("Internal_RSC", "5") {
            Lookup::Pending(pending) => pending.wait(Duration::from_secs(5)),
            other => other.ready(),
        };
        assert_eq!(text, Some("five".to_string()));

        let deadline = Instant::now() + Duration::from_secs(5);
        while tables.is_loading() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(!tables.is_loading());
    }

    #[test]
    fn test_loader_panic_still_answers_waiters() {
        let tables = StringTables::loading();
        let Lookup::Pending(loaded_key) = tables.try_get("C", "1") else {
            panic!("lookup should be pending while loading");
        };
        let Lookup::Pending(missing_key) = tables.try_get("C", "2") else {
            panic!("lookup should be pending while loading");
        };

        let guard = LoadGuard::new(Arc::clone(&tables));
        let result = std::thread::spawn(move || {
            let mut guard = guard;
            guard.loaded.push(table("C", &[("1", "partial")]));
            panic!("loader failed");
        })
        .join();
        assert!(result.is_err());

        assert!(!tables.is_loading());
        assert_eq!(loaded_key.wait(Duration::from_secs(5)), Some("partial".to_string()));
        assert_eq!(missing_key.wait(Duration::from_secs(5)), None);
        assert!(matches!(tables.try_get("C", "2"), Lookup::Missing));
    }

    #[test]
    fn test_background_load_missing_path() {
        let tables = StringTables::load_in_background(vec![PathBuf::from("/nonexistent/x.stbl")]);
        let text = match tables.try_get("x", "1") {
            Lookup::Pending(pending) => pending.wait(Duration::from_secs(5)),
            other => other.ready(),
        };
        assert_eq!(text, None);
    }
}
