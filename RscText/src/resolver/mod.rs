//! Text resolution with localized-first, legacy-fallback lookup
//!
//! [`TextResolver`] turns a resource ID into a [`TokenSequence`]. The
//! localized collection is queried first under the ID's decimal string; on a
//! miss the legacy archive is opened (once, on first use) and the record is
//! decoded.
//!
//! # Usage
//!
//! ```no_run
//! use rsctext::resolver::TextResolver;
//! use rsctext::localization::StringTables;
//!
//! let tables = StringTables::new();
//! tables.load_path("Text/Localization")?;
//!
//! let resolver = TextResolver::lazy("/games/arena", "TEXT.RSC").with_lookup(tables);
//! println!("{}", resolver.get_text(1001));
//! # Ok::<(), rsctext::Error>(())
//! ```
//!
//! # Pending lookups
//!
//! A [`LocalizedLookup`] may answer [`Lookup::Pending`] while its tables are
//! still loading. What happens then is chosen with [`LocalizedWait`]:
//! `NonBlocking` (the default) drops the handle and falls back to the legacy
//! archive, so localization is best-effort until loading completes.
//! `Bounded` waits for the answer up to a timeout before falling back.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::{DEFAULT_COLLECTION, LocalizedWait, ResolverConfig};
use crate::error::Error;
use crate::formats::markup::string_to_tokens;
use crate::formats::rsc::{ByteStore, RscArchive, StopAt, decode_record};
use crate::formats::token::TokenSequence;
use crate::localization::{LocalizedLookup, Lookup, NoLocalization, StringTables};
use crate::variant::{LegacyRng, VariantGroup, select_first_text, select_random_text_line};

/// Emit a resolution trace when debug logging is enabled
macro_rules! trace_resolution {
    ($resolver:expr, $($arg:tt)+) => {
        if $resolver.is_debug_logging() {
            tracing::debug!($($arg)+);
        }
    };
}

/// Where legacy record bytes come from
enum StoreHandle {
    /// Archive opened on first use
    Lazy {
        path: PathBuf,
        archive: OnceLock<Option<RscArchive>>,
    },
    /// Caller-provided store
    Explicit(Box<dyn ByteStore>),
    /// No legacy source configured
    Absent,
}

impl StoreHandle {
    fn get(&self) -> Option<&dyn ByteStore> {
        match self {
            Self::Explicit(store) => Some(store.as_ref()),
            Self::Absent => None,
            Self::Lazy { path, archive } => archive
                .get_or_init(|| match RscArchive::read(path) {
                    Ok(archive) => {
                        tracing::info!(
                            "Opened legacy archive {} ({} records)",
                            path.display(),
                            archive.len()
                        );
                        Some(archive)
                    }
                    Err(e) => {
                        tracing::warn!("Legacy archive unavailable, treating it as empty: {e}");
                        None
                    }
                })
                .as_ref()
                .map(|archive| archive as &dyn ByteStore),
        }
    }
}

/// Resolves resource IDs to token sequences.
///
/// All methods take `&self`; the resolver is `Send + Sync` and can be shared
/// behind an `Arc`.
pub struct TextResolver {
    collection: String,
    wait: LocalizedWait,
    lookup: Box<dyn LocalizedLookup>,
    store: StoreHandle,
    legacy_rng: Mutex<LegacyRng>,
    debug_logging: AtomicBool,
}

impl TextResolver {
    fn with_store_handle(store: StoreHandle) -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            wait: LocalizedWait::default(),
            lookup: Box::new(NoLocalization),
            store,
            legacy_rng: Mutex::new(LegacyRng::default()),
            debug_logging: AtomicBool::new(false),
        }
    }

    /// Resolver over an explicit byte store, with no localization
    pub fn new(store: impl ByteStore + 'static) -> Self {
        Self::with_store_handle(StoreHandle::Explicit(Box::new(store)))
    }

    /// Resolver that opens `dir/name` the first time a record is needed.
    ///
    /// A missing or unreadable archive is logged once and treated as empty.
    pub fn lazy(dir: impl Into<PathBuf>, name: &str) -> Self {
        Self::with_store_handle(StoreHandle::Lazy {
            path: dir.into().join(name),
            archive: OnceLock::new(),
        })
    }

    /// Resolver with localization only
    #[must_use]
    pub fn without_archive() -> Self {
        Self::with_store_handle(StoreHandle::Absent)
    }

    /// Build a resolver from configuration.
    ///
    /// String tables listed in the configuration are loaded on a background
    /// thread; lookups made before loading finishes follow the configured
    /// [`LocalizedWait`] policy.
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        let mut resolver = match &config.archive_dir {
            Some(dir) => Self::lazy(dir, &config.archive_name),
            None => Self::without_archive(),
        };
        if !config.string_tables.is_empty() {
            let tables: Arc<StringTables> =
                StringTables::load_in_background(config.string_tables.clone());
            resolver.lookup = Box::new(tables);
        }
        resolver.collection.clone_from(&config.collection);
        resolver.wait = config.localized_wait();
        resolver.set_debug_logging(config.debug_logging);
        resolver
    }

    /// Replace the localized lookup
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl LocalizedLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// Localized collection used for resource IDs
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    #[must_use]
    pub fn with_localized_wait(mut self, wait: LocalizedWait) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn localized_wait(&self) -> LocalizedWait {
        self.wait
    }

    /// Trace every resolution attempt and outcome through `tracing`
    pub fn set_debug_logging(&self, enabled: bool) {
        self.debug_logging.store(enabled, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_debug_logging(&self) -> bool {
        self.debug_logging.load(Ordering::Relaxed)
    }

    /// Reseed the legacy generator used by [`TextResolver::get_random_tokens`]
    pub fn seed_legacy_rng(&self, seed: u32) {
        *self.rng() = LegacyRng::new(seed);
    }

    fn rng(&self) -> MutexGuard<'_, LegacyRng> {
        self.legacy_rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Legacy byte store, opening it on first use
    #[must_use]
    pub fn store(&self) -> Option<&dyn ByteStore> {
        self.store.get()
    }

    /// Resolve `id` to its token sequence.
    ///
    /// Returns `None` when neither the localized collection nor the legacy
    /// archive has the record. A localized hit never touches the archive.
    #[must_use]
    pub fn get_tokens(&self, id: u32) -> Option<TokenSequence> {
        let key = id.to_string();
        if let Some(text) = self.localized(&self.collection, &key) {
            return Some(string_to_tokens(&text));
        }

        let Some(store) = self.store() else {
            trace_resolution!(self, "Record {id}: no legacy archive, not found");
            return None;
        };
        match store.fetch(id) {
            Some(bytes) => {
                trace_resolution!(self, "Record {id}: legacy fallback used ({} bytes)", bytes.len());
                Some(decode_record(bytes, 0, StopAt::EndOfRecord))
            }
            None => {
                trace_resolution!(self, "Record {id}: not found");
                None
            }
        }
    }

    /// Resolve `id` and pick one of its variants.
    ///
    /// `use_legacy_rng` selects the shared [`LegacyRng`] instead of the thread
    /// generator. The run is returned without a terminator. Missing records
    /// give an empty sequence; a record whose first variant is empty yields
    /// its first non-empty variant.
    #[must_use]
    pub fn get_random_tokens(&self, id: u32, use_legacy_rng: bool) -> TokenSequence {
        let Some(tokens) = self.get_tokens(id) else {
            return TokenSequence::default();
        };

        let group = VariantGroup::split(&tokens);
        let chosen = if use_legacy_rng {
            group.choose_legacy(&mut self.rng())
        } else {
            group.choose(&mut rand::thread_rng())
        };

        match chosen {
            Ok(run) => run,
            Err(Error::DegenerateVariantSplit { index }) => {
                tracing::warn!(
                    "Record {id}: variant {index} is empty with nothing before it, using first non-empty variant"
                );
                group.first_non_empty().unwrap_or_default()
            }
            Err(e) => {
                tracing::warn!("Record {id}: variant selection failed: {e}");
                TokenSequence::default()
            }
        }
    }

    /// First text segment of `id`, or `""`
    #[must_use]
    pub fn get_text(&self, id: u32) -> String {
        select_first_text(self.get_tokens(id).as_ref())
    }

    /// One randomly chosen text segment of `id`, or `""`
    #[must_use]
    pub fn get_random_text(&self, id: u32) -> String {
        self.get_tokens(id)
            .map(|tokens| select_random_text_line(&tokens, &mut rand::thread_rng()))
            .unwrap_or_default()
    }

    /// Look up any localized string, following the resolver's wait policy
    #[must_use]
    pub fn try_get_localized_string(&self, collection: &str, key: &str) -> Option<String> {
        self.localized(collection, key)
    }

    fn localized(&self, collection: &str, key: &str) -> Option<String> {
        match self.lookup.try_get(collection, key) {
            Lookup::Found(text) => {
                trace_resolution!(self, "{collection}:{key}: localized hit");
                Some(text)
            }
            Lookup::Missing => {
                trace_resolution!(self, "{collection}:{key}: localized miss");
                None
            }
            Lookup::Pending(pending) => match self.wait {
                LocalizedWait::NonBlocking => {
                    trace_resolution!(self, "{collection}:{key}: localized lookup pending, not waiting");
                    None
                }
                LocalizedWait::Bounded(timeout) => {
                    let text = pending.wait(timeout);
                    trace_resolution!(
                        self,
                        "{collection}:{key}: localized lookup pending, waited up to {timeout:?}: {}",
                        if text.is_some() { "hit" } else { "miss" }
                    );
                    text
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::rsc::RscWriter;
    use crate::formats::token::Token;
    use crate::localization::PendingLookup;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// In-memory store counting every fetch
    #[derive(Default)]
    struct CountingStore {
        records: HashMap<u32, Vec<u8>>,
        fetches: Arc<AtomicUsize>,
    }

    impl ByteStore for CountingStore {
        fn fetch(&self, id: u32) -> Option<&[u8]> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.records.get(&id).map(Vec::as_slice)
        }
    }

    fn store_with(records: &[(u32, &[u8])]) -> (CountingStore, Arc<AtomicUsize>) {
        let store = CountingStore {
            records: records.iter().map(|(id, b)| (*id, b.to_vec())).collect(),
            fetches: Arc::new(AtomicUsize::new(0)),
        };
        let fetches = Arc::clone(&store.fetches);
        (store, fetches)
    }

    fn tables(entries: &[(&str, &str)]) -> StringTables {
        let mut table = crate::formats::table::StringTable::new(DEFAULT_COLLECTION);
        for (key, text) in entries {
            table.insert(*key, *text);
        }
        StringTables::from_tables([table])
    }

    /// Lookup that is always pending, answered after `delay`
    struct SlowLookup {
        answer: Option<String>,
        delay: Duration,
    }

    impl LocalizedLookup for SlowLookup {
        fn try_get(&self, _collection: &str, _key: &str) -> Lookup {
            let (answer, pending) = PendingLookup::channel();
            let text = self.answer.clone();
            let delay = self.delay;
            std::thread::spawn(move || {
                std::thread::sleep(delay);
                answer.send(text);
            });
            Lookup::Pending(pending)
        }
    }

    #[test]
    fn test_localized_hit_skips_store() {
        let (store, fetches) = store_with(&[(1, b"legacy\xFE")]);
        let resolver = TextResolver::new(store).with_lookup(tables(&[("1", "Localized[/newline]Two")]));

        assert_eq!(resolver.get_text(1), "Localized");
        assert_eq!(
            resolver.get_tokens(1).unwrap().tokens(),
            &[
                Token::text("Localized"),
                Token::NewLine,
                Token::text("Two"),
                Token::EndOfRecord
            ]
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_legacy_fallback_is_terminated_once() {
        let (store, fetches) = store_with(&[(2, b"Hello\x00World\xFEtrailing\xFE")]);
        let resolver = TextResolver::new(store).with_lookup(tables(&[("1", "other")]));

        let tokens = resolver.get_tokens(2).unwrap();
        assert_eq!(
            tokens.tokens(),
            &[
                Token::text("Hello"),
                Token::NewLine,
                Token::text("World"),
                Token::EndOfRecord
            ]
        );
        assert!(tokens.is_well_formed());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unterminated_legacy_record() {
        let (store, _) = store_with(&[(3, b"open ended")]);
        let resolver = TextResolver::new(store);
        let tokens = resolver.get_tokens(3).unwrap();
        assert_eq!(tokens.tokens(), &[Token::text("open ended"), Token::EndOfRecord]);
    }

    #[test]
    fn test_absent_everywhere() {
        let (store, _) = store_with(&[]);
        let resolver = TextResolver::new(store);
        assert_eq!(resolver.get_tokens(99), None);
        assert_eq!(resolver.get_text(99), "");
        assert_eq!(resolver.get_random_text(99), "");
        assert!(resolver.get_random_tokens(99, true).is_empty());
    }

    #[test]
    fn test_without_archive() {
        let resolver = TextResolver::without_archive().with_lookup(tables(&[("5", "five")]));
        assert_eq!(resolver.get_text(5), "five");
        assert_eq!(resolver.get_tokens(6), None);
    }

    #[test]
    fn test_lazy_archive_opens_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RscWriter::new();
        writer.add_tokens(10, &[Token::text("from disk")]).unwrap();
        writer.write(dir.path().join("TEXT.RSC")).unwrap();

        let resolver = TextResolver::lazy(dir.path(), "TEXT.RSC");
        assert_eq!(resolver.get_text(10), "from disk");

        // The handle stays open even if the file goes away
        std::fs::remove_file(dir.path().join("TEXT.RSC")).unwrap();
        assert_eq!(resolver.get_text(10), "from disk");
    }

    #[test]
    fn test_missing_lazy_archive_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = TextResolver::lazy(dir.path(), "TEXT.RSC");
        assert_eq!(resolver.get_tokens(1), None);
        assert!(resolver.store().is_none());
    }

    #[test]
    fn test_pending_non_blocking_falls_back() {
        let (store, fetches) = store_with(&[(4, b"legacy\xFE")]);
        let resolver = TextResolver::new(store).with_lookup(SlowLookup {
            answer: Some("late".to_string()),
            delay: Duration::from_millis(0),
        });
        assert_eq!(resolver.get_text(4), "legacy");
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pending_bounded_uses_answer() {
        let (store, fetches) = store_with(&[(4, b"legacy\xFE")]);
        let resolver = TextResolver::new(store)
            .with_lookup(SlowLookup {
                answer: Some("late".to_string()),
                delay: Duration::from_millis(5),
            })
            .with_localized_wait(LocalizedWait::Bounded(Duration::from_secs(5)));
        assert_eq!(resolver.get_text(4), "late");
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pending_bounded_times_out() {
        let (store, _) = store_with(&[(4, b"legacy\xFE")]);
        let resolver = TextResolver::new(store)
            .with_lookup(SlowLookup {
                answer: Some("too late".to_string()),
                delay: Duration::from_secs(2),
            })
            .with_localized_wait(LocalizedWait::Bounded(Duration::from_millis(5)));
        assert_eq!(resolver.get_text(4), "legacy");
    }

    #[test]
    fn test_random_tokens_legacy_is_reproducible() {
        let (store, _) = store_with(&[(7, b"one\xFFtwo\xFFthree\xFE")]);
        let resolver = TextResolver::new(store);

        resolver.seed_legacy_rng(1234);
        let first: Vec<_> = (0..10).map(|_| resolver.get_random_tokens(7, true)).collect();
        resolver.seed_legacy_rng(1234);
        let second: Vec<_> = (0..10).map(|_| resolver.get_random_tokens(7, true)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|run| run.len() == 1));
    }

    #[test]
    fn test_random_tokens_trailing_empty_variant() {
        let (store, _) = store_with(&[(8, b"a\xFFb\xFF\xFE")]);
        let resolver = TextResolver::new(store);
        for _ in 0..50 {
            let run = resolver.get_random_tokens(8, false);
            assert!(run.tokens() == [Token::text("a")] || run.tokens() == [Token::text("b")]);
        }
    }

    #[test]
    fn test_random_tokens_degenerate_first_variant() {
        let (store, _) = store_with(&[(9, b"\xFFonly\xFE")]);
        let resolver = TextResolver::new(store);
        for _ in 0..20 {
            assert_eq!(resolver.get_random_tokens(9, false).tokens(), &[Token::text("only")]);
        }
    }

    #[test]
    fn test_try_get_localized_string() {
        let resolver = TextResolver::without_archive().with_lookup(tables(&[("greeting", "Hail")]));
        assert_eq!(
            resolver.try_get_localized_string(DEFAULT_COLLECTION, "greeting"),
            Some("Hail".to_string())
        );
        assert_eq!(resolver.try_get_localized_string("Other", "greeting"), None);
    }

    #[test]
    fn test_debug_logging_does_not_change_results() {
        let (store, _) = store_with(&[(2, b"x\xFE")]);
        let resolver = TextResolver::new(store).with_lookup(tables(&[("1", "y")]));
        let before = (resolver.get_tokens(1), resolver.get_tokens(2), resolver.get_tokens(3));
        resolver.set_debug_logging(true);
        assert!(resolver.is_debug_logging());
        let after = (resolver.get_tokens(1), resolver.get_tokens(2), resolver.get_tokens(3));
        assert_eq!(before, after);
    }

    /// Shared buffer collecting formatted log output
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn take(&self) -> String {
            let bytes = std::mem::take(&mut *self.0.lock().unwrap());
            String::from_utf8(bytes).unwrap()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_debug_logging_traces_each_path() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let (store, _) = store_with(&[(2, b"x\xFE")]);
            let resolver = TextResolver::new(store).with_lookup(tables(&[("1", "y")]));
            let pending = TextResolver::without_archive().with_lookup(SlowLookup {
                answer: Some("late".to_string()),
                delay: Duration::from_millis(1),
            });
            let resolve_all = || {
                let _ = resolver.get_tokens(1);
                let _ = resolver.get_tokens(2);
                let _ = resolver.get_tokens(3);
                let _ = pending.get_tokens(4);
            };

            resolve_all();
            let quiet = logs.take();
            for phrase in ["localized", "legacy fallback", "not found", "pending"] {
                assert!(!quiet.contains(phrase), "unexpected {phrase:?} in {quiet}");
            }

            resolver.set_debug_logging(true);
            pending.set_debug_logging(true);
            resolve_all();
            let traced = logs.take();
            for line in [
                "Internal_RSC:1: localized hit",
                "Internal_RSC:2: localized miss",
                "Record 2: legacy fallback used (2 bytes)",
                "Record 3: not found",
                "Internal_RSC:4: localized lookup pending, not waiting",
                "Record 4: no legacy archive, not found",
            ] {
                assert!(traced.contains(line), "missing {line:?} in {traced}");
            }
        });
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RscWriter::new();
        writer.add_tokens(1, &[Token::text("legacy one")]).unwrap();
        writer.add_tokens(2, &[Token::text("legacy two")]).unwrap();
        writer.write(dir.path().join("FALL.RSC")).unwrap();

        let mut table = crate::formats::table::StringTable::new("Fall_RSC");
        table.insert("1", "localized one");
        let table_path = dir.path().join("Fall_RSC.stbl");
        crate::formats::table::write_table(&table_path, &table).unwrap();

        let config = ResolverConfig {
            archive_dir: Some(dir.path().to_path_buf()),
            archive_name: "FALL.RSC".to_string(),
            collection: "Fall_RSC".to_string(),
            string_tables: vec![table_path],
            localized_wait_ms: Some(5_000),
            debug_logging: true,
        };
        let resolver = TextResolver::from_config(&config);
        assert_eq!(resolver.collection(), "Fall_RSC");
        assert!(resolver.is_debug_logging());
        assert_eq!(resolver.get_text(1), "localized one");
        assert_eq!(resolver.get_text(2), "legacy two");
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextResolver>();
    }
}
