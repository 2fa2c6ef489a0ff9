//! Corpus Service
//!
//! The operations exposed to the transport layer. Every query checks the
//! cache first and stores its result after computing it; blocking traversal
//! runs on the tokio blocking pool.
//!
//! Identical concurrent misses are single-flighted: callers for one key share
//! a gate, and only the holder computes. Waiters re-check the cache once they
//! hold the gate. Errors are never cached, so the next waiter behind a failed
//! computation computes again under the same gate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheStats, TtlCache};
use crate::config::Config;
use crate::corpus::{AvailabilityFlags, CorpusId, CorpusResolver};
use crate::engine::search::validate_query;
use crate::engine::{
    describe_module, get_item, list_entries, search_directory, search_documentation,
    ItemContent, ListingEntry, ModuleInfo, SearchResult,
};
use crate::error::{CorpusError, Result};

// == Cached Payload ==
/// Value stored in the service cache, one variant per cached operation.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Search(Vec<SearchResult>),
    Listing(Vec<ListingEntry>),
    Item(ItemContent),
    Module(ModuleInfo),
}

/// Shared handle to the service cache.
pub type SharedCache = Arc<RwLock<TtlCache<CachedPayload>>>;

// == Corpus Service ==
#[derive(Debug)]
pub struct CorpusService {
    resolver: CorpusResolver,
    max_results: usize,
    cache: SharedCache,
    in_flight: GateMap,
}

impl CorpusService {
    // == Constructor ==
    pub fn new(resolver: CorpusResolver, cache_ttl: Duration, max_results: usize) -> Self {
        Self {
            resolver,
            max_results: max_results.max(1),
            cache: Arc::new(RwLock::new(TtlCache::new(cache_ttl))),
            in_flight: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Resolves corpora and sizes the cache from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CorpusResolver::from_config(config),
            Duration::from_secs(config.cache_ttl),
            config.max_results,
        )
    }

    /// Cache handle, for the background expiry sweep.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }

    pub fn availability(&self) -> AvailabilityFlags {
        self.resolver.flags()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    // == Search ==
    /// Ranked matches for `query`; empty when nothing matches.
    pub async fn search(&self, corpus: CorpusId, query: &str) -> Result<Vec<SearchResult>> {
        validate_query(query)?;
        let location = self.resolver.resolve(corpus)?;

        let key = format!("search:{}:{}", corpus, query);
        let pattern = query.to_string();
        let max_results = self.max_results;
        let payload = self
            .cached(key, move || {
                let suffix = location.suffix();
                let results = if location.id.is_documentation() {
                    search_documentation(&location.root, &suffix, &pattern, max_results)?
                } else {
                    search_directory(&location.root, &suffix, &pattern, max_results)?
                };
                Ok(CachedPayload::Search(results))
            })
            .await?;

        match payload {
            CachedPayload::Search(results) => Ok(results),
            other => Err(unexpected("search", &other)),
        }
    }

    // == List ==
    pub async fn list(&self, corpus: CorpusId) -> Result<Vec<ListingEntry>> {
        let location = self.resolver.resolve(corpus)?;

        let key = format!("list:{}", corpus);
        let payload = self
            .cached(key, move || {
                let entries = list_entries(
                    &location.root,
                    &location.suffix(),
                    location.id.fallback_description(),
                )?;
                Ok(CachedPayload::Listing(entries))
            })
            .await?;

        match payload {
            CachedPayload::Listing(entries) => Ok(entries),
            other => Err(unexpected("list", &other)),
        }
    }

    // == Get Item ==
    pub async fn get_item(&self, corpus: CorpusId, name: &str) -> Result<ItemContent> {
        let location = self.resolver.resolve(corpus)?;

        let key = format!("item:{}:{}", corpus, name);
        let name = name.to_string();
        let payload = self
            .cached(key, move || {
                get_item(&location.root, &name, &location.suffix()).map(CachedPayload::Item)
            })
            .await?;

        match payload {
            CachedPayload::Item(item) => Ok(item),
            other => Err(unexpected("get_item", &other)),
        }
    }

    // == Describe Module ==
    pub async fn describe_module(&self, corpus: CorpusId, module_name: &str) -> Result<ModuleInfo> {
        let location = self.resolver.resolve(corpus)?;

        let key = format!("module:{}:{}", corpus, module_name);
        let module_name = module_name.to_string();
        let payload = self
            .cached(key, move || {
                describe_module(&location.root, &module_name, &location.suffix())
                    .map(CachedPayload::Module)
            })
            .await?;

        match payload {
            CachedPayload::Module(info) => Ok(info),
            other => Err(unexpected("describe_module", &other)),
        }
    }

    // == Cache Management ==
    /// Drops every cached result. Returns the number removed.
    pub async fn cache_clear(&self) -> usize {
        let removed = self.cache.write().await.clear();
        debug!("Cache cleared: {} entries removed", removed);
        removed
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Cached Computation ==
    async fn cached<F>(&self, key: String, compute: F) -> Result<CachedPayload>
    where
        F: FnOnce() -> Result<CachedPayload> + Send + 'static,
    {
        if let Some(hit) = self.cache.write().await.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        let flight = Flight::join(&self.in_flight, &key);
        let permit = Arc::clone(&flight.gate).lock_owned().await;

        // Counted as a miss above; the re-check must not count again.
        if let Some(hit) = self.cache.read().await.peek(&key) {
            debug!("Cache filled while waiting: {}", key);
            return Ok(hit);
        }

        debug!("Cache miss: {}", key);
        let cache = Arc::clone(&self.cache);
        // Permit and membership move into the blocking task so the gate stays
        // held until the result is stored, even if this future is dropped.
        tokio::task::spawn_blocking(move || {
            let outcome = compute();
            if let Ok(payload) = &outcome {
                cache.blocking_write().set(key, payload.clone());
            }
            drop(permit);
            drop(flight);
            outcome
        })
        .await
        .map_err(|e| CorpusError::Internal(format!("Query task failed: {}", e)))?
    }
}

// == In-Flight Gates ==
type Gate = Arc<Mutex<()>>;

#[derive(Debug, Default)]
struct GateSlot {
    gate: Gate,
    members: usize,
}

type GateMap = Arc<StdMutex<HashMap<String, GateSlot>>>;

fn gates(map: &GateMap) -> MutexGuard<'_, HashMap<String, GateSlot>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A caller's membership in the gate for one key.
///
/// Every caller for a key shares one gate for as long as any member remains;
/// the last member to leave removes it from the map.
struct Flight {
    map: GateMap,
    key: String,
    gate: Gate,
}

impl Flight {
    fn join(map: &GateMap, key: &str) -> Self {
        let gate = {
            let mut slots = gates(map);
            let slot = slots.entry(key.to_string()).or_default();
            slot.members += 1;
            Arc::clone(&slot.gate)
        };
        Self {
            map: Arc::clone(map),
            key: key.to_string(),
            gate,
        }
    }
}

impl Drop for Flight {
    fn drop(&mut self) {
        let mut slots = gates(&self.map);
        let vacant = match slots.get_mut(&self.key) {
            Some(slot) if Arc::ptr_eq(&slot.gate, &self.gate) => {
                slot.members = slot.members.saturating_sub(1);
                slot.members == 0
            }
            _ => false,
        };
        if vacant {
            slots.remove(&self.key);
        }
    }
}

fn unexpected(operation: &str, payload: &CachedPayload) -> CorpusError {
    CorpusError::Internal(format!(
        "Cached payload for {} has the wrong shape: {:?}",
        operation, payload
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn fixture() -> (TempDir, CorpusService) {
        let root = TempDir::new().unwrap();
        write(root.path(), "docs/intro.md", "Welcome to the guide.\nfoo appears here\n");
        write(root.path(), "examples/a.rs", "foo bar");
        write(root.path(), "examples/b.rs", "no match");
        write(root.path(), "lib/io/README.md", "I/O module");
        write(root.path(), "lib/io/file.rs", "pub fn open() {}");

        let resolver = CorpusResolver::new(root.path(), None, "md", "rs");
        let service = CorpusService::new(resolver, Duration::from_secs(60), 10);
        (root, service)
    }

    #[tokio::test]
    async fn test_search_examples_end_to_end() {
        let (_root, service) = fixture();

        let results = service.search(CorpusId::Examples, "foo").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file, "a.rs");
        assert_eq!(results[0].line, 1);
        assert_eq!(results[0].content, "foo bar");
    }

    #[tokio::test]
    async fn test_search_docs_has_context() {
        let (_root, service) = fixture();

        let results = service.search(CorpusId::Docs, "FOO").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].context.as_deref(),
            Some("Welcome to the guide.\nfoo appears here")
        );
    }

    #[tokio::test]
    async fn test_search_results_are_cached() {
        let (root, service) = fixture();

        let first = service.search(CorpusId::Examples, "foo").await.unwrap();
        write(root.path(), "examples/c.rs", "foo again");
        let second = service.search(CorpusId::Examples, "foo").await.unwrap();

        assert_eq!(first, second);
        let stats = service.cache_stats().await;
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hits, 1);

        assert_eq!(service.cache_clear().await, 1);
        let third = service.search(CorpusId::Examples, "foo").await.unwrap();
        assert_eq!(third.len(), 2);
    }

    #[tokio::test]
    async fn test_short_query_is_validation_error() {
        let (_root, service) = fixture();

        let result = service.search(CorpusId::Secondary, " x ").await;
        assert!(matches!(result, Err(CorpusError::Validation(_))));
        assert_eq!(service.cache_stats().await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_unavailable_corpus_is_not_found() {
        let (_root, service) = fixture();

        assert!(matches!(
            service.list(CorpusId::Secondary).await,
            Err(CorpusError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_root_list_is_not_found() {
        let resolver = CorpusResolver::new("/no/such/corpus", None, "md", "rs");
        let service = CorpusService::new(resolver, Duration::from_secs(60), 10);

        assert!(matches!(
            service.list(CorpusId::Examples).await,
            Err(CorpusError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_item_and_module() {
        let (_root, service) = fixture();

        let names: Vec<String> = service
            .list(CorpusId::Examples)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let item = service.get_item(CorpusId::Stdlib, "io/file").await.unwrap();
        assert_eq!(item.content, "pub fn open() {}");

        let module = service.describe_module(CorpusId::Stdlib, "io").await.unwrap();
        assert_eq!(module.readme.as_deref(), Some("I/O module"));
        assert_eq!(module.files.len(), 1);
        assert_eq!(module.files[0].path, "io/file.rs");
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let (_root, service) = fixture();

        assert!(service.get_item(CorpusId::Examples, "zzz").await.is_err());
        assert_eq!(service.cache_stats().await.entry_count, 0);
    }

    /// Counts runs and the peak number of overlapping runs of a computation.
    #[derive(Default)]
    struct Tracker {
        active: AtomicUsize,
        peak: AtomicUsize,
        runs: AtomicUsize,
    }

    impl Tracker {
        fn compute(
            self: &Arc<Self>,
            delay: Duration,
            fail: bool,
        ) -> impl FnOnce() -> Result<CachedPayload> + Send + 'static {
            let tracker = Arc::clone(self);
            move || {
                tracker.runs.fetch_add(1, Ordering::SeqCst);
                let now = tracker.active.fetch_add(1, Ordering::SeqCst) + 1;
                tracker.peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(delay);
                tracker.active.fetch_sub(1, Ordering::SeqCst);
                if fail {
                    Err(CorpusError::NotFound("gone".into()))
                } else {
                    Ok(CachedPayload::Listing(Vec::new()))
                }
            }
        }
    }

    fn spawn_cached(
        service: &Arc<CorpusService>,
        tracker: &Arc<Tracker>,
        fail: bool,
    ) -> tokio::task::JoinHandle<Result<CachedPayload>> {
        let service = Arc::clone(service);
        let compute = tracker.compute(Duration::from_millis(200), fail);
        tokio::spawn(async move { service.cached("k".to_string(), compute).await })
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries() {
        let (_root, service) = fixture();
        let service = Arc::new(service);
        let tracker = Arc::new(Tracker::default());

        let handles: Vec<_> = (0..8)
            .map(|_| spawn_cached(&service, &tracker, false))
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(tracker.runs.load(Ordering::SeqCst), 1);
        let stats = service.cache_stats().await;
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 8, "Each caller counted once");
        assert!(gates(&service.in_flight).is_empty());
    }

    #[tokio::test]
    async fn test_single_flight_after_failed_computation() {
        let (_root, service) = fixture();
        let service = Arc::new(service);
        let tracker = Arc::new(Tracker::default());

        let first = spawn_cached(&service, &tracker, true);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = spawn_cached(&service, &tracker, false);
        tokio::time::sleep(Duration::from_millis(200)).await;
        // The first caller has failed and the second is recomputing.
        let third = spawn_cached(&service, &tracker, false);

        assert!(first.await.unwrap().is_err());
        assert!(second.await.unwrap().is_ok());
        assert!(third.await.unwrap().is_ok());

        assert_eq!(tracker.peak.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.runs.load(Ordering::SeqCst), 2, "Third caller reads the cache");
        assert!(gates(&service.in_flight).is_empty());
    }

    #[tokio::test]
    async fn test_dropped_caller_keeps_gate_until_stored() {
        let (_root, service) = fixture();
        let service = Arc::new(service);
        let tracker = Arc::new(Tracker::default());

        let abandoned = spawn_cached(&service, &tracker, false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        abandoned.abort();
        let _ = abandoned.await;

        let follower = spawn_cached(&service, &tracker, false);
        assert!(follower.await.unwrap().is_ok());

        assert_eq!(tracker.peak.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.runs.load(Ordering::SeqCst), 1);
        assert!(gates(&service.in_flight).is_empty());
    }

    #[tokio::test]
    async fn test_expired_results_are_recomputed() {
        let root = TempDir::new().unwrap();
        write(root.path(), "examples/a.rs", "needle");
        let resolver = CorpusResolver::new(root.path(), None, "md", "rs");
        let service = CorpusService::new(resolver, Duration::from_millis(100), 10);

        assert_eq!(service.search(CorpusId::Examples, "needle").await.unwrap().len(), 1);
        write(root.path(), "examples/b.rs", "needle");
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(service.search(CorpusId::Examples, "needle").await.unwrap().len(), 2);
    }
}
