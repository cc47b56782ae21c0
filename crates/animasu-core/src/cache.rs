//! In-memory TTL cache for scraped pages
//!
//! Entries expire a fixed time after they are written. Expiry is lazy: a
//! lookup that finds a stale entry removes it and reports a miss. There is
//! no background sweep and no capacity bound; `purge_expired` exists for
//! callers that want to reclaim memory explicitly.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::types::{AnimeDetail, CountedListingPage, EpisodePage, ListingPage};

/// Default TTL for cached pages (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Lets tests step past a TTL without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A cached value with expiration time.
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Generic key/value store with a per-entry TTL.
///
/// Writes fully replace any previous entry under the same key. A poisoned
/// lock is treated as a miss on read and a dropped write, never a panic.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache with the default TTL and the system clock.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL and the system clock.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with a custom TTL and clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// TTL applied to every write.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a cached value, or None if missing or expired.
    ///
    /// An expired entry is removed as part of the lookup.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        {
            let guard = self.entries.read().ok()?;
            match guard.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock: another writer may have refreshed it.
        let mut guard = self.entries.write().ok()?;
        match guard.get(key) {
            Some(entry) if entry.is_expired(now) => {
                guard.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Store a value, replacing whatever was cached under `key`.
    pub fn set(&self, key: K, value: V) {
        let expires_at = self.clock.now() + self.ttl;
        if let Ok(mut guard) = self.entries.write() {
            guard.insert(key, CacheEntry { value, expires_at });
        }
    }

    /// Drop a single entry.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries
            .write()
            .ok()
            .and_then(|mut guard| guard.remove(key))
            .map(|entry| entry.value)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        match self.entries.write() {
            Ok(mut guard) => {
                let before = guard.len();
                guard.retain(|_, entry| !entry.is_expired(now));
                before - guard.len()
            }
            Err(_) => 0,
        }
    }

    /// Drop everything.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
    }

    /// Number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Key space of one scraper operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Ongoing,
    Anime,
    Episode,
    Search,
    Genre,
    Character,
    Movies,
    Filter,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Ongoing => "ongoing",
            Namespace::Anime => "anime",
            Namespace::Episode => "episode",
            Namespace::Search => "search",
            Namespace::Genre => "genre",
            Namespace::Character => "character",
            Namespace::Movies => "movies",
            Namespace::Filter => "filter",
        }
    }
}

/// Cache key made of an operation namespace and its arguments.
///
/// Keys compare structurally, so equal arguments under different
/// namespaces never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(namespace: Namespace, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            namespace,
            args: args.into_iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace.as_str())?;
        for arg in &self.args {
            write!(f, "_{}", arg)?;
        }
        Ok(())
    }
}

/// Any result an operation can cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPage {
    Listing(ListingPage),
    CountedListing(CountedListingPage),
    Details(Vec<AnimeDetail>),
    Episode(EpisodePage),
}

/// Conversion between an operation result and its cached form.
pub trait Cacheable: Sized {
    fn into_cached(self) -> CachedPage;
    fn from_cached(page: CachedPage) -> Option<Self>;
}

impl Cacheable for ListingPage {
    fn into_cached(self) -> CachedPage {
        CachedPage::Listing(self)
    }

    fn from_cached(page: CachedPage) -> Option<Self> {
        match page {
            CachedPage::Listing(listing) => Some(listing),
            _ => None,
        }
    }
}

impl Cacheable for CountedListingPage {
    fn into_cached(self) -> CachedPage {
        CachedPage::CountedListing(self)
    }

    fn from_cached(page: CachedPage) -> Option<Self> {
        match page {
            CachedPage::CountedListing(listing) => Some(listing),
            _ => None,
        }
    }
}

impl Cacheable for Vec<AnimeDetail> {
    fn into_cached(self) -> CachedPage {
        CachedPage::Details(self)
    }

    fn from_cached(page: CachedPage) -> Option<Self> {
        match page {
            CachedPage::Details(details) => Some(details),
            _ => None,
        }
    }
}

impl Cacheable for EpisodePage {
    fn into_cached(self) -> CachedPage {
        CachedPage::Episode(self)
    }

    fn from_cached(page: CachedPage) -> Option<Self> {
        match page {
            CachedPage::Episode(episode) => Some(episode),
            _ => None,
        }
    }
}

/// The process-wide page cache shared by scraper operations.
pub type PageCache = TtlCache<CacheKey, CachedPage>;
