//! Memoization of fully rendered output.

use std::collections::HashMap;
use std::sync::RwLock;

use sha2::{Digest, Sha256};

use crate::render::RenderOptions;

/// Content hash of everything that influences a rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(citations: &str, options: &RenderOptions) -> CacheKey {
        let mut hasher = Sha256::new();
        for field in &[
            citations,
            options.prefix.as_str(),
            options.postfix.as_str(),
            options.separator.as_str(),
        ] {
            // Length prefixes keep ("ab", "c") and ("a", "bc") apart.
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update([options.show_count as u8]);
        CacheKey(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait ResultCache {
    fn get(&self, key: &CacheKey) -> Option<String>;
    fn put(&self, key: CacheKey, output: String);
}

/// Cache that never remembers anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<String> {
        None
    }

    fn put(&self, _key: CacheKey, _output: String) {}
}

/// Process-wide cache shared between requests.
///
/// Holds at most `capacity` renderings. Once full, storing a new key drops an
/// arbitrary older one.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, String>>,
    capacity: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        MemoryCache::bounded(DEFAULT_CAPACITY)
    }
}

pub const DEFAULT_CAPACITY: usize = 10_000;

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        MemoryCache {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn put(&self, key: CacheKey, output: String) {
        match self.entries.write() {
            Ok(mut entries) => {
                if self.capacity == 0 {
                    return;
                }
                if entries.len() >= self.capacity && !entries.contains_key(&key) {
                    let evicted = entries.keys().next().cloned();
                    if let Some(evicted) = evicted {
                        trace!("cache full, evicting {}", evicted.as_str());
                        entries.remove(&evicted);
                    }
                }
                entries.insert(key, output);
            }
            Err(_) => warn!("result cache lock poisoned; dropping entry"),
        }
    }
}
