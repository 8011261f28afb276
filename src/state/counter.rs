use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::StoreError;
use crate::models::CommunityId;
use crate::utils::file::{CountMap, load_counts, save_counts};

/// Result of a counter bump. The new count is always valid; `persisted`
/// carries the outcome of the write-through so the caller can log it.
#[derive(Debug)]
pub struct Incremented {
    pub count: u64,
    pub persisted: Result<(), StoreError>,
}

pub trait CounterStore: Send + Sync {
    fn get(&self, community: &CommunityId) -> u64;
    fn increment(&self, community: &CommunityId) -> Incremented;
}

/// Counter map mirrored to a JSON file on every increment.
pub struct JsonCounterStore {
    path: PathBuf,
    counts: Mutex<CountMap>,
}

impl JsonCounterStore {
    /// Loads the file once. An absent or unreadable file starts the store
    /// empty; the service keeps running with in-memory counts.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let counts = match load_counts(&path) {
            Ok(Some(counts)) => {
                info!(path = %path.display(), guilds = counts.len(), "Loaded reply counters");
                counts
            }
            Ok(None) => {
                info!(path = %path.display(), "No counter file yet, starting from zero");
                CountMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Could not load reply counters, starting from zero");
                CountMap::new()
            }
        };

        Self {
            path,
            counts: Mutex::new(counts),
        }
    }
}

impl CounterStore for JsonCounterStore {
    fn get(&self, community: &CommunityId) -> u64 {
        self.counts.lock().get(community).copied().unwrap_or(0)
    }

    fn increment(&self, community: &CommunityId) -> Incremented {
        // The lock spans the file rewrite so concurrent bumps land in order.
        let mut counts = self.counts.lock();
        let entry = counts.entry(community.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
        let count = *entry;

        Incremented {
            count,
            persisted: save_counts(&self.path, &counts),
        }
    }
}

#[derive(Default)]
pub struct MemoryCounterStore {
    counts: Mutex<CountMap>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, community: &CommunityId) -> u64 {
        self.counts.lock().get(community).copied().unwrap_or(0)
    }

    fn increment(&self, community: &CommunityId) -> Incremented {
        let mut counts = self.counts.lock();
        let entry = counts.entry(community.clone()).or_insert(0);
        *entry = entry.saturating_add(1);

        Incremented {
            count: *entry,
            persisted: Ok(()),
        }
    }
}
