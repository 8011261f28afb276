mod cooldown;
mod counter;

use std::path::PathBuf;

use thiserror::Error;

pub use cooldown::{CooldownGate, CooldownPolicy, MemoryCooldown};
pub use counter::{CounterStore, Incremented, JsonCounterStore, MemoryCounterStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("counter file {path} is not a valid count map: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
