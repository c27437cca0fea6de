pub mod memory;
pub mod sqlite;

use crate::config::{Config, StoreBackend};
use crate::error::{RankError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde::Serialize;
use std::sync::Arc;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Largest counter magnitude; values are clamped into `[-COUNTER_LIMIT, COUNTER_LIMIT]`.
/// Inside this range one reinforcement still changes the bias factor in `f64`.
pub const COUNTER_LIMIT: f64 = 1e6;

/// One persisted relevance counter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceEntry {
    pub key: String,
    pub value: f64,
    pub updated_at: DateTime<Utc>,
}

/// Key-value persistence for relevance counters.
///
/// Missing keys read as zero. `adjust` must be atomic per key so concurrent
/// reinforcement never loses an update.
pub trait RelevanceStore: Send + Sync {
    /// Current value, zero when the key was never written
    fn get(&self, key: &str) -> Result<f64>;

    fn set(&self, key: &str, value: f64) -> Result<()>;

    /// Add `delta` to the stored value and return the new value
    fn adjust(&self, key: &str, delta: f64) -> Result<f64>;

    /// Apply every `(key, delta)` pair or none of them; new values in order
    fn adjust_many(&self, deltas: &[(&str, f64)]) -> Result<Vec<f64>>;

    /// All records, highest value first
    fn entries(&self) -> Result<Vec<RelevanceEntry>>;

    /// Drop records not updated since `before`
    fn remove_stale(&self, before: DateTime<Utc>) -> Result<usize>;

    /// Drop every record
    fn clear(&self) -> Result<usize>;

    fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }
}

/// Open the store selected by the configuration; `None` disables learning
pub fn open(config: &Config) -> Result<Option<Arc<dyn RelevanceStore>>> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            let path = config.store_path();
            info!("Opening relevance store: {:?}", path);
            Ok(Some(Arc::new(SqliteStore::open(&path)?)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory relevance store");
            Ok(Some(Arc::new(MemoryStore::new())))
        }
        StoreBackend::None => {
            info!("Relevance store disabled");
            Ok(None)
        }
    }
}

/// Reject non-finite values and clamp the rest into the supported range
pub(crate) fn checked_counter(key: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(RankError::InvalidValue(format!("{} = {}", key, value)));
    }
    Ok(value.clamp(-COUNTER_LIMIT, COUNTER_LIMIT))
}

/// Fixed-width UTC timestamp, so textual order matches time order
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Unreadable timestamps sort as oldest
pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Highest value first, key order for ties
pub(crate) fn sort_entries(entries: &mut [RelevanceEntry]) {
    entries.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
}
