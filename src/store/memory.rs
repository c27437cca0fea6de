// In-process relevance store

use crate::error::{RankError, Result};
use crate::store::{checked_counter, sort_entries, RelevanceEntry, RelevanceStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Counters kept for the process lifetime only
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, (f64, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, (f64, DateTime<Utc>)>>> {
        self.records
            .read()
            .map_err(|e| RankError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, (f64, DateTime<Utc>)>>> {
        self.records
            .write()
            .map_err(|e| RankError::LockPoisoned(e.to_string()))
    }
}

impl RelevanceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<f64> {
        Ok(self.read()?.get(key).map_or(0.0, |(value, _)| *value))
    }

    fn set(&self, key: &str, value: f64) -> Result<()> {
        let value = checked_counter(key, value)?;
        self.write()?.insert(key.to_string(), (value, Utc::now()));
        Ok(())
    }

    fn adjust(&self, key: &str, delta: f64) -> Result<f64> {
        let mut values = self.adjust_many(&[(key, delta)])?;
        Ok(values.pop().unwrap_or_default())
    }

    fn adjust_many(&self, deltas: &[(&str, f64)]) -> Result<Vec<f64>> {
        let mut records = self.write()?;

        // Validate the whole batch before touching the map.
        let mut staged: Vec<(&str, f64)> = Vec::with_capacity(deltas.len());
        for &(key, delta) in deltas {
            let delta = checked_counter(key, delta)?;
            let current = staged
                .iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .or_else(|| records.get(key).map(|(v, _)| *v))
                .unwrap_or(0.0);
            staged.push((key, checked_counter(key, current + delta)?));
        }

        let now = Utc::now();
        for &(key, value) in &staged {
            records.insert(key.to_string(), (value, now));
        }
        Ok(staged.into_iter().map(|(_, value)| value).collect())
    }

    fn entries(&self) -> Result<Vec<RelevanceEntry>> {
        let mut entries: Vec<RelevanceEntry> = self
            .read()?
            .iter()
            .map(|(key, (value, updated_at))| RelevanceEntry {
                key: key.clone(),
                value: *value,
                updated_at: *updated_at,
            })
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }

    fn remove_stale(&self, before: DateTime<Utc>) -> Result<usize> {
        let mut records = self.write()?;
        let count = records.len();
        records.retain(|_, (_, updated_at)| *updated_at >= before);
        Ok(count - records.len())
    }

    fn clear(&self) -> Result<usize> {
        let mut records = self.write()?;
        let count = records.len();
        records.clear();
        Ok(count)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::COUNTER_LIMIT;
    use std::sync::Arc;

    #[test]
    fn test_missing_key_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nothing").unwrap(), 0.0);
    }

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set("k", 2.5).unwrap();
        assert_eq!(store.get("k").unwrap(), 2.5);
    }

    #[test]
    fn test_adjust_creates_lazily() {
        let store = MemoryStore::new();
        assert_eq!(store.adjust("k", 1.0).unwrap(), 1.0);
        assert_eq!(store.adjust("k", -3.0).unwrap(), -2.0);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_adjust_many_repeated_key() {
        let store = MemoryStore::new();
        let values = store.adjust_many(&[("a", 1.0), ("b", 2.0), ("a", 1.0)]).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 2.0]);
        assert_eq!(store.get("a").unwrap(), 2.0);
    }

    #[test]
    fn test_adjust_many_all_or_nothing() {
        let store = MemoryStore::new();
        assert!(store.adjust_many(&[("a", 1.0), ("b", f64::NAN)]).is_err());
        assert_eq!(store.get("a").unwrap(), 0.0);
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_counters_clamped() {
        let store = MemoryStore::new();
        store.set("k", 1e12).unwrap();
        assert_eq!(store.get("k").unwrap(), COUNTER_LIMIT);
        assert_eq!(store.adjust("k", 1.0).unwrap(), COUNTER_LIMIT);
        assert_eq!(store.adjust("k", -1.0).unwrap(), COUNTER_LIMIT - 1.0);
    }

    #[test]
    fn test_concurrent_adjust_loses_nothing() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.adjust("shared", 1.0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("shared").unwrap(), 800.0);
    }

    #[test]
    fn test_entries_sorted_by_value() {
        let store = MemoryStore::new();
        store.set("low", 1.0).unwrap();
        store.set("high", 5.0).unwrap();
        store.set("mid", 3.0).unwrap();
        let keys: Vec<String> = store.entries().unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_remove_stale() {
        let store = MemoryStore::new();
        store.set("old", 1.0).unwrap();
        let removed = store
            .remove_stale(Utc::now() + chrono::Duration::seconds(60))
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_remove_stale_keeps_recent() {
        let store = MemoryStore::new();
        store.set("fresh", 1.0).unwrap();
        let removed = store
            .remove_stale(Utc::now() - chrono::Duration::days(1))
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        store.set("a", 1.0).unwrap();
        store.set("b", 1.0).unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.get("a").unwrap(), 0.0);
    }
}
