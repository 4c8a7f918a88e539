// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use lapwatch_core::timing::store::{DurationStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// In-memory named-duration store using `RwLock<HashMap>`.
///
/// One instance is shared (through an `Arc`) by every stopwatch that should
/// contribute to the same totals. Create a fresh one per test to keep totals
/// from leaking between tests.
#[derive(Debug, Default)]
pub struct InMemoryDurationStore {
    totals: RwLock<HashMap<String, Duration>>,
}

impl InMemoryDurationStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Duration>>> {
        self.totals
            .write()
            .map_err(|_| StoreError::StorageError("Failed to acquire write lock".to_string()))
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, Duration>>> {
        self.totals
            .read()
            .map_err(|_| StoreError::StorageError("Failed to acquire read lock".to_string()))
    }
}

impl DurationStore for InMemoryDurationStore {
    fn register(&self, label: &str) -> StoreResult<()> {
        self.write()?.entry(label.to_string()).or_default();
        Ok(())
    }

    fn add(&self, label: &str, elapsed: Duration) -> StoreResult<Duration> {
        let mut totals = self.write()?;
        let total = totals.entry(label.to_string()).or_default();
        *total = total.saturating_add(elapsed);
        Ok(*total)
    }

    fn total(&self, label: &str) -> StoreResult<Duration> {
        self.read()?
            .get(label)
            .copied()
            .ok_or_else(|| StoreError::LabelNotFound(label.to_string()))
    }

    fn contains(&self, label: &str) -> bool {
        self.read().map(|totals| totals.contains_key(label)).unwrap_or(false)
    }

    fn snapshot(&self) -> Vec<(String, Duration)> {
        let mut entries: Vec<_> = match self.read() {
            Ok(totals) => totals
                .iter()
                .map(|(label, total)| (label.clone(), *total))
                .collect(),
            Err(_) => Vec::new(),
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.read().map(|totals| totals.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_creates_zero_total() {
        let store = InMemoryDurationStore::new();
        store.register("parse").unwrap();

        assert!(store.contains("parse"));
        assert_eq!(store.total("parse").unwrap(), Duration::ZERO);

        // Registering again keeps the existing total.
        store.add("parse", Duration::from_millis(7)).unwrap();
        store.register("parse").unwrap();
        assert_eq!(store.total("parse").unwrap(), Duration::from_millis(7));
    }

    #[test]
    fn test_add_accumulates_per_label() {
        let store = InMemoryDurationStore::new();

        assert_eq!(
            store.add("sort", Duration::from_millis(5)).unwrap(),
            Duration::from_millis(5)
        );
        assert_eq!(
            store.add("sort", Duration::from_millis(3)).unwrap(),
            Duration::from_millis(8)
        );
        store.add("fib", Duration::from_millis(1)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.snapshot(),
            vec![
                ("fib".to_string(), Duration::from_millis(1)),
                ("sort".to_string(), Duration::from_millis(8)),
            ]
        );
        assert!((store.total_secs_f64("sort") - 0.008).abs() < 1e-12);
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let store = InMemoryDurationStore::new();
        store.add("long", Duration::MAX).unwrap();

        assert_eq!(
            store.add("long", Duration::from_secs(1)).unwrap(),
            Duration::MAX
        );
        assert_eq!(store.total("long").unwrap(), Duration::MAX);
    }

    #[test]
    fn test_clear_all() {
        let store = InMemoryDurationStore::new();
        store.add("x", Duration::from_secs(1)).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store.total("x").is_err());
    }
}
