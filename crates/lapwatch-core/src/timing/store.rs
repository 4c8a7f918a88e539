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

//! Contract for the named-duration aggregate.
//!
//! Stopwatches that carry a label add every stopped duration to the total kept
//! under that label. The store is handed to each stopwatch explicitly, so two
//! stopwatches only share totals when they share a store.

use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An error that can occur within a duration store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested label has never been registered or recorded.
    #[error("no duration recorded under label '{0}'")]
    LabelNotFound(String),
    /// An error originating from the storage layer itself.
    #[error("duration store error: {0}")]
    StorageError(String),
}

/// Trait defining the interface for named-duration stores.
pub trait DurationStore: Send + Sync + Debug + 'static {
    /// Makes `label` known with a zero total if it is not known yet.
    fn register(&self, label: &str) -> StoreResult<()>;

    /// Adds `elapsed` to the total under `label`, creating it if needed.
    ///
    /// Returns the new total.
    fn add(&self, label: &str, elapsed: Duration) -> StoreResult<Duration>;

    /// Returns the total under `label`.
    fn total(&self, label: &str) -> StoreResult<Duration>;

    /// Check if a label exists
    fn contains(&self, label: &str) -> bool;

    /// All labels with their totals, sorted by label.
    fn snapshot(&self) -> Vec<(String, Duration)>;

    /// Forget every label.
    fn clear(&self) -> StoreResult<()>;

    /// Number of labels currently stored.
    fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// `true` when no label is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total under `label` in seconds, or zero when unknown.
    fn total_secs_f64(&self, label: &str) -> f64 {
        self.total(label).map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Store that knows nothing, for exercising the provided methods.
    #[derive(Debug)]
    struct EmptyStore;

    impl DurationStore for EmptyStore {
        fn register(&self, _label: &str) -> StoreResult<()> {
            Ok(())
        }

        fn add(&self, _label: &str, elapsed: Duration) -> StoreResult<Duration> {
            Ok(elapsed)
        }

        fn total(&self, label: &str) -> StoreResult<Duration> {
            Err(StoreError::LabelNotFound(label.to_string()))
        }

        fn contains(&self, _label: &str) -> bool {
            false
        }

        fn snapshot(&self) -> Vec<(String, Duration)> {
            Vec::new()
        }

        fn clear(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn provided_methods_fall_back_to_zero() {
        let store = EmptyStore;
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.total_secs_f64("parse"), 0.0);
    }

    #[test]
    fn missing_label_error_names_the_label() {
        let err = EmptyStore.total("parse").unwrap_err();
        assert_eq!(err.to_string(), "no duration recorded under label 'parse'");
    }
}
