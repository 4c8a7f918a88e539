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

//! Provides the foundational types for elapsed-time measurement.
//!
//! This module defines the "common language" shared by every timing adapter:
//! the [`Stopwatch`] state machine, the template used to format reported
//! durations, the reporter that receives them, and the store that aggregates
//! labelled durations. `lapwatch-telemetry` builds the scoped, call-wrapping
//! and recursion-aware adapters on top of these contracts.

pub mod error;
pub mod format;
pub mod report;
pub mod stopwatch;
pub mod store;

pub use self::error::{TimerError, TimerResult};
pub use self::format::{ElapsedFormat, DEFAULT_TEMPLATE};
pub use self::report::{MemoryReporter, Reporter, StdoutReporter};
pub use self::stopwatch::{Stopwatch, StopwatchBuilder};
pub use self::store::{DurationStore, StoreError, StoreResult};
