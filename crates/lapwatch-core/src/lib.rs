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

//! # Lapwatch Core
//!
//! Foundational crate containing the stopwatch state machine, the clock
//! abstraction and the contracts shared by every timing adapter.

#![warn(missing_docs)]

pub mod clock;
pub mod timing;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use timing::{
    DurationStore, ElapsedFormat, MemoryReporter, Reporter, StdoutReporter, Stopwatch,
    StopwatchBuilder, StoreError, StoreResult, TimerError, TimerResult, DEFAULT_TEMPLATE,
};
