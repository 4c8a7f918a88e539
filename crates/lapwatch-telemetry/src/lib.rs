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

//! # Lapwatch Telemetry
//!
//! Timing adapters built on `lapwatch-core`: scope guards, call wrappers,
//! recursion-aware timers, an in-memory duration store, a `log` reporter,
//! JSON timer configuration and the service tying them together.

#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod logging;
pub mod reporting;
pub mod service;
pub mod storage;
pub mod utils;

pub use adapters::{RecursionGuard, RecursiveTimer, TimedFn};
pub use config::{LevelConfig, ReporterConfig, TimerConfig, TimersConfig};
pub use reporting::LogReporter;
pub use service::TimingService;
pub use storage::InMemoryDurationStore;
pub use utils::{time_fallible, time_scope, ScopedTimer};
