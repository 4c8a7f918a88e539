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

//! Error types shared by the timing primitives.

use super::store::StoreError;
use std::io;
use thiserror::Error;

/// A specialized `Result` type for stopwatch operations.
pub type TimerResult<T> = Result<T, TimerError>;

/// An error raised by a stopwatch or one of its adapters.
///
/// Usage errors (`AlreadyRunning`, `NotRunning`) leave the stopwatch exactly as
/// it was before the failing call.
#[derive(Debug, Error)]
pub enum TimerError {
    /// `start()` was called on a running stopwatch.
    #[error("stopwatch is already running, call stop() first")]
    AlreadyRunning,
    /// `stop()` or `pause()` was called on an idle stopwatch.
    #[error("stopwatch is not running, call start() first")]
    NotRunning,
    /// The repeat count must be at least one.
    #[error("repeat count must be at least 1, got {0}")]
    InvalidRepeatCount(usize),
    /// The elapsed-time template could not be parsed.
    #[error("invalid elapsed-time format: {0}")]
    InvalidFormat(String),
    /// The reporter failed to emit a line.
    #[error("failed to report elapsed time: {0}")]
    Report(#[from] io::Error),
    /// The named-duration store rejected an update.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No timer with this name is configured.
    #[error("no timer named '{0}' is configured")]
    UnknownTimer(String),
}
