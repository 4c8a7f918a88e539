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

//! Reporter routing elapsed-time lines through the `log` facade.

use lapwatch_core::timing::Reporter;
use std::io;

/// Target used when none is given.
pub const DEFAULT_TARGET: &str = "lapwatch";

/// Emits every report line as a log record.
#[derive(Debug, Clone)]
pub struct LogReporter {
    level: log::Level,
    target: String,
}

impl LogReporter {
    /// Logs at `level` under the default target.
    pub fn new(level: log::Level) -> Self {
        Self {
            level,
            target: DEFAULT_TARGET.to_string(),
        }
    }

    /// Logs under `target` instead of the default one.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// The level records are emitted at.
    pub fn level(&self) -> log::Level {
        self.level
    }

    /// The target records are emitted under.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl Reporter for LogReporter {
    fn report(&mut self, line: &str) -> io::Result<()> {
        log::log!(target: self.target.as_str(), self.level, "{line}");
        Ok(())
    }
}
