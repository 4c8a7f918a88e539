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

//! JSON configuration for named timers.
//!
//! ```json
//! {
//!   "timers": {
//!     "sort": { "repeat_count": 5, "format": "sorted in {:0.4f} s" },
//!     "fib": { "reporter": { "kind": "log", "level": "debug" } },
//!     "quiet": { "reporter": { "kind": "none" } }
//!   }
//! }
//! ```

use crate::reporting::LogReporter;
use anyhow::Context;
use lapwatch_core::timing::{Reporter, StdoutReporter, StopwatchBuilder, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Log levels accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelConfig {
    /// `log::Level::Error`
    Error,
    /// `log::Level::Warn`
    Warn,
    /// `log::Level::Info`
    #[default]
    Info,
    /// `log::Level::Debug`
    Debug,
    /// `log::Level::Trace`
    Trace,
}

impl From<LevelConfig> for log::Level {
    fn from(level: LevelConfig) -> Self {
        match level {
            LevelConfig::Error => log::Level::Error,
            LevelConfig::Warn => log::Level::Warn,
            LevelConfig::Info => log::Level::Info,
            LevelConfig::Debug => log::Level::Debug,
            LevelConfig::Trace => log::Level::Trace,
        }
    }
}

/// Where a configured timer sends its reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReporterConfig {
    /// Print to standard output.
    #[default]
    Stdout,
    /// Emit a log record.
    Log {
        /// Level of the record.
        #[serde(default)]
        level: LevelConfig,
        /// Target of the record, `lapwatch` when absent.
        #[serde(default)]
        target: Option<String>,
    },
    /// Do not report.
    None,
}

impl ReporterConfig {
    /// Creates the configured reporter, `None` when reporting is disabled.
    pub fn build(&self) -> Option<Box<dyn Reporter>> {
        match self {
            ReporterConfig::Stdout => Some(Box::new(StdoutReporter)),
            ReporterConfig::Log { level, target } => {
                let mut reporter = LogReporter::new((*level).into());
                if let Some(target) = target {
                    reporter = reporter.with_target(target.clone());
                }
                Some(Box::new(reporter))
            }
            ReporterConfig::None => None,
        }
    }
}

/// Configuration for a single timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Label keying the named aggregate. Defaults to the timer's name when
    /// built through a `TimingService`.
    pub label: Option<String>,
    /// Template for reported durations
    pub format: String,
    /// Reporting sink
    pub reporter: ReporterConfig,
    /// Trials per reporting window
    pub repeat_count: usize,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            label: None,
            format: DEFAULT_TEMPLATE.to_string(),
            reporter: ReporterConfig::default(),
            repeat_count: 1,
        }
    }
}

impl TimerConfig {
    /// A stopwatch builder carrying this configuration.
    ///
    /// Format and repeat count are validated by the builder's `build`.
    pub fn builder(&self) -> StopwatchBuilder {
        let mut builder = StopwatchBuilder::new()
            .format(self.format.clone())
            .repeat_count(self.repeat_count)
            .boxed_reporter(self.reporter.build());
        if let Some(label) = &self.label {
            builder = builder.label(label.clone());
        }
        builder
    }
}

/// Complete timers configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimersConfig {
    /// Map of timer name to configuration
    #[serde(default)]
    pub timers: HashMap<String, TimerConfig>,
}

impl TimersConfig {
    /// Load timers configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load timers configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timers config {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse timers config {}", path.display()))
    }

    /// Save timers configuration to JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write timers config {}", path.display()))?;
        Ok(())
    }

    /// Adds or replaces the configuration of `name`.
    pub fn insert(&mut self, name: impl Into<String>, config: TimerConfig) -> &mut Self {
        self.timers.insert(name.into(), config);
        self
    }

    /// Configuration of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&TimerConfig> {
        self.timers.get(name)
    }
}
