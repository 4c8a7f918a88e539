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

//! Service building configured timers that share one duration store.

use crate::adapters::recursive::RecursiveTimer;
use crate::adapters::timed_fn::TimedFn;
use crate::config::{TimerConfig, TimersConfig};
use crate::storage::memory_store::InMemoryDurationStore;
use lapwatch_core::clock::{Clock, MonotonicClock};
use lapwatch_core::timing::{DurationStore, Stopwatch, TimerError, TimerResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Builds stopwatches from a [`TimersConfig`].
///
/// Every stopwatch built by the service shares the service's clock and
/// accumulates into its store, under the configured label or, when none is
/// configured, under the timer's name.
#[derive(Debug)]
pub struct TimingService {
    config: TimersConfig,
    store: Arc<dyn DurationStore>,
    clock: Arc<dyn Clock>,
}

impl TimingService {
    /// Creates a service over an in-memory store and the monotonic clock.
    pub fn new(config: TimersConfig) -> Self {
        Self {
            config,
            store: Arc::new(InMemoryDurationStore::new()),
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Loads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = TimersConfig::from_file(path)?;
        log::debug!("Loaded {} timer configuration(s)", config.timers.len());
        Ok(Self::new(config))
    }

    /// Replaces the duration store.
    pub fn with_store(mut self, store: Arc<dyn DurationStore>) -> Self {
        self.store = store;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the stopwatch configured under `name`.
    pub fn stopwatch(&self, name: &str) -> TimerResult<Stopwatch> {
        let config = self
            .config
            .get(name)
            .ok_or_else(|| TimerError::UnknownTimer(name.to_string()))?;
        self.build(name, config)
    }

    /// Builds an unconfigured stopwatch aggregating under `label`.
    ///
    /// It uses the default format and reports to stdout once per trial.
    pub fn labelled(&self, label: &str) -> TimerResult<Stopwatch> {
        self.build(label, &TimerConfig::default())
    }

    /// Wraps `func` with the stopwatch configured under `name`.
    pub fn timed_fn<F>(&self, name: &str, func: F) -> TimerResult<TimedFn<F>> {
        Ok(TimedFn::new(func, self.stopwatch(name)?))
    }

    /// A recursion-aware timer using the stopwatch configured under `name`.
    pub fn recursive_timer(&self, name: &str) -> TimerResult<RecursiveTimer> {
        Ok(RecursiveTimer::new(self.stopwatch(name)?))
    }

    /// The shared duration store.
    pub fn store(&self) -> &Arc<dyn DurationStore> {
        &self.store
    }

    /// The configuration the service was created with.
    pub fn config(&self) -> &TimersConfig {
        &self.config
    }

    /// Accumulated totals, sorted by label.
    pub fn totals(&self) -> Vec<(String, Duration)> {
        self.store.snapshot()
    }

    /// Logs every accumulated total at info level.
    pub fn log_summary(&self) {
        let totals = self.totals();
        if totals.is_empty() {
            log::info!("No timings recorded");
            return;
        }
        for (label, total) in totals {
            log::info!("{label}: {:.6} s total", total.as_secs_f64());
        }
    }

    fn build(&self, name: &str, config: &TimerConfig) -> TimerResult<Stopwatch> {
        let mut builder = config.builder();
        if config.label.is_none() {
            builder = builder.label(name);
        }
        builder
            .clock(self.clock.clone())
            .store(self.store.clone())
            .build()
    }
}

impl Default for TimingService {
    fn default() -> Self {
        Self::new(TimersConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReporterConfig;
    use lapwatch_core::clock::ManualClock;

    fn quiet(repeat_count: usize, label: Option<&str>) -> TimerConfig {
        TimerConfig {
            label: label.map(str::to_string),
            reporter: ReporterConfig::None,
            repeat_count,
            ..TimerConfig::default()
        }
    }

    fn service() -> (TimingService, Arc<ManualClock>) {
        let mut config = TimersConfig::default();
        config
            .insert("parse", quiet(1, None))
            .insert("lex", quiet(1, Some("frontend")))
            .insert("emit", quiet(1, Some("frontend")))
            .insert("bench", quiet(3, None));
        let clock = Arc::new(ManualClock::new());
        (TimingService::new(config).with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_unknown_timer_is_an_error() {
        let (service, _) = service();
        let err = service.stopwatch("missing").unwrap_err();
        assert!(matches!(err, TimerError::UnknownTimer(ref name) if name == "missing"));
    }

    #[test]
    fn test_label_defaults_to_timer_name() {
        let (service, clock) = service();
        let mut watch = service.stopwatch("parse").unwrap();
        assert_eq!(watch.label(), Some("parse"));
        assert_eq!(service.store().total("parse").unwrap(), Duration::ZERO);

        watch.start().unwrap();
        clock.advance_ms(8);
        watch.stop().unwrap();
        assert_eq!(
            service.store().total("parse").unwrap(),
            Duration::from_millis(8)
        );
    }

    #[test]
    fn test_shared_label_accumulates_across_timers() {
        let (service, clock) = service();
        let mut lex = service.stopwatch("lex").unwrap();
        let mut emit = service.stopwatch("emit").unwrap();

        lex.start().unwrap();
        clock.advance_ms(3);
        lex.stop().unwrap();
        emit.start().unwrap();
        clock.advance_ms(4);
        emit.stop().unwrap();

        assert_eq!(
            service.totals(),
            vec![("frontend".to_string(), Duration::from_millis(7))]
        );
        assert!(!service.store().contains("lex"));
    }

    #[test]
    fn test_timed_fn_uses_configured_repeat_count() {
        let (service, clock) = service();
        let mut timed = service.timed_fn("bench", || clock.advance_ms(2)).unwrap();
        timed.call().unwrap();

        assert_eq!(timed.stopwatch().trial_durations().len(), 3);
        assert_eq!(
            service.store().total("bench").unwrap(),
            Duration::from_millis(6)
        );
    }

    #[test]
    fn test_recursive_timer_from_config() {
        let (service, _) = service();
        let timer = service.recursive_timer("parse").unwrap();
        assert_eq!(timer.enter(|| 42).unwrap(), 42);
        assert_eq!(timer.stopwatch().trial_durations().len(), 1);
    }

    #[test]
    fn test_labelled_registers_label() {
        let service = TimingService::default();
        let watch = service.labelled("adhoc").unwrap();
        assert_eq!(watch.label(), Some("adhoc"));
        assert!(service.store().contains("adhoc"));
        service.log_summary();
    }
}
