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

//! The stopwatch state machine.
//!
//! A [`Stopwatch`] is either idle or running. `start` moves it to running,
//! `stop` moves it back to idle, records one trial and, once `repeat_count`
//! trials have accumulated, reports the fastest of them. `pause` banks the
//! time measured so far without recording a trial, so that the next
//! `start`/`stop` pair continues from there.

use super::error::{TimerError, TimerResult};
use super::format::ElapsedFormat;
use super::report::{Reporter, StdoutReporter};
use super::store::DurationStore;
use crate::clock::{Clock, MonotonicClock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A reusable elapsed-time tracker.
///
/// Not meant to be shared between threads: one flow of control drives one
/// stopwatch at a time.
pub struct Stopwatch {
    label: Option<String>,
    format: ElapsedFormat,
    reporter: Option<Box<dyn Reporter>>,
    repeat_count: usize,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn DurationStore>>,
    running_since: Option<Duration>,
    accumulated: Duration,
    trial_durations: Vec<Duration>,
    window_len: usize,
}

impl Stopwatch {
    /// Creates an idle stopwatch with the default format, reporting to stdout
    /// after every stop.
    pub fn new() -> Self {
        Self {
            label: None,
            format: ElapsedFormat::default(),
            reporter: Some(Box::new(StdoutReporter)),
            repeat_count: 1,
            clock: Arc::new(MonotonicClock::new()),
            store: None,
            running_since: None,
            accumulated: Duration::ZERO,
            trial_durations: Vec::new(),
            window_len: 0,
        }
    }

    /// Returns a builder for a configured stopwatch.
    pub fn builder() -> StopwatchBuilder {
        StopwatchBuilder::new()
    }

    /// Starts timing.
    ///
    /// Fails with [`TimerError::AlreadyRunning`] if the stopwatch is running.
    pub fn start(&mut self) -> TimerResult<()> {
        if self.running_since.is_some() {
            return Err(TimerError::AlreadyRunning);
        }
        self.running_since = Some(self.clock.now());
        Ok(())
    }

    /// Banks the time measured since the last `start` and goes idle without
    /// recording a trial or reporting.
    ///
    /// Returns the total banked so far. A later `start` resumes timing and
    /// the next `stop` includes the banked time.
    pub fn pause(&mut self) -> TimerResult<Duration> {
        let since = self.running_since.take().ok_or(TimerError::NotRunning)?;
        self.accumulated += self.clock.now().saturating_sub(since);
        Ok(self.accumulated)
    }

    /// Stops timing, records the trial and returns its duration.
    ///
    /// The trial is added to the named aggregate when the stopwatch has both
    /// a label and a store. When the reporting window is full, the minimum of
    /// the window is formatted and handed to the reporter. A reporter or
    /// store failure is returned after the trial has been recorded.
    pub fn stop(&mut self) -> TimerResult<Duration> {
        let since = self.running_since.ok_or(TimerError::NotRunning)?;
        let elapsed = self.accumulated + self.clock.now().saturating_sub(since);

        self.running_since = None;
        self.accumulated = Duration::ZERO;
        self.trial_durations.push(elapsed);
        self.window_len += 1;

        let stored = match (&self.label, &self.store) {
            (Some(label), Some(store)) => store.add(label, elapsed).map(drop),
            _ => Ok(()),
        };

        // The window is closed even when the store rejected the trial.
        if self.window_len >= self.repeat_count {
            self.complete_window()?;
        }
        stored?;
        Ok(elapsed)
    }

    fn complete_window(&mut self) -> TimerResult<()> {
        let window = &self.trial_durations[self.trial_durations.len() - self.window_len..];
        let best = window.iter().min().copied().unwrap_or_default();
        if window.len() > 1 {
            log::debug!(
                "{} trials for {}: {:?} (min {:?})",
                window.len(),
                self.label.as_deref().unwrap_or("unnamed stopwatch"),
                window,
                best
            );
        }
        self.window_len = 0;

        if let Some(reporter) = self.reporter.as_mut() {
            let line = self.format.render(best);
            reporter.report(&line)?;
        }
        Ok(())
    }

    /// Drops the trials of an unfinished reporting window without reporting.
    ///
    /// The trials stay in [`Stopwatch::trial_durations`]; only the window
    /// restarts.
    pub fn abandon_cycle(&mut self) {
        if self.window_len > 0 {
            log::trace!(
                "Abandoning {} of {} trials without reporting",
                self.window_len,
                self.repeat_count
            );
        }
        self.window_len = 0;
    }

    /// Clears all recorded trials and banked time.
    ///
    /// Fails with [`TimerError::AlreadyRunning`] while running.
    pub fn reset(&mut self) -> TimerResult<()> {
        if self.running_since.is_some() {
            return Err(TimerError::AlreadyRunning);
        }
        self.accumulated = Duration::ZERO;
        self.trial_durations.clear();
        self.window_len = 0;
        Ok(())
    }

    /// Returns `true` between a `start` and the matching `stop` or `pause`.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// The time measured so far in the current trial, including banked time.
    pub fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map(|since| self.clock.now().saturating_sub(since))
            .unwrap_or_default();
        self.accumulated + running
    }

    /// Every completed trial, oldest first.
    pub fn trial_durations(&self) -> &[Duration] {
        &self.trial_durations
    }

    /// Trials recorded since the last report.
    pub fn pending_trials(&self) -> &[Duration] {
        &self.trial_durations[self.trial_durations.len() - self.window_len..]
    }

    /// The shortest completed trial.
    pub fn best_trial(&self) -> Option<Duration> {
        self.trial_durations.iter().min().copied()
    }

    /// The label keying the named aggregate.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of trials per reporting window.
    pub fn repeat_count(&self) -> usize {
        self.repeat_count
    }

    /// The template applied to reported durations.
    pub fn format(&self) -> &ElapsedFormat {
        &self.format
    }

    /// `true` when a reporter is attached.
    pub fn has_reporter(&self) -> bool {
        self.reporter.is_some()
    }

    /// The store receiving labelled durations.
    pub fn store(&self) -> Option<&Arc<dyn DurationStore>> {
        self.store.as_ref()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stopwatch")
            .field("label", &self.label)
            .field("format", &self.format.template())
            .field("reporter", &self.reporter.is_some())
            .field("repeat_count", &self.repeat_count)
            .field("running", &self.is_running())
            .field("accumulated", &self.accumulated)
            .field("trial_durations", &self.trial_durations)
            .finish()
    }
}

/// Builder for [`Stopwatch`].
pub struct StopwatchBuilder {
    label: Option<String>,
    format: Option<String>,
    reporter: Option<Box<dyn Reporter>>,
    repeat_count: usize,
    clock: Option<Arc<dyn Clock>>,
    store: Option<Arc<dyn DurationStore>>,
}

impl StopwatchBuilder {
    /// Starts from the defaults of [`Stopwatch::new`].
    pub fn new() -> Self {
        Self {
            label: None,
            format: None,
            reporter: Some(Box::new(StdoutReporter)),
            repeat_count: 1,
            clock: None,
            store: None,
        }
    }

    /// Sets the label keying the named aggregate.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the elapsed-time template, validated by [`StopwatchBuilder::build`].
    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    /// Replaces the reporter.
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Replaces the reporter with an already boxed one, or disables
    /// reporting with `None`.
    pub fn boxed_reporter(mut self, reporter: Option<Box<dyn Reporter>>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Disables reporting.
    pub fn silent(mut self) -> Self {
        self.reporter = None;
        self
    }

    /// Sets how many trials make up one reporting window.
    pub fn repeat_count(mut self, repeat_count: usize) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Uses `clock` instead of a fresh [`MonotonicClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sends labelled durations to `store`.
    pub fn store(mut self, store: Arc<dyn DurationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validates the configuration and creates an idle stopwatch.
    ///
    /// A labelled stopwatch registers its label in the store with a zero
    /// total, so the label is visible before the first stop.
    pub fn build(self) -> TimerResult<Stopwatch> {
        if self.repeat_count == 0 {
            return Err(TimerError::InvalidRepeatCount(self.repeat_count));
        }
        let format = match self.format {
            Some(template) => ElapsedFormat::parse(&template)?,
            None => ElapsedFormat::default(),
        };
        if let (Some(label), Some(store)) = (&self.label, &self.store) {
            store.register(label)?;
        }

        Ok(Stopwatch {
            label: self.label,
            format,
            reporter: self.reporter,
            repeat_count: self.repeat_count,
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(MonotonicClock::new())),
            store: self.store,
            running_since: None,
            accumulated: Duration::ZERO,
            trial_durations: Vec::new(),
            window_len: 0,
        })
    }
}

impl Default for StopwatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
