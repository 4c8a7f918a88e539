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

//! Provides RAII-based scope timers. (RAII = Resource Acquisition Is Initialization)

use lapwatch_core::timing::{Stopwatch, TimerError, TimerResult};
use std::thread;
use std::time::Duration;

/// Times a scope with a [`Stopwatch`]: started on creation, stopped exactly
/// once when the scope ends.
///
/// This leverages the RAII pattern to ensure that the trial is always
/// recorded, even in the case of early returns or panics. Call
/// [`ScopedTimer::finish`] to observe the result of the stop; a guard that is
/// simply dropped logs any stop failure instead.
pub struct ScopedTimer<'a> {
    stopwatch: &'a mut Stopwatch,
    stopped: bool,
}

impl<'a> ScopedTimer<'a> {
    /// Starts `stopwatch` and returns the guard that will stop it.
    pub fn start(stopwatch: &'a mut Stopwatch) -> TimerResult<Self> {
        stopwatch.start()?;
        Ok(Self {
            stopwatch,
            stopped: false,
        })
    }

    /// Time measured so far in this scope.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// Ends the scope now and returns the stopwatch's `stop()` result.
    pub fn finish(mut self) -> TimerResult<Duration> {
        self.stopped = true;
        self.stopwatch.stop()
    }
}

/// When the timer goes out of scope without `finish`, it stops the stopwatch.
impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }
        let unwinding = thread::panicking();
        match self.stopwatch.stop() {
            Ok(elapsed) if unwinding => log::warn!(
                "[ScopedTimer] {} exited by unwinding after {:?}",
                self.stopwatch.label().unwrap_or("timed scope"),
                elapsed
            ),
            Ok(_) => {}
            Err(e) => log::warn!("[ScopedTimer] Failed to stop stopwatch: {e}"),
        }
    }
}

/// Runs `body` as one timed trial of `stopwatch` and returns its value.
///
/// A panic in `body` still records the trial before unwinding continues.
pub fn time_scope<T>(stopwatch: &mut Stopwatch, body: impl FnOnce() -> T) -> TimerResult<T> {
    let guard = ScopedTimer::start(stopwatch)?;
    let value = body();
    guard.finish()?;
    Ok(value)
}

/// Runs a fallible `body` as one timed trial of `stopwatch`.
///
/// The trial is recorded whether `body` succeeds or fails. An error from
/// `body` takes precedence over an error from stopping the stopwatch.
pub fn time_fallible<T, E>(
    stopwatch: &mut Stopwatch,
    body: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    E: From<TimerError>,
{
    let guard = ScopedTimer::start(stopwatch)?;
    let outcome = body();
    let stopped = guard.finish();
    let value = outcome?;
    stopped?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapwatch_core::clock::ManualClock;
    use lapwatch_core::timing::MemoryReporter;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    fn stopwatch() -> (Stopwatch, Arc<ManualClock>, MemoryReporter) {
        let clock = Arc::new(ManualClock::new());
        let reporter = MemoryReporter::new();
        let watch = Stopwatch::builder()
            .clock(clock.clone())
            .reporter(reporter.clone())
            .build()
            .unwrap();
        (watch, clock, reporter)
    }

    #[derive(Debug)]
    enum JobError {
        Timer(TimerError),
        Failed,
    }

    impl From<TimerError> for JobError {
        fn from(e: TimerError) -> Self {
            JobError::Timer(e)
        }
    }

    #[test]
    fn guard_stops_when_dropped() {
        let (mut watch, clock, reporter) = stopwatch();
        {
            let guard = ScopedTimer::start(&mut watch).unwrap();
            clock.advance_ms(40);
            assert_eq!(guard.elapsed(), Duration::from_millis(40));
        }
        assert!(!watch.is_running());
        assert_eq!(watch.trial_durations(), &[Duration::from_millis(40)]);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn finish_stops_exactly_once() {
        let (mut watch, clock, reporter) = stopwatch();
        let guard = ScopedTimer::start(&mut watch).unwrap();
        clock.advance_ms(5);
        assert_eq!(guard.finish().unwrap(), Duration::from_millis(5));

        assert_eq!(watch.trial_durations().len(), 1);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn starting_a_running_stopwatch_fails() {
        let (mut watch, _, _) = stopwatch();
        watch.start().unwrap();
        assert!(matches!(
            ScopedTimer::start(&mut watch),
            Err(TimerError::AlreadyRunning)
        ));
        assert!(watch.is_running());
    }

    #[test]
    fn time_scope_returns_body_value() {
        let (mut watch, clock, _) = stopwatch();
        let value = time_scope(&mut watch, || {
            clock.advance_ms(9);
            21 * 2
        })
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(watch.trial_durations(), &[Duration::from_millis(9)]);
    }

    #[test]
    fn panic_inside_scope_still_records_trial() {
        let (mut watch, clock, reporter) = stopwatch();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            time_scope(&mut watch, || {
                clock.advance_ms(7);
                panic!("body failed");
            })
        }));

        assert!(result.is_err(), "the panic must keep propagating");
        assert!(!watch.is_running());
        assert_eq!(watch.trial_durations(), &[Duration::from_millis(7)]);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn failing_body_records_trial_and_returns_its_error() {
        let (mut watch, clock, _) = stopwatch();

        let result: Result<u32, JobError> = time_fallible(&mut watch, || {
            clock.advance_ms(3);
            Err(JobError::Failed)
        });

        assert!(matches!(result, Err(JobError::Failed)));
        assert_eq!(watch.trial_durations(), &[Duration::from_millis(3)]);
    }

    #[test]
    fn fallible_scope_surfaces_start_errors() {
        let (mut watch, _, _) = stopwatch();
        watch.start().unwrap();

        let result: Result<(), JobError> = time_fallible(&mut watch, || Ok(()));
        assert!(matches!(
            result,
            Err(JobError::Timer(TimerError::AlreadyRunning))
        ));
    }
}
