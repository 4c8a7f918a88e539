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

//! Timing for directly self-recursive functions.
//!
//! Wrapping every level of a recursion in its own timer would report once per
//! call. A [`RecursiveTimer`] only times the outermost call of a chain, so a
//! recursion of any depth yields exactly one report per external call.

use crate::utils::timer::ScopedTimer;
use lapwatch_core::timing::{Stopwatch, TimerResult};
use std::cell::{Cell, Ref, RefCell};

/// Tracks whether the next call into a wrapped function is an outermost one.
///
/// The flag is shared by every call of the wrapped function, recursive ones
/// included. It uses `Cell` and is therefore not `Sync`: only one call chain
/// may be in flight per guard.
#[derive(Debug)]
pub struct RecursionGuard {
    is_outermost_call: Cell<bool>,
}

impl RecursionGuard {
    /// Creates a guard expecting an outermost call.
    pub fn new() -> Self {
        Self {
            is_outermost_call: Cell::new(true),
        }
    }

    /// `true` when no call chain is currently in flight.
    pub fn is_outermost_call(&self) -> bool {
        self.is_outermost_call.get()
    }

    /// Claims the outermost frame if no chain is in flight.
    ///
    /// The flag is restored when the returned frame is dropped, which happens
    /// when the outermost call finishes or unwinds. Nested calls get `None`.
    pub fn enter(&self) -> Option<OutermostFrame<'_>> {
        if self.is_outermost_call.replace(false) {
            Some(OutermostFrame { guard: self })
        } else {
            None
        }
    }
}

impl Default for RecursionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// The outermost call of a chain; dropping it ends the chain.
#[derive(Debug)]
pub struct OutermostFrame<'a> {
    guard: &'a RecursionGuard,
}

impl Drop for OutermostFrame<'_> {
    fn drop(&mut self) {
        self.guard.is_outermost_call.set(true);
    }
}

/// A stopwatch that times only the outermost call of a recursive chain.
///
/// The wrapped function routes each of its calls, recursive ones included,
/// through [`RecursiveTimer::enter`].
#[derive(Debug)]
pub struct RecursiveTimer {
    guard: RecursionGuard,
    stopwatch: RefCell<Stopwatch>,
}

impl RecursiveTimer {
    /// Times outermost calls with `stopwatch`.
    pub fn new(stopwatch: Stopwatch) -> Self {
        Self {
            guard: RecursionGuard::new(),
            stopwatch: RefCell::new(stopwatch),
        }
    }

    /// Runs one call of the wrapped function.
    ///
    /// The outermost call starts the stopwatch, runs `body` (and with it every
    /// nested call) and stops the stopwatch, which reports. Nested calls run
    /// `body` directly.
    pub fn enter<R>(&self, body: impl FnOnce() -> R) -> TimerResult<R> {
        let Some(_frame) = self.guard.enter() else {
            return Ok(body());
        };

        let mut stopwatch = self.stopwatch.borrow_mut();
        let scope = ScopedTimer::start(&mut stopwatch)?;
        let value = body();
        scope.finish()?;
        Ok(value)
    }

    /// The stopwatch; must not be called from inside [`RecursiveTimer::enter`].
    pub fn stopwatch(&self) -> Ref<'_, Stopwatch> {
        self.stopwatch.borrow()
    }

    /// The recursion guard.
    pub fn guard(&self) -> &RecursionGuard {
        &self.guard
    }

    /// Unwraps into the stopwatch.
    pub fn into_stopwatch(self) -> Stopwatch {
        self.stopwatch.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapwatch_core::clock::ManualClock;
    use lapwatch_core::timing::MemoryReporter;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::time::Duration;

    fn timer() -> (RecursiveTimer, Arc<ManualClock>, MemoryReporter) {
        let clock = Arc::new(ManualClock::new());
        let reporter = MemoryReporter::new();
        let watch = Stopwatch::builder()
            .clock(clock.clone())
            .reporter(reporter.clone())
            .build()
            .unwrap();
        (RecursiveTimer::new(watch), clock, reporter)
    }

    fn countdown(timer: &RecursiveTimer, clock: &ManualClock, n: u32) -> TimerResult<u32> {
        timer.enter(|| -> TimerResult<u32> {
            clock.advance_ms(1);
            if n == 0 {
                Ok(0)
            } else {
                Ok(1 + countdown(timer, clock, n - 1)?)
            }
        })?
    }

    #[test]
    fn guard_hands_out_one_outermost_frame() {
        let guard = RecursionGuard::new();
        let frame = guard.enter();
        assert!(frame.is_some());
        assert!(!guard.is_outermost_call());
        assert!(guard.enter().is_none());

        drop(frame);
        assert!(guard.is_outermost_call());
    }

    #[test]
    fn one_report_per_external_call_at_any_depth() {
        let (timer, clock, reporter) = timer();

        for depth in [0, 1, 5, 20] {
            assert_eq!(countdown(&timer, &clock, depth).unwrap(), depth);
        }

        assert_eq!(reporter.count(), 4);
        assert_eq!(
            timer.stopwatch().trial_durations(),
            &[
                Duration::from_millis(1),
                Duration::from_millis(2),
                Duration::from_millis(6),
                Duration::from_millis(21),
            ]
        );
        assert!(timer.guard().is_outermost_call());
    }

    #[test]
    fn unwinding_outermost_call_resets_the_guard() {
        let (timer, clock, reporter) = timer();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            timer.enter(|| {
                clock.advance_ms(4);
                panic!("recursion failed");
            })
        }));
        assert!(result.is_err());
        assert!(timer.guard().is_outermost_call());
        assert!(!timer.stopwatch().is_running());
        assert_eq!(reporter.count(), 1);

        assert_eq!(countdown(&timer, &clock, 2).unwrap(), 2);
        assert_eq!(reporter.count(), 2);
    }
}
