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

//! Call-wrapping timer.
//!
//! A [`TimedFn`] owns a callable and a [`Stopwatch`]. Every invocation runs
//! the callable `repeat_count` times, each run being one scoped trial, lets
//! the stopwatch report the fastest trial and hands back the value of the last
//! run. Values of earlier runs are dropped.

use crate::utils::timer::{time_fallible, time_scope};
use lapwatch_core::timing::{Stopwatch, TimerError, TimerResult};

/// A callable wrapped so that every invocation is timed.
pub struct TimedFn<F> {
    func: F,
    stopwatch: Stopwatch,
}

impl<F> TimedFn<F> {
    /// Wraps `func`, timing it with `stopwatch`.
    ///
    /// The stopwatch's repeat count decides how many trials run per
    /// invocation.
    pub fn new(func: F, stopwatch: Stopwatch) -> Self {
        Self { func, stopwatch }
    }

    /// Wraps `func` with a default stopwatch reporting every call to stdout.
    pub fn with_defaults(func: F) -> Self {
        Self::new(func, Stopwatch::new())
    }

    /// The stopwatch timing this callable.
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// Mutable access to the stopwatch, e.g. to reset its history.
    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch {
        &mut self.stopwatch
    }

    /// Unwraps into the callable and its stopwatch.
    pub fn into_parts(self) -> (F, Stopwatch) {
        (self.func, self.stopwatch)
    }

    /// Invokes a callable taking one argument (use a tuple for several).
    ///
    /// `args` is cloned for every trial. Returns the value of the last trial.
    /// If a trial panics, that trial is recorded, no report is emitted and
    /// the panic continues; the next invocation starts a fresh window.
    pub fn invoke<A, R>(&mut self, args: A) -> TimerResult<R>
    where
        F: FnMut(A) -> R,
        A: Clone,
    {
        let Self { func, stopwatch } = self;
        let trials = begin_cycle(stopwatch);

        let mut last = run_trial(stopwatch, |sw| time_scope(sw, || func(args.clone())))?;
        for _ in 1..trials {
            last = run_trial(stopwatch, |sw| time_scope(sw, || func(args.clone())))?;
        }
        Ok(last)
    }

    /// Invokes a callable taking no arguments.
    pub fn call<R>(&mut self) -> TimerResult<R>
    where
        F: FnMut() -> R,
    {
        let Self { func, stopwatch } = self;
        let trials = begin_cycle(stopwatch);

        let mut last = run_trial(stopwatch, |sw| time_scope(sw, || func()))?;
        for _ in 1..trials {
            last = run_trial(stopwatch, |sw| time_scope(sw, || func()))?;
        }
        Ok(last)
    }

    /// Invokes a fallible callable.
    ///
    /// The first failing trial is recorded, the remaining trials are skipped,
    /// the partial reporting window is dropped and the error is returned.
    pub fn try_invoke<A, R, E>(&mut self, args: A) -> Result<R, E>
    where
        F: FnMut(A) -> Result<R, E>,
        A: Clone,
        E: From<TimerError>,
    {
        let Self { func, stopwatch } = self;
        let trials = begin_cycle(stopwatch);

        let mut last = run_trial(stopwatch, |sw| time_fallible(sw, || func(args.clone())))?;
        for _ in 1..trials {
            last = run_trial(stopwatch, |sw| time_fallible(sw, || func(args.clone())))?;
        }
        Ok(last)
    }
}

/// Drops whatever a previous, interrupted invocation left in the window.
fn begin_cycle(stopwatch: &mut Stopwatch) -> usize {
    stopwatch.abandon_cycle();
    stopwatch.repeat_count()
}

fn run_trial<T, E>(
    stopwatch: &mut Stopwatch,
    trial: impl FnOnce(&mut Stopwatch) -> Result<T, E>,
) -> Result<T, E> {
    let outcome = trial(stopwatch);
    if outcome.is_err() {
        stopwatch.abandon_cycle();
    }
    outcome
}
