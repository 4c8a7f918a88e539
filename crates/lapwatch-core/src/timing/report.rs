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

//! Sinks for formatted elapsed-time lines.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Receives one formatted line per reporting event.
///
/// Any `FnMut(&str) -> io::Result<()>` closure is a reporter. Failures are
/// handed back to the stopwatch, which propagates them to its caller.
pub trait Reporter {
    /// Emits `line`.
    fn report(&mut self, line: &str) -> io::Result<()>;
}

impl<F> Reporter for F
where
    F: FnMut(&str) -> io::Result<()>,
{
    fn report(&mut self, line: &str) -> io::Result<()> {
        self(line)
    }
}

/// Writes each line to standard output. This is the default reporter.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }
}

/// Keeps every reported line in memory.
///
/// Clones share the same buffer, so one clone can be given to a stopwatch
/// while another is kept to inspect what was reported.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the lines reported so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Number of lines reported so far.
    pub fn count(&self) -> usize {
        self.lines.borrow().len()
    }

    /// The most recent line, if any.
    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, line: &str) -> io::Result<()> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}
