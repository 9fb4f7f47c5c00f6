// Copyright 2024 FastLabs Developers
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

use std::fmt;
use std::io;
use std::io::Write;

use crate::LogRecord;
use crate::Location;
use crate::Logger;
use crate::Severity;
use crate::layout::TextLayout;

/// A logger that prints records to standard output as they are logged.
///
/// Printing happens synchronously on the calling thread, without buffering. Output format is the
/// one of [`TextLayout`], with colored severities unless [`no_color`](ConsoleLogger::no_color) is
/// called.
///
/// # Examples
///
/// ```
/// use twinlog::ConsoleLogger;
///
/// let logger = ConsoleLogger::from_level("debug");
/// twinlog::info!(logger, "this is an info message");
/// ```
#[derive(Debug)]
pub struct ConsoleLogger {
    min_severity: Severity,
    layout: TextLayout,
}

impl ConsoleLogger {
    /// Creates a console logger observing records at `min_severity` and above.
    pub fn new(min_severity: Severity) -> Self {
        Self {
            min_severity,
            layout: TextLayout::default(),
        }
    }

    /// Creates a console logger from a severity name. See [`Severity::parse`].
    pub fn from_level(name: &str) -> Self {
        Self::new(Severity::parse(name))
    }

    /// Disable colored severities.
    pub fn no_color(mut self) -> Self {
        self.layout = self.layout.no_color();
        self
    }
}

impl Logger for ConsoleLogger {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn log(&self, severity: Severity, location: Location, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }

        let record = LogRecord::new(severity, location, args);
        let mut line = self.layout.format(&record);
        line.push('\n');
        let _ = io::stdout().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_level() {
        assert_eq!(ConsoleLogger::from_level("Warning").min_severity(), Severity::Warning);
        assert_eq!(ConsoleLogger::from_level("loud").min_severity(), Severity::Unknown);
    }

    #[test]
    fn test_filter() {
        let logger = ConsoleLogger::new(Severity::Error).no_color();
        assert!(!logger.enabled(Severity::Warning));
        assert!(logger.enabled(Severity::Error));
        assert!(logger.enabled(Severity::Fatal));
        logger.error(format_args!("printed to stdout"));
    }
}
