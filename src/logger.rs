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

use crate::Location;
use crate::Severity;

/// The logging capability shared by [`ConsoleLogger`](crate::ConsoleLogger) and
/// [`FileLogger`](crate::FileLogger).
///
/// Implementors only decide what happens to a record that passed the level filter; the filter
/// itself and the per-severity methods are provided.
///
/// The trait is object safe, so either logger can be held as a `Box<dyn Logger>`:
///
/// ```
/// use twinlog::ConsoleLogger;
/// use twinlog::Logger;
/// use twinlog::Severity;
///
/// let logger: Box<dyn Logger> = Box::new(ConsoleLogger::new(Severity::Info));
/// logger.info(format_args!("listening on {}", 8080));
/// ```
///
/// # Note
///
/// The per-severity methods know the calling file and line but not the calling function, so their
/// records carry [`UNKNOWN_FUNCTION`](crate::UNKNOWN_FUNCTION) (`?`) as function name. Use the
/// macros, such as [`info!`](crate::info), to record the function as well.
pub trait Logger: fmt::Debug + Send + Sync + 'static {
    /// The minimum severity this logger observes.
    fn min_severity(&self) -> Severity;

    /// Builds and emits a record. Records below [`min_severity`](Logger::min_severity) are
    /// ignored.
    fn log(&self, severity: Severity, location: Location, args: fmt::Arguments<'_>);

    /// Flushes any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) {}

    /// Whether a record at `severity` would be observed.
    fn enabled(&self, severity: Severity) -> bool {
        severity.is_observed_by(self.min_severity())
    }

    /// Logs at [`Severity::Debug`].
    #[track_caller]
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, Location::caller(), args)
    }

    /// Logs at [`Severity::Trace`].
    #[track_caller]
    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Trace, Location::caller(), args)
    }

    /// Logs at [`Severity::Info`].
    #[track_caller]
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, Location::caller(), args)
    }

    /// Logs at [`Severity::Warning`].
    #[track_caller]
    fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, Location::caller(), args)
    }

    /// Logs at [`Severity::Error`].
    #[track_caller]
    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, Location::caller(), args)
    }

    /// Logs at [`Severity::Fatal`].
    ///
    /// This only records the message; it does not terminate the process.
    #[track_caller]
    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Fatal, Location::caller(), args)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug)]
    struct Capture {
        min: Severity,
        seen: Mutex<Vec<(Severity, Location, String)>>,
    }

    impl Capture {
        fn new(min: Severity) -> Self {
            Self {
                min,
                seen: Mutex::new(vec![]),
            }
        }
    }

    impl Logger for Capture {
        fn min_severity(&self) -> Severity {
            self.min
        }

        fn log(&self, severity: Severity, location: Location, args: fmt::Arguments<'_>) {
            if self.enabled(severity) {
                let mut seen = self.seen.lock().unwrap();
                seen.push((severity, location, args.to_string()));
            }
        }
    }

    #[test]
    fn test_severity_methods_filter_and_track_caller() {
        let logger = Capture::new(Severity::Warning);
        logger.debug(format_args!("dropped"));
        logger.info(format_args!("dropped"));
        let line = line!() + 1;
        logger.warning(format_args!("kept {}", 1));
        logger.fatal(format_args!("kept {}", 2));

        let seen = logger.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, Severity::Warning);
        assert_eq!(seen[0].1.file(), "logger.rs");
        assert_eq!(seen[0].1.line(), line);
        assert_eq!(seen[0].1.function(), crate::UNKNOWN_FUNCTION);
        assert_eq!(seen[0].2, "kept 1");
        assert_eq!(seen[1].0, Severity::Fatal);
    }

    #[test]
    fn test_dyn_logger() {
        let logger: Box<dyn Logger> = Box::new(Capture::new(Severity::Unknown));
        for severity in Severity::ALL {
            assert!(logger.enabled(severity));
        }
        logger.trace(format_args!("through a trait object"));
    }
}
