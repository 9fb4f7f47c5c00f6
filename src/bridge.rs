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

//! A bridge to forward logs from the `log` crate to a twinlog [`Logger`].

use crate::Location;
use crate::Logger;
use crate::Severity;
use crate::record::UNKNOWN_FUNCTION;

#[derive(Debug)]
struct LogCrateProxy<L>(L);

impl<L: Logger> log::Log for LogCrateProxy<L> {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.0.enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let severity = Severity::from(record.level());
        if !self.0.enabled(severity) {
            return;
        }

        // the module path stands in for the function name, which the log crate does not carry
        let location = Location::new(
            record.file_static().unwrap_or(UNKNOWN_FUNCTION),
            record.module_path_static().unwrap_or(UNKNOWN_FUNCTION),
            record.line().unwrap_or_default(),
        );
        self.0.log(severity, location, *record.args());
    }

    fn flush(&self) {
        self.0.flush()
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_boxed_logger`] with a proxy forwarding every `log` record to
/// `logger`. The logger is never dropped afterwards; a [`FileLogger`](crate::FileLogger) installed
/// this way keeps its writer thread for the rest of the process.
///
/// This function will set the global maximum log level to `Trace`. Filtering happens in `logger`.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use twinlog::ConsoleLogger;
/// use twinlog::Severity;
///
/// if let Err(err) = twinlog::bridge::try_setup_log_crate(ConsoleLogger::new(Severity::Info)) {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate(logger: impl Logger) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogCrateProxy(logger)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate(logger: impl Logger) {
    try_setup_log_crate(logger).expect(
        "twinlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::Mutex;

    use log::Log;

    use super::*;

    #[derive(Debug)]
    struct Capture {
        min: Severity,
        seen: Mutex<Vec<String>>,
    }

    impl Logger for Capture {
        fn min_severity(&self) -> Severity {
            self.min
        }

        fn log(&self, severity: Severity, location: Location, args: fmt::Arguments<'_>) {
            if self.enabled(severity) {
                let mut seen = self.seen.lock().unwrap();
                seen.push(format!("{severity} {location} {args}"));
            }
        }
    }

    #[test]
    fn test_forwards_log_records() {
        let proxy = LogCrateProxy(Capture {
            min: Severity::Info,
            seen: Mutex::new(vec![]),
        });

        for (level, message) in [
            (log::Level::Debug, "hidden"),
            (log::Level::Warn, "disk almost full"),
            (log::Level::Error, "disk full"),
        ] {
            proxy.log(
                &log::Record::builder()
                    .args(format_args!("{message}"))
                    .level(level)
                    .file_static(Some("src/storage/disk.rs"))
                    .module_path_static(Some("app::storage::disk"))
                    .line(Some(27))
                    .build(),
            );
        }

        assert!(!proxy.enabled(&log::Metadata::builder().level(log::Level::Trace).build()));
        assert_eq!(
            *proxy.0.seen.lock().unwrap(),
            vec![
                "WARNING disk.rs:app::storage::disk:27 disk almost full",
                "ERROR disk.rs:app::storage::disk:27 disk full",
            ]
        );
    }
}
