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

//! Log severities and the level filter shared by every logger.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The severity of a log record.
///
/// From least to most severe, the severities are:
///
/// - `Unknown`
/// - `Debug`
/// - `Trace`
/// - `Info`
/// - `Warning`
/// - `Error`
/// - `Fatal`
///
/// A logger configured with a minimum severity observes every record whose severity is greater
/// than or equal to it. Note that `Trace` sorts *above* `Debug`.
///
/// `Unknown` is what [`Severity::parse`] returns for a name it does not recognize. Because it sorts
/// below `Debug`, a logger configured with `Unknown` observes **everything**. A misspelled level
/// name therefore turns the logger fully verbose instead of silencing it.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum Severity {
    /// Produced by unrecognized configuration names.
    #[default]
    Unknown = 0,
    /// The "debug" severity.
    Debug = 1,
    /// The "trace" severity.
    Trace = 2,
    /// The "info" severity.
    Info = 3,
    /// The "warning" severity.
    Warning = 4,
    /// The "error" severity.
    ///
    /// Records at this severity and above are duplicated into the error file of a
    /// [`FileLogger`](crate::FileLogger).
    Error = 5,
    /// The "fatal" severity.
    Fatal = 6,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 7] = [
        Severity::Unknown,
        Severity::Debug,
        Severity::Trace,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Parses a severity name, ignoring ASCII case.
    ///
    /// Recognized names are `debug`, `trace`, `info`, `warning`, `error` and `fatal`. Any other
    /// input yields [`Severity::Unknown`]; parsing never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use twinlog::Severity;
    ///
    /// assert_eq!(Severity::parse("WARNING"), Severity::Warning);
    /// assert_eq!(Severity::parse("warn"), Severity::Unknown);
    /// ```
    pub fn parse(name: &str) -> Severity {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Severity::Debug,
            "trace" => Severity::Trace,
            "info" => Severity::Info,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            "fatal" => Severity::Fatal,
            _ => Severity::Unknown,
        }
    }

    /// Returns the upper case name used in formatted log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Unknown => "UNKNOWN",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Returns whether a record at this severity passes a filter configured at `min`.
    pub fn is_observed_by(self, min: Severity) -> bool {
        self >= min
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        Severity::parse(name)
    }
}

impl FromStr for Severity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Severity::parse(s))
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}
