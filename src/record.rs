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

//! Log records and their call-site locations.

use std::fmt;

use jiff::Zoned;

/// The function name reported when the caller's function cannot be determined.
///
/// This is the case for the `#[track_caller]` severity methods of [`Logger`](crate::Logger); use
/// the logging macros to capture the enclosing function as well.
pub const UNKNOWN_FUNCTION: &str = "?";

/// Where a log record was emitted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    file: &'static str,
    function: &'static str,
    line: u32,
}

impl Location {
    /// Creates a location. Only the basename of `file` is kept.
    pub fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file: basename(file),
            function,
            line,
        }
    }

    /// The location of the caller, as tracked by `#[track_caller]`.
    ///
    /// The function name is [`UNKNOWN_FUNCTION`].
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self::new(caller.file(), UNKNOWN_FUNCTION, caller.line())
    }

    /// The source file name, without directories.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The enclosing function name.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The source line.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.function, self.line)
    }
}

fn basename(path: &'static str) -> &'static str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// A single log record, built on the caller's thread.
///
/// The message is interpolated eagerly so the record owns everything it needs and can be handed
/// to another thread.
#[derive(Clone, Debug)]
pub struct LogRecord {
    time: Zoned,
    severity: crate::Severity,
    location: Location,
    message: String,
}

impl LogRecord {
    /// Creates a record observed now.
    pub fn new(severity: crate::Severity, location: Location, args: fmt::Arguments<'_>) -> Self {
        Self::with_time(Zoned::now(), severity, location, args)
    }

    /// Creates a record with an explicit observed time.
    pub fn with_time(
        time: Zoned,
        severity: crate::Severity,
        location: Location,
        args: fmt::Arguments<'_>,
    ) -> Self {
        let message = match args.as_str() {
            Some(s) => s.to_owned(),
            None => args.to_string(),
        };

        Self {
            time,
            severity,
            location,
            message,
        }
    }

    /// The observed time.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The observed time with second precision, as `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp(&self) -> impl fmt::Display + '_ {
        self.time.strftime("%Y-%m-%d %H:%M:%S")
    }

    /// The severity of the record.
    pub fn severity(&self) -> crate::Severity {
        self.severity
    }

    /// Where the record was emitted.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The interpolated message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
