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

//! Traps receive the diagnostics a logger cannot report through itself.

use std::fmt;
use std::io;
use std::io::Write;

use crate::Error;
use crate::LogRecord;
use crate::layout::TextLayout;

/// A sink for errors raised inside the logging pipeline and for dropped records.
///
/// Logging calls are fire-and-forget, so nothing is ever returned to the code that logs. Anything
/// that goes wrong afterwards is handed to the logger's trap instead.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error, such as a failed rotation or write.
    fn trap(&self, err: &Error);

    /// Handle a record that was dropped because the ingress queue was full.
    ///
    /// Called on the logging thread. Default to printing `msg missing: <line>` to standard output.
    fn overflow(&self, record: &LogRecord) {
        let _ = write_overflow(&mut io::stdout(), record);
    }
}

fn write_overflow(w: &mut impl Write, record: &LogRecord) -> io::Result<()> {
    let line = TextLayout::default().no_color().format(record);
    writeln!(w, "msg missing: {line}")
}

impl<T: Trap> From<T> for Box<dyn Trap> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A default trap that sends errors to standard error and overflow notices to standard output.
///
/// If either stream is not available, it does nothing.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        let _ = writeln!(io::stderr(), "{err}");
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::Zoned;

    use super::*;
    use crate::Location;
    use crate::Severity;

    #[test]
    fn test_overflow_notice() {
        let record = LogRecord::with_time(
            Zoned::from_str("2024-08-10T17:12:52[UTC]").unwrap(),
            Severity::Warning,
            Location::new("src/server.rs", "accept", 88),
            format_args!("backlog at {}", 128),
        );

        let mut out = vec![];
        write_overflow(&mut out, &record).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("msg missing: ["));
        assert_eq!(
            out,
            "msg missing: [2024-08-10 17:12:52] [WARNING] [server.rs:accept:88] backlog at 128\n"
        );
    }
}
