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

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;

use crate::LogRecord;
use crate::Severity;

/// A layout that formats log record as optionally colored text.
///
/// Output format:
///
/// ```text
/// [2024-08-11 22:44:57] [ERROR] [main.rs:serve:51] Hello error!
/// [2024-08-11 22:44:57] [WARNING] [main.rs:serve:52] Hello warning!
/// [2024-08-11 22:44:57] [INFO] [main.rs:serve:53] Hello info!
/// ```
///
/// By default, severities are colored when the `colored` feature is enabled. Call
/// [`no_color`](TextLayout::no_color) to disable coloring; files are always written without color.
///
/// # Examples
///
/// ```
/// use twinlog::layout::TextLayout;
///
/// let layout = TextLayout::default().no_color();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    #[cfg(feature = "colored")]
    colors: SeverityColor,
    no_color: bool,
}

impl TextLayout {
    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Customize the color of the fatal severity. Default to bright red.
    ///
    /// No effect if `no_color` is set.
    #[cfg(feature = "colored")]
    pub fn fatal_color(mut self, color: Color) -> Self {
        self.colors.fatal = color;
        self
    }

    /// Customize the color of the error severity. Default to red.
    ///
    /// No effect if `no_color` is set.
    #[cfg(feature = "colored")]
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warning severity. Default to yellow.
    ///
    /// No effect if `no_color` is set.
    #[cfg(feature = "colored")]
    pub fn warning_color(mut self, color: Color) -> Self {
        self.colors.warning = color;
        self
    }

    /// Formats a record as a single line, without the trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut text = String::new();
        let location = record.location();

        // SAFETY: write to a string always succeeds
        write!(
            &mut text,
            "[{}] [{}] [{}:{}:{}] {}",
            record.timestamp(),
            self.format_severity(record.severity()),
            location.file(),
            location.function(),
            location.line(),
            record.message(),
        )
        .unwrap();

        text
    }

    #[cfg(feature = "colored")]
    fn format_severity(&self, severity: Severity) -> String {
        if self.no_color {
            severity.to_string()
        } else {
            severity
                .as_str()
                .color(self.colors.color_of(severity))
                .to_string()
        }
    }

    #[cfg(not(feature = "colored"))]
    fn format_severity(&self, severity: Severity) -> String {
        severity.to_string()
    }
}

/// Colors for different severities.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct SeverityColor {
    fatal: Color,
    error: Color,
    warning: Color,
    info: Color,
    trace: Color,
    debug: Color,
    unknown: Color,
}

#[cfg(feature = "colored")]
impl Default for SeverityColor {
    fn default() -> Self {
        Self {
            fatal: Color::BrightRed,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Green,
            trace: Color::Magenta,
            debug: Color::Blue,
            unknown: Color::White,
        }
    }
}

#[cfg(feature = "colored")]
impl SeverityColor {
    fn color_of(&self, severity: Severity) -> Color {
        match severity {
            Severity::Fatal => self.fatal,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
            Severity::Trace => self.trace,
            Severity::Debug => self.debug,
            Severity::Unknown => self.unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::Zoned;

    use super::*;
    use crate::Location;

    fn record(severity: Severity, message: &str) -> LogRecord {
        LogRecord::with_time(
            Zoned::from_str("2024-08-11T22:44:57.172105[UTC]").unwrap(),
            severity,
            Location::new("examples/server.rs", "serve", 51),
            format_args!("{message}"),
        )
    }

    #[test]
    fn test_plain_line() {
        let layout = TextLayout::default().no_color();
        assert_eq!(
            layout.format(&record(Severity::Error, "Hello error!")),
            "[2024-08-11 22:44:57] [ERROR] [server.rs:serve:51] Hello error!"
        );
        assert_eq!(
            layout.format(&record(Severity::Warning, "disk at 91%")),
            "[2024-08-11 22:44:57] [WARNING] [server.rs:serve:51] disk at 91%"
        );
    }

    #[test]
    fn test_message_is_not_reinterpreted() {
        let layout = TextLayout::default().no_color();
        let line = layout.format(&record(Severity::Info, "{} literal braces %v"));
        assert!(line.ends_with("] {} literal braces %v"));
    }
}
