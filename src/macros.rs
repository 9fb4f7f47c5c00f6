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

//! Logging macros capturing the call site.

/// Logs at the given severity, capturing the calling file, function and line.
///
/// # Examples
///
/// ```
/// use twinlog::ConsoleLogger;
/// use twinlog::Severity;
///
/// let logger = ConsoleLogger::new(Severity::Info);
/// twinlog::log!(logger, Severity::Warning, "{} retries left", 3);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {{
        #[allow(unused_imports)]
        use $crate::Logger as _;

        let logger = &$logger;
        let severity: $crate::Severity = $severity;
        if logger.enabled(severity) {
            logger.log(severity, $crate::location!(), ::std::format_args!($($arg)+));
        }
    }};
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Logs at [`Severity::Trace`](crate::Severity::Trace).
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Logs at [`Severity::Warning`](crate::Severity::Warning).
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Logs at [`Severity::Fatal`](crate::Severity::Fatal). The process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}

/// Expands to the [`Location`](crate::Location) of the call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::std::file!(),
            $crate::__function_name!(),
            ::std::line!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::__private::function_from_probe(type_name_of(f))
    }};
}

#[doc(hidden)]
pub mod __private {
    /// Extracts the enclosing function name from the type name of a nested probe function.
    pub fn function_from_probe(probe: &'static str) -> &'static str {
        let mut path = probe.strip_suffix("::f").unwrap_or(probe);
        while let Some(outer) = path.strip_suffix("::{{closure}}") {
            path = outer;
        }
        match path.rfind("::") {
            Some(pos) => &path[pos + 2..],
            None => path,
        }
    }
}
