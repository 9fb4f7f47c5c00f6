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

//! Twinlog is a minimal leveled logger printing to the terminal or writing to a rotating pair of
//! log files.
//!
//! # Overview
//!
//! Both loggers implement the [`Logger`] trait and share one level filter: a logger configured
//! with a minimum [`Severity`] observes every record at that severity or above.
//!
//! * [`ConsoleLogger`] prints each record to standard output on the calling thread.
//! * [`FileLogger`] hands records to a bounded queue drained by a background thread, which writes
//!   them to `<name>` and, from [`Severity::Error`] up, also to `<name>_error`. Files larger than
//!   the configured maximum are renamed aside with a timestamp suffix and replaced by fresh ones.
//!
//! Every line has the form:
//!
//! ```text
//! [2024-08-11 22:44:57] [WARNING] [main.rs:serve:52] connection pool exhausted
//! ```
//!
//! # Examples
//!
//! Log to the terminal:
//!
//! ```
//! let logger = twinlog::ConsoleLogger::from_level("info");
//!
//! twinlog::info!(logger, "This is an info message.");
//! twinlog::debug!(logger, "This one is filtered out.");
//! ```
//!
//! Log to files, and forward records of the `log` crate:
//!
//! ```
//! use twinlog::FileLogger;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! let logger = FileLogger::builder(dir.path(), "app_log")
//!     .level("warning")
//!     .build()
//!     .unwrap();
//!
//! twinlog::bridge::setup_log_crate(logger);
//!
//! log::error!("Error message.");
//! log::info!("Info message, filtered out.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod file;
pub mod layout;
pub mod trap;

mod console;
mod error;
mod logger;
mod macros;
mod record;
mod severity;

pub use self::console::ConsoleLogger;
pub use self::error::Error;
pub use self::file::FileLogger;
pub use self::file::FileLoggerBuilder;
pub use self::logger::Logger;
pub use self::record::Location;
pub use self::record::LogRecord;
pub use self::record::UNKNOWN_FUNCTION;
pub use self::severity::Severity;
pub use self::trap::Trap;

#[doc(hidden)]
pub use self::macros::__private;
