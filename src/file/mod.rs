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

//! A logger writing to a rotating pair of files through a background writer thread.
//!
//! Within the target directory, [`FileLogger`] maintains two live files: `<name>` receives every
//! observed record and `<name>_error` additionally receives records at [`Severity::Error`] and
//! above. Before each write the file size is checked; a file larger than the configured maximum is
//! renamed to `<name><YYYYMMDDHHMMSSmmm>` (or `<name>_error<...>`) and a fresh file is opened.
//!
//! Logging never blocks: records are handed to a bounded queue drained by a dedicated thread. When
//! the queue is full the record is dropped and `msg missing: <line>` is printed to standard output.
//!
//! # Example
//!
//! ```
//! use twinlog::FileLogger;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! let logger = FileLogger::builder(dir.path(), "app_log")
//!     .level("debug")
//!     .max_file_size(10 * 1024 * 1024)
//!     .build()
//!     .unwrap();
//!
//! twinlog::info!(logger, "This log will be written to {}.", "app_log");
//! twinlog::error!(logger, "This one also goes to app_log_error.");
//! ```

use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::Error;
use crate::LogRecord;
use crate::Location;
use crate::Logger;
use crate::Severity;
use crate::Trap;
use crate::layout::TextLayout;
use crate::trap::DefaultTrap;

use self::clock::Clock;
use self::queue::EnqueueError;
use self::queue::IngressQueue;
use self::rotation::RotatingFile;
use self::worker::Worker;

mod clock;
mod queue;
mod rotation;
mod worker;

/// Default maximum size of each log file, 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of records the ingress queue holds.
pub const DEFAULT_QUEUE_CAPACITY: NonZeroUsize = NonZeroUsize::new(50_000).unwrap();

/// A logger that writes records to a rotating pair of files.
///
/// The writer thread starts when the logger is built and runs until the logger is dropped. Dropping
/// the logger writes every record still queued and then joins the thread. A logger installed with
/// [`setup_log_crate`](crate::bridge::setup_log_crate) lives, and writes, for the rest of the
/// process.
///
/// See the [module documentation](crate::file) for the on-disk layout.
pub struct FileLogger {
    min_severity: Severity,
    main_path: PathBuf,
    error_path: PathBuf,
    flush_timeout: Duration,
    trap: Arc<dyn Trap>,
    counters: Arc<Counters>,
    state: WriterState,
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("min_severity", &self.min_severity)
            .field("main_path", &self.main_path)
            .field("error_path", &self.error_path)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl FileLogger {
    /// Creates a [`FileLoggerBuilder`] writing `<dir>/<name>` and `<dir>/<name>_error`.
    pub fn builder(dir: impl AsRef<Path>, name: impl Into<String>) -> FileLoggerBuilder {
        FileLoggerBuilder::new(dir, name)
    }

    /// The path of the main log file.
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    /// The path of the error log file.
    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// A snapshot of the logger's counters.
    pub fn stats(&self) -> Stats {
        self.counters.snapshot()
    }
}

impl Logger for FileLogger {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn log(&self, severity: Severity, location: Location, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }

        let record = LogRecord::new(severity, location, args);
        match self.state.queue().enqueue(record) {
            Ok(()) => {}
            Err(EnqueueError::Overflow(record)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                self.trap.overflow(&record);
            }
            Err(EnqueueError::Closed(record)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                let line = TextLayout::default().no_color().format(&record);
                let err = Error::new("log writer has stopped, record dropped")
                    .with_context("path", self.main_path.display())
                    .with_context("record", line);
                self.trap.trap(&err);
            }
        }
    }

    /// Blocks until everything logged before the call has been written, or the flush timeout
    /// elapses.
    fn flush(&self) {
        if let Err(err) = self.state.queue().flush(self.flush_timeout) {
            self.trap.trap(&err);
        }
    }
}

/// A builder for configuring [`FileLogger`].
#[derive(Debug)]
pub struct FileLoggerBuilder {
    dir: PathBuf,
    name: String,
    min_severity: Severity,
    max_file_size: u64,
    queue_capacity: NonZeroUsize,
    thread_name: String,
    flush_timeout: Duration,
    trap: Box<dyn Trap>,
}

impl FileLoggerBuilder {
    /// Creates a new [`FileLoggerBuilder`] writing `<dir>/<name>` and `<dir>/<name>_error`.
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

        Self {
            dir: dir.as_ref().to_path_buf(),
            name: name.into(),
            min_severity: Severity::Debug,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            thread_name: "twinlog-file-writer".to_string(),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Sets the minimum severity to observe. Default to [`Severity::Debug`].
    #[must_use]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Sets the minimum severity from its name. See [`Severity::parse`].
    ///
    /// Unrecognized names yield [`Severity::Unknown`], which observes everything.
    #[must_use]
    pub fn level(mut self, name: &str) -> Self {
        self.min_severity = Severity::parse(name);
        self
    }

    /// Sets the maximum size in bytes of both the main and the error file.
    ///
    /// The size is checked before each write, so a file may exceed it by up to one line before it
    /// is rotated.
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_file_size = n;
        self
    }

    /// Sets the number of records buffered for the writer thread. Default to 50,000.
    #[must_use]
    pub fn queue_capacity(mut self, n: NonZeroUsize) -> Self {
        self.queue_capacity = n;
        self
    }

    /// Override the writer thread's name.
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets how long [`Logger::flush`] waits for the writer. Default to one second.
    #[must_use]
    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    /// Sets the trap receiving internal errors and overflow notices.
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Opens both files and starts the writer thread.
    pub fn build(self) -> Result<FileLogger, Error> {
        let thread_name = self.thread_name.clone();
        let (mut logger, worker) = self.build_unstarted()?;
        let handle = worker.make_thread(thread_name)?;
        logger.state.start(handle);
        Ok(logger)
    }

    fn build_unstarted(self) -> Result<(FileLogger, Worker), Error> {
        let Self {
            dir,
            name,
            min_severity,
            max_file_size,
            queue_capacity,
            thread_name: _,
            flush_timeout,
            trap,
        } = self;

        fs::create_dir_all(&dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", dir.display())
                .with_source(err)
        })?;

        let main_path = dir.join(&name);
        let error_path = dir.join(format!("{name}_error"));
        let main = RotatingFile::open(main_path.clone(), max_file_size, Clock::System)?;
        let error = RotatingFile::open(error_path.clone(), max_file_size, Clock::System)?;

        let trap: Arc<dyn Trap> = Arc::from(trap);
        let counters = Arc::new(Counters::default());
        let (queue, receiver) = IngressQueue::bounded(queue_capacity);
        let worker = Worker::new(main, error, receiver, trap.clone(), counters.clone());

        let logger = FileLogger {
            min_severity,
            main_path,
            error_path,
            flush_timeout,
            trap,
            counters,
            state: WriterState::new(queue),
        };
        Ok((logger, worker))
    }
}

/// Counters of a [`FileLogger`], as returned by [`FileLogger::stats`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[non_exhaustive]
pub struct Stats {
    /// Records written to the main file.
    pub written: u64,
    /// Records dropped because the queue was full or the writer had stopped.
    pub dropped: u64,
    /// Successful rotations, of either file.
    pub rotations: u64,
    /// Rotations that failed to rename or reopen a file.
    pub rotation_failures: u64,
    /// Lines that could not be written, to either file.
    pub write_failures: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) written: AtomicU64,
    pub(crate) dropped: AtomicU64,
    pub(crate) rotations: AtomicU64,
    pub(crate) rotation_failures: AtomicU64,
    pub(crate) write_failures: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> Stats {
        Stats {
            written: self.written.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            rotation_failures: self.rotation_failures.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
struct WriterState(Option<State>);

#[derive(Debug)]
struct State {
    queue: IngressQueue,
    handle: Option<JoinHandle<()>>,
}

impl WriterState {
    fn new(queue: IngressQueue) -> Self {
        Self(Some(State {
            queue,
            handle: None,
        }))
    }

    fn start(&mut self, handle: JoinHandle<()>) {
        // SAFETY: state is always Some before dropped.
        self.0.as_mut().unwrap().handle = Some(handle);
    }

    fn queue(&self) -> &IngressQueue {
        // SAFETY: state is always Some before dropped.
        &self.0.as_ref().unwrap().queue
    }
}

impl Drop for WriterState {
    fn drop(&mut self) {
        let Some(State { queue, handle }) = self.0.take() else {
            return;
        };

        // drop our sender, the writer breaks its loop once the queue is drained
        drop(queue);

        if let Some(handle) = handle {
            if handle.join().is_err() {
                eprintln!("log writer thread panicked");
            }
        }
    }
}
