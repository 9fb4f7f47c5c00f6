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

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;

use crate::Error;
use crate::LogRecord;
use crate::Severity;
use crate::Trap;
use crate::file::Counters;
use crate::file::queue::Message;
use crate::file::rotation::RotatingFile;
use crate::layout::TextLayout;

/// The only owner of the log files. Drains the ingress queue until every producer is gone.
pub(crate) struct Worker {
    main: RotatingFile,
    error: RotatingFile,
    layout: TextLayout,
    receiver: Receiver<Message>,
    trap: Arc<dyn Trap>,
    counters: Arc<Counters>,
}

impl Worker {
    pub(crate) fn new(
        main: RotatingFile,
        error: RotatingFile,
        receiver: Receiver<Message>,
        trap: Arc<dyn Trap>,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            main,
            error,
            layout: TextLayout::default().no_color(),
            receiver,
            trap,
            counters,
        }
    }

    pub(crate) fn make_thread(self, name: String) -> Result<JoinHandle<()>, Error> {
        std::thread::Builder::new()
            .name(name)
            .spawn(move || self.run())
            .map_err(|err| Error::new("failed to spawn the log writer thread").with_source(err))
    }

    pub(crate) fn run(mut self) {
        while let Ok(message) = self.receiver.recv() {
            match message {
                Message::Record(record) => {
                    if let Err(err) = self.write(&record) {
                        // Without a size the bound cannot be enforced; stop writing altogether.
                        let err = Error::new("log writer stopped").with_source(err);
                        self.trap.trap(&err);
                        self.discard_queued();
                        return;
                    }
                }
                Message::Flush(done) => {
                    self.flush();
                    let _ = done.send(());
                }
            }
        }

        self.flush();
    }

    /// Writes a record to the main file, and to the error file at [`Severity::Error`] and above.
    ///
    /// Only a failed size check is returned. Rotation and write failures are trapped and counted.
    fn write(&mut self, record: &LogRecord) -> Result<(), Error> {
        let mut line = self.layout.format(record);
        line.push('\n');

        match self.write_line(Target::Main, line.as_bytes()) {
            Ok(true) => {
                self.counters.written.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(err) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        }
        if record.severity() >= Severity::Error {
            self.write_line(Target::Error, line.as_bytes())?;
        }
        Ok(())
    }

    fn write_line(&mut self, target: Target, line: &[u8]) -> Result<bool, Error> {
        let file = match target {
            Target::Main => &mut self.main,
            Target::Error => &mut self.error,
        };

        if !file.check_size_valid()? {
            match file.rotate() {
                Ok(_) => {
                    self.counters.rotations.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    self.counters
                        .rotation_failures
                        .fetch_add(1, Ordering::Relaxed);
                    self.trap.trap(&err);
                }
            }
        }

        match file.write_all(line) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.counters.write_failures.fetch_add(1, Ordering::Relaxed);
                self.trap.trap(&err);
                Ok(false)
            }
        }
    }

    /// Counts and reports every record still queued once the writer has stopped.
    ///
    /// Pending flush requests are not acknowledged, so their callers see the writer as stopped.
    fn discard_queued(&self) {
        for message in self.receiver.try_iter() {
            if let Message::Record(record) = message {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                let err = Error::new("log writer has stopped, record dropped")
                    .with_context("path", self.main.path().display())
                    .with_context("record", self.layout.format(&record));
                self.trap.trap(&err);
            }
        }
    }

    fn flush(&mut self) {
        for file in [&mut self.main, &mut self.error] {
            if let Err(err) = file.flush() {
                let err = err.with_context("path", file.path().display());
                self.trap.trap(&err);
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Target {
    Main,
    Error,
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::num::NonZeroUsize;
    use std::path::Path;
    use std::str::FromStr;
    use std::sync::Mutex;
    use std::time::Duration;

    use jiff::Zoned;
    use tempfile::TempDir;

    use super::*;
    use crate::Location;
    use crate::file::clock::Clock;
    use crate::file::queue::EnqueueError;
    use crate::file::queue::IngressQueue;

    #[derive(Debug, Default)]
    struct RecordingTrap(Mutex<Vec<String>>);

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.to_string());
        }
    }

    fn clock() -> Clock {
        Clock::frozen_at("2024-08-10T17:12:52[UTC]")
    }

    fn worker(dir: &Path, max_size: u64) -> (IngressQueue, Worker, Arc<RecordingTrap>) {
        let main = RotatingFile::open(dir.join("app"), max_size, clock()).unwrap();
        let error = RotatingFile::open(dir.join("app_error"), max_size, clock()).unwrap();
        let (queue, receiver) = IngressQueue::bounded(NonZeroUsize::new(64).unwrap());
        let trap = Arc::new(RecordingTrap::default());
        let worker = Worker::new(
            main,
            error,
            receiver,
            trap.clone(),
            Arc::new(Counters::default()),
        );
        (queue, worker, trap)
    }

    fn record(severity: Severity, message: &str) -> LogRecord {
        LogRecord::with_time(
            Zoned::from_str("2024-08-10T17:12:52[UTC]").unwrap(),
            severity,
            Location::new("src/main.rs", "main", 12),
            format_args!("{message}"),
        )
    }

    fn read_lines(path: impl AsRef<Path>) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_error_records_are_duplicated() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (queue, worker, trap) = worker(temp_dir.path(), u64::MAX);
        let counters = worker.counters.clone();

        for severity in Severity::ALL {
            queue
                .enqueue(record(severity, &format!("at {severity}")))
                .unwrap();
        }
        drop(queue);
        worker.run();

        let main = read_lines(temp_dir.path().join("app"));
        let error = read_lines(temp_dir.path().join("app_error"));
        assert_eq!(main.len(), 7);
        assert_eq!(
            main[3],
            "[2024-08-10 17:12:52] [INFO] [main.rs:main:12] at INFO"
        );
        assert_eq!(error, main[5..].to_vec());
        assert_eq!(
            error,
            vec![
                "[2024-08-10 17:12:52] [ERROR] [main.rs:main:12] at ERROR",
                "[2024-08-10 17:12:52] [FATAL] [main.rs:main:12] at FATAL",
            ]
        );
        assert_eq!(counters.written.load(Ordering::Relaxed), 7);
        assert!(trap.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_files_rotate_independently() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (queue, worker, _trap) = worker(temp_dir.path(), 100);
        let counters = worker.counters.clone();

        // two lines exceed the 100 byte limit, so a file rotates before every third line
        for i in 0..6 {
            queue.enqueue(record(Severity::Info, &format!("info {i}"))).unwrap();
        }
        queue.enqueue(record(Severity::Error, "error 0")).unwrap();
        drop(queue);
        worker.run();

        let mut names = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        names.sort();

        // main: 7 lines, 2 per generation; error: a single line, never rotated
        assert_eq!(
            names,
            vec![
                "app",
                "app20240810171252000",
                "app20240810171252001",
                "app20240810171252002",
                "app_error",
            ]
        );
        assert_eq!(counters.rotations.load(Ordering::Relaxed), 3);
        assert_eq!(
            read_lines(temp_dir.path().join("app20240810171252000")).len(),
            2
        );
        let live = read_lines(temp_dir.path().join("app"));
        assert_eq!(live.len(), 1);
        assert!(live[0].ends_with("error 0"));
        assert_eq!(read_lines(temp_dir.path().join("app_error")), live);
    }

    #[test]
    fn test_flush_is_acknowledged_in_order() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (queue, worker, _trap) = worker(temp_dir.path(), u64::MAX);
        let handle = worker.make_thread("twinlog-test-writer".to_string()).unwrap();

        queue.enqueue(record(Severity::Warning, "before flush")).unwrap();
        queue.flush(Duration::from_secs(10)).unwrap();
        assert_eq!(read_lines(temp_dir.path().join("app")).len(), 1);

        drop(queue);
        handle.join().unwrap();
    }

    #[test]
    fn test_failed_rotation_keeps_writing() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (queue, worker, trap) = worker(temp_dir.path(), 10);
        let counters = worker.counters.clone();
        let handle = worker.make_thread("twinlog-test-writer".to_string()).unwrap();

        queue.enqueue(record(Severity::Info, "first")).unwrap();
        queue.flush(Duration::from_secs(10)).unwrap();
        // the oversized live file is gone when the next record asks for a rotation
        fs::remove_file(temp_dir.path().join("app")).unwrap();
        queue.enqueue(record(Severity::Info, "second")).unwrap();
        queue.flush(Duration::from_secs(10)).unwrap();
        drop(queue);
        handle.join().unwrap();

        let traps = trap.0.lock().unwrap();
        assert_eq!(traps.len(), 1);
        assert!(traps[0].starts_with("failed to rename log file"), "{}", traps[0]);

        let stats = counters.snapshot();
        assert_eq!(stats.written, 2);
        assert_eq!(stats.rotations, 0);
        assert_eq!(stats.rotation_failures, 1);
        assert_eq!(
            read_lines(temp_dir.path().join("app")),
            vec!["[2024-08-10 17:12:52] [INFO] [main.rs:main:12] second"]
        );
    }

    #[test]
    fn test_failed_size_check_stops_and_reports_queued_records() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (queue, mut worker, trap) = worker(temp_dir.path(), u64::MAX);
        let counters = worker.counters.clone();
        worker.main.size_check_error = Some(io::ErrorKind::PermissionDenied);

        for message in ["first", "second", "third"] {
            queue.enqueue(record(Severity::Info, message)).unwrap();
        }
        worker.run();

        let traps = trap.0.lock().unwrap();
        assert_eq!(traps.len(), 3);
        assert!(traps[0].starts_with("log writer stopped"), "{}", traps[0]);
        assert!(traps[0].contains("failed to read log file size"));
        for (trapped, message) in traps[1..].iter().zip(["second", "third"]) {
            assert!(trapped.starts_with("log writer has stopped, record dropped"));
            assert!(trapped.contains(message), "{trapped}");
        }

        let stats = counters.snapshot();
        assert_eq!(stats.written, 0);
        assert_eq!(stats.dropped, 3);
        assert_eq!(fs::read_to_string(temp_dir.path().join("app")).unwrap(), "");
        assert!(matches!(
            queue.enqueue(record(Severity::Info, "late")),
            Err(EnqueueError::Closed(_))
        ));
    }
}
