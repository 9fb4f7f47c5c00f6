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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Timestamp;
use jiff::Zoned;

use crate::Error;
use crate::file::clock::Clock;

/// A log file that is renamed aside once it grows over a size threshold.
///
/// Each rotation renames the live file to `<path><YYYYMMDDHHMMSSmmm>` and opens a fresh file at
/// the original path. Backup names of one file are strictly increasing, and an existing file is
/// never overwritten by a rename.
#[derive(Debug)]
pub(crate) struct RotatingFile {
    path: PathBuf,
    file: Option<File>,
    max_size: u64,
    last_backup_millis: Option<i64>,
    clock: Clock,
    /// Makes every size check fail with this error kind.
    #[cfg(test)]
    pub(crate) size_check_error: Option<io::ErrorKind>,
}

impl RotatingFile {
    pub(crate) fn open(path: PathBuf, max_size: u64, clock: Clock) -> Result<Self, Error> {
        let file = open_append(&path).map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;

        Ok(Self {
            path,
            file: Some(file),
            max_size,
            last_backup_millis: None,
            clock,
            #[cfg(test)]
            size_check_error: None,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the live file is not larger than the maximum size.
    ///
    /// A file whose handle was lost by a failed rotation has nothing to check; the next write
    /// reopens it.
    pub(crate) fn check_size_valid(&self) -> Result<bool, Error> {
        let Some(file) = &self.file else {
            return Ok(true);
        };

        let metadata = file.metadata();
        #[cfg(test)]
        let metadata = match self.size_check_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => metadata,
        };

        let metadata = metadata.map_err(|err| {
            Error::new("failed to read log file size")
                .with_context("path", self.path.display())
                .with_source(err)
        })?;
        Ok(metadata.len() <= self.max_size)
    }

    /// Renames the live file aside and opens a fresh one at the original path.
    ///
    /// On failure the file keeps being written: if the rename failed, the original file is
    /// reopened and grows further until a later rotation succeeds.
    pub(crate) fn rotate(&mut self) -> Result<PathBuf, Error> {
        let backup = self.next_backup_path()?;

        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        let renamed = fs::rename(&self.path, &backup);
        let reopened = open_append(&self.path);

        let mut failure = None;
        if let Err(err) = renamed {
            failure = Some(
                Error::new("failed to rename log file")
                    .with_context("path", self.path.display())
                    .with_context("backup", backup.display())
                    .with_source(err),
            );
        }
        match reopened {
            Ok(file) => self.file = Some(file),
            Err(err) => {
                let err = failure
                    .take()
                    .unwrap_or_else(|| Error::new("failed to reopen log file"))
                    .with_context("path", self.path.display())
                    .with_source(err);
                failure = Some(err);
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(backup),
        }
    }

    pub(crate) fn write_all(&mut self, buf: &[u8]) -> Result<(), Error> {
        let file = match self.file.take() {
            Some(file) => file,
            None => open_append(&self.path).map_err(|err| {
                Error::new("failed to reopen log file")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })?,
        };
        let file = self.file.insert(file);

        file.write_all(buf).map_err(|err| {
            Error::new("failed to write log file")
                .with_context("path", self.path.display())
                .with_source(err)
        })
    }

    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        match &mut self.file {
            Some(file) => file.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    fn next_backup_path(&mut self) -> Result<PathBuf, Error> {
        let now = self.clock.now();
        let tz = now.time_zone().clone();

        let mut millis = now.timestamp().as_millisecond();
        if let Some(last) = self.last_backup_millis {
            millis = millis.max(last + 1);
        }

        loop {
            let stamp = Timestamp::from_millisecond(millis)
                .map_err(|err| {
                    Error::new("failed to compute backup timestamp")
                        .with_context("path", self.path.display())
                        .with_source(err)
                })?
                .to_zoned(tz.clone());

            let backup = backup_path(&self.path, &stamp);
            if !backup.exists() {
                self.last_backup_millis = Some(millis);
                return Ok(backup);
            }
            millis += 1;
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path)
}

fn backup_path(path: &Path, stamp: &Zoned) -> PathBuf {
    let suffix = format!(
        "{}{:03}",
        stamp.strftime("%Y%m%d%H%M%S"),
        stamp.millisecond()
    );
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
