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

use std::num::NonZeroUsize;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;
use crossbeam_channel::bounded;

use crate::Error;
use crate::LogRecord;

pub(crate) enum Message {
    Record(LogRecord),
    Flush(oneshot::Sender<()>),
}

#[derive(Debug)]
pub(crate) enum EnqueueError {
    /// The queue is at capacity.
    Overflow(LogRecord),
    /// The writer is gone.
    Closed(LogRecord),
}

/// The producer side of a fixed-capacity hand-off to the writer thread.
#[derive(Debug)]
pub(crate) struct IngressQueue {
    sender: Sender<Message>,
}

impl IngressQueue {
    pub(crate) fn bounded(capacity: NonZeroUsize) -> (IngressQueue, Receiver<Message>) {
        let (sender, receiver) = bounded(capacity.get());
        (IngressQueue { sender }, receiver)
    }

    /// Appends a record without ever blocking; the record is handed back if it cannot be queued.
    pub(crate) fn enqueue(&self, record: LogRecord) -> Result<(), EnqueueError> {
        match self.sender.try_send(Message::Record(record)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(Message::Record(record))) => Err(EnqueueError::Overflow(record)),
            Err(TrySendError::Disconnected(Message::Record(record))) => {
                Err(EnqueueError::Closed(record))
            }
            Err(_) => unreachable!("enqueue only sends records"),
        }
    }

    /// Waits until every message queued before this call has been handled by the writer.
    pub(crate) fn flush(&self, timeout: Duration) -> Result<(), Error> {
        let (done, wait) = oneshot::channel();
        match self.sender.send_timeout(Message::Flush(done), timeout) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                return Err(Error::new("timed out queueing flush request")
                    .with_context("timeout", format!("{timeout:?}")));
            }
            Err(SendTimeoutError::Disconnected(_)) => {
                return Err(Error::new("failed to flush: log writer has stopped"));
            }
        }

        wait.recv_timeout(timeout).map_err(|err| {
            Error::new("failed to wait for log writer flush")
                .with_context("timeout", format!("{timeout:?}"))
                .with_source(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use crate::Severity;

    fn record(n: usize) -> LogRecord {
        LogRecord::new(
            Severity::Info,
            Location::new("queue.rs", "record", 1),
            format_args!("record {n}"),
        )
    }

    fn message_text(message: Message) -> String {
        match message {
            Message::Record(record) => record.message().to_string(),
            Message::Flush(_) => "flush".to_string(),
        }
    }

    #[test]
    fn test_overflow_hands_record_back() {
        let (queue, receiver) = IngressQueue::bounded(NonZeroUsize::new(2).unwrap());

        let mut overflowed = vec![];
        for n in 0..5 {
            match queue.enqueue(record(n)) {
                Ok(()) => {}
                Err(EnqueueError::Overflow(record)) => overflowed.push(record.message().to_string()),
                Err(EnqueueError::Closed(_)) => panic!("receiver is alive"),
            }
        }

        assert_eq!(overflowed, vec!["record 2", "record 3", "record 4"]);
        let queued = receiver.try_iter().map(message_text).collect::<Vec<_>>();
        assert_eq!(queued, vec!["record 0", "record 1"]);
    }

    #[test]
    fn test_capacity_never_grows() {
        let (queue, receiver) = IngressQueue::bounded(NonZeroUsize::new(3).unwrap());
        for n in 0..10 {
            let _ = queue.enqueue(record(n));
        }
        assert_eq!(receiver.len(), 3);
        assert_eq!(receiver.capacity(), Some(3));
    }

    #[test]
    fn test_closed_queue() {
        let (queue, receiver) = IngressQueue::bounded(NonZeroUsize::new(8).unwrap());
        drop(receiver);
        assert!(matches!(
            queue.enqueue(record(0)),
            Err(EnqueueError::Closed(_))
        ));
        let err = queue.flush(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err.message(), "failed to flush: log writer has stopped");
    }

    #[test]
    fn test_flush_times_out_without_writer_progress() {
        let (queue, _receiver) = IngressQueue::bounded(NonZeroUsize::new(1).unwrap());
        queue.enqueue(record(0)).unwrap();
        let err = queue.flush(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err.message(), "timed out queueing flush request");
    }
}
