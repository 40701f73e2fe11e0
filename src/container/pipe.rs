use std::io::{self, Read, Write};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

/// Largest segment a single write hands across the pipe.
pub const MAX_SEGMENT: usize = 64 * 1024;

type Segment = io::Result<Vec<u8>>;

/// Bounded in-memory pipe between a producer thread and a consumer thread.
///
/// At most `capacity` segments are in flight; further writes block until the reader catches up
/// (`capacity == 0` makes every write wait for the reader). Dropping the writer ends the stream;
/// [`PipeWriter::fail`] ends it with an error the reader will observe instead of end-of-stream.
/// Dropping the reader makes pending and later writes fail with `BrokenPipe`.
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = sync_channel(capacity);
    (
        PipeWriter {
            tx,
            reader_gone: false,
        },
        PipeReader {
            rx,
            segment: Vec::new(),
            pos: 0,
            finished: false,
        },
    )
}

pub struct PipeWriter {
    tx: SyncSender<Segment>,
    reader_gone: bool,
}

impl PipeWriter {
    /// Whether a write already failed because the reader was dropped.
    pub fn reader_gone(&self) -> bool {
        self.reader_gone
    }

    /// Close the pipe so the reader sees `err` rather than a clean end of stream.
    pub fn fail(self, err: io::Error) {
        // The reader may already be gone; nobody is left to tell in that case.
        let _ = self.tx.send(Err(err));
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let n = buf.len().min(MAX_SEGMENT);
        if self.tx.send(Ok(buf[..n].to_vec())).is_err() {
            self.reader_gone = true;
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "pipe reader dropped",
            ));
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct PipeReader {
    rx: Receiver<Segment>,
    segment: Vec<u8>,
    pos: usize,
    finished: bool,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos == self.segment.len() {
            if self.finished {
                return Ok(0);
            }
            match self.rx.recv() {
                Ok(Ok(segment)) => {
                    self.segment = segment;
                    self.pos = 0;
                }
                Ok(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                Err(_) => {
                    self.finished = true;
                    return Ok(0);
                }
            }
        }
        let n = buf.len().min(self.segment.len() - self.pos);
        buf[..n].copy_from_slice(&self.segment[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/pipe.rs"]
mod tests;
