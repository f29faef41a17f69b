// Vimproved Event Stream
// Fixed-size input_event records over blocking reads and writes

use std::io::{ErrorKind, Read, Write};

use crate::event::{Event, EventKind};
use crate::intercept::Emitted;
use crate::interceptor::Interceptor;

/// Size of one wire record on 64-bit Linux: 16-byte timestamp, u16 type,
/// u16 code, i32 value, native endian.
pub const EVENT_SIZE: usize = 24;

/// Errors on the output side of the stream.
///
/// There is no read variant: a failed or partial read is end-of-stream,
/// not an error. A failed or partial write is fatal, since a dropped
/// record desynchronizes the consumer's view of key state.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("failed to write event: {0}")]
    Write(#[source] std::io::Error),
}

/// Decode one wire record. The timestamp bytes are ignored.
pub fn decode_event(buf: &[u8; EVENT_SIZE]) -> Event {
    let kind = u16::from_ne_bytes([buf[16], buf[17]]);
    let code = u16::from_ne_bytes([buf[18], buf[19]]);
    let value = i32::from_ne_bytes([buf[20], buf[21], buf[22], buf[23]]);
    Event {
        kind: EventKind::from_raw(kind),
        code,
        value,
    }
}

/// Encode one wire record, timestamp zeroed
pub fn encode_event(event: &Event) -> [u8; EVENT_SIZE] {
    let mut buf = [0u8; EVENT_SIZE];
    buf[16..18].copy_from_slice(&event.kind.raw().to_ne_bytes());
    buf[18..20].copy_from_slice(&event.code.to_ne_bytes());
    buf[20..24].copy_from_slice(&event.value.to_ne_bytes());
    buf
}

/// Blocking reader of wire records
pub struct EventReader<R: Read> {
    inner: R,
}

impl<R: Read> EventReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next event, blocking until one full record is available.
    ///
    /// Returns None at end-of-stream. A partial trailing record and any
    /// read error also end the stream; position in the event sequence is
    /// lost either way, so there is nothing to retry.
    pub fn read_event(&mut self) -> Option<Event> {
        let mut buf = [0u8; EVENT_SIZE];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Some(decode_event(&buf)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => None,
            Err(e) => {
                log::debug!("input stream read failed, treating as end-of-stream: {e}");
                None
            }
        }
    }
}

/// Blocking writer of wire records, flushed per call
pub struct EventWriter<W: Write> {
    inner: W,
}

impl<W: Write> EventWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one event and flush it
    pub fn write_event(&mut self, event: &Event) -> Result<(), StreamError> {
        self.inner
            .write_all(&encode_event(event))
            .and_then(|()| self.inner.flush())
            .map_err(StreamError::Write)
    }

    /// Write a batch of events and flush once
    pub fn write_events(&mut self, events: &[Event]) -> Result<(), StreamError> {
        if events.is_empty() {
            return Ok(());
        }
        for event in events {
            self.inner
                .write_all(&encode_event(event))
                .map_err(StreamError::Write)?;
        }
        self.inner.flush().map_err(StreamError::Write)
    }
}

/// The filter loop: one blocking read per iteration until end-of-stream.
///
/// Synthetic events reach the output before the forwarded original, in
/// emission order. A write error aborts immediately; end-of-stream
/// returns Ok.
pub fn run_filter<R: Read, W: Write>(
    interceptor: &mut Interceptor,
    input: R,
    output: W,
) -> Result<(), StreamError> {
    let mut reader = EventReader::new(input);
    let mut writer = EventWriter::new(output);
    let mut emitted = Emitted::new();

    while let Some(event) = reader.read_event() {
        emitted.clear();
        let forward = interceptor.process(&event, &mut emitted);
        if !emitted.is_empty() {
            log::trace!("{event}: {} synthetic event(s)", emitted.len());
        }
        writer.write_events(&emitted)?;
        if forward {
            writer.write_event(&event)?;
        }
    }

    log::debug!("input stream ended");
    Ok(())
}
