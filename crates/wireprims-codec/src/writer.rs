use std::io::{ErrorKind, Write};

use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};

/// Writes encoded values to any `Write` stream.
///
/// Encoded bytes are staged in a buffer and pushed to the sink whenever the
/// buffer reaches `write_buffer_size`, on [`flush`](Self::flush) and on
/// [`into_inner`](Self::into_inner). Callers that drive [`Codec`](crate::Codec)
/// methods directly must flush before handing the sink to anyone else;
/// [`serialize`](crate::serialize) does so on every call.
pub struct Writer<W> {
    inner: W,
    buf: BytesMut,
    written: u64,
    config: CodecConfig,
}

impl<W: Write> Writer<W> {
    /// Create a new writer with default configuration.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new writer with explicit configuration.
    pub fn with_config(inner: W, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.write_buffer_size),
            written: 0,
            config,
        }
    }

    /// Append a single byte.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.buf.put_u8(byte);
        self.written += 1;
        self.drain_if_full()
    }

    /// Append a run of bytes.
    ///
    /// Runs at least as large as the staging buffer bypass it. If the sink
    /// fails partway through such a run, the unsent tail is staged so a later
    /// [`flush`](Self::flush) resumes exactly where the sink stopped.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.written += bytes.len() as u64;
        if bytes.len() < self.config.write_buffer_size {
            self.buf.put_slice(bytes);
            return self.drain_if_full();
        }

        if let Err(err) = self.drain() {
            self.buf.put_slice(bytes);
            return Err(err);
        }
        let mut sent = 0usize;
        write_all(&mut self.inner, bytes, &mut sent).inspect_err(|_| {
            self.buf.put_slice(&bytes[sent..]);
        })
    }

    /// Append a fixed-width little-endian `u32`.
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.buf.put_u32_le(value);
        self.written += 4;
        self.drain_if_full()
    }

    /// Push staged bytes to the sink and flush it.
    pub fn flush(&mut self) -> Result<()> {
        self.drain()?;
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }

    fn drain_if_full(&mut self) -> Result<()> {
        if self.buf.len() >= self.config.write_buffer_size {
            self.drain()?;
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        // Bytes the sink accepted leave the buffer even when a later write
        // fails, so a retried flush never sends them twice.
        let mut sent = 0usize;
        let result = write_all(&mut self.inner, &self.buf, &mut sent);
        self.buf.advance(sent);
        result?;
        trace!(bytes = sent, "drained encoded bytes to sink");
        Ok(())
    }

    /// Total bytes encoded through this writer, staged or not.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Bytes staged but not yet pushed to the sink.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Flush staged bytes and return the inner stream.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    /// Current writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// Write all of `data`, recording in `sent` how much the sink accepted.
///
/// Only `Interrupted` is retried. `WouldBlock` and every other failure go
/// back to the caller.
fn write_all<W: Write>(inner: &mut W, data: &[u8], sent: &mut usize) -> Result<()> {
    while *sent < data.len() {
        match inner.write(&data[*sent..]) {
            Ok(0) => return Err(CodecError::Io(ErrorKind::WriteZero.into())),
            Ok(n) => *sent += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        }
    }
    Ok(())
}
