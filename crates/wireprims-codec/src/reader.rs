use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};

/// Reads encoded values from any `Read` stream.
///
/// The reader never pulls more bytes from the underlying stream than the
/// codecs ask for, apart from a single byte of look-ahead that stays buffered
/// here. Values written back-to-back can therefore be read one at a time, and
/// whatever follows the last value is left untouched.
pub struct Reader<R> {
    inner: R,
    peeked: Option<u8>,
    consumed: u64,
    config: CodecConfig,
}

impl<R: Read> Reader<R> {
    /// Create a new reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(inner: R, config: CodecConfig) -> Self {
        Self {
            inner,
            peeked: None,
            consumed: 0,
            config,
        }
    }

    /// Look at the next byte without consuming it.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn peek_byte(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            let mut byte = [0u8; 1];
            if self.fill(&mut byte)? == 1 {
                self.peeked = Some(byte[0]);
            }
        }
        Ok(self.peeked)
    }

    /// Read one byte, or `Ok(None)` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.peeked = None;
            self.consumed += 1;
        }
        Ok(byte)
    }

    /// Read one byte on behalf of `ty`, failing with `Truncated` at end of stream.
    pub fn read_byte(&mut self, ty: &'static str) -> Result<u8> {
        self.next_byte()?.ok_or(CodecError::Truncated { ty })
    }

    /// Fill `buf` completely on behalf of `ty`.
    pub fn read_exact(&mut self, buf: &mut [u8], ty: &'static str) -> Result<()> {
        let mut filled = 0usize;
        if !buf.is_empty() {
            if let Some(byte) = self.peeked.take() {
                buf[0] = byte;
                filled = 1;
            }
        }
        filled += self.fill(&mut buf[filled..])?;
        self.consumed += filled as u64;

        if filled < buf.len() {
            return Err(CodecError::Truncated { ty });
        }
        Ok(())
    }

    /// Append exactly `len` bytes to `out`.
    ///
    /// The buffer grows one chunk at a time, so a corrupt length prefix runs
    /// into end of stream long before it can exhaust memory.
    pub fn read_into_vec(&mut self, out: &mut Vec<u8>, len: usize, ty: &'static str) -> Result<()> {
        let chunk = self.config.read_chunk_size.max(1);
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(chunk);
            let start = out.len();
            out.resize(start + step, 0);
            self.read_exact(&mut out[start..], ty)?;
            remaining -= step;
        }
        Ok(())
    }

    /// Read exactly `len` bytes into an owned buffer.
    pub fn read_bytes(&mut self, len: usize, ty: &'static str) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.read_into_vec(&mut buf, len, ty)?;
        Ok(Bytes::from(buf))
    }

    /// True once the underlying stream has no more bytes.
    pub fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.peek_byte()?.is_none())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
        Ok(filled)
    }

    /// Number of bytes handed to codecs so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    ///
    /// A byte pulled in by [`peek_byte`](Self::peek_byte) and not yet
    /// consumed is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::ErrorKind as CodecErrorKind;

    #[test]
    fn peek_does_not_consume() {
        let mut reader = Reader::new(Cursor::new(vec![7u8, 8]));

        assert_eq!(reader.peek_byte().unwrap(), Some(7));
        assert_eq!(reader.peek_byte().unwrap(), Some(7));
        assert_eq!(reader.consumed(), 0);
        assert_eq!(reader.read_byte("u8").unwrap(), 7);
        assert_eq!(reader.read_byte("u8").unwrap(), 8);
        assert_eq!(reader.consumed(), 2);
        assert!(reader.is_exhausted().unwrap());
    }

    #[test]
    fn read_exact_includes_peeked_byte() {
        let mut reader = Reader::new(Cursor::new(b"abcd".to_vec()));
        reader.peek_byte().unwrap();

        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf, "test").unwrap();
        assert_eq!(&buf, b"abc");
        assert_eq!(reader.consumed(), 3);
    }

    #[test]
    fn short_stream_is_truncated() {
        let mut reader = Reader::new(Cursor::new(vec![1u8, 2]));
        let mut buf = [0u8; 4];

        let err = reader.read_exact(&mut buf, "u32").unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Truncated);
        assert!(matches!(err, CodecError::Truncated { ty: "u32" }));
    }

    #[test]
    fn does_not_read_past_request() {
        let mut reader = Reader::new(Cursor::new(vec![1u8, 2, 3, 4, 5]));
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf, "test").unwrap();

        let cursor = reader.into_inner();
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn bulk_read_spans_multiple_chunks() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let cfg = CodecConfig {
            read_chunk_size: 64,
            ..CodecConfig::default()
        };
        let mut reader = Reader::with_config(Cursor::new(payload.clone()), cfg);

        let bytes = reader.read_bytes(payload.len(), "Bytes").unwrap();
        assert_eq!(bytes.as_ref(), payload.as_slice());
        assert_eq!(reader.consumed(), payload.len() as u64);
    }

    #[test]
    fn huge_declared_length_fails_without_huge_allocation() {
        let mut reader = Reader::new(Cursor::new(vec![0u8; 16]));
        let mut out = Vec::new();

        let err = reader
            .read_into_vec(&mut out, usize::MAX / 2, "Vec")
            .unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::Truncated);
        assert!(out.len() <= CodecConfig::default().read_chunk_size);
    }

    #[test]
    fn byte_by_byte_source() {
        let source = ByteByByteReader {
            bytes: b"slow".to_vec(),
            pos: 0,
        };
        let mut reader = Reader::new(source);
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf, "test").unwrap();
        assert_eq!(&buf, b"slow");
    }

    #[test]
    fn interrupted_read_retries() {
        let source = InterruptedThenData {
            interrupted: false,
            bytes: vec![42],
            pos: 0,
        };
        let mut reader = Reader::new(source);
        assert_eq!(reader.read_byte("u8").unwrap(), 42);
    }

    #[test]
    fn would_block_propagates_io_error() {
        let mut reader = Reader::new(WouldBlock);
        let err = reader.read_byte("u8").unwrap_err();
        assert!(matches!(err, CodecError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = Reader::new(Cursor::new(Vec::<u8>::new()));

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        assert_eq!(reader.config(), &CodecConfig::default());
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct WouldBlock;

    impl Read for WouldBlock {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }
}
