//! Length-prefixed framing for externally encoded messages.
//!
//! Message types such as protocol buffers are not self-delimiting, so they
//! cannot sit in the middle of a stream on their own. Wrapping one in
//! [`Framed`] prefixes it with a fixed-width length.
//!
//! Wire format:
//! ```text
//! ┌──────────────┬─────────────────────────────┐
//! │ Size (4B LE) │ Payload (Size bytes, > 0)    │
//! └──────────────┴─────────────────────────────┘
//! ```

use std::fmt;
use std::io::{Read, Write};
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::codec::Codec;
use crate::error::{CodecError, Direction, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Size of the length prefix.
pub const PREFIX_SIZE: usize = 4;

const TYPE_NAME: &str = "external message";

/// A message that knows how to encode itself to and from opaque bytes.
pub trait ExternalMessage {
    type Error: fmt::Display;

    /// Encode the whole message.
    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    /// Replace `self` with the message encoded in `bytes`.
    fn from_bytes(&mut self, bytes: &[u8]) -> std::result::Result<(), Self::Error>;
}

/// Opt-in wrapper that gives an [`ExternalMessage`] a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Framed<M>(pub M);

impl<M> Framed<M> {
    pub fn new(message: M) -> Self {
        Self(message)
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

impl<M> Deref for Framed<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.0
    }
}

impl<M> DerefMut for Framed<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.0
    }
}

impl<M> From<M> for Framed<M> {
    fn from(message: M) -> Self {
        Self(message)
    }
}

impl<M: ExternalMessage> Codec for Framed<M> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        let payload = self.0.to_bytes().map_err(|err| {
            debug!(error = %err, "external message failed to encode");
            CodecError::malformed(Direction::Serializing, TYPE_NAME, "external encoder failed")
        })?;

        let max = out.config().framed_limit();
        let size = u32::try_from(payload.len())
            .ok()
            .filter(|&size| size as usize <= max)
            .ok_or(CodecError::TooLarge {
                direction: Direction::Serializing,
                ty: TYPE_NAME,
                size: payload.len() as u64,
                max,
            })?;

        trace!(size, "writing framed external message");
        out.write_u32_le(size)?;
        out.write_bytes(&payload)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        let mut prefix = [0u8; PREFIX_SIZE];
        input.read_exact(&mut prefix, TYPE_NAME)?;
        let size = u32::from_le_bytes(prefix);

        if size == 0 {
            return Err(CodecError::malformed(
                Direction::Deserializing,
                TYPE_NAME,
                "zero-length frame",
            ));
        }
        let max = input.config().framed_limit();
        if size as usize > max {
            debug!(size, max, "rejecting oversized framed message");
            return Err(CodecError::TooLarge {
                direction: Direction::Deserializing,
                ty: TYPE_NAME,
                size: u64::from(size),
                max,
            });
        }

        let payload = input.read_bytes(size as usize, TYPE_NAME)?;
        self.0.from_bytes(&payload).map_err(|err| {
            debug!(error = %err, size, "external message failed to parse");
            CodecError::malformed(
                Direction::Deserializing,
                TYPE_NAME,
                "external parser rejected payload",
            )
        })
    }
}
