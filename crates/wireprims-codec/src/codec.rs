use std::io::{Read, Write};

use tracing::debug;

use crate::error::{CodecError, Direction, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// A type with a binary wire representation.
///
/// Every record is self-delimiting: `deserialize` consumes exactly the bytes
/// `serialize` produced, so any number of values can share one stream.
/// Containers implement this by delegating to their element codecs, which
/// means nesting depth is bounded only by the call stack. Callers decoding
/// untrusted, deeply nested types should bound that depth themselves.
pub trait Codec {
    /// Write `self` to `out`.
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()>;

    /// Overwrite `self` with the next value read from `input`.
    ///
    /// Scalars are reset to their default value on failure. Aggregates are
    /// left in an unspecified but valid state.
    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()>;

    /// Write the elements of a sequence, without a length prefix.
    ///
    /// Byte and bool override this to emit a single raw run.
    #[doc(hidden)]
    fn serialize_slice<W: Write>(items: &[Self], out: &mut Writer<W>) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.serialize(out)?;
        }
        Ok(())
    }

    /// Fill every element of a sequence, without a length prefix.
    #[doc(hidden)]
    fn deserialize_slice<R: Read>(items: &mut [Self], input: &mut Reader<R>) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.deserialize(input)?;
        }
        Ok(())
    }
}

impl<T: Codec> Codec for Box<T> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        (**self).serialize(out)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        (**self).deserialize(input)
    }
}

/// Serialize `item` and flush the writer.
pub fn serialize<T: Codec + ?Sized, W: Write>(item: &T, out: &mut Writer<W>) -> Result<()> {
    item.serialize(out)?;
    out.flush()
}

/// Deserialize into `item`, resetting it to its default value on failure.
pub fn deserialize<T: Codec + Default, R: Read>(item: &mut T, input: &mut Reader<R>) -> Result<()> {
    match item.deserialize(input) {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!(
                error = %err,
                consumed = input.consumed(),
                "deserialize failed; resetting item"
            );
            *item = T::default();
            Err(err)
        }
    }
}

/// Encode a single value into a fresh buffer.
pub fn to_bytes<T: Codec + ?Sized>(item: &T) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    item.serialize(&mut writer)?;
    writer.into_inner()
}

/// Decode one value from the front of `bytes`. Trailing bytes are ignored.
pub fn from_bytes<T: Codec + Default>(bytes: &[u8]) -> Result<T> {
    let mut reader = Reader::new(bytes);
    let mut item = T::default();
    item.deserialize(&mut reader)?;
    Ok(item)
}

/// Decode one value that must span all of `bytes`.
pub fn from_bytes_exact<T: Codec + Default>(bytes: &[u8]) -> Result<T> {
    let mut reader = Reader::new(bytes);
    let mut item = T::default();
    item.deserialize(&mut reader)?;
    if !reader.is_exhausted()? {
        return Err(CodecError::malformed(
            Direction::Deserializing,
            std::any::type_name::<T>(),
            "trailing bytes after value",
        ));
    }
    Ok(item)
}
