//! Byte-width and character codecs.
//!
//! `u8` and `i8` travel as a single raw byte. Sequences of them skip the
//! per-element loop and move as one raw run after the length prefix. `char`
//! is wider than a byte and uses the varint format of its scalar value.

use std::io::{Read, Write};

use crate::codec::Codec;
use crate::error::{CodecError, Direction, Result};
use crate::reader::Reader;
use crate::varint;
use crate::writer::Writer;

impl Codec for u8 {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        out.write_byte(*self)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        *self = 0;
        *self = input.read_byte("u8")?;
        Ok(())
    }

    fn serialize_slice<W: Write>(items: &[Self], out: &mut Writer<W>) -> Result<()> {
        out.write_bytes(items)
    }

    fn deserialize_slice<R: Read>(items: &mut [Self], input: &mut Reader<R>) -> Result<()> {
        input.read_exact(items, "u8")
    }
}

impl Codec for i8 {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        out.write_byte(*self as u8)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        *self = 0;
        *self = input.read_byte("i8")? as i8;
        Ok(())
    }

    fn serialize_slice<W: Write>(items: &[Self], out: &mut Writer<W>) -> Result<()> {
        let raw: Vec<u8> = items.iter().map(|&b| b as u8).collect();
        out.write_bytes(&raw)
    }

    fn deserialize_slice<R: Read>(items: &mut [Self], input: &mut Reader<R>) -> Result<()> {
        let mut raw = vec![0u8; items.len()];
        input.read_exact(&mut raw, "i8")?;
        for (item, byte) in items.iter_mut().zip(raw) {
            *item = byte as i8;
        }
        Ok(())
    }
}

impl Codec for char {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        varint::pack(u32::from(*self), out)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        *self = char::default();
        let scalar: u32 = varint::read(input)?;
        *self = char::from_u32(scalar).ok_or(CodecError::malformed(
            Direction::Deserializing,
            "char",
            "not a unicode scalar value",
        ))?;
        Ok(())
    }
}
