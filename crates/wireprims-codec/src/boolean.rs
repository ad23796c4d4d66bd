use std::io::{Read, Write};

use crate::codec::Codec;
use crate::error::{CodecError, Direction, Result};
use crate::reader::Reader;
use crate::writer::Writer;

const TRUE: u8 = b'1';
const FALSE: u8 = b'0';

fn to_byte(value: bool) -> u8 {
    if value {
        TRUE
    } else {
        FALSE
    }
}

fn from_byte(byte: u8) -> Result<bool> {
    match byte {
        TRUE => Ok(true),
        FALSE => Ok(false),
        _ => Err(CodecError::malformed(
            Direction::Deserializing,
            "bool",
            "expected '0' or '1'",
        )),
    }
}

impl Codec for bool {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        out.write_byte(to_byte(*self))
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        *self = false;
        *self = match input.next_byte()? {
            Some(byte) => from_byte(byte)?,
            None => {
                return Err(CodecError::malformed(
                    Direction::Deserializing,
                    "bool",
                    "stream ended early",
                ))
            }
        };
        Ok(())
    }

    // Sequences of bool are transcoded to a raw run of '0'/'1' bytes.
    fn serialize_slice<W: Write>(items: &[Self], out: &mut Writer<W>) -> Result<()> {
        let raw: Vec<u8> = items.iter().map(|&b| to_byte(b)).collect();
        out.write_bytes(&raw)
    }

    fn deserialize_slice<R: Read>(items: &mut [Self], input: &mut Reader<R>) -> Result<()> {
        let mut raw = vec![0u8; items.len()];
        input.read_exact(&mut raw, "bool")?;
        for (item, byte) in items.iter_mut().zip(raw) {
            *item = from_byte(byte)?;
        }
        Ok(())
    }
}
