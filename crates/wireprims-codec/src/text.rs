//! Text and raw buffer codecs.
//!
//! Both are a varint byte count followed by the bytes themselves. Strings
//! carry their UTF-8 code units verbatim, no other text encoding is applied.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::codec::Codec;
use crate::containers::read_len;
use crate::error::{CodecError, Direction, Result, ResultExt};
use crate::reader::Reader;
use crate::writer::Writer;

impl Codec for String {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        self.len().serialize(out).while_serializing("String")?;
        out.write_bytes(self.as_bytes())
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        let len = read_len(input).while_deserializing("String")?;
        let mut raw = Vec::new();
        input.read_into_vec(&mut raw, len, "String")?;
        *self = String::from_utf8(raw).map_err(|_| {
            CodecError::malformed(Direction::Deserializing, "String", "invalid UTF-8")
        })?;
        Ok(())
    }
}

impl Codec for Bytes {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        self.len().serialize(out).while_serializing("Bytes")?;
        out.write_bytes(self)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        *self = Bytes::new();
        let len = read_len(input).while_deserializing("Bytes")?;
        *self = input.read_bytes(len, "Bytes")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};
    use crate::error::ErrorKind;

    #[test]
    fn string_is_count_then_utf8() {
        let bytes = to_bytes(&"héllo".to_string()).unwrap();
        assert_eq!(bytes[..2], [0x01, 0x06]);
        assert_eq!(&bytes[2..], "héllo".as_bytes());
        assert_eq!(from_bytes::<String>(&bytes).unwrap(), "héllo");
    }

    #[test]
    fn empty_string() {
        assert_eq!(to_bytes(&String::new()).unwrap(), vec![0x00]);
        assert_eq!(from_bytes::<String>(&[0x00]).unwrap(), "");
    }

    #[test]
    fn short_string_is_truncated() {
        let err = from_bytes::<String>(&[0x01, 0x05, b'a', b'b']).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { ty: "String" }));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = from_bytes::<String>(&[0x01, 0x02, 0xC3, 0x28]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn bad_length_prefix_carries_string_context() {
        let err = from_bytes::<String>(&[0x09]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(err.trace(), vec!["String"]);
    }

    #[test]
    fn bytes_share_the_byte_vec_format() {
        let payload = Bytes::from_static(b"\x00\x01binary\xFF");
        let bytes = to_bytes(&payload).unwrap();

        assert_eq!(bytes, to_bytes(&payload.to_vec()).unwrap());
        assert_eq!(from_bytes::<Bytes>(&bytes).unwrap(), payload);
    }

    #[test]
    fn strings_concatenate() {
        let mut writer = Writer::new(Vec::new());
        "one".to_string().serialize(&mut writer).unwrap();
        "two".to_string().serialize(&mut writer).unwrap();
        let wire = writer.into_inner().unwrap();

        let mut reader = Reader::new(&wire[..]);
        let mut first = String::new();
        let mut second = String::new();
        first.deserialize(&mut reader).unwrap();
        second.deserialize(&mut reader).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("one", "two"));
        assert!(reader.is_exhausted().unwrap());
    }
}
