//! Typed values as they appear on the command line.

use std::io::{Read, Write};

use clap::ValueEnum;
use serde_json::{Number, Value};
use wireprims_codec::float::format_token;
use wireprims_codec::{Codec, CodecError, Reader, Writer};

use crate::exit::{codec_error, CliError, CliResult, USAGE};

/// Wire types the CLI can encode and decode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
    String,
    Bytes,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
        }
    }
}

/// Parse `text` as `ty` and append its encoding to `out`.
pub fn encode<W: Write>(ty: ValueType, text: &str, out: &mut Writer<W>) -> CliResult<()> {
    let result = match ty {
        ValueType::I8 => parse_number::<i8>(ty, text)?.serialize(out),
        ValueType::I16 => parse_number::<i16>(ty, text)?.serialize(out),
        ValueType::I32 => parse_number::<i32>(ty, text)?.serialize(out),
        ValueType::I64 => parse_number::<i64>(ty, text)?.serialize(out),
        ValueType::U8 => parse_number::<u8>(ty, text)?.serialize(out),
        ValueType::U16 => parse_number::<u16>(ty, text)?.serialize(out),
        ValueType::U32 => parse_number::<u32>(ty, text)?.serialize(out),
        ValueType::U64 => parse_number::<u64>(ty, text)?.serialize(out),
        ValueType::F32 => parse_number::<f32>(ty, text)?.serialize(out),
        ValueType::F64 => parse_number::<f64>(ty, text)?.serialize(out),
        ValueType::Bool => parse_bool(text)?.serialize(out),
        ValueType::Char => parse_char(text)?.serialize(out),
        ValueType::String => text.to_string().serialize(out),
        ValueType::Bytes => parse_hex(text)?.serialize(out),
    };
    result.map_err(|err| codec_error("encode failed", err))
}

/// Decode the next record of type `ty` as a JSON value.
pub fn decode_next<R: Read>(ty: ValueType, input: &mut Reader<R>) -> Result<Value, CodecError> {
    let value = match ty {
        ValueType::I8 => Value::from(read::<i8, R>(input)?),
        ValueType::I16 => Value::from(read::<i16, R>(input)?),
        ValueType::I32 => Value::from(read::<i32, R>(input)?),
        ValueType::I64 => Value::from(read::<i64, R>(input)?),
        ValueType::U8 => Value::from(read::<u8, R>(input)?),
        ValueType::U16 => Value::from(read::<u16, R>(input)?),
        ValueType::U32 => Value::from(read::<u32, R>(input)?),
        ValueType::U64 => Value::from(read::<u64, R>(input)?),
        ValueType::F32 => {
            let v = read::<f32, R>(input)?;
            float_value(f64::from(v), format_token(v))
        }
        ValueType::F64 => {
            let v = read::<f64, R>(input)?;
            float_value(v, format_token(v))
        }
        ValueType::Bool => Value::from(read::<bool, R>(input)?),
        ValueType::Char => Value::from(read::<char, R>(input)?.to_string()),
        ValueType::String => Value::from(read::<String, R>(input)?),
        ValueType::Bytes => Value::from(hex::encode(read::<Vec<u8>, R>(input)?)),
    };
    Ok(value)
}

/// Render a decoded value for human-facing output.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn read<T: Codec + Default, R: Read>(input: &mut Reader<R>) -> Result<T, CodecError> {
    let mut value = T::default();
    value.deserialize(input)?;
    Ok(value)
}

// JSON has no infinities or NaN; those fall back to their wire token.
fn float_value(value: f64, token: String) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::String(token))
}

fn parse_number<T: std::str::FromStr>(ty: ValueType, text: &str) -> CliResult<T> {
    text.trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid {} value: {text:?}", ty.name())))
}

fn parse_bool(text: &str) -> CliResult<bool> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CliError::new(
            USAGE,
            format!("invalid bool value: {other:?} (expected true, false, 1 or 0)"),
        )),
    }
}

fn parse_char(text: &str) -> CliResult<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::new(
            USAGE,
            format!("invalid char value: {text:?} (expected exactly one character)"),
        )),
    }
}

/// Decode hex text, ignoring embedded whitespace.
pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|err| CliError::new(USAGE, format!("invalid hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::DATA_INVALID;

    fn encode_hex(ty: ValueType, text: &str) -> CliResult<String> {
        let mut writer = Writer::new(Vec::new());
        encode(ty, text, &mut writer)?;
        Ok(hex::encode(writer.into_inner().map_err(|err| codec_error("flush", err))?))
    }

    fn decode_all(ty: ValueType, bytes: &[u8]) -> Vec<Value> {
        let mut reader = Reader::new(bytes);
        let mut values = Vec::new();
        while !reader.is_exhausted().unwrap() {
            values.push(decode_next(ty, &mut reader).unwrap());
        }
        values
    }

    #[test]
    fn encodes_each_type_from_text() {
        assert_eq!(encode_hex(ValueType::U32, "300").unwrap(), "022c01");
        assert_eq!(encode_hex(ValueType::I16, "-1").unwrap(), "8101");
        assert_eq!(encode_hex(ValueType::U8, "255").unwrap(), "ff");
        assert_eq!(encode_hex(ValueType::Bool, "true").unwrap(), "31");
        assert_eq!(encode_hex(ValueType::F64, "inf").unwrap(), hex::encode("inf "));
        assert_eq!(encode_hex(ValueType::String, "hi").unwrap(), "01026869");
        assert_eq!(encode_hex(ValueType::Bytes, "dead beef").unwrap(), "0104deadbeef");
    }

    #[test]
    fn bad_text_is_a_usage_error() {
        assert_eq!(encode_hex(ValueType::U8, "256").unwrap_err().code, USAGE);
        assert_eq!(encode_hex(ValueType::Bool, "yes").unwrap_err().code, USAGE);
        assert_eq!(encode_hex(ValueType::Char, "ab").unwrap_err().code, USAGE);
        assert_eq!(encode_hex(ValueType::Bytes, "abc").unwrap_err().code, USAGE);
    }

    #[test]
    fn decodes_records_back_to_json() {
        assert_eq!(
            decode_all(ValueType::U32, &[0x02, 0x2C, 0x01, 0x00]),
            vec![Value::from(300u32), Value::from(0u32)]
        );
        assert_eq!(
            decode_all(ValueType::F64, b"inf 2.5e0 "),
            vec![Value::from("inf"), Value::from(2.5)]
        );
        assert_eq!(
            decode_all(ValueType::Bytes, &[0x01, 0x02, 0xAB, 0xCD]),
            vec![Value::from("abcd")]
        );
    }

    #[test]
    fn decode_failure_maps_to_data_invalid() {
        let mut reader = Reader::new(&[0x02, 0x2C][..]);
        let err = decode_next(ValueType::U32, &mut reader).unwrap_err();
        assert_eq!(codec_error("decode failed", err).code, DATA_INVALID);
    }

    #[test]
    fn display_strips_json_quotes() {
        assert_eq!(display(&Value::from("text")), "text");
        assert_eq!(display(&Value::from(7)), "7");
    }
}
