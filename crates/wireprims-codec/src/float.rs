//! Floating-point codec.
//!
//! Values travel as a decimal token followed by one space. The three IEEE
//! special values use the literal tokens `inf`, `ninf` and `NaN`. Finite
//! values are written with 35 significant digits, which is more than enough
//! for the decimal text to parse back to the identical bit pattern.

use std::fmt::LowerExp;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::codec::Codec;
use crate::error::{CodecError, Direction, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Significant digits written for finite values.
pub const SIGNIFICANT_DIGITS: usize = 35;

/// Token terminator.
pub const DELIMITER: u8 = b' ';

const INF: &[u8] = b"inf";
const NEG_INF: &[u8] = b"ninf";
const NAN: &[u8] = b"NaN";

// Longest token a conforming writer can produce is well under this.
const MAX_TOKEN_LEN: usize = 128;

/// A float type carried by the textual codec.
pub trait FloatToken: Copy + Default + PartialOrd + LowerExp + FromStr {
    const TYPE_NAME: &'static str;
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    const NAN: Self;
}

impl FloatToken for f32 {
    const TYPE_NAME: &'static str = "f32";
    const INFINITY: Self = f32::INFINITY;
    const NEG_INFINITY: Self = f32::NEG_INFINITY;
    const NAN: Self = f32::NAN;
}

impl FloatToken for f64 {
    const TYPE_NAME: &'static str = "f64";
    const INFINITY: Self = f64::INFINITY;
    const NEG_INFINITY: Self = f64::NEG_INFINITY;
    const NAN: Self = f64::NAN;
}

/// Render `value` as its wire token, without the delimiter.
pub fn format_token<T: FloatToken>(value: T) -> String {
    if value == T::INFINITY {
        "inf".to_string()
    } else if value == T::NEG_INFINITY {
        "ninf".to_string()
    } else if value < T::INFINITY {
        format_decimal(value)
    } else {
        "NaN".to_string()
    }
}

fn format_decimal<T: LowerExp>(value: T) -> String {
    let text = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        _ => text,
    }
}

/// Write `value` as a token plus delimiter.
pub fn write_float<T: FloatToken, W: Write>(value: T, out: &mut Writer<W>) -> Result<()> {
    out.write_bytes(format_token(value).as_bytes())?;
    out.write_byte(DELIMITER)
}

/// Read a token plus delimiter into `value`.
///
/// `value` is zero unless the whole record decodes.
pub fn read_float<T: FloatToken, R: Read>(value: &mut T, input: &mut Reader<R>) -> Result<()> {
    *value = T::default();

    let parsed = match input.peek_byte()? {
        Some(b'i') => {
            expect_literal::<T, R>(input, INF)?;
            T::INFINITY
        }
        Some(b'n') => {
            expect_literal::<T, R>(input, NEG_INF)?;
            T::NEG_INFINITY
        }
        Some(b'N') => {
            expect_literal::<T, R>(input, NAN)?;
            T::NAN
        }
        Some(_) => read_decimal(input)?,
        None => return Err(CodecError::Truncated { ty: T::TYPE_NAME }),
    };

    if input.read_byte(T::TYPE_NAME)? != DELIMITER {
        return Err(CodecError::malformed(
            Direction::Deserializing,
            T::TYPE_NAME,
            "token not followed by a space",
        ));
    }

    *value = parsed;
    Ok(())
}

fn expect_literal<T: FloatToken, R: Read>(input: &mut Reader<R>, literal: &[u8]) -> Result<()> {
    let mut buf = [0u8; 4];
    let buf = &mut buf[..literal.len()];
    input.read_exact(buf, T::TYPE_NAME)?;
    if *buf != *literal {
        return Err(CodecError::malformed(
            Direction::Deserializing,
            T::TYPE_NAME,
            "unrecognized special value",
        ));
    }
    Ok(())
}

fn read_decimal<T: FloatToken, R: Read>(input: &mut Reader<R>) -> Result<T> {
    let mut token = String::new();
    while let Some(byte) = input.peek_byte()? {
        if !is_decimal_char(byte) {
            break;
        }
        if token.len() == MAX_TOKEN_LEN {
            return Err(CodecError::malformed(
                Direction::Deserializing,
                T::TYPE_NAME,
                "decimal token too long",
            ));
        }
        input.next_byte()?;
        token.push(char::from(byte));
    }

    token.parse().map_err(|_| {
        CodecError::malformed(
            Direction::Deserializing,
            T::TYPE_NAME,
            "invalid decimal token",
        )
    })
}

fn is_decimal_char(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E')
}

impl Codec for f32 {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_float(*self, out)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        read_float(self, input)
    }
}

impl Codec for f64 {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_float(*self, out)
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        read_float(self, input)
    }
}
