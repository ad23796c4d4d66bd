//! Variable-length integer codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ Control (1B)                 │ Magnitude (n bytes, LE)      │
//! │ bit 7: sign (1 = negative)   │ absolute value, high-order   │
//! │ bits 6-4: ignored            │ zero bytes trimmed; omitted  │
//! │ bits 3-0: n (0..=8)          │ entirely for zero            │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Only the magnitude travels, so a value written from any integer width can
//! be read into any other width that can hold it.

use std::io::{Read, Write};

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Sign flag in the control byte.
pub const SIGN_BIT: u8 = 0x80;

/// Magnitude byte count in the control byte.
pub const LEN_MASK: u8 = 0x0F;

/// Longest possible record: control byte plus eight magnitude bytes.
pub const MAX_RECORD_LEN: usize = 9;

/// An integer of at most 64 bits carried by the varint codec.
pub trait VarInt: Copy + Default {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;
    /// Width in bytes.
    const WIDTH: usize;

    /// Split into a sign flag and absolute value.
    fn to_sign_magnitude(self) -> (bool, u64);

    /// Rebuild from a sign flag and absolute value, or `None` if out of range.
    fn from_sign_magnitude(negative: bool, magnitude: u64) -> Option<Self>;
}

macro_rules! unsigned_varint {
    ($($t:ty),*) => {$(
        impl VarInt for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const WIDTH: usize = std::mem::size_of::<$t>();

            fn to_sign_magnitude(self) -> (bool, u64) {
                (false, self as u64)
            }

            fn from_sign_magnitude(negative: bool, magnitude: u64) -> Option<Self> {
                if negative {
                    return None;
                }
                <$t>::try_from(magnitude).ok()
            }
        }
    )*};
}

macro_rules! signed_varint {
    ($($t:ty),*) => {$(
        impl VarInt for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const WIDTH: usize = std::mem::size_of::<$t>();

            fn to_sign_magnitude(self) -> (bool, u64) {
                // Widening first keeps MIN's magnitude representable.
                (self < 0, (self as i64).unsigned_abs())
            }

            fn from_sign_magnitude(negative: bool, magnitude: u64) -> Option<Self> {
                let value = if negative {
                    -i128::from(magnitude)
                } else {
                    i128::from(magnitude)
                };
                <$t>::try_from(value).ok()
            }
        }
    )*};
}

unsigned_varint!(u16, u32, u64, usize);
signed_varint!(i16, i32, i64, isize);

/// Number of magnitude bytes needed for `magnitude`; zero for zero.
pub fn magnitude_len(magnitude: u64) -> usize {
    (64 - magnitude.leading_zeros() as usize).div_ceil(8)
}

/// Encode `value` into a record buffer, returning the record length.
pub fn encode<T: VarInt>(value: T, record: &mut [u8; MAX_RECORD_LEN]) -> usize {
    let (negative, magnitude) = value.to_sign_magnitude();
    let n = magnitude_len(magnitude);
    record[0] = n as u8 | if negative { SIGN_BIT } else { 0 };
    record[1..=n].copy_from_slice(&magnitude.to_le_bytes()[..n]);
    n + 1
}

/// Write `value` as a varint record.
pub fn pack<T: VarInt, W: Write>(value: T, out: &mut Writer<W>) -> Result<()> {
    let mut record = [0u8; MAX_RECORD_LEN];
    let len = encode(value, &mut record);
    out.write_bytes(&record[..len])
}

/// Read a varint record into `value`.
///
/// `value` is zero unless the whole record decodes and fits.
pub fn unpack<T: VarInt, R: Read>(value: &mut T, input: &mut Reader<R>) -> Result<()> {
    *value = T::default();

    let control = input.read_byte(T::TYPE_NAME)?;
    let declared = control & LEN_MASK;
    if usize::from(declared) > T::WIDTH {
        return Err(CodecError::Overflow {
            ty: T::TYPE_NAME,
            declared,
        });
    }

    let mut magnitude = [0u8; 8];
    input.read_exact(&mut magnitude[..usize::from(declared)], T::TYPE_NAME)?;

    *value = T::from_sign_magnitude(control & SIGN_BIT != 0, u64::from_le_bytes(magnitude))
        .ok_or(CodecError::Overflow {
            ty: T::TYPE_NAME,
            declared,
        })?;
    Ok(())
}

/// Read a varint record as a fresh value.
pub fn read<T: VarInt, R: Read>(input: &mut Reader<R>) -> Result<T> {
    let mut value = T::default();
    unpack(&mut value, input)?;
    Ok(value)
}

macro_rules! varint_codec {
    ($($t:ty),*) => {$(
        impl Codec for $t {
            fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
                pack(*self, out)
            }

            fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
                unpack(self, input)
            }
        }
    )*};
}

varint_codec!(u16, u32, u64, usize, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes, to_bytes};
    use crate::error::ErrorKind;

    #[test]
    fn zero_is_a_lone_control_byte() {
        assert_eq!(to_bytes(&0u32).unwrap(), vec![0x00]);
        assert_eq!(to_bytes(&0i64).unwrap(), vec![0x00]);
    }

    #[test]
    fn minimal_magnitude_bytes() {
        assert_eq!(to_bytes(&255u32).unwrap(), vec![0x01, 0xFF]);
        assert_eq!(to_bytes(&256u32).unwrap(), vec![0x02, 0x00, 0x01]);
        assert_eq!(to_bytes(&-1i16).unwrap(), vec![0x81, 0x01]);
        assert_eq!(
            to_bytes(&u64::MAX).unwrap(),
            vec![0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn most_negative_values_roundtrip() {
        assert_eq!(
            to_bytes(&i64::MIN).unwrap(),
            vec![0x88, 0, 0, 0, 0, 0, 0, 0, 0x80]
        );
        assert_eq!(from_bytes::<i64>(&to_bytes(&i64::MIN).unwrap()).unwrap(), i64::MIN);
        assert_eq!(from_bytes::<i16>(&to_bytes(&i16::MIN).unwrap()).unwrap(), i16::MIN);
        assert_eq!(from_bytes::<i32>(&to_bytes(&i32::MIN).unwrap()).unwrap(), i32::MIN);
    }

    #[test]
    fn pointer_width_integers_roundtrip() {
        for value in [isize::MIN, -1, 0, 1, isize::MAX] {
            let bytes = to_bytes(&value).unwrap();
            assert_eq!(from_bytes::<isize>(&bytes).unwrap(), value);
            assert_eq!(bytes, to_bytes(&(value as i64)).unwrap());
        }
        for value in [0usize, 255, 256, usize::MAX] {
            let bytes = to_bytes(&value).unwrap();
            assert_eq!(from_bytes::<usize>(&bytes).unwrap(), value);
            assert_eq!(bytes, to_bytes(&(value as u64)).unwrap());
        }

        let bytes = to_bytes(&-1isize).unwrap();
        assert_eq!(from_bytes::<usize>(&bytes).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn magnitude_len_boundaries() {
        assert_eq!(magnitude_len(0), 0);
        assert_eq!(magnitude_len(1), 1);
        assert_eq!(magnitude_len(0xFF), 1);
        assert_eq!(magnitude_len(0x100), 2);
        assert_eq!(magnitude_len(u64::MAX), 8);
    }

    #[test]
    fn reserved_control_bits_are_ignored() {
        assert_eq!(from_bytes::<u32>(&[0x71, 0x2A]).unwrap(), 42);
        assert_eq!(from_bytes::<i32>(&[0xF1, 0x2A]).unwrap(), -42);
    }

    #[test]
    fn declared_width_beyond_target_overflows() {
        let bytes = to_bytes(&70_000u32).unwrap();
        let err = from_bytes::<u16>(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert!(matches!(err, CodecError::Overflow { ty: "u16", declared: 3 }));
    }

    #[test]
    fn value_outside_target_range_overflows() {
        // Fits in two magnitude bytes but not in i16.
        let bytes = to_bytes(&40_000u32).unwrap();
        assert_eq!(from_bytes::<i16>(&bytes).unwrap_err().kind(), ErrorKind::Overflow);

        let bytes = to_bytes(&-1i32).unwrap();
        assert_eq!(from_bytes::<u64>(&bytes).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn missing_control_byte_is_truncated() {
        let err = from_bytes::<u32>(&[]).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { ty: "u32" }));
    }

    #[test]
    fn missing_magnitude_bytes_are_truncated() {
        let err = from_bytes::<u64>(&[0x04, 0x01, 0x02]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn failed_unpack_leaves_zero() {
        let mut value = 99u32;
        let mut reader = Reader::new(&[0x05, 1, 2, 3, 4, 5][..]);
        assert!(value.deserialize(&mut reader).is_err());
        assert_eq!(value, 0);
    }

    #[test]
    fn read_helper_returns_value() {
        let mut reader = Reader::new(&[0x81, 0x05, 0x00][..]);
        assert_eq!(read::<i32, _>(&mut reader).unwrap(), -5);
        assert_eq!(read::<u64, _>(&mut reader).unwrap(), 0);
    }
}
