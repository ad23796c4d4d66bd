//! Container codecs.
//!
//! Wire format for every variable-size container:
//! ```text
//! ┌────────────────────┬─────────────┬─────┬──────────────────┐
//! │ Count (varint u)   │ Element 0   │ ... │ Element count-1  │
//! └────────────────────┴─────────────┴─────┴──────────────────┘
//! ```
//! Maps write each entry as key then value. Ordered containers are written
//! in ascending order; hashed ones in their iteration order. Pairs and
//! complex numbers have a fixed arity and carry no count.
//!
//! Any element failure aborts the container and comes back wrapped with the
//! container's type name.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::io::{Read, Write};

use crate::codec::Codec;
use crate::error::{CodecError, Result, ResultExt};
use crate::reader::Reader;
use crate::writer::Writer;

/// Read a container element count.
pub fn read_len<R: Read>(input: &mut Reader<R>) -> Result<usize> {
    let mut len = 0usize;
    len.deserialize(input)?;
    Ok(len)
}

fn write_slice<T: Codec, W: Write>(items: &[T], out: &mut Writer<W>) -> Result<()> {
    items.len().serialize(out)?;
    T::serialize_slice(items, out)
}

fn read_elements<T, R, F>(input: &mut Reader<R>, mut insert: F) -> Result<()>
where
    T: Codec + Default,
    R: Read,
    F: FnMut(T),
{
    let len = read_len(input)?;
    for _ in 0..len {
        let mut item = T::default();
        item.deserialize(input)?;
        insert(item);
    }
    Ok(())
}

fn write_entries<'a, K, V, W, I>(len: usize, entries: I, out: &mut Writer<W>) -> Result<()>
where
    K: Codec + 'a,
    V: Codec + 'a,
    W: Write,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    len.serialize(out)?;
    for (key, value) in entries {
        key.serialize(out)?;
        value.serialize(out)?;
    }
    Ok(())
}

fn read_entries<K, V, R, F>(input: &mut Reader<R>, mut insert: F) -> Result<()>
where
    K: Codec + Default,
    V: Codec + Default,
    R: Read,
    F: FnMut(K, V),
{
    let len = read_len(input)?;
    for _ in 0..len {
        let mut key = K::default();
        key.deserialize(input)?;
        let mut value = V::default();
        value.deserialize(input)?;
        insert(key, value);
    }
    Ok(())
}

fn write_iter<'a, T, W, I>(iter: I, out: &mut Writer<W>) -> Result<()>
where
    T: Codec + 'a,
    W: Write,
    I: ExactSizeIterator<Item = &'a T>,
{
    iter.len().serialize(out)?;
    for item in iter {
        item.serialize(out)?;
    }
    Ok(())
}

/// Serialize any exact-size sequence with the same wire format as `Vec<T>`.
///
/// Lets a lazily produced sequence be written without collecting it first.
pub fn serialize_seq<'a, T, I, W>(items: I, out: &mut Writer<W>) -> Result<()>
where
    T: Codec + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: ExactSizeIterator,
    W: Write,
{
    write_iter(items.into_iter(), out).while_serializing("sequence")
}

impl<A: Codec, B: Codec> Codec for (A, B) {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        self.0
            .serialize(out)
            .and_then(|()| self.1.serialize(out))
            .while_serializing("tuple")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.0
            .deserialize(input)
            .and_then(|()| self.1.deserialize(input))
            .while_deserializing("tuple")
    }
}

impl<T: Codec + Default> Codec for Vec<T> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_slice(self, out).while_serializing("Vec")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        let len = read_len(input).while_deserializing("Vec")?;

        // Grow one step at a time so a corrupt count cannot allocate ahead of
        // the data actually present.
        let step = input.config().read_chunk_size.max(1);
        let mut filled = 0usize;
        while filled < len {
            let end = filled + (len - filled).min(step);
            self.resize_with(end, T::default);
            T::deserialize_slice(&mut self[filled..end], input).while_deserializing("Vec")?;
            filled = end;
        }
        Ok(())
    }
}

impl<T: Codec + Default> Codec for VecDeque<T> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_iter(self.iter(), out).while_serializing("VecDeque")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        read_elements(input, |item| self.push_back(item)).while_deserializing("VecDeque")
    }
}

impl<K, V> Codec for BTreeMap<K, V>
where
    K: Codec + Default + Ord,
    V: Codec + Default,
{
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_entries(self.len(), self.iter(), out).while_serializing("BTreeMap")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        read_entries(input, |key, value| {
            self.insert(key, value);
        })
        .while_deserializing("BTreeMap")
    }
}

impl<K, V, S> Codec for HashMap<K, V, S>
where
    K: Codec + Default + Eq + Hash,
    V: Codec + Default,
    S: BuildHasher,
{
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_entries(self.len(), self.iter(), out).while_serializing("HashMap")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        read_entries(input, |key, value| {
            self.insert(key, value);
        })
        .while_deserializing("HashMap")
    }
}

impl<T: Codec + Default + Ord> Codec for BTreeSet<T> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_iter(self.iter(), out).while_serializing("BTreeSet")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        read_elements(input, |item| {
            self.insert(item);
        })
        .while_deserializing("BTreeSet")
    }
}

impl<T, S> Codec for HashSet<T, S>
where
    T: Codec + Default + Eq + Hash,
    S: BuildHasher,
{
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_iter(self.iter(), out).while_serializing("HashSet")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        self.clear();
        read_elements(input, |item| {
            self.insert(item);
        })
        .while_deserializing("HashSet")
    }
}

impl<T: Codec, const N: usize> Codec for [T; N] {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        write_slice(self, out).while_serializing("array")
    }

    /// Fails with `LengthMismatch` when the record's count differs from `N`.
    /// In that case none of the record's elements are consumed, so the
    /// stream is left positioned inside the record.
    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        let found = read_len(input).while_deserializing("array")?;
        if found != N {
            return Err(CodecError::LengthMismatch {
                ty: "array",
                expected: N,
                found,
            });
        }
        T::deserialize_slice(self, input).while_deserializing("array")
    }
}

/// A complex number, written as real part then imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T: Codec + Default> Codec for Complex<T> {
    fn serialize<W: Write>(&self, out: &mut Writer<W>) -> Result<()> {
        self.re
            .serialize(out)
            .and_then(|()| self.im.serialize(out))
            .while_serializing("Complex")
    }

    fn deserialize<R: Read>(&mut self, input: &mut Reader<R>) -> Result<()> {
        let mut re = T::default();
        let mut im = T::default();
        re.deserialize(input)
            .and_then(|()| im.deserialize(input))
            .while_deserializing("Complex")?;
        *self = Complex { re, im };
        Ok(())
    }
}
