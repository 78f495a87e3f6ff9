// Copyright 2026 The Flatser Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalars: `null`, fixed-width integers, `bool`, IEEE-754 floats, and the raw
//! `byte` type, plus the two internal scalars used by combinator headers
//! (`DataOffset`, `ArrayLen`). Spec §3.1, §3.2, §4.3.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::Error;
use crate::layout::{check_bounds, AutoDeserialise, Serialisable};

/// A type whose wire representation is a fixed-width little-endian byte
/// sequence with no variable part. Implemented for every scalar.
pub trait ScalarCodec: Copy + 'static {
    /// Width in bytes of the encoded form.
    const WIDTH: usize;

    /// Encodes `self` into the first `WIDTH` bytes of `out`.
    fn encode(self, out: &mut [u8]);

    /// Decodes a value from the first `WIDTH` bytes of `bytes`.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_int {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ScalarCodec for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn encode(self, out: &mut [u8]) {
                    out[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
                }

                fn decode(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$t>::from_le_bytes(buf)
                }
            }
        )+
    };
}

impl_scalar_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl ScalarCodec for bool {
    const WIDTH: usize = 1;

    fn encode(self, out: &mut [u8]) {
        out[0] = if self { 0x01 } else { 0x00 };
    }

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl ScalarCodec for f32 {
    const WIDTH: usize = 4;

    fn encode(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_bits().to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[..4]);
        f32::from_bits(u32::from_le_bytes(buf))
    }
}

impl ScalarCodec for f64 {
    const WIDTH: usize = 8;

    fn encode(self, out: &mut [u8]) {
        out[..8].copy_from_slice(&self.to_bits().to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[..8]);
        f64::from_bits(u64::from_le_bytes(buf))
    }
}

/// An uninterpreted 8-bit value, distinct from `u8` only in that it carries no
/// arithmetic meaning — the wire encoding is identical. Spec §2 "raw byte".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawByte(pub u8);

impl ScalarCodec for RawByte {
    const WIDTH: usize = 1;

    fn encode(self, out: &mut [u8]) {
        out[0] = self.0;
    }

    fn decode(bytes: &[u8]) -> Self {
        RawByte(bytes[0])
    }
}

/// Lazy view over a scalar: a byte span and a fixed offset, decoded on demand
/// by [`ScalarReader::value`].
#[derive(Debug)]
pub struct ScalarReader<'a, T> {
    buffer: &'a [u8],
    fixed_offset: usize,
    _marker: PhantomData<T>,
}

impl<'a, T> Clone for ScalarReader<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ScalarReader<'a, T> {}

impl<'a, T: ScalarCodec> ScalarReader<'a, T> {
    /// Decodes the scalar value from the underlying bytes.
    pub fn value(self) -> T {
        T::decode(&self.buffer[self.fixed_offset..self.fixed_offset + T::WIDTH])
    }
}

impl<'a, T: ScalarCodec> AutoDeserialise for ScalarReader<'a, T> {
    type Output = T;

    fn auto_deserialise(self) -> T {
        self.value()
    }
}

macro_rules! impl_serialisable_scalar {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Serialisable for $t {
                const FIXED_SIZE: usize = <$t as ScalarCodec>::WIDTH;
                type Source = $t;
                type Reader<'a> = ScalarReader<'a, $t>;

                fn write<B: Buffer>(source: &Self::Source, buffer: &mut B, fixed_offset: usize) -> Result<(), Error> {
                    source.encode(&mut buffer.span_mut()[fixed_offset..fixed_offset + Self::FIXED_SIZE]);
                    Ok(())
                }

                fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>, Error>
                where
                    Self: 'a,
                {
                    check_bounds(stringify!($t), buffer, fixed_offset, Self::FIXED_SIZE)?;
                    Ok(ScalarReader { buffer, fixed_offset, _marker: PhantomData })
                }
            }
        )+
    };
}

impl_serialisable_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, bool, f32, f64, RawByte);

/// The empty scalar: zero bytes on the wire, one inhabitant in memory.
/// Spec §3.1 "The special scalar `null` has `fixed_size=0`".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// Lazy view over `null`. Always trivially constructible; never touches the
/// buffer, since there is nothing to read.
#[derive(Debug, Clone, Copy)]
pub struct NullReader;

impl AutoDeserialise for NullReader {
    type Output = Null;

    fn auto_deserialise(self) -> Null {
        Null
    }
}

impl Serialisable for Null {
    const FIXED_SIZE: usize = 0;
    type Source = Null;
    type Reader<'a> = NullReader;

    fn write<B: Buffer>(_source: &Self::Source, _buffer: &mut B, _fixed_offset: usize) -> Result<(), Error> {
        Ok(())
    }

    fn read<'a>(_buffer: &'a [u8], _fixed_offset: usize) -> Result<Self::Reader<'a>, Error>
    where
        Self: 'a,
    {
        Ok(NullReader)
    }
}

/// Internal scalar used for `optional`/`variant` variable-data offsets.
/// Encodes the *0 = empty, otherwise `position + 1`* convention at the
/// combinator level, not here — this type is a plain `u16`.
pub(crate) type DataOffset = u16;

/// Internal scalar used for `dynamic_array` variable-data offsets.
pub(crate) type ArrayOffset = u32;

/// Internal scalar used for `dynamic_array` element counts.
pub(crate) type ArrayLen = u32;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HeapBuffer;
    use crate::{deserialise, serialise};

    #[test]
    fn u32_round_trips_bit_exact() {
        let mut buffer = HeapBuffer::default();
        serialise::<u32, _>(&43_834_534u32, &mut buffer).unwrap();
        assert_eq!(buffer.span(), &[0xA6, 0xDC, 0x9C, 0x02]);
        let reader = deserialise::<u32>(buffer.span()).unwrap();
        assert_eq!(reader.value(), 43_834_534);
    }

    #[test]
    fn i64_round_trips_bit_exact() {
        let mut buffer = HeapBuffer::default();
        let value: i64 = -567_865_433_565_765;
        serialise::<i64, _>(&value, &mut buffer).unwrap();
        assert_eq!(buffer.span(), &[0xBB, 0x55, 0x8D, 0x86, 0x87, 0xFB, 0xFD, 0xFF]);
        assert_eq!(deserialise::<i64>(buffer.span()).unwrap().value(), value);
    }

    #[test]
    fn bool_nonzero_byte_reads_as_true() {
        let bytes = [0x7F];
        assert!(deserialise::<bool>(&bytes).unwrap().value());
    }

    #[test]
    fn null_has_zero_fixed_size_and_no_bytes() {
        let mut buffer = HeapBuffer::default();
        serialise::<Null, _>(&Null, &mut buffer).unwrap();
        assert_eq!(buffer.span().len(), 0);
    }

    #[test]
    fn float_bit_pattern_preserved_including_nan() {
        let mut buffer = HeapBuffer::default();
        let value = f64::from_bits(0x7FF8_0000_0000_0001); // a signalling-adjacent NaN payload
        serialise::<f64, _>(&value, &mut buffer).unwrap();
        let read_back = deserialise::<f64>(buffer.span()).unwrap().value();
        assert_eq!(read_back.to_bits(), value.to_bits());
    }

    #[test]
    fn deserialise_fails_on_undersized_buffer() {
        let bytes = [0u8; 3];
        assert!(matches!(deserialise::<u32>(&bytes), Err(Error::OutOfBounds { .. })));
    }
}
