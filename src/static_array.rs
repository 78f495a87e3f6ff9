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

//! `static_array<T, N>`: a fixed-length homogeneous array. Spec §3.2, §4.4.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layout::{check_bounds, push_fixed_subobject, AutoDeserialise, Serialisable};

/// Marker type for a serialisable array of exactly `N` elements of type `T`.
pub struct StaticArray<T, const N: usize>(PhantomData<T>);

/// Lazy reader for [`StaticArray`].
pub struct StaticArrayReader<'a, T: Serialisable, const N: usize> {
    buffer: &'a [u8],
    fixed_offset: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Serialisable, const N: usize> Clone for StaticArrayReader<'a, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Serialisable, const N: usize> Copy for StaticArrayReader<'a, T, N> {}

impl<'a, T: Serialisable, const N: usize> AutoDeserialise for StaticArrayReader<'a, T, N> {
    type Output = Self;

    fn auto_deserialise(self) -> Self {
        self
    }
}

impl<'a, T: Serialisable, const N: usize> StaticArrayReader<'a, T, N> {
    /// Number of elements. Always `N`.
    pub fn len(self) -> usize {
        N
    }

    /// Whether this array has no elements (`N == 0`).
    pub fn is_empty(self) -> bool {
        N == 0
    }

    fn element_offset(self, index: usize) -> usize {
        self.fixed_offset + index * T::FIXED_SIZE
    }

    /// Reads the element at `index`. Panics if `index >= N`; see [`Self::at`]
    /// for a checked alternative (spec §4.4 "unchecked `[]` vs checked `at`").
    pub fn index(self, index: usize) -> <T::Reader<'a> as AutoDeserialise>::Output {
        self.at(index).expect("static_array index out of bounds")
    }

    /// Reads the element at `index`, or fails with [`Error::OutOfBounds`] if
    /// `index >= N`.
    pub fn at(self, index: usize) -> Result<<T::Reader<'a> as AutoDeserialise>::Output> {
        if index >= N {
            return Err(Error::out_of_bounds("static_array index", index, 1, N));
        }
        Ok(T::read(self.buffer, self.element_offset(index))?.auto_deserialise())
    }

    /// A lazy, random-access view over the elements.
    pub fn elements(self) -> impl Iterator<Item = <T::Reader<'a> as AutoDeserialise>::Output> + 'a
    where
        T: 'a,
    {
        (0..N).map(move |i| self.index(i))
    }
}

impl<T: Serialisable, const N: usize> Serialisable for StaticArray<T, N> {
    const FIXED_SIZE: usize = N * T::FIXED_SIZE;
    type Source = [T::Source; N];
    type Reader<'a> = StaticArrayReader<'a, T, N> where T: 'a;

    fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
        let mut offset = fixed_offset;
        for element in source {
            offset = push_fixed_subobject::<T, Buf>(offset, buffer, |buffer, offset| T::write(element, buffer, offset))?;
        }
        Ok(())
    }

    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
    where
        Self: 'a,
    {
        check_bounds("static_array", buffer, fixed_offset, Self::FIXED_SIZE)?;
        Ok(StaticArrayReader { buffer, fixed_offset, _marker: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HeapBuffer;
    use crate::{deserialise, serialise};

    #[test]
    fn static_array_bit_exact() {
        let mut buffer = HeapBuffer::default();
        let source: [i32; 3] = [1_170_411_248, -1_630_057_274, 838_860_801];
        serialise::<StaticArray<i32, 3>, _>(&source, &mut buffer).unwrap();
        assert_eq!(
            buffer.span(),
            &[0xF0, 0x0E, 0xC3, 0x45, 0xC6, 0x4C, 0xD7, 0x9E, 0x01, 0x00, 0x00, 0x32]
        );

        let reader = deserialise::<StaticArray<i32, 3>>(buffer.span()).unwrap();
        assert_eq!(reader.index(0), 1_170_411_248);
        assert_eq!(reader.index(1), -1_630_057_274);
        assert_eq!(reader.index(2), 838_860_801);
        assert!(reader.at(3).is_err());
    }

    #[test]
    fn zero_sized_array_has_zero_fixed_size() {
        assert_eq!(StaticArray::<u32, 0>::FIXED_SIZE, 0);
        let mut buffer = HeapBuffer::default();
        serialise::<StaticArray<u32, 0>, _>(&[], &mut buffer).unwrap();
        assert_eq!(buffer.span().len(), 0);
    }
}
