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

//! `dynamic_array<T>`: a runtime-length homogeneous sequence. Spec §3.2,
//! §4.8.
//!
//! The fixed part is a `u32` element count followed by a `u32` offset to the
//! start of the elements' contiguous fixed region (`0` when the array is
//! empty). Source values are built from anything that can turn into an
//! iterator of element sources — spec §4.8's "input range erasure" — rather
//! than a type-erased visitor, since Rust's `IntoIterator` already gives that
//! for free without a vtable.
//!
//! `smallvec` backs the source storage: short arrays (the common case for
//! wire messages) stay inline, longer ones spill to the heap. This is a
//! storage-only optimisation; it never changes the emitted bytes.

use std::iter::FromIterator;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layout::{check_bounds, push_fixed_subobject, push_variable_subobjects, AutoDeserialise, Serialisable};

/// Inline capacity for [`DynamicArraySource`]'s backing [`SmallVec`]. Chosen
/// to keep small arrays (the common case for protocol messages) off the heap
/// without bloating the source type for the rare large one.
const INLINE_CAPACITY: usize = 4;

/// Marker type for a serialisable dynamic array of `T`.
pub struct DynamicArray<T>(PhantomData<T>);

/// Source value for [`DynamicArray`]. Builds from any `IntoIterator` of
/// element sources; see [`crate::dynamic_array::DynamicArraySource::from_iter`]
/// and the [`From`] impls.
#[derive(Debug, Clone)]
pub struct DynamicArraySource<T: Serialisable>(SmallVec<[T::Source; INLINE_CAPACITY]>);

impl<T: Serialisable> DynamicArraySource<T> {
    /// An empty array.
    pub fn new() -> Self {
        DynamicArraySource(SmallVec::new())
    }

    /// Number of elements currently held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends an element.
    pub fn push(&mut self, element: T::Source) {
        self.0.push(element);
    }
}

impl<T: Serialisable> Default for DynamicArraySource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialisable> FromIterator<T::Source> for DynamicArraySource<T> {
    fn from_iter<I: IntoIterator<Item = T::Source>>(iter: I) -> Self {
        DynamicArraySource(iter.into_iter().collect())
    }
}

impl<T: Serialisable> From<Vec<T::Source>> for DynamicArraySource<T> {
    fn from(elements: Vec<T::Source>) -> Self {
        DynamicArraySource(SmallVec::from_vec(elements))
    }
}

impl<T: Serialisable, const N: usize> From<[T::Source; N]> for DynamicArraySource<T> {
    fn from(elements: [T::Source; N]) -> Self {
        DynamicArraySource(elements.into_iter().collect())
    }
}

/// Convenience alias matching the original's `list<T>` naming — an ordinary
/// `dynamic_array<T>` with no behavioural difference. Spec §9 supplemented
/// feature (see SPEC_FULL.md §E.1).
pub type List<T> = DynamicArray<T>;

/// Source-side constructor matching [`List`].
pub fn list<T: Serialisable>(elements: impl IntoIterator<Item = T::Source>) -> DynamicArraySource<T> {
    elements.into_iter().collect()
}

/// Lazy reader for [`DynamicArray`].
pub struct DynamicArrayReader<'a, T: Serialisable> {
    buffer: &'a [u8],
    count: u32,
    elements_offset: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Serialisable> Clone for DynamicArrayReader<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Serialisable> Copy for DynamicArrayReader<'a, T> {}

impl<'a, T: Serialisable> AutoDeserialise for DynamicArrayReader<'a, T> {
    type Output = Self;

    fn auto_deserialise(self) -> Self {
        self
    }
}

impl<'a, T: Serialisable> DynamicArrayReader<'a, T> {
    /// Number of elements.
    pub fn len(self) -> usize {
        self.count as usize
    }

    /// Whether this array has no elements.
    pub fn is_empty(self) -> bool {
        self.count == 0
    }

    fn element_offset(self, index: usize) -> usize {
        self.elements_offset + index * T::FIXED_SIZE
    }

    /// Reads the element at `index`. Panics if out of range; see
    /// [`Self::at`] for a checked alternative.
    pub fn index(self, index: usize) -> <T::Reader<'a> as AutoDeserialise>::Output {
        self.at(index).expect("dynamic_array index out of bounds")
    }

    /// Reads the element at `index`, or fails with [`Error::OutOfBounds`] if
    /// `index >= len()`.
    pub fn at(self, index: usize) -> Result<<T::Reader<'a> as AutoDeserialise>::Output> {
        if index >= self.len() {
            return Err(Error::out_of_bounds("dynamic_array index", index, 1, self.len()));
        }
        Ok(T::read(self.buffer, self.element_offset(index))?.auto_deserialise())
    }

    /// A lazy, random-access view over the elements.
    pub fn elements(self) -> impl Iterator<Item = <T::Reader<'a> as AutoDeserialise>::Output> + 'a
    where
        T: 'a,
    {
        (0..self.len()).map(move |i| self.index(i))
    }
}

impl<T: Serialisable> Serialisable for DynamicArray<T> {
    const FIXED_SIZE: usize = 8;
    type Source = DynamicArraySource<T>;
    type Reader<'a> = DynamicArrayReader<'a, T> where T: 'a;

    fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
        let count = u32::try_from(source.0.len()).map_err(|_| Error::ObjectTooLarge {
            context: "dynamic_array<T> element count",
            actual: source.0.len() as u64,
            field_width: 4,
        })?;

        let var_pos = push_variable_subobjects::<T, Buf>(source.0.len(), buffer, |buffer, var_pos| {
            let mut offset = var_pos;
            for element in source.0.iter() {
                offset =
                    push_fixed_subobject::<T, Buf>(offset, buffer, |buffer, offset| T::write(element, buffer, offset))?;
            }
            Ok(())
        })?;

        let elements_offset: u32 = if count > 0 {
            u32::try_from(var_pos).map_err(|_| Error::ObjectTooLarge {
                context: "dynamic_array<T> elements offset",
                actual: var_pos as u64,
                field_width: 4,
            })?
        } else {
            0
        };

        buffer.span_mut()[fixed_offset..fixed_offset + 4].copy_from_slice(&count.to_le_bytes());
        buffer.span_mut()[fixed_offset + 4..fixed_offset + 8].copy_from_slice(&elements_offset.to_le_bytes());
        Ok(())
    }

    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
    where
        Self: 'a,
    {
        check_bounds("dynamic_array<T>", buffer, fixed_offset, Self::FIXED_SIZE)?;
        let count = u32::from_le_bytes([
            buffer[fixed_offset],
            buffer[fixed_offset + 1],
            buffer[fixed_offset + 2],
            buffer[fixed_offset + 3],
        ]);
        let elements_offset = u32::from_le_bytes([
            buffer[fixed_offset + 4],
            buffer[fixed_offset + 5],
            buffer[fixed_offset + 6],
            buffer[fixed_offset + 7],
        ]) as usize;
        if count > 0 {
            check_bounds(
                "dynamic_array<T> elements region",
                buffer,
                elements_offset,
                count as usize * T::FIXED_SIZE,
            )?;
        }
        Ok(DynamicArrayReader { buffer, count, elements_offset, _marker: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HeapBuffer;
    use crate::{deserialise, serialise};

    #[test]
    fn empty_array_is_eight_zero_bytes() {
        let mut buffer = HeapBuffer::default();
        serialise::<DynamicArray<u32>, _>(&DynamicArraySource::new(), &mut buffer).unwrap();
        assert_eq!(buffer.span(), &[0u8; 8]);
        let reader = deserialise::<DynamicArray<u32>>(buffer.span()).unwrap();
        assert_eq!(reader.len(), 0);
        assert!(reader.is_empty());
    }

    #[test]
    fn five_u16_elements_bit_exact() {
        let mut buffer = HeapBuffer::default();
        let source: DynamicArraySource<u16> = [49524u16, 23705, 25710, 53558, 55921].into();
        serialise::<DynamicArray<u16>, _>(&source, &mut buffer).unwrap();
        assert_eq!(
            buffer.span(),
            &[
                0x05, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x74, 0xC1, 0x99, 0x5C, 0x6E, 0x64, 0x36, 0xD1, 0x71, 0xDA
            ]
        );

        let reader = deserialise::<DynamicArray<u16>>(buffer.span()).unwrap();
        assert_eq!(reader.len(), 5);
        let collected: Vec<u16> = reader.elements().collect();
        assert_eq!(collected, vec![49524, 23705, 25710, 53558, 55921]);
        assert!(reader.at(5).is_err());
    }

    #[test]
    fn nested_dynamic_array_bit_exact() {
        let mut buffer = HeapBuffer::default();
        let inner0: DynamicArraySource<u32> = [11_223_344u32, 1_566_778_899, 123_456_789].into();
        let inner1: DynamicArraySource<u32> = [10_203_040u32].into();
        let source: DynamicArraySource<DynamicArray<u32>> = [inner0, inner1].into();
        serialise::<DynamicArray<DynamicArray<u32>>, _>(&source, &mut buffer).unwrap();

        let reader = deserialise::<DynamicArray<DynamicArray<u32>>>(buffer.span()).unwrap();
        assert_eq!(reader.len(), 2);
        let first: Vec<u32> = reader.index(0).elements().collect();
        let second: Vec<u32> = reader.index(1).elements().collect();
        assert_eq!(first, vec![11_223_344, 1_566_778_899, 123_456_789]);
        assert_eq!(second, vec![10_203_040]);
    }

    #[test]
    fn list_alias_and_constructor() {
        let mut buffer = HeapBuffer::default();
        let source = list::<u8>(vec![1, 2, 3]);
        serialise::<List<u8>, _>(&source, &mut buffer).unwrap();
        let reader = deserialise::<List<u8>>(buffer.span()).unwrap();
        assert_eq!(reader.elements().collect::<Vec<u8>>(), vec![1, 2, 3]);
    }
}
