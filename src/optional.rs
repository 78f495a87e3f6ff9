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

//! `optional<T>`: zero or one instance of `T`. Spec §3.2, §4.6.
//!
//! The fixed slot is a `u16` offset that doubles as the presence flag: `0`
//! means empty; a nonzero `v` means the value's fixed part starts at absolute
//! buffer offset `v - 1`.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layout::{check_bounds, push_fixed_subobject, push_variable_subobjects, AutoDeserialise, Serialisable};
use crate::scalar::DataOffset;

/// Marker type for a serialisable optional value of type `T`.
pub struct Optional<T>(PhantomData<T>);

/// Source value for [`Optional`]. A thin wrapper around `Option` so it reads
/// naturally at call sites (`Optional::some(x)` / `.into()` from `Option`).
#[derive(Debug, Clone)]
pub struct OptionalSource<T: Serialisable>(pub Option<T::Source>);

impl<T: Serialisable> OptionalSource<T> {
    /// An empty optional.
    pub fn none() -> Self {
        OptionalSource(None)
    }

    /// A present optional holding `value`.
    pub fn some(value: T::Source) -> Self {
        OptionalSource(Some(value))
    }
}

impl<T: Serialisable> From<Option<T::Source>> for OptionalSource<T> {
    fn from(value: Option<T::Source>) -> Self {
        OptionalSource(value)
    }
}

impl<T: Serialisable> Default for OptionalSource<T> {
    fn default() -> Self {
        OptionalSource(None)
    }
}

/// Lazy reader for [`Optional`].
pub struct OptionalReader<'a, T: Serialisable> {
    buffer: &'a [u8],
    fixed_offset: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Serialisable> Clone for OptionalReader<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Serialisable> Copy for OptionalReader<'a, T> {}

impl<'a, T: Serialisable> AutoDeserialise for OptionalReader<'a, T> {
    type Output = Self;

    fn auto_deserialise(self) -> Self {
        self
    }
}

impl<'a, T: Serialisable> OptionalReader<'a, T> {
    fn raw_offset(self) -> DataOffset {
        // The fixed slot is a plain u16; bounds were checked at construction.
        u16::from_le_bytes([self.buffer[self.fixed_offset], self.buffer[self.fixed_offset + 1]])
    }

    /// Whether this optional contains a value.
    pub fn has_value(self) -> bool {
        self.raw_offset() > 0
    }

    /// Gets the contained value, or fails with [`Error::NoValue`] if empty.
    pub fn value(self) -> Result<<T::Reader<'a> as AutoDeserialise>::Output> {
        let raw = self.raw_offset();
        if raw == 0 {
            return Err(Error::NoValue);
        }
        let value_offset = (raw - 1) as usize;
        Ok(T::read(self.buffer, value_offset)?.auto_deserialise())
    }
}

impl<T: Serialisable> Serialisable for Optional<T> {
    const FIXED_SIZE: usize = 2;
    type Source = OptionalSource<T>;
    type Reader<'a> = OptionalReader<'a, T> where T: 'a;

    fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
        match &source.0 {
            None => {
                push_fixed_subobject::<DataOffset, Buf>(fixed_offset, buffer, |buffer, offset| {
                    buffer.span_mut()[offset..offset + 2].copy_from_slice(&0u16.to_le_bytes());
                    Ok(())
                })?;
                Ok(())
            }
            Some(value) => {
                let value_pos = push_variable_subobjects::<T, Buf>(1, buffer, |buffer, var_pos| {
                    T::write(value, buffer, var_pos)
                })?;
                let offset: DataOffset = u16::try_from(value_pos + 1).map_err(|_| Error::ObjectTooLarge {
                    context: "optional<T> variable offset",
                    actual: (value_pos + 1) as u64,
                    field_width: 2,
                })?;
                push_fixed_subobject::<DataOffset, Buf>(fixed_offset, buffer, |buffer, field_offset| {
                    buffer.span_mut()[field_offset..field_offset + 2].copy_from_slice(&offset.to_le_bytes());
                    Ok(())
                })?;
                Ok(())
            }
        }
    }

    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
    where
        Self: 'a,
    {
        check_bounds("optional<T>", buffer, fixed_offset, Self::FIXED_SIZE)?;
        Ok(OptionalReader { buffer, fixed_offset, _marker: PhantomData })
    }
}
