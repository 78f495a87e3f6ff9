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

//! Deterministic binary layout and lazy, zero-copy typed readers.
//!
//! A type `T` in the combinator grammar (scalars, [`pair::Pair`],
//! tuples, [`static_array::StaticArray`], [`optional::Optional`],
//! the `variant` family, [`dynamic_array::DynamicArray`], and
//! [`crate::define_record!`]-declared records) has a compile-time
//! `fixed_size(T)` and a layout split into a fixed-size prefix plus an
//! appended variable-size tail. [`serialise`] writes a `T::Source` into a
//! [`buffer::Buffer`]; [`deserialise`] hands back a `T::Reader`, a cheap,
//! copyable view that decodes fields on demand without allocating.
//!
//! Little-endian two's-complement integers, native IEEE-754 float bit
//! patterns, and `bool` as a single `0x00`/`0x01` byte (any nonzero byte
//! reads back `true`). Offsets inside `optional`, `variant`, and
//! `dynamic_array` are absolute from the start of the buffer, never
//! relative to their holder.

pub mod buffer;
pub mod dynamic_array;
pub mod error;
pub mod layout;
pub mod optional;
pub mod pair;
pub mod record;
pub mod scalar;
pub mod static_array;
pub mod tuple;
pub mod variant;

pub use error::{Error, Result};
pub use layout::{AutoDeserialise, Serialisable};

/// Re-exports of the names most call sites need, mirroring the grouping the
/// module tree already gives them.
pub mod prelude {
    pub use crate::buffer::{Buffer, FixedBuffer, HeapBuffer};
    pub use crate::dynamic_array::{list, DynamicArray, DynamicArraySource, List};
    pub use crate::error::{Error, Result};
    pub use crate::layout::{AutoDeserialise, Serialisable};
    pub use crate::optional::{Optional, OptionalSource};
    pub use crate::pair::{Pair, PairSource};
    pub use crate::record::{IndexedField, IndexedFieldMut};
    pub use crate::scalar::{Null, RawByte};
    pub use crate::static_array::StaticArray;
    pub use crate::variant::{
        Variant0, Variant0Source, Variant1, Variant1Source, Variant2, Variant2Source, Variant3, Variant3Source,
        Variant4, Variant4Source, Variant5, Variant5Source,
    };
    pub use crate::{define_record, deserialise, serialise};
}

/// Serialises `source` into `buffer`, overwriting any previous content.
///
/// Initialises `buffer` to exactly `T::FIXED_SIZE` bytes, then invokes `T`'s
/// writer at fixed offset 0; the writer appends any variable-size tail as it
/// goes. Spec §4.9.
pub fn serialise<T: Serialisable, B: buffer::Buffer>(source: &T::Source, buffer: &mut B) -> Result<()> {
    buffer.initialise(T::FIXED_SIZE)?;
    T::write(source, buffer, 0)
}

/// Constructs a reader over `bytes` for type `T`, anchored at fixed offset 0.
///
/// Fails with [`Error::OutOfBounds`] if `bytes` is shorter than
/// `T::FIXED_SIZE`. The full slice, not just the fixed prefix, is retained so
/// that accessors can resolve the variable-size tail. Spec §4.9.
pub fn deserialise<T: Serialisable>(bytes: &[u8]) -> Result<T::Reader<'_>> {
    T::read(bytes, 0)
}
