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

//! The layout engine: fixed/variable placement, and the lazy-reader contract.
//! See spec §4.2.

use crate::buffer::Buffer;
use crate::error::Error;

/// Implemented by every type in the combinator grammar. Mirrors the three
/// things spec §1 says the format defines for a type `T`: its fixed byte
/// layout size, a writer from an in-memory [`Source`](Serialisable::Source),
/// and a lazily-projected [`Reader`](Serialisable::Reader).
pub trait Serialisable: Sized {
    /// The size in bytes of the fixed-size portion of this type's layout.
    /// A compile-time constant per type, per spec §3.1.
    const FIXED_SIZE: usize;

    /// The in-memory representation a caller builds to serialise this type.
    type Source;

    /// The lazy, borrowed view a reader produces for this type. Cheap to
    /// copy; holds only a byte span and a fixed offset (spec §3.4, §8
    /// "Reader aliasing").
    type Reader<'a>: AutoDeserialise
    where
        Self: 'a;

    /// Writes `source`'s fixed part into `buffer` at `fixed_offset`, recursing
    /// into [`push_variable_subobjects`] for any variable-size children.
    /// Must not touch bytes outside `[fixed_offset, fixed_offset + FIXED_SIZE)`
    /// plus whatever it appends to the buffer's tail.
    fn write<B: Buffer>(source: &Self::Source, buffer: &mut B, fixed_offset: usize) -> Result<(), Error>;

    /// Constructs a reader anchored at `fixed_offset` within `buffer`,
    /// validating that `[fixed_offset, fixed_offset + FIXED_SIZE)` lies
    /// within `buffer` (spec §4.2 "Bounds checking policy").
    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>, Error>
    where
        Self: 'a;
}

/// The policy by which a scalar reader auto-materialises to its value, while a
/// composite reader stays a lazy sub-reader (spec GLOSSARY "auto-deserialise").
///
/// Container accessors (`optional::value`, `variant::get`, `dynamic_array::at`,
/// ...) always return `Output`, never the raw `Reader` itself, so callers get a
/// `u32` out of an `optional<u32>` but a `Reader<Record>` out of an
/// `optional<Record>`.
pub trait AutoDeserialise: Copy {
    /// What a caller actually receives when they extract a value of this type.
    type Output;

    /// Performs the auto-deserialise conversion.
    fn auto_deserialise(self) -> Self::Output;
}

/// Validates that `buffer` has at least `fixed_offset + size` bytes, i.e. that
/// a fixed region of `size` bytes starting at `fixed_offset` lies within it.
///
/// Public so that [`crate::define_record!`]-generated code (which may live in
/// a downstream crate) can call it; combinator modules within this crate use
/// it the same way.
pub fn check_bounds(
    context: &'static str,
    buffer: &[u8],
    fixed_offset: usize,
    size: usize,
) -> Result<(), Error> {
    match fixed_offset.checked_add(size) {
        Some(end) if end <= buffer.len() => Ok(()),
        _ => Err(Error::out_of_bounds(context, fixed_offset, size, buffer.len())),
    }
}

/// Invokes `write` to emit `T`'s fixed part at `fixed_offset`, then returns
/// `fixed_offset + T::FIXED_SIZE`. Does not grow the buffer — the fixed bytes
/// at `fixed_offset` must already exist, either because they're part of the
/// top-level allocation ([`crate::serialise`]) or because an enclosing
/// [`push_variable_subobjects`] reserved them. Spec §4.2.
pub fn push_fixed_subobject<T: Serialisable, B: Buffer>(
    fixed_offset: usize,
    buffer: &mut B,
    write: impl FnOnce(&mut B, usize) -> Result<(), Error>,
) -> Result<usize, Error> {
    write(buffer, fixed_offset)?;
    Ok(fixed_offset + T::FIXED_SIZE)
}

/// Reserves `count * T::FIXED_SIZE` bytes at the tail of `buffer`, then
/// invokes `emit` with the absolute offset of the start of that region
/// (`var_region_start`). `emit` is expected to write the `count` fixed parts
/// there and may itself grow the buffer further for their variable parts.
/// Returns `var_region_start`. Spec §4.2, §4.9 "two-phase emission".
pub fn push_variable_subobjects<T: Serialisable, B: Buffer>(
    count: usize,
    buffer: &mut B,
    emit: impl FnOnce(&mut B, usize) -> Result<(), Error>,
) -> Result<usize, Error> {
    let needed = T::FIXED_SIZE.checked_mul(count).ok_or_else(|| Error::ObjectTooLarge {
        context: "variable subobject region",
        actual: count as u64,
        field_width: usize::BITS as usize / 8,
    })?;
    let var_region_start = buffer.span().len();
    buffer.extend(needed)?;
    emit(buffer, var_region_start)?;
    Ok(var_region_start)
}
