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

//! Error kinds produced by the layout engine, the combinators, and the buffer
//! contract. See spec §7.

use thiserror::Error;

/// Every fallible operation in this crate fails with one of these kinds.
///
/// No partial writes leak: a `Writer` that returns `Err` must not have left the
/// buffer larger than it needs to be for anything previously committed, and a
/// `Reader` that returns `Err` never hands back a value derived from invalid
/// bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read would extend past the end of the buffer: an undersized fixed
    /// region, an offset + size pair out of range, or an index `>= len` for a
    /// checked index.
    #[error("out of bounds: {context} at offset {offset} needs {needed} byte(s) but buffer has {len}")]
    OutOfBounds {
        /// What was being read, for diagnostics (e.g. `"dynamic_array<u32> element 3"`).
        context: &'static str,
        /// The absolute offset the read started from.
        offset: usize,
        /// The number of bytes required from `offset`.
        needed: usize,
        /// The total length of the buffer that was available.
        len: usize,
    },

    /// `value()` (or `*`) was called on an empty `optional`.
    #[error("no value present in optional<T>")]
    NoValue,

    /// `get::<I>()` was called on a `variant` whose active tag is not `I`, or a
    /// `variant` source held no alternative at serialise time.
    #[error("bad variant access: expected tag {expected}, found {found}")]
    BadVariantAccess {
        /// The tag the caller asked for.
        expected: u8,
        /// The tag actually stored, or `u8::MAX` if the source was valueless.
        found: u8,
    },

    /// A `dynamic_array` has more than `u32::MAX` elements, or a computed
    /// variable offset does not fit the field width that stores it
    /// (`u16` for `optional`/`variant`, `u32` for `dynamic_array`).
    #[error("object too large: {context} ({actual}) exceeds the {field_width}-byte field that stores it")]
    ObjectTooLarge {
        /// What was too large, for diagnostics.
        context: &'static str,
        /// The value that didn't fit.
        actual: u64,
        /// The width, in bytes, of the field that must hold it.
        field_width: usize,
    },

    /// A buffer could not grow to the requested size.
    #[error("buffer capacity exceeded: requested {requested} bytes, capacity is {capacity}")]
    CapacityExceeded {
        /// The total size that was requested.
        requested: usize,
        /// The buffer's fixed capacity.
        capacity: usize,
    },

    /// A `variant` read encountered a tag `>=` the number of alternatives.
    #[error("corrupt variant tag: {tag} is not a valid alternative out of {alternatives}")]
    CorruptTag {
        /// The tag byte that was read.
        tag: u8,
        /// The number of declared alternatives in the variant.
        alternatives: usize,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(context: &'static str, offset: usize, needed: usize, len: usize) -> Self {
        log::trace!("out of bounds: {context} at {offset}..{offset}+{needed}, len {len}");
        Error::OutOfBounds { context, offset, needed, len }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
