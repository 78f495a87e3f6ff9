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

//! `variant<T0, ..., Tk-1>`: a tagged union holding exactly one value from a
//! closed set of alternatives. Spec §3.2, §4.7.
//!
//! The fixed part is a `u8` tag plus a `u16` offset to the selected
//! alternative's fixed part (absolute from the start of the buffer). The tag
//! is validated against the alternative count when a reader is constructed —
//! spec §9 Open Question 1 resolves the "what if the tag is out of range"
//! ambiguity in the original by defining [`crate::error::Error::CorruptTag`]
//! for it, rather than the looser unchecked behaviour of the C++ source.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layout::{check_bounds, push_fixed_subobject, push_variable_subobjects, AutoDeserialise, Serialisable};
use crate::scalar::DataOffset;

const TAG_SIZE: usize = 1;
const OFFSET_SIZE: usize = 2;

/// Variant with zero alternatives: inhabited (there is exactly one source
/// value, meaning "no value"), but nothing can ever be read out of it.
pub struct Variant0;

/// The single possible source value for [`Variant0`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Variant0Source;

/// Reader for [`Variant0`]. Carries no accessors; [`Self::visit`] is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct Variant0Reader;

impl AutoDeserialise for Variant0Reader {
    type Output = Self;

    fn auto_deserialise(self) -> Self {
        self
    }
}

impl Variant0Reader {
    /// A no-op: there is nothing to dispatch on.
    pub fn visit(self) {}
}

impl Serialisable for Variant0 {
    const FIXED_SIZE: usize = TAG_SIZE + OFFSET_SIZE;
    type Source = Variant0Source;
    type Reader<'a> = Variant0Reader;

    fn write<Buf: Buffer>(_source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
        buffer.span_mut()[fixed_offset..fixed_offset + Self::FIXED_SIZE].fill(0);
        Ok(())
    }

    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
    where
        Self: 'a,
    {
        check_bounds("variant<>", buffer, fixed_offset, Self::FIXED_SIZE)?;
        Ok(Variant0Reader)
    }
}

macro_rules! impl_variant {
    (
        marker: $marker:ident;
        source: $source:ident;
        reader: $reader:ident;
        alternatives: $(($ty:ident, $idx:literal, $alt:ident, $get:ident)),+ $(,)?
    ) => {
        /// Marker type for a variant with these alternatives, in order.
        pub struct $marker<$($ty),+>(PhantomData<($($ty,)+)>);

        /// Source value for [`$marker`]: exactly one active alternative.
        #[derive(Debug, Clone)]
        pub enum $source<$($ty: Serialisable),+> {
            $(
                #[doc = concat!("Alternative ", stringify!($idx), ".")]
                $alt($ty::Source)
            ),+
        }

        impl<$($ty: Serialisable),+> $source<$($ty),+> {
            fn tag(&self) -> u8 {
                match self {
                    $($source::$alt(_) => $idx,)+
                }
            }
        }

        /// Lazy reader for [`$marker`].
        pub struct $reader<'a, $($ty: Serialisable),+> {
            buffer: &'a [u8],
            tag: u8,
            value_offset: usize,
            _marker: PhantomData<($($ty,)+)>,
        }

        impl<'a, $($ty: Serialisable),+> Clone for $reader<'a, $($ty),+> {
            fn clone(&self) -> Self { *self }
        }

        impl<'a, $($ty: Serialisable),+> Copy for $reader<'a, $($ty),+> {}

        impl<'a, $($ty: Serialisable),+> AutoDeserialise for $reader<'a, $($ty),+> {
            type Output = Self;

            fn auto_deserialise(self) -> Self {
                self
            }
        }

        impl<'a, $($ty: Serialisable + 'a),+> $reader<'a, $($ty),+> {
            /// The zero-based index of the contained alternative.
            pub fn tag(self) -> u8 {
                self.tag
            }

            $(
                #[doc = concat!("Gets the value if the active tag is ", stringify!($idx), ", else `BadVariantAccess`.")]
                pub fn $get(self) -> Result<<$ty::Reader<'a> as AutoDeserialise>::Output> {
                    if self.tag == $idx {
                        Ok(<$ty as Serialisable>::read(self.buffer, self.value_offset)?.auto_deserialise())
                    } else {
                        Err(Error::BadVariantAccess { expected: $idx, found: self.tag })
                    }
                }
            )+

            /// Dispatches to the closure matching the active alternative,
            /// propagating any error resolving that alternative (e.g. a
            /// corrupt nested tag) instead of panicking.
            pub fn visit<R>(self, $($get: impl FnOnce(<$ty::Reader<'a> as AutoDeserialise>::Output) -> R),+) -> Result<R> {
                $(
                    if self.tag == $idx {
                        return Ok($get(self.$get()?));
                    }
                )+
                unreachable!("tag was validated against alternative count at construction")
            }
        }

        impl<$($ty: Serialisable),+> Serialisable for $marker<$($ty),+> {
            const FIXED_SIZE: usize = TAG_SIZE + OFFSET_SIZE;
            type Source = $source<$($ty),+>;
            type Reader<'a> = $reader<'a, $($ty),+> where $($ty: 'a),+;

            fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
                let tag = source.tag();
                match source {
                    $(
                        $source::$alt(value) => {
                            let value_pos = push_variable_subobjects::<$ty, Buf>(1, buffer, |buffer, var_pos| {
                                <$ty as Serialisable>::write(value, buffer, var_pos)
                            })?;
                            let offset: DataOffset = u16::try_from(value_pos).map_err(|_| Error::ObjectTooLarge {
                                context: "variant<T...> value offset",
                                actual: value_pos as u64,
                                field_width: OFFSET_SIZE,
                            })?;
                            push_fixed_subobject::<u8, Buf>(fixed_offset, buffer, |buffer, at| {
                                buffer.span_mut()[at] = tag;
                                Ok(())
                            })?;
                            push_fixed_subobject::<DataOffset, Buf>(fixed_offset + TAG_SIZE, buffer, |buffer, at| {
                                buffer.span_mut()[at..at + OFFSET_SIZE].copy_from_slice(&offset.to_le_bytes());
                                Ok(())
                            })?;
                            Ok(())
                        }
                    ),+
                }
            }

            fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
            where
                Self: 'a,
            {
                check_bounds("variant<T...>", buffer, fixed_offset, Self::FIXED_SIZE)?;
                let tag = buffer[fixed_offset];
                const ALTERNATIVES: usize = { let mut n = 0; $(let _ = $idx; n += 1;)+ n };
                if tag as usize >= ALTERNATIVES {
                    return Err(Error::CorruptTag { tag, alternatives: ALTERNATIVES });
                }
                let value_offset =
                    u16::from_le_bytes([buffer[fixed_offset + TAG_SIZE], buffer[fixed_offset + TAG_SIZE + 1]]) as usize;
                // Validate the offset against the selected alternative's fixed
                // size now, so a corrupt/hostile offset fails here with a typed
                // error rather than surfacing as a panic from `visit` later.
                $(
                    if tag == $idx {
                        check_bounds(stringify!($reader), buffer, value_offset, <$ty as Serialisable>::FIXED_SIZE)?;
                    }
                )+
                Ok($reader { buffer, tag, value_offset, _marker: PhantomData })
            }
        }
    };
}

impl_variant! {
    marker: Variant1;
    source: Variant1Source;
    reader: Variant1Reader;
    alternatives: (A, 0, Alt0, get_0),
}

impl_variant! {
    marker: Variant2;
    source: Variant2Source;
    reader: Variant2Reader;
    alternatives: (A, 0, Alt0, get_0), (B, 1, Alt1, get_1),
}

impl_variant! {
    marker: Variant3;
    source: Variant3Source;
    reader: Variant3Reader;
    alternatives: (A, 0, Alt0, get_0), (B, 1, Alt1, get_1), (C, 2, Alt2, get_2),
}

impl_variant! {
    marker: Variant4;
    source: Variant4Source;
    reader: Variant4Reader;
    alternatives: (A, 0, Alt0, get_0), (B, 1, Alt1, get_1), (C, 2, Alt2, get_2), (D, 3, Alt3, get_3),
}

impl_variant! {
    marker: Variant5;
    source: Variant5Source;
    reader: Variant5Reader;
    alternatives: (A, 0, Alt0, get_0), (B, 1, Alt1, get_1), (C, 2, Alt2, get_2), (D, 3, Alt3, get_3), (E, 4, Alt4, get_4),
}
