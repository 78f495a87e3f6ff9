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

//! `tuple<T1, ..., Tn>`: an ordered sequence of heterogeneous values laid out
//! contiguously, like [`crate::pair::Pair`] generalised past two elements.
//! Spec §3.2, §4.4.
//!
//! Implemented directly on Rust's native tuple types (`(A, B, C)`, ...) for
//! arities 2 through 6 — a reasonable finite bound, the same approach serde
//! takes for its own tuple impls, rather than requiring a distinct marker
//! type per arity.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::layout::{check_bounds, push_fixed_subobject, AutoDeserialise, Serialisable};

macro_rules! impl_tuple {
    (
        reader: $reader:ident;
        arity: $arity:literal;
        fields: $(($ty:ident, $idx:literal, $method:ident)),+ $(,)?
    ) => {
        #[doc = concat!("Lazy reader for a ", stringify!($arity), "-element tuple.")]
        pub struct $reader<'a, $($ty: Serialisable),+> {
            buffer: &'a [u8],
            offsets: [usize; $arity],
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

        impl<'a, $($ty: Serialisable),+> $reader<'a, $($ty),+> {
            $(
                #[doc = concat!("Reads tuple element ", stringify!($idx), ".")]
                pub fn $method(self) -> <$ty::Reader<'a> as AutoDeserialise>::Output {
                    <$ty as Serialisable>::read(self.buffer, self.offsets[$idx])
                        .expect("tuple element offset was validated at reader construction")
                        .auto_deserialise()
                }
            )+
        }

        impl<$($ty: Serialisable),+> Serialisable for ($($ty,)+) {
            const FIXED_SIZE: usize = 0 $(+ $ty::FIXED_SIZE)+;
            type Source = ($($ty::Source,)+);
            type Reader<'a> = $reader<'a, $($ty),+> where $($ty: 'a),+;

            fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
                #[allow(non_snake_case)]
                let ($($ty,)+) = source;
                let mut offset = fixed_offset;
                $(
                    offset = push_fixed_subobject::<$ty, Buf>(offset, buffer, |buffer, offset| {
                        <$ty as Serialisable>::write($ty, buffer, offset)
                    })?;
                )+
                let _ = offset;
                Ok(())
            }

            fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
            where
                Self: 'a,
            {
                check_bounds(stringify!($reader), buffer, fixed_offset, Self::FIXED_SIZE)?;
                let mut offsets = [0usize; $arity];
                let mut offset = fixed_offset;
                $(
                    offsets[$idx] = offset;
                    offset += <$ty as Serialisable>::FIXED_SIZE;
                )+
                let _ = offset;
                Ok($reader { buffer, offsets, _marker: PhantomData })
            }
        }
    };
}

impl_tuple! {
    reader: Tuple2Reader;
    arity: 2;
    fields: (A, 0, get_0), (B, 1, get_1),
}

impl_tuple! {
    reader: Tuple3Reader;
    arity: 3;
    fields: (A, 0, get_0), (B, 1, get_1), (C, 2, get_2),
}

impl_tuple! {
    reader: Tuple4Reader;
    arity: 4;
    fields: (A, 0, get_0), (B, 1, get_1), (C, 2, get_2), (D, 3, get_3),
}

impl_tuple! {
    reader: Tuple5Reader;
    arity: 5;
    fields: (A, 0, get_0), (B, 1, get_1), (C, 2, get_2), (D, 3, get_3), (E, 4, get_4),
}

impl_tuple! {
    reader: Tuple6Reader;
    arity: 6;
    fields: (A, 0, get_0), (B, 1, get_1), (C, 2, get_2), (D, 3, get_3), (E, 4, get_4), (F, 5, get_5),
}
