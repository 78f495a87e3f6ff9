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

//! `pair<A, B>`: two heterogeneous values laid out contiguously. Spec §3.2,
//! §4.4.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::layout::{check_bounds, push_fixed_subobject, AutoDeserialise, Serialisable};

/// Marker type for a serialisable pair of `A` and `B`.
pub struct Pair<A, B>(PhantomData<(A, B)>);

/// Source value for [`Pair`].
#[derive(Debug, Clone)]
pub struct PairSource<A: Serialisable, B: Serialisable> {
    /// The first element's source.
    pub first: A::Source,
    /// The second element's source.
    pub second: B::Source,
}

impl<A: Serialisable, B: Serialisable> PairSource<A, B> {
    /// Builds a pair source from its two elements.
    pub fn new(first: A::Source, second: B::Source) -> Self {
        PairSource { first, second }
    }
}

/// Lazy reader for [`Pair`].
pub struct PairReader<'a, A: Serialisable, B: Serialisable> {
    buffer: &'a [u8],
    fixed_offset: usize,
    _marker: PhantomData<(A, B)>,
}

impl<'a, A: Serialisable, B: Serialisable> Clone for PairReader<'a, A, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A: Serialisable, B: Serialisable> Copy for PairReader<'a, A, B> {}

impl<'a, A: Serialisable, B: Serialisable> PairReader<'a, A, B> {
    /// Reads the first element.
    pub fn first(self) -> <A::Reader<'a> as AutoDeserialise>::Output {
        A::read(self.buffer, self.fixed_offset)
            .expect("pair's first field offset was validated at construction")
            .auto_deserialise()
    }

    /// Reads the second element.
    pub fn second(self) -> <B::Reader<'a> as AutoDeserialise>::Output {
        B::read(self.buffer, self.fixed_offset + A::FIXED_SIZE)
            .expect("pair's second field offset was validated at construction")
            .auto_deserialise()
    }
}

impl<'a, A: Serialisable, B: Serialisable> AutoDeserialise for PairReader<'a, A, B> {
    type Output = Self;

    fn auto_deserialise(self) -> Self {
        self
    }
}

impl<A: Serialisable, B: Serialisable> Serialisable for Pair<A, B> {
    const FIXED_SIZE: usize = A::FIXED_SIZE + B::FIXED_SIZE;
    type Source = PairSource<A, B>;
    type Reader<'a> = PairReader<'a, A, B> where A: 'a, B: 'a;

    fn write<Buf: Buffer>(source: &Self::Source, buffer: &mut Buf, fixed_offset: usize) -> Result<()> {
        let offset =
            push_fixed_subobject::<A, Buf>(fixed_offset, buffer, |buffer, offset| A::write(&source.first, buffer, offset))?;
        push_fixed_subobject::<B, Buf>(offset, buffer, |buffer, offset| B::write(&source.second, buffer, offset))?;
        Ok(())
    }

    fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> Result<Self::Reader<'a>>
    where
        Self: 'a,
    {
        check_bounds("pair", buffer, fixed_offset, Self::FIXED_SIZE)?;
        Ok(PairReader { buffer, fixed_offset, _marker: PhantomData })
    }
}
