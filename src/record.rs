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

//! `record`: an ordered, named-field struct with single inheritance.
//! Spec §4.5.
//!
//! A record's field list is `base.fields ++ own_fields`, in that order
//! (inherited fields first). Rust has no variadic/reflective struct
//! definition, so records are declared with [`define_record!`], which
//! expands to: a zero-sized marker type implementing [`Serialisable`]; a
//! `Source` struct with one public field per declared field (field-by-name
//! *set* is just direct field assignment); and a `Reader` with one accessor
//! method per field (field-by-name *read*), plus an `as_base` widening method
//! when the record declares a base.
//!
//! A record with no explicit base is modelled as inheriting from
//! [`crate::scalar::Null`] — zero fixed bytes, nothing to write, nothing to
//! widen to — so the macro only needs one code path instead of two.

/// Positional (by-index) read access into a record's own declared fields —
/// spec §4.5's "field-by-index read" operation. Grounded on the original
/// `serialpp` C++ library's `deserialiser<R>::get<Index>()`
/// (`record.hpp`), which resolves the index to a field name at compile time
/// and delegates to the by-name accessor; [`define_record!`] does the same
/// by generating one `impl` per declared field at its positional index.
///
/// Indexing is local to the record level that declares the field, the same
/// as the by-name accessor methods: reach an inherited field by index
/// through the generated reader's `as_base()` first, e.g.
/// `reader.as_base().field::<0>()`.
pub trait IndexedField<const I: usize> {
    /// What reading field `I` produces.
    type Output;

    /// Reads field `I`.
    fn field(self) -> Self::Output;
}

/// Positional (by-index) write access into a record's own declared fields on
/// its `Source` value — spec §4.5's "field-by-index set" operation.
pub trait IndexedFieldMut<const I: usize> {
    /// What a caller supplies to set field `I`.
    type Input;

    /// Overwrites field `I`.
    fn set_field(&mut self, value: Self::Input);
}

/// Declares a record type, its `Source`, and its `Reader`.
///
/// ```ignore
/// define_record! {
///     pub struct Point as PointSource, PointReader {
///         x: i32,
///         y: i32,
///     }
/// }
///
/// define_record! {
///     pub struct Point3 : Point as Point3Source, Point3Reader {
///         z: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $source:ident, $reader:ident {
            $($field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $crate::define_record! {
            $(#[$meta])*
            $vis struct $name : $crate::scalar::Null as $source, $reader {
                $($field : $ty),*
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $base:ty as $source:ident, $reader:ident {
            $($field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        $vis struct $name;

        #[doc = concat!("Source value for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone)]
        $vis struct $source {
            __base: <$base as $crate::layout::Serialisable>::Source,
            $(pub $field: <$ty as $crate::layout::Serialisable>::Source),*
        }

        impl $source {
            /// Builds a source value from the base record's source plus this
            /// record's own fields, in declaration order.
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                base: <$base as $crate::layout::Serialisable>::Source,
                $($field: <$ty as $crate::layout::Serialisable>::Source),*
            ) -> Self {
                $source { __base: base, $($field),* }
            }
        }

        #[doc = concat!("Lazy reader for [`", stringify!($name), "`].")]
        #[derive(Debug)]
        $vis struct $reader<'a> {
            __buffer: &'a [u8],
            __fixed_offset: usize,
            $(#[allow(dead_code)] $field: usize,)*
        }

        impl<'a> Clone for $reader<'a> {
            fn clone(&self) -> Self { *self }
        }

        impl<'a> Copy for $reader<'a> {}

        impl<'a> $reader<'a> {
            /// Widens this reader to view only the base record's fields,
            /// which occupy an identical-offset prefix of this record's
            /// fixed region (spec §4.5 "implicit reader widening").
            pub fn as_base(self) -> <$base as $crate::layout::Serialisable>::Reader<'a> {
                // Bounds were already validated when `self` was constructed,
                // and the base's fixed region is a prefix of this one's, so
                // this cannot fail.
                <$base as $crate::layout::Serialisable>::read(self.__buffer, self.__fixed_offset)
                    .expect("base record fields are a validated prefix")
            }

            $(
                #[doc = concat!("Reads the `", stringify!($field), "` field.")]
                pub fn $field(self) -> <<$ty as $crate::layout::Serialisable>::Reader<'a> as $crate::layout::AutoDeserialise>::Output {
                    <$ty as $crate::layout::Serialisable>::read(self.__buffer, self.$field)
                        .expect("field offset was validated at reader construction")
                        .auto_deserialise()
                }
            )*
        }

        impl $crate::layout::Serialisable for $name {
            const FIXED_SIZE: usize = <$base as $crate::layout::Serialisable>::FIXED_SIZE
                $(+ <$ty as $crate::layout::Serialisable>::FIXED_SIZE)*;

            type Source = $source;
            type Reader<'a> = $reader<'a>;

            fn write<Buf: $crate::buffer::Buffer>(
                source: &Self::Source,
                buffer: &mut Buf,
                fixed_offset: usize,
            ) -> $crate::error::Result<()> {
                let mut offset = $crate::layout::push_fixed_subobject::<$base, Buf>(
                    fixed_offset,
                    buffer,
                    |buffer, offset| <$base as $crate::layout::Serialisable>::write(&source.__base, buffer, offset),
                )?;
                $(
                    offset = $crate::layout::push_fixed_subobject::<$ty, Buf>(
                        offset,
                        buffer,
                        |buffer, offset| <$ty as $crate::layout::Serialisable>::write(&source.$field, buffer, offset),
                    )?;
                )*
                let _ = offset;
                Ok(())
            }

            fn read<'a>(buffer: &'a [u8], fixed_offset: usize) -> $crate::error::Result<Self::Reader<'a>>
            where
                Self: 'a,
            {
                $crate::layout::check_bounds(stringify!($name), buffer, fixed_offset, Self::FIXED_SIZE)?;
                let mut offset = fixed_offset + <$base as $crate::layout::Serialisable>::FIXED_SIZE;
                $(
                    let $field = offset;
                    offset += <$ty as $crate::layout::Serialisable>::FIXED_SIZE;
                )*
                let _ = offset;
                Ok($reader {
                    __buffer: buffer,
                    __fixed_offset: fixed_offset,
                    $($field,)*
                })
            }
        }

        $crate::__define_record_indexed_fields! {
            reader: $reader;
            source: $source;
            index: 0;
            fields: $($field : $ty),*
        }
    };
}

/// Generates one [`IndexedField`]/[`IndexedFieldMut`] impl per field, one
/// field per recursive step, threading a literal index expression through
/// (this is the only way `macro_rules!` can attach a distinct integer to
/// each repetition element — there's no indexed repetition binding). Not
/// part of the public macro surface; called from [`define_record!`].
#[doc(hidden)]
#[macro_export]
macro_rules! __define_record_indexed_fields {
    (
        reader: $reader:ident;
        source: $source:ident;
        index: $i:expr;
        fields: $(,)?
    ) => {};

    (
        reader: $reader:ident;
        source: $source:ident;
        index: $i:expr;
        fields: $field:ident : $ty:ty $(, $rest_field:ident : $rest_ty:ty)* $(,)?
    ) => {
        impl<'a> $crate::record::IndexedField<{ $i }> for $reader<'a> {
            type Output = <<$ty as $crate::layout::Serialisable>::Reader<'a> as $crate::layout::AutoDeserialise>::Output;

            fn field(self) -> Self::Output {
                self.$field()
            }
        }

        impl $crate::record::IndexedFieldMut<{ $i }> for $source {
            type Input = <$ty as $crate::layout::Serialisable>::Source;

            fn set_field(&mut self, value: Self::Input) {
                self.$field = value;
            }
        }

        $crate::__define_record_indexed_fields! {
            reader: $reader;
            source: $source;
            index: ($i + 1);
            fields: $($rest_field : $rest_ty),*
        }
    };
}
