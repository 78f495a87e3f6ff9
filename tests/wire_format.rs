//! End-to-end byte-exact scenarios spanning the whole combinator grammar.
//! Each case here composes multiple combinators the way a real payload would,
//! rather than exercising one in isolation (that's what the per-module unit
//! tests already do).

use flatser::buffer::HeapBuffer;
use flatser::dynamic_array::{DynamicArray, DynamicArraySource};
use flatser::layout::Serialisable;
use flatser::optional::{Optional, OptionalSource};
use flatser::static_array::StaticArray;
use flatser::variant::{Variant2, Variant2Source, Variant3, Variant3Source};
use flatser::{deserialise, serialise};

#[test]
fn scalar_i64_bit_exact() {
    let mut buffer = HeapBuffer::default();
    serialise::<i64, _>(&-567_865_433_565_765i64, &mut buffer).unwrap();
    assert_eq!(buffer.span(), &[0xBB, 0x55, 0x8D, 0x86, 0x87, 0xFB, 0xFD, 0xFF]);
}

#[test]
fn static_array_of_i32_bit_exact() {
    let mut buffer = HeapBuffer::default();
    let source: [i32; 3] = [1_170_411_248, -1_630_057_274, 838_860_801];
    serialise::<StaticArray<i32, 3>, _>(&source, &mut buffer).unwrap();
    assert_eq!(
        buffer.span(),
        &[0xF0, 0x0E, 0xC3, 0x45, 0xC6, 0x4C, 0xD7, 0x9E, 0x01, 0x00, 0x00, 0x32]
    );
}

#[test]
fn nested_optional_of_i32_bit_exact() {
    let mut buffer = HeapBuffer::default();
    let inner = OptionalSource::<i32>::some(-1_912_447_038);
    let outer = OptionalSource::<Optional<i32>>::some(inner);
    serialise::<Optional<Optional<i32>>, _>(&outer, &mut buffer).unwrap();
    assert_eq!(buffer.span(), &[0x03, 0x00, 0x05, 0x00, 0xC2, 0x5F, 0x02, 0x8E]);
}

#[test]
fn dynamic_array_of_dynamic_array_bit_exact() {
    let mut buffer = HeapBuffer::default();
    let inner0: DynamicArraySource<u32> = [11_223_344u32, 1_566_778_899, 123_456_789].into();
    let inner1: DynamicArraySource<u32> = [10_203_040u32].into();
    let source: DynamicArraySource<DynamicArray<u32>> = [inner0, inner1].into();
    serialise::<DynamicArray<DynamicArray<u32>>, _>(&source, &mut buffer).unwrap();

    // Two-phase emission: outer header, then both children's 8-byte headers
    // back to back, then each child's elements in the order its header was
    // written.
    assert_eq!(
        buffer.span(),
        &[
            0x02, 0x00, 0x00, 0x00, // outer count = 2
            0x08, 0x00, 0x00, 0x00, // outer offset = 8
            0x03, 0x00, 0x00, 0x00, // child 0 count = 3
            0x18, 0x00, 0x00, 0x00, // child 0 offset = 24
            0x01, 0x00, 0x00, 0x00, // child 1 count = 1
            0x24, 0x00, 0x00, 0x00, // child 1 offset = 36
            0x30, 0x41, 0xAB, 0x00, // 11_223_344
            0x13, 0x26, 0x63, 0x5D, // 1_566_778_899
            0x15, 0xCD, 0x5B, 0x07, // 123_456_789
            0xA0, 0xAF, 0x9B, 0x00, // 10_203_040
        ]
    );

    let reader = deserialise::<DynamicArray<DynamicArray<u32>>>(buffer.span()).unwrap();
    let first: Vec<u32> = reader.index(0).elements().collect();
    let second: Vec<u32> = reader.index(1).elements().collect();
    assert_eq!(first, vec![11_223_344, 1_566_778_899, 123_456_789]);
    assert_eq!(second, vec![10_203_040]);
}

#[test]
fn nested_variant_bit_exact() {
    let mut buffer = HeapBuffer::default();
    let inner = Variant3Source::<u8, i16, i32>::Alt2(-123_456_789);
    let outer = Variant2Source::<Variant2<u32, u16>, Variant3<u8, i16, i32>>::Alt1(inner);
    serialise::<Variant2<Variant2<u32, u16>, Variant3<u8, i16, i32>>, _>(&outer, &mut buffer).unwrap();
    assert_eq!(
        buffer.span(),
        &[0x01, 0x03, 0x00, 0x02, 0x06, 0x00, 0xEB, 0x32, 0xA4, 0xF8]
    );

    let reader = deserialise::<Variant2<Variant2<u32, u16>, Variant3<u8, i16, i32>>>(buffer.span()).unwrap();
    assert_eq!(reader.tag(), 1);
    assert_eq!(reader.get_1().unwrap().get_2().unwrap(), -123_456_789);
}

flatser::define_record! {
    pub struct WireScenario as WireScenarioSource, WireScenarioReader {
        a: i8,
        b: u32,
        c: i16,
        d: u64
    }
}

#[test]
fn record_fields_bit_exact() {
    let mut buffer = HeapBuffer::default();
    let source = WireScenarioSource::new(-34i8, 206_000u32, 36i16, 360_720u64);
    serialise::<WireScenario, _>(&source, &mut buffer).unwrap();
    assert_eq!(
        buffer.span(),
        &[0xDE, 0xB0, 0x24, 0x03, 0x00, 0x24, 0x00, 0x10, 0x81, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    let reader = deserialise::<WireScenario>(buffer.span()).unwrap();
    assert_eq!(reader.a(), -34);
    assert_eq!(reader.b(), 206_000);
    assert_eq!(reader.c(), 36);
    assert_eq!(reader.d(), 360_720);
}
