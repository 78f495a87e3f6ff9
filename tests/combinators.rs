//! Integration-level coverage of individual combinators through the public
//! facade, including the error-surface edge cases from §7/§8.

use flatser::buffer::{FixedBuffer, HeapBuffer};
use flatser::error::Error;
use flatser::layout::Serialisable;
use flatser::optional::{Optional, OptionalSource};
use flatser::pair::{Pair, PairSource};
use flatser::static_array::StaticArray;
use flatser::variant::{Variant0, Variant0Source, Variant2, Variant2Source};
use flatser::{deserialise, serialise};

#[test]
fn pair_and_tuple_compose() {
    let mut buffer = HeapBuffer::default();
    let source = PairSource::<(u8, u16, i32), bool>::new((7, 1000, -42), true);
    serialise::<Pair<(u8, u16, i32), bool>, _>(&source, &mut buffer).unwrap();

    let reader = deserialise::<Pair<(u8, u16, i32), bool>>(buffer.span()).unwrap();
    let first = reader.first();
    assert_eq!(first.get_0(), 7);
    assert_eq!(first.get_1(), 1000);
    assert_eq!(first.get_2(), -42);
    assert!(reader.second());
}

#[test]
fn static_array_of_optional_handles_mixed_presence() {
    let mut buffer = HeapBuffer::default();
    let source: [<Optional<u32> as Serialisable>::Source; 3] =
        [OptionalSource::some(1), OptionalSource::none(), OptionalSource::some(3)];
    serialise::<StaticArray<Optional<u32>, 3>, _>(&source, &mut buffer).unwrap();

    let reader = deserialise::<StaticArray<Optional<u32>, 3>>(buffer.span()).unwrap();
    assert_eq!(reader.index(0).value().unwrap(), 1);
    assert!(!reader.index(1).has_value());
    assert_eq!(reader.index(2).value().unwrap(), 3);
}

#[test]
fn zero_alternative_variant_in_a_fixed_buffer() {
    let mut buffer = FixedBuffer::new(Variant0::FIXED_SIZE);
    serialise::<Variant0, _>(&Variant0Source, &mut buffer).unwrap();
    assert_eq!(buffer.span(), &[0, 0, 0]);
}

#[test]
fn fixed_buffer_rejects_a_payload_too_large_to_fit() {
    // Variant2<u32,u32> needs 3 (tag+offset) + 4 (value) bytes; give it 4.
    let mut buffer = FixedBuffer::new(4);
    let source = Variant2Source::<u32, u32>::Alt0(1);
    let err = serialise::<Variant2<u32, u32>, _>(&source, &mut buffer).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { .. }));
}

#[test]
fn deserialise_rejects_buffers_shorter_than_fixed_size() {
    let bytes = [0u8; 1];
    let err = deserialise::<Pair<i32, u16>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
}

#[test]
fn optional_offset_beyond_buffer_fails_on_access() {
    // Hand-craft an optional<u32> whose offset field points past the buffer.
    let bytes = [0xFF, 0xFF]; // offset = 65535 -> value_pos = 65534, way past len 2
    let reader = deserialise::<Optional<u32>>(&bytes).unwrap();
    assert!(reader.has_value());
    assert!(matches!(reader.value(), Err(Error::OutOfBounds { .. })));
}
