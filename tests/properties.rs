//! Property-based round-trip laws: for every supported shape, decoding an
//! encoding recovers the value and consumes the stream exactly.

use std::collections::{BTreeMap, HashMap};

use polycode::{Codec, MemoryOutputArchive, ViewInputArchive};
use proptest::prelude::*;

fn roundtrip<T: Codec + Default>(value: &mut T) -> T {
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data)
        .apply(value)
        .expect("save failed");

    let mut archive = ViewInputArchive::new(&data);
    let mut loaded = T::default();
    archive.apply(&mut loaded).expect("load failed");
    assert_eq!(archive.offset(), data.len(), "leftover bytes after decode");
    loaded
}

proptest! {
    #[test]
    fn integers_roundtrip(mut value in any::<i64>()) {
        prop_assert_eq!(roundtrip(&mut value), value);
    }

    #[test]
    fn wide_integers_roundtrip(mut value in any::<u128>()) {
        prop_assert_eq!(roundtrip(&mut value), value);
    }

    #[test]
    fn floats_roundtrip_bit_exact(bits in any::<u64>()) {
        let mut value = f64::from_bits(bits);
        prop_assert_eq!(roundtrip(&mut value).to_bits(), bits);
    }

    #[test]
    fn chars_roundtrip(mut value in any::<char>()) {
        prop_assert_eq!(roundtrip(&mut value), value);
    }

    #[test]
    fn strings_roundtrip(text in ".{0,64}") {
        let mut value = text.clone();
        prop_assert_eq!(roundtrip(&mut value), text);
    }

    #[test]
    fn scalar_vectors_roundtrip(values in proptest::collection::vec(any::<u32>(), 0..128)) {
        let mut value = values.clone();
        prop_assert_eq!(roundtrip(&mut value), values);
    }

    #[test]
    fn string_vectors_roundtrip(values in proptest::collection::vec(".{0,8}", 0..32)) {
        let mut value = values.clone();
        prop_assert_eq!(roundtrip(&mut value), values);
    }

    #[test]
    fn maps_roundtrip(entries in proptest::collection::hash_map(any::<u16>(), any::<i64>(), 0..64)) {
        let mut value: HashMap<u16, i64> = entries.clone();
        prop_assert_eq!(roundtrip(&mut value), entries);
    }

    #[test]
    fn ordered_maps_roundtrip(entries in proptest::collection::btree_map(".{0,6}", any::<u8>(), 0..32)) {
        let mut value: BTreeMap<String, u8> = entries.clone();
        prop_assert_eq!(roundtrip(&mut value), entries);
    }

    #[test]
    fn tuples_roundtrip(mut value in any::<(u8, i32, bool)>()) {
        prop_assert_eq!(roundtrip(&mut value), value);
    }

    #[test]
    fn adjacent_values_decode_in_order(mut first in any::<u64>(), text in ".{0,16}") {
        let mut data = Vec::new();
        let mut out = MemoryOutputArchive::new(&mut data);
        out.apply(&mut first).expect("save failed");
        out.apply(&mut text.clone()).expect("save failed");

        let mut archive = ViewInputArchive::new(&data);
        let mut a = 0_u64;
        let mut b = String::new();
        archive.apply(&mut a).expect("load failed");
        archive.apply(&mut b).expect("load failed");
        prop_assert_eq!(a, first);
        prop_assert_eq!(b, text);
        prop_assert_eq!(archive.offset(), data.len());
    }
}
