//! Coverage for `#[derive(Codec)]` expansions.

use polycode::{Codec, MemoryOutputArchive, PolycodeError, Result, ViewInputArchive};

fn roundtrip<T: Codec + Default>(value: &mut T) -> T {
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data)
        .apply(value)
        .expect("save failed");
    let mut loaded = T::default();
    ViewInputArchive::new(&data)
        .apply(&mut loaded)
        .expect("load failed");
    loaded
}

#[derive(Codec, Debug, Default, PartialEq)]
struct Named {
    id: u64,
    label: String,
}

#[derive(Codec, Debug, Default, PartialEq)]
struct Wrapper(u32, String);

#[derive(Codec, Debug, Default, PartialEq)]
struct Marker;

#[derive(Codec, Debug, Default, PartialEq)]
struct Pair<T> {
    left: T,
    right: T,
}

#[derive(Codec, Debug, Default, PartialEq)]
enum Mode {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Codec, Debug, Default, PartialEq)]
enum StatusCode {
    #[default]
    Ok = 200,
    NotFound = 404,
    Teapot = 418,
}

#[test]
fn named_struct_roundtrips() {
    let mut value = Named {
        id: 99,
        label: "chunk".into(),
    };
    assert_eq!(roundtrip(&mut value), value);
}

#[test]
fn tuple_and_unit_structs_roundtrip() -> Result<()> {
    let mut value = Wrapper(7, "seven".into());
    assert_eq!(roundtrip(&mut value), value);

    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data).apply(&mut Marker)?;
    assert!(data.is_empty());
    Ok(())
}

#[test]
fn generic_struct_roundtrips() {
    let mut value = Pair {
        left: vec![1_u8, 2],
        right: vec![3_u8],
    };
    assert_eq!(roundtrip(&mut value), value);
}

#[test]
fn enums_travel_as_u32_discriminants() -> Result<()> {
    assert_eq!(roundtrip(&mut Mode::Stopped), Mode::Stopped);
    assert_eq!(roundtrip(&mut StatusCode::Teapot), StatusCode::Teapot);

    // The wire holds the declared discriminant, not the variant index.
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data).apply(&mut StatusCode::NotFound)?;
    assert_eq!(data, 404_u32.to_ne_bytes());
    Ok(())
}

#[test]
fn unknown_discriminant_fails_on_decode() -> Result<()> {
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data).apply(&mut 500_u32)?;

    let mut status = StatusCode::default();
    let err = ViewInputArchive::new(&data)
        .apply(&mut status)
        .expect_err("must fail");
    assert!(matches!(err, PolycodeError::Malformed(_)));
    Ok(())
}

#[test]
fn derived_struct_matches_manual_field_order() -> Result<()> {
    let mut derived = Vec::new();
    MemoryOutputArchive::new(&mut derived).apply(&mut Named {
        id: 5,
        label: "x".into(),
    })?;

    let mut manual = Vec::new();
    let mut out = MemoryOutputArchive::new(&mut manual);
    out.apply(&mut 5_u64)?;
    out.apply(&mut String::from("x"))?;

    assert_eq!(derived, manual);
    Ok(())
}
