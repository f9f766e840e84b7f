//! Built-in [`Codec`] implementations for the standard shapes.
//!
//! Wire layouts:
//!
//! - scalars: native in-memory bytes, host-endian
//! - `bool`: one byte; decode maps zero to `false`, anything else to `true`
//! - `char`: its `u32` scalar value, validated on decode
//! - resizable sequences and strings: `u32` element count, then the
//!   elements (one raw block when the element is a scalar)
//! - associative containers: `u32` entry count, then each entry
//! - fixed-size arrays, pairs and tuples: elements in order, no prefix
//! - `Box<T>`: the pointee value, no tag
//!
//! `usize` and `isize` have no implementation on purpose: their width
//! varies by target, which would make streams unreadable even between
//! machines of the same endianness. Sequence lengths travel as `u32`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use crate::archive::{Archive, ArchiveKind};
use crate::codec::{sealed, Codec, Scalar};
use crate::error::{PolycodeError, Result};

/// Narrows a sequence length into the `u32` wire prefix.
pub(crate) fn length_prefix(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| PolycodeError::LengthOverflow(len))
}

// --- Scalar raw views ---

/// Reinterprets a scalar slice as its raw bytes.
#[allow(unsafe_code)]
pub(crate) fn scalar_bytes<T: Scalar>(items: &[T]) -> &[u8] {
    // SAFETY: `Scalar` is sealed to primitive integers and floats. They
    // have no padding and no invalid bit patterns, and `u8` alignment is
    // never stricter than `T`'s, so viewing the initialized elements as
    // bytes is sound.
    unsafe { std::slice::from_raw_parts(items.as_ptr().cast::<u8>(), std::mem::size_of_val(items)) }
}

/// Reinterprets a scalar slice as its raw bytes, mutably.
#[allow(unsafe_code)]
pub(crate) fn scalar_bytes_mut<T: Scalar>(items: &mut [T]) -> &mut [u8] {
    let len = std::mem::size_of_val(items);
    // SAFETY: as in `scalar_bytes`; additionally, every byte combination
    // written through the view is a valid value of a sealed scalar type,
    // so the elements remain initialized and valid afterwards.
    unsafe { std::slice::from_raw_parts_mut(items.as_mut_ptr().cast::<u8>(), len) }
}

// --- Fundamental scalars ---

macro_rules! impl_scalar_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl sealed::Sealed for $ty {}
        impl Scalar for $ty {}

        impl Codec for $ty {
            fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
                match A::KIND {
                    ArchiveKind::Saving => archive.write_bytes(&value.to_ne_bytes()),
                    ArchiveKind::Loading => {
                        let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                        archive.read_bytes(&mut bytes)?;
                        *value = <$ty>::from_ne_bytes(bytes);
                        Ok(())
                    }
                }
            }

            fn serialize_slice<A: Archive>(archive: &mut A, items: &mut [Self]) -> Result<()> {
                match A::KIND {
                    ArchiveKind::Saving => archive.write_bytes(scalar_bytes(items)),
                    ArchiveKind::Loading => archive.read_bytes(scalar_bytes_mut(items)),
                }
            }
        }
    )+};
}

impl_scalar_codec!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl Codec for bool {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => archive.write_bytes(&[u8::from(*value)]),
            ArchiveKind::Loading => {
                let mut byte = [0u8];
                archive.read_bytes(&mut byte)?;
                *value = byte[0] != 0;
                Ok(())
            }
        }
    }
}

impl Codec for char {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut code = *value as u32;
                u32::serialize(archive, &mut code)
            }
            ArchiveKind::Loading => {
                let mut code = 0u32;
                u32::serialize(archive, &mut code)?;
                *value = char::from_u32(code).ok_or_else(|| {
                    PolycodeError::Malformed(format!("{code:#x} is not a character scalar value"))
                })?;
                Ok(())
            }
        }
    }
}

// --- Strings ---

impl Codec for String {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                archive.write_bytes(value.as_bytes())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                let mut bytes = vec![0u8; size as usize];
                archive.read_bytes(&mut bytes)?;
                *value = String::from_utf8(bytes).map_err(|error| {
                    PolycodeError::Malformed(format!("string payload is not UTF-8: {error}"))
                })?;
                Ok(())
            }
        }
    }
}

// --- Resizable sequences ---

impl<T: Codec + Default> Codec for Vec<T> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                T::serialize_slice(archive, value.as_mut_slice())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                value.resize_with(size as usize, T::default);
                T::serialize_slice(archive, value.as_mut_slice())
            }
        }
    }
}

impl<T: Codec + Default> Codec for VecDeque<T> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                value.resize_with(size as usize, T::default);
            }
        }

        for item in value.iter_mut() {
            T::serialize(archive, item)?;
        }
        Ok(())
    }
}

// --- Associative containers ---
//
// Saving iterates the live entries, cloning each key into a scratch slot
// since the container will not hand out mutable keys. Loading decodes a
// scratch entry and moves it in; the entry is dropped either way.

impl<K, V, S> Codec for HashMap<K, V, S>
where
    K: Codec + Default + Clone + Eq + Hash,
    V: Codec + Default,
    S: BuildHasher,
{
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                for (key, item) in value.iter_mut() {
                    let mut key = key.clone();
                    K::serialize(archive, &mut key)?;
                    V::serialize(archive, item)?;
                }
                Ok(())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                for _ in 0..size {
                    let mut entry = <(K, V)>::default();
                    <(K, V)>::serialize(archive, &mut entry)?;
                    value.insert(entry.0, entry.1);
                }
                Ok(())
            }
        }
    }
}

impl<K, V> Codec for BTreeMap<K, V>
where
    K: Codec + Default + Clone + Ord,
    V: Codec + Default,
{
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                for (key, item) in value.iter_mut() {
                    let mut key = key.clone();
                    K::serialize(archive, &mut key)?;
                    V::serialize(archive, item)?;
                }
                Ok(())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                for _ in 0..size {
                    let mut entry = <(K, V)>::default();
                    <(K, V)>::serialize(archive, &mut entry)?;
                    value.insert(entry.0, entry.1);
                }
                Ok(())
            }
        }
    }
}

impl<T, S> Codec for HashSet<T, S>
where
    T: Codec + Default + Clone + Eq + Hash,
    S: BuildHasher,
{
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                for item in value.iter() {
                    let mut item = item.clone();
                    T::serialize(archive, &mut item)?;
                }
                Ok(())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                for _ in 0..size {
                    let mut item = T::default();
                    T::serialize(archive, &mut item)?;
                    value.insert(item);
                }
                Ok(())
            }
        }
    }
}

impl<T> Codec for BTreeSet<T>
where
    T: Codec + Default + Clone + Ord,
{
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => {
                let mut size = length_prefix(value.len())?;
                u32::serialize(archive, &mut size)?;
                for item in value.iter() {
                    let mut item = item.clone();
                    T::serialize(archive, &mut item)?;
                }
                Ok(())
            }
            ArchiveKind::Loading => {
                let mut size = 0u32;
                u32::serialize(archive, &mut size)?;
                for _ in 0..size {
                    let mut item = T::default();
                    T::serialize(archive, &mut item)?;
                    value.insert(item);
                }
                Ok(())
            }
        }
    }
}

// --- Fixed-size aggregates ---

impl<T: Codec, const N: usize> Codec for [T; N] {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        for item in value.iter_mut() {
            T::serialize(archive, item)?;
        }
        Ok(())
    }
}

macro_rules! impl_tuple_codec {
    ($($name:ident => $index:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
                $( $name::serialize(archive, &mut value.$index)?; )+
                Ok(())
            }
        }
    };
}

impl_tuple_codec!(T0 => 0);
impl_tuple_codec!(T0 => 0, T1 => 1);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2, T3 => 3);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2, T3 => 3, T4 => 4);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2, T3 => 3, T4 => 4, T5 => 5);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2, T3 => 3, T4 => 4, T5 => 5, T6 => 6);
impl_tuple_codec!(T0 => 0, T1 => 1, T2 => 2, T3 => 3, T4 => 4, T5 => 5, T6 => 6, T7 => 7);

// --- Owning pointers (non-polymorphic) ---

impl<T: Codec> Codec for Box<T> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        T::serialize(archive, value.as_mut())
    }
}
