//! Explicit raw binary blocks.
//!
//! [`as_binary`] wraps a slice of scalars so the whole run is copied to or
//! from the wire in one pass, with no length prefix. The element count is
//! the caller's contract: the load side must wrap a slice of exactly the
//! saved length. Use with care.

use crate::archive::{Archive, ArchiveKind};
use crate::codec::{Codec, Scalar};
use crate::codec_impls::{scalar_bytes, scalar_bytes_mut};
use crate::error::Result;

/// A borrowed run of scalars serialized as one raw block.
///
/// The wire representation is exactly `items.len() * size_of::<T>()`
/// bytes of native in-memory data; nothing is written before or after.
#[derive(Debug)]
pub struct Binary<'a, T: Scalar> {
    items: &'a mut [T],
}

/// Wraps a scalar slice for raw block serialization.
///
/// ## Examples
///
/// ```rust
/// use polycode::{as_binary, MemoryOutputArchive, Result};
///
/// fn main() -> Result<()> {
///     let mut samples = [1_u16, 2, 3, 4];
///     let mut data = Vec::new();
///     MemoryOutputArchive::new(&mut data).apply(&mut as_binary(&mut samples))?;
///     assert_eq!(data.len(), 8);
///     Ok(())
/// }
/// ```
pub fn as_binary<T: Scalar>(items: &mut [T]) -> Binary<'_, T> {
    Binary { items }
}

impl<T: Scalar> Codec for Binary<'_, T> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => archive.write_bytes(scalar_bytes(&*value.items)),
            ArchiveKind::Loading => archive.read_bytes(scalar_bytes_mut(&mut *value.items)),
        }
    }
}
