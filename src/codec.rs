//! The [`Codec`] trait: one bidirectional serializer per type.
//!
//! A type describes its wire shape once; the direction comes from the
//! archive it is applied to. On a saving archive the implementation reads
//! the value and emits bytes, on a loading archive it fills the value from
//! the stream. Built-in implementations for the standard shapes live in a
//! sibling module; user types implement the trait by hand or through
//! `#[derive(Codec)]`.
//!
//! Raw pointers deliberately have no implementation: passing `*const T` or
//! `*mut T` to an archive is a compile error, which is exactly the intent.

use crate::archive::Archive;
use crate::error::Result;

/// A value that can be saved to and loaded from an archive.
///
/// The single `serialize` implementation covers both directions. For
/// built-in shapes the direction is branched on
/// [`Archive::KIND`](crate::Archive::KIND); for plain field-by-field
/// types no branch is needed at all, since applying each field works the
/// same way in either direction:
///
/// ```rust
/// use polycode::{Archive, Codec, Result};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Codec for Point {
///     fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
///         archive.apply(&mut value.x)?;
///         archive.apply(&mut value.y)
///     }
/// }
/// ```
pub trait Codec {
    /// Saves `value` into or loads `value` from `archive`, depending on
    /// the archive's direction.
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()>;

    /// Serializes a contiguous run of values.
    ///
    /// The default walks the slice element by element. Scalar types
    /// override it with a single raw block transfer, which is how
    /// `Vec<u32>` and friends hit the contiguous fast path while producing
    /// byte-identical streams.
    #[doc(hidden)]
    fn serialize_slice<A: Archive>(archive: &mut A, items: &mut [Self]) -> Result<()>
    where
        Self: Sized,
    {
        for item in items.iter_mut() {
            Self::serialize(archive, item)?;
        }
        Ok(())
    }
}

/// Marker for fundamental scalars whose in-memory representation is the
/// wire representation.
///
/// Sealed: the raw block transfers behind [`crate::as_binary`] and the
/// contiguous container fast path reinterpret `[T]` as bytes in both
/// directions, which is only sound for primitive integers and floats
/// (no padding, every bit pattern valid). `bool` and `char` are not
/// scalars here; they carry decode-side validation instead.
pub trait Scalar: Copy + sealed::Sealed {}

pub(crate) mod sealed {
    pub trait Sealed {}
}
