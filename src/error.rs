//! Centralized error handling for polycode.
//!
//! Every failure condition in the library is propagated through the
//! [`Result`] type; there are no panic paths in non-test code (enforced by
//! `#![deny(clippy::unwrap_used)]` and `#![deny(clippy::panic)]`).
//!
//! ## Error Categories
//!
//! - **Range** ([`PolycodeError::OutOfRange`]): a read past the end of the
//!   input buffer
//! - **Null slot** ([`PolycodeError::NullSlot`]): saving an empty owning slot
//! - **Registry** ([`PolycodeError::UndeclaredType`],
//!   [`PolycodeError::TypeMismatch`]): polymorphic lookup and cast failures
//! - **Caller limits** ([`PolycodeError::LengthOverflow`]): sequences longer
//!   than the `u32` length prefix can express
//! - **Validation** ([`PolycodeError::Malformed`]): decoded bytes that
//!   violate an invariant of the target type
//! - **Internal** ([`PolycodeError::Internal`]): logic errors (should not
//!   occur in production)
//!
//! A second class of failures never reaches this enum at all: handing a raw
//! pointer to an archive, or serializing a type without a
//! [`Codec`](crate::Codec) implementation, is rejected by the compiler.

use std::fmt;

/// A specialized `Result` type for polycode operations.
///
/// ## Examples
///
/// ```rust
/// use polycode::Result;
///
/// fn encode_all() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PolycodeError>;

/// The master error enum covering all runtime failure domains in polycode.
///
/// A failed `apply` call aborts the current operation and surfaces one of
/// these variants; the archive's buffer is left in the documented state
/// (saving sinks truncated to their logical size, consuming loaders drained
/// of the consumed prefix).
#[derive(Debug, Clone)]
pub enum PolycodeError {
    /// A read requested more bytes than the input buffer still holds.
    OutOfRange {
        /// The number of bytes the decoder asked for.
        requested: usize,
        /// The number of bytes left in the buffer.
        available: usize,
    },

    /// An owning polymorphic slot was `None` when saving.
    ///
    /// The payload is the static type name of the slot.
    NullSlot(&'static str),

    /// A registry lookup found no entry for the requested type or id.
    ///
    /// On save this means the concrete type of the object was never
    /// registered; on load it means the stream's leading id is unknown.
    UndeclaredType(String),

    /// A loaded object's dynamic type does not match the requested
    /// static target type.
    TypeMismatch {
        /// The static type the caller asked to load into.
        expected: &'static str,
    },

    /// A sequence was too long for the 32-bit length prefix.
    ///
    /// The payload is the offending element count.
    LengthOverflow(usize),

    /// Decoded bytes violate an invariant of the target type, such as a
    /// string that is not valid UTF-8 or an unknown enum discriminant.
    Malformed(String),

    /// Logic error inside the library (should not occur in production;
    /// please report as a bug).
    Internal(String),
}

impl fmt::Display for PolycodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                requested,
                available,
            } => write!(
                f,
                "Range Error: requested {requested} byte(s) but only {available} remain"
            ),
            Self::NullSlot(name) => {
                write!(f, "Null Slot Error: cannot save an empty `{name}` slot")
            }
            Self::UndeclaredType(s) => write!(f, "Undeclared Type Error: {s}"),
            Self::TypeMismatch { expected } => {
                write!(f, "Type Mismatch Error: loaded object is not a `{expected}`")
            }
            Self::LengthOverflow(len) => write!(
                f,
                "Length Overflow Error: {len} elements exceed the u32 size prefix"
            ),
            Self::Malformed(s) => write!(f, "Malformed Payload Error: {s}"),
            Self::Internal(s) => write!(f, "Internal Logic Error: {s}"),
        }
    }
}

impl std::error::Error for PolycodeError {}
