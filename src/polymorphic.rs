//! Polymorphic serialization through abstract owning pointers.
//!
//! A type opts in by implementing the [`Polymorphic`] marker and
//! registering a stable name (see [`crate::register_types!`]). Registered
//! objects can then travel behind `Box<dyn Polymorphic>`: the save side
//! prefixes the body with the `u64` id registered for the concrete type,
//! and the load side uses that id to construct the right concrete type
//! again, so a heterogeneous stream reconstructs with the original dynamic
//! types intact.
//!
//! Three owning shapes carry the tagged encoding:
//!
//! - `Option<Box<dyn Polymorphic>>`: the abstract slot. `None` on save is
//!   an error ([`PolycodeError::NullSlot`](crate::PolycodeError::NullSlot));
//!   a load replaces the slot's content.
//! - `Option<Box<T>>` for a registered concrete `T`: same wire format,
//!   but the load checks that the reconstructed object actually is a `T`
//!   and fails with a type mismatch otherwise.
//! - `Box<dyn Polymorphic>`: the never-empty variant; a load swaps the
//!   pointee for the reconstructed object.
//!
//! [`as_polymorphic`] forces the same tagged encoding for a value held by
//! reference, without an owning pointer in sight.

use std::any::Any;

use crate::archive::{Archive, ArchiveKind};
use crate::codec::Codec;
use crate::error::{PolycodeError, Result};

/// Marker for types that may be serialized behind an abstract reference.
///
/// The `Any` supertrait supplies the runtime type identity used by the
/// registry on save and the checked downcasts on load; dropping a
/// `Box<dyn Polymorphic>` runs the concrete destructor, so reconstructed
/// objects are always cleaned up correctly, mismatches included.
///
/// Implementing the marker is one line:
///
/// ```rust
/// # struct Sprite;
/// impl polycode::Polymorphic for Sprite {}
/// ```
pub trait Polymorphic: Any {
    /// Diagnostic name of the concrete type, reachable through a trait
    /// object. Used in error messages; not part of the wire format.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Codec for Box<dyn Polymorphic> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => archive.save_polymorphic(value.as_mut()),
            ArchiveKind::Loading => {
                *value = archive.load_polymorphic()?;
                Ok(())
            }
        }
    }
}

impl Codec for Option<Box<dyn Polymorphic>> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => match value {
                Some(object) => archive.save_polymorphic(object.as_mut()),
                None => Err(PolycodeError::NullSlot("dyn Polymorphic")),
            },
            ArchiveKind::Loading => {
                *value = Some(archive.load_polymorphic()?);
                Ok(())
            }
        }
    }
}

impl<T: Polymorphic> Codec for Option<Box<T>> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => match value {
                Some(object) => archive.save_polymorphic(object.as_mut()),
                None => Err(PolycodeError::NullSlot(std::any::type_name::<T>())),
            },
            ArchiveKind::Loading => {
                let loaded: Box<dyn Any> = archive.load_polymorphic()?;
                let object = loaded.downcast::<T>().map_err(|_| PolycodeError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                })?;
                *value = Some(object);
                Ok(())
            }
        }
    }
}

/// A reference serialized with the tagged polymorphic encoding.
///
/// Produced by [`as_polymorphic`].
#[derive(Debug)]
pub struct PolymorphicRef<'a, T: Polymorphic> {
    object: &'a mut T,
}

/// Forces the tagged polymorphic encoding for a value held by reference.
///
/// Saving `as_polymorphic(&mut student)` produces the exact byte stream
/// of saving an owning pointer holding the same object. Loading through
/// the wrapper reconstructs from the stream's id and assigns into the
/// referenced value, failing with a type mismatch when the stream holds a
/// different concrete type.
pub fn as_polymorphic<T: Polymorphic>(object: &mut T) -> PolymorphicRef<'_, T> {
    PolymorphicRef { object }
}

impl<T: Polymorphic> Codec for PolymorphicRef<'_, T> {
    fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
        match A::KIND {
            ArchiveKind::Saving => archive.save_polymorphic(&mut *value.object),
            ArchiveKind::Loading => {
                let loaded: Box<dyn Any> = archive.load_polymorphic()?;
                let object = loaded.downcast::<T>().map_err(|_| PolycodeError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                })?;
                *value.object = *object;
                Ok(())
            }
        }
    }
}
