//! # Polycode
//!
//! A compact binary object-serialization library for Rust with first-class
//! support for runtime-polymorphic objects.
//!
//! ## Overview
//!
//! Values are *applied* to an archive: a direction-tagged object bound to
//! one in-memory byte buffer. A saving archive appends each value's
//! encoding to a caller-owned `Vec<u8>`; a loading archive reconstructs
//! values from a byte slice, or consumes them from the front of an owned
//! vector. The same [`Codec`] implementation drives both directions, so a
//! type describes its wire shape exactly once.
//!
//! ### Key Features
//!
//! *   **One serializer per type:** implement [`Codec`] by hand or with
//!     `#[derive(Codec)]`; the direction comes from the archive.
//! *   **Built-in composite shapes:** scalars, strings, sequences, maps
//!     and sets, fixed-size arrays, tuples and owning pointers, each with
//!     a fixed, documented wire layout.
//! *   **Polymorphic streams:** objects registered under a stable name
//!     travel behind `Box<dyn Polymorphic>` with a leading 64-bit
//!     name-derived tag, and reconstruct with their dynamic types intact.
//! *   **Link-time registration:** [`register_types!`] collects
//!     registrations into the binary with no startup code to call and no
//!     initialization order to get wrong.
//! *   **Contiguous fast path:** vectors of fundamental scalars are
//!     copied as a single raw block, byte-identical to the per-element
//!     layout.
//! *   **No panics:** every failure surfaces as a [`PolycodeError`]
//!     (enforced by clippy lints); misuse that can be caught statically,
//!     like serializing a raw pointer, does not compile at all.
//!
//! ## Wire Format
//!
//! A stream is the concatenation of the applied values' encodings, in
//! argument order, with no framing, headers or checksums. Scalars are
//! native in-memory bytes (host-endian). Length-prefixed shapes use a
//! `u32` count. A polymorphic record is `u64 id` followed by the body of
//! the concrete type; ids derive from registration names via truncated
//! SHA-1 (see [`type_tag`]).
//!
//! ## Usage
//!
//! ### Round-tripping a struct
//!
//! ```rust
//! use polycode::{Codec, MemoryInputArchive, MemoryOutputArchive, Result};
//!
//! #[derive(Codec, Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! fn main() -> Result<()> {
//!     let mut data = Vec::new();
//!     MemoryOutputArchive::new(&mut data).apply(&mut Point { x: 1337, y: 1338 })?;
//!
//!     let mut point = Point::default();
//!     MemoryInputArchive::new(&mut data).apply(&mut point)?;
//!     assert_eq!(point, Point { x: 1337, y: 1338 });
//!     Ok(())
//! }
//! ```
//!
//! ### Polymorphic round-trip
//!
//! ```rust
//! use polycode::{register_types, Codec, MemoryInputArchive, MemoryOutputArchive};
//! use polycode::{Polymorphic, Result};
//!
//! #[derive(Codec, Debug, Default, PartialEq)]
//! struct Monster {
//!     hit_points: u32,
//! }
//!
//! impl Polymorphic for Monster {}
//!
//! register_types! {
//!     Monster => "game::Monster",
//! }
//!
//! fn main() -> Result<()> {
//!     let mut data = Vec::new();
//!     let mut slot: Option<Box<dyn Polymorphic>> = Some(Box::new(Monster { hit_points: 50 }));
//!     MemoryOutputArchive::new(&mut data).apply(&mut slot)?;
//!
//!     let mut loaded: Option<Box<Monster>> = None;
//!     MemoryInputArchive::new(&mut data).apply(&mut loaded)?;
//!     assert_eq!(*loaded.expect("slot filled"), Monster { hit_points: 50 });
//!     Ok(())
//! }
//! ```
//!
//! ## Portability
//!
//! The primitive codec writes host-endian bytes by design: streams are
//! cheap to produce and consume but not portable across architectures of
//! different endianness. Callers needing portable streams should wrap the
//! archives with a byte-order-normalizing layer. Ids from [`type_tag`]
//! are endian-independent and stable everywhere.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod archive;
pub mod binary;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod polymorphic;
pub mod registry;
pub mod tag;

// Private modules
mod codec_impls;

/// Internal re-exports for the registration macro, so downstream crates do
/// not need their own copies of its dependencies.
#[doc(hidden)]
pub mod internal {
    pub use linkme;
    pub use paste;
}

// --- RE-EXPORTS ---

pub use archive::{
    Archive, ArchiveKind, LazyOutputArchive, MemoryInputArchive, MemoryOutputArchive,
    ViewInputArchive,
};
pub use binary::{as_binary, Binary};
pub use codec::{Codec, Scalar};
pub use error::{PolycodeError, Result};
pub use polymorphic::{as_polymorphic, Polymorphic, PolymorphicRef};
pub use registry::register;
pub use tag::type_tag;

// Re-export the derive macro so it is accessible as `polycode::Codec`.
pub use polycode_derive::Codec;
