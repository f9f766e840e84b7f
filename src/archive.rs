//! The archives: direction-tagged entry points over byte buffers.
//!
//! An archive binds one direction (saving or loading) to one buffer for its
//! lifetime and exposes `apply`, which routes each value through its
//! [`Codec`] implementation. Four archive types cover the built-in set:
//!
//! - [`MemoryOutputArchive`]: saves into a caller-owned `Vec<u8>`,
//!   truncating the vector to the bytes actually written on every exit
//!   path of `apply`.
//! - [`LazyOutputArchive`]: the appending archive backing it, which defers
//!   that truncation. User serializers run against this type during a
//!   save; it is public for wrappers that manage commits themselves.
//! - [`ViewInputArchive`]: loads from a borrowed byte slice, advancing a
//!   cursor.
//! - [`MemoryInputArchive`]: loads from a caller-owned `Vec<u8>`, draining
//!   the consumed prefix from the vector on every exit path of `apply`.
//!
//! Values applied in one call are encoded in argument order, back to back,
//! with no framing between them. Scalars travel as their native in-memory
//! bytes; the wire is therefore host-endian, trading portability across
//! architectures for copy speed. A byte-order-normalizing archive can be
//! layered on top of [`Archive::write_bytes`] / [`Archive::read_bytes`] if
//! cross-architecture streams are ever needed.

use crate::buffer::{ByteSink, ByteSource};
use crate::codec::Codec;
use crate::error::{PolycodeError, Result};
use crate::polymorphic::Polymorphic;
use crate::registry;

/// The direction of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// The archive encodes values into a byte sink.
    Saving,
    /// The archive decodes values from a byte source.
    Loading,
}

/// The common surface of the saving and loading archives.
///
/// `Codec` implementations are generic over this trait; the associated
/// [`KIND`](Archive::KIND) constant tells a bidirectional implementation
/// which side it is running on, and the byte-level methods are the
/// primitive codec underneath everything else.
pub trait Archive: Sized {
    /// Whether this archive saves or loads.
    const KIND: ArchiveKind;

    /// Appends raw bytes to the stream. Fails on loading archives.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Fills `bytes` from the stream. Fails on saving archives.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;

    /// Serializes one value through its [`Codec`] implementation.
    ///
    /// This is also the composition point: a user serializer calling
    /// `archive.apply(&mut field)` extends the same stream in place.
    fn apply<T: Codec>(&mut self, value: &mut T) -> Result<()> {
        T::serialize(self, value)
    }

    /// Emits the tagged encoding of a polymorphic object.
    #[doc(hidden)]
    fn save_polymorphic(&mut self, object: &mut dyn Polymorphic) -> Result<()>;

    /// Reconstructs a polymorphic object from its tagged encoding.
    #[doc(hidden)]
    fn load_polymorphic(&mut self) -> Result<Box<dyn Polymorphic>>;
}

// --- Saving ---

/// The appending saving archive.
///
/// Writes grow the output vector in amortized steps and leave slack bytes
/// past the logical size; [`MemoryOutputArchive`] trims that slack after
/// every top-level `apply`. Nested serializers compose on this type
/// without triggering intermediate truncations.
#[derive(Debug)]
pub struct LazyOutputArchive<'a> {
    sink: ByteSink<'a>,
}

impl<'a> LazyOutputArchive<'a> {
    /// Creates a saving archive appending to `output`.
    pub fn new(output: &'a mut Vec<u8>) -> Self {
        Self {
            sink: ByteSink::new(output),
        }
    }

    /// Truncates the output vector to the bytes actually written.
    pub fn commit(&mut self) {
        self.sink.commit();
    }
}

impl Archive for LazyOutputArchive<'_> {
    const KIND: ArchiveKind = ArchiveKind::Saving;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write(bytes);
        Ok(())
    }

    fn read_bytes(&mut self, _bytes: &mut [u8]) -> Result<()> {
        Err(PolycodeError::Internal(
            "attempted to read from a saving archive".into(),
        ))
    }

    fn save_polymorphic(&mut self, object: &mut dyn Polymorphic) -> Result<()> {
        registry::save(self, object)
    }

    fn load_polymorphic(&mut self) -> Result<Box<dyn Polymorphic>> {
        Err(PolycodeError::Internal(
            "attempted a polymorphic load on a saving archive".into(),
        ))
    }
}

/// The user-facing saving archive over a caller-owned `Vec<u8>`.
///
/// Each `apply` call appends the encodings of its value after the vector's
/// existing content and then truncates the vector to exactly the bytes
/// written, on the success and failure paths alike. The vector therefore
/// never holds filler bytes between calls, and after a failure it still
/// contains everything encoded before the failing value.
///
/// ## Examples
///
/// ```rust
/// use polycode::{MemoryOutputArchive, Result};
///
/// fn main() -> Result<()> {
///     let mut data = Vec::new();
///     let mut out = MemoryOutputArchive::new(&mut data);
///     out.apply(&mut 1337_i32)?;
///     out.apply(&mut 1338_i32)?;
///     assert_eq!(data.len(), 8);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MemoryOutputArchive<'a> {
    inner: LazyOutputArchive<'a>,
}

impl<'a> MemoryOutputArchive<'a> {
    /// Creates a saving archive appending to `output`.
    pub fn new(output: &'a mut Vec<u8>) -> Self {
        Self {
            inner: LazyOutputArchive::new(output),
        }
    }

    /// Saves one value, committing the output vector on every exit path.
    pub fn apply<T: Codec>(&mut self, value: &mut T) -> Result<()> {
        let result = self.inner.apply(value);
        self.inner.commit();
        result
    }
}

// --- Loading ---

/// The loading archive over a borrowed byte range.
///
/// Maintains a read offset into the slice; each decoded value advances it.
/// Reading past the end fails with [`PolycodeError::OutOfRange`].
#[derive(Debug)]
pub struct ViewInputArchive<'a> {
    source: ByteSource<'a>,
}

impl<'a> ViewInputArchive<'a> {
    /// Creates a loading archive over `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            source: ByteSource::new(input),
        }
    }

    /// Loads one value from the current offset.
    pub fn apply<T: Codec>(&mut self, value: &mut T) -> Result<()> {
        T::serialize(self, value)
    }

    /// Returns the number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.source.offset()
    }

    /// Rewinds the archive to the start of the input.
    pub fn reset(&mut self) {
        self.source.reset();
    }
}

impl Archive for ViewInputArchive<'_> {
    const KIND: ArchiveKind = ArchiveKind::Loading;

    fn write_bytes(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(PolycodeError::Internal(
            "attempted to write to a loading archive".into(),
        ))
    }

    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.source.read(bytes)
    }

    fn save_polymorphic(&mut self, _object: &mut dyn Polymorphic) -> Result<()> {
        Err(PolycodeError::Internal(
            "attempted a polymorphic save on a loading archive".into(),
        ))
    }

    fn load_polymorphic(&mut self) -> Result<Box<dyn Polymorphic>> {
        registry::load(self)
    }
}

/// The consuming loading archive over a caller-owned `Vec<u8>`.
///
/// Each `apply` decodes from the front of the vector and then removes
/// exactly the consumed bytes from it, on success and failure alike. A
/// vector filled by a [`MemoryOutputArchive`] can therefore be drained
/// value by value, and after a failed call it still holds the bytes the
/// failing decode did not get to.
///
/// ## Examples
///
/// ```rust
/// use polycode::{MemoryInputArchive, MemoryOutputArchive, Result};
///
/// fn main() -> Result<()> {
///     let mut data = Vec::new();
///     MemoryOutputArchive::new(&mut data).apply(&mut String::from("hello"))?;
///
///     let mut text = String::new();
///     MemoryInputArchive::new(&mut data).apply(&mut text)?;
///     assert_eq!(text, "hello");
///     assert!(data.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MemoryInputArchive<'a> {
    input: &'a mut Vec<u8>,
}

impl<'a> MemoryInputArchive<'a> {
    /// Creates a consuming loading archive over `input`.
    pub fn new(input: &'a mut Vec<u8>) -> Self {
        Self { input }
    }

    /// Loads one value, draining the consumed prefix on every exit path.
    pub fn apply<T: Codec>(&mut self, value: &mut T) -> Result<()> {
        let mut view = ViewInputArchive::new(self.input.as_slice());
        let result = view.apply(value);
        let consumed = view.offset();
        self.input.drain(..consumed);
        result
    }
}

/// Serializes several values in argument order through one archive.
///
/// Expands to consecutive `apply` calls and stops at the first failure.
/// Works with any of the archive types.
///
/// ## Examples
///
/// ```rust
/// use polycode::{apply, MemoryInputArchive, MemoryOutputArchive, Result};
///
/// fn main() -> Result<()> {
///     let mut data = Vec::new();
///     let mut out = MemoryOutputArchive::new(&mut data);
///     apply!(out, &mut 1337_i32, &mut 1338_i32)?;
///
///     let (mut x, mut y) = (0_i32, 0_i32);
///     let mut input = MemoryInputArchive::new(&mut data);
///     apply!(input, &mut x, &mut y)?;
///     assert_eq!((x, y), (1337, 1338));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! apply {
    ($archive:expr, $($value:expr),+ $(,)?) => {'__apply: {
        let archive = &mut $archive;
        $(
            if let ::core::result::Result::Err(error) = archive.apply($value) {
                break '__apply ::core::result::Result::Err(error);
            }
        )+
        ::core::result::Result::Ok(())
    }};
}
