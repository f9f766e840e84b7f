//! The polymorphic type registry.
//!
//! One table per direction maps serialization ids to thunks and runtime
//! type keys to ids. The save path looks up the id for the concrete type
//! of the object, emits it, and invokes the save thunk; the load path
//! reads the id and invokes the load thunk, which constructs and fills the
//! registered concrete type. Lookups take a shared lock, registration an
//! exclusive one, and thunks always run with no lock held, so nested
//! polymorphic serialization re-enters the registry freely.
//!
//! ## Registration
//!
//! Types register under a stable name whose [`type_tag`] becomes the
//! on-wire id. The usual way is the link-time [`register_types!`] macro,
//! which needs no startup code at all: entries are collected into a
//! distributed slice and folded into the tables the first time any
//! polymorphic value is serialized. [`register`] does the same thing at
//! runtime for dynamically chosen names.
//!
//! Registering the same id or type twice is not an error: the later entry
//! wins and a warning is logged.
//!
//! ```rust
//! use polycode::{register_types, Archive, Codec, MemoryOutputArchive, Polymorphic, Result};
//!
//! #[derive(Default)]
//! struct Circle {
//!     radius: f64,
//! }
//!
//! impl Codec for Circle {
//!     fn serialize<A: Archive>(archive: &mut A, value: &mut Self) -> Result<()> {
//!         archive.apply(&mut value.radius)
//!     }
//! }
//!
//! impl Polymorphic for Circle {}
//!
//! register_types! {
//!     Circle => "shapes::Circle",
//! }
//!
//! fn main() -> Result<()> {
//!     let mut shape: Option<Box<dyn Polymorphic>> = Some(Box::new(Circle { radius: 2.0 }));
//!     let mut data = Vec::new();
//!     MemoryOutputArchive::new(&mut data).apply(&mut shape)?;
//!     assert_eq!(data.len(), 16); // u64 id + f64 radius
//!     Ok(())
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::LazyLock;

use linkme::distributed_slice;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::archive::{LazyOutputArchive, ViewInputArchive};
use crate::codec::Codec;
use crate::error::{PolycodeError, Result};
use crate::polymorphic::Polymorphic;
use crate::tag::type_tag;

/// A save thunk: downcasts to the registered concrete type and encodes it.
pub type SaveThunk = fn(&mut LazyOutputArchive<'_>, &mut dyn Polymorphic) -> Result<()>;

/// A load thunk: constructs the registered concrete type, decodes it and
/// hands it back behind the polymorphic base.
pub type LoadThunk = fn(&mut ViewInputArchive<'_>) -> Result<Box<dyn Polymorphic>>;

/// A link-time registration record for one polymorphic type.
///
/// Produced by [`register_types!`]; not normally written by hand.
pub struct TypeEntry {
    /// The serialization id, derived from [`TypeEntry::name`].
    pub id: u64,
    /// The stable name the id derives from.
    pub name: &'static str,
    /// Produces the runtime type key of the concrete type.
    pub key: fn() -> TypeId,
    /// The saving-archive thunk.
    pub save: SaveThunk,
    /// The loading-archive thunk.
    pub load: LoadThunk,
}

/// All link-time registered polymorphic types.
#[distributed_slice]
pub static POLYMORPHIC_TYPES: [TypeEntry];

// --- Tables ---

struct Table<F> {
    thunk_by_id: HashMap<u64, F>,
    id_by_key: HashMap<TypeId, u64>,
}

impl<F> Table<F> {
    fn add(&mut self, id: u64, key: TypeId, name: &str, thunk: F) {
        if self.thunk_by_id.insert(id, thunk).is_some() {
            warn!(name, id, "duplicate polymorphic registration, keeping the later entry");
        }
        self.id_by_key.insert(key, id);
    }
}

fn seed<F>(thunk_of: impl Fn(&TypeEntry) -> F) -> RwLock<Table<F>> {
    let mut table = Table {
        thunk_by_id: HashMap::new(),
        id_by_key: HashMap::new(),
    };
    for entry in POLYMORPHIC_TYPES.iter() {
        table.add(entry.id, (entry.key)(), entry.name, thunk_of(entry));
    }
    debug!(types = POLYMORPHIC_TYPES.len(), "seeded polymorphic registry");
    RwLock::new(table)
}

static SAVE_TABLE: LazyLock<RwLock<Table<SaveThunk>>> = LazyLock::new(|| seed(|entry| entry.save));
static LOAD_TABLE: LazyLock<RwLock<Table<LoadThunk>>> = LazyLock::new(|| seed(|entry| entry.load));

// --- Serialization entry points ---

/// Emits the tagged encoding of `object`: its registered id, then its body
/// through the save thunk.
pub(crate) fn save(archive: &mut LazyOutputArchive<'_>, object: &mut dyn Polymorphic) -> Result<()> {
    let key = Any::type_id(&*object);

    let (mut id, thunk) = {
        let table = SAVE_TABLE.read();
        let Some(id) = table.id_by_key.get(&key).copied() else {
            return Err(undeclared(object.type_name()));
        };
        let Some(thunk) = table.thunk_by_id.get(&id).copied() else {
            return Err(undeclared(object.type_name()));
        };
        (id, thunk)
    };

    u64::serialize(archive, &mut id)?;
    thunk(archive, object)
}

/// Reads the leading id and reconstructs the registered concrete type
/// through the load thunk.
pub(crate) fn load(archive: &mut ViewInputArchive<'_>) -> Result<Box<dyn Polymorphic>> {
    let mut id = 0u64;
    u64::serialize(archive, &mut id)?;

    let thunk = {
        let table = LOAD_TABLE.read();
        let Some(thunk) = table.thunk_by_id.get(&id).copied() else {
            return Err(PolycodeError::UndeclaredType(format!(
                "no polymorphic type registered for id {id:#018x}"
            )));
        };
        thunk
    };

    thunk(archive)
}

fn undeclared(type_name: &str) -> PolycodeError {
    PolycodeError::UndeclaredType(format!("type `{type_name}` was never registered"))
}

// --- Registration ---

/// Registers `T` under `name` at runtime.
///
/// The link-time [`register_types!`] macro is preferable when the set of
/// types is known statically; this function covers plugins and other
/// late-bound cases. Re-registering replaces the previous entry.
pub fn register<T>(name: &str)
where
    T: Polymorphic + Codec + Default,
{
    let id = type_tag(name);
    SAVE_TABLE.write().add(id, TypeId::of::<T>(), name, save_thunk::<T>);
    LOAD_TABLE.write().add(id, TypeId::of::<T>(), name, load_thunk::<T>);
}

#[doc(hidden)]
pub fn type_key<T: Any>() -> TypeId {
    TypeId::of::<T>()
}

#[doc(hidden)]
pub fn save_thunk<T: Polymorphic + Codec>(
    archive: &mut LazyOutputArchive<'_>,
    object: &mut dyn Polymorphic,
) -> Result<()> {
    let any = object as &mut dyn Any;
    match any.downcast_mut::<T>() {
        Some(object) => T::serialize(archive, object),
        None => Err(PolycodeError::Internal(format!(
            "save thunk for `{}` invoked with a different concrete type",
            std::any::type_name::<T>()
        ))),
    }
}

#[doc(hidden)]
pub fn load_thunk<T: Polymorphic + Codec + Default>(
    archive: &mut ViewInputArchive<'_>,
) -> Result<Box<dyn Polymorphic>> {
    let mut object = T::default();
    T::serialize(archive, &mut object)?;
    Ok(Box::new(object))
}

/// Registers polymorphic types under their stable names at link time.
///
/// Each entry maps a type to the name its on-wire id derives from. The
/// expansion is a set of static registration records; nothing runs at
/// startup and registration itself cannot fail. A type missing from the
/// registry surfaces later as an undeclared-type error when it is first
/// serialized, never as an aborted program.
///
/// ```rust,ignore
/// register_types! {
///     Person => "v1::Person",
///     Student => "v1::Student",
/// }
/// ```
#[macro_export]
macro_rules! register_types {
    ($($ty:ident => $name:literal),+ $(,)?) => {
        $crate::internal::paste::paste! {
            $(
                #[allow(non_upper_case_globals)]
                #[$crate::internal::linkme::distributed_slice($crate::registry::POLYMORPHIC_TYPES)]
                #[linkme(crate = $crate::internal::linkme)]
                static [<POLYCODE_TYPE_ $ty>]: $crate::registry::TypeEntry =
                    $crate::registry::TypeEntry {
                        id: $crate::type_tag($name),
                        name: $name,
                        key: $crate::registry::type_key::<$ty>,
                        save: $crate::registry::save_thunk::<$ty>,
                        load: $crate::registry::load_thunk::<$ty>,
                    };
            )+
        }
    };
}
