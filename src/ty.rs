//! Type information on payload types
//!
//! The [`TypeRegistry`] holds a descriptor for every type that has passed
//! through an [`Optional`], so we can report names in error messages and
//! answer [`Optional::value_type`] queries.
//!
//! Shape resolution is recursive through the [`Describe`] trait: leaf types
//! resolve to [`TypeShape::Value`], while the two wrapper types resolve to
//! their dedicated shapes and are thereby recognizable as disallowed
//! payloads at run time.

use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use log::trace;

use crate::optional::Optional;

/// The shape of a type, as far as [`Optional`] is concerned.
///
/// This is the closed set of wrapper shapes the crate distinguishes. A
/// wrapper shape can never be a payload: it would introduce a second
/// representation of absence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeShape {
    /// A plain value with no wrapper semantics
    Value,

    /// `Optional<T>`
    Optional(TypeId),

    /// `std::option::Option<T>`
    NativeOption(TypeId),
}

impl TypeShape {
    /// Whether this shape is one of the disallowed wrappers.
    pub fn is_wrapper(&self) -> bool {
        !matches!(self, TypeShape::Value)
    }
}

/// A description of a single type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ty {
    /// The name of the type in Rust, mostly for diagnostic purposes
    pub rust_name: &'static str,

    /// The memory alignment of the type in bytes
    pub alignment: usize,

    /// The size of the type in bytes
    pub size: usize,

    /// The [`TypeId`] corresponding to this type
    pub type_id: TypeId,

    /// The shape of the type
    pub shape: TypeShape,
}

impl Ty {
    fn new<T: 'static>(shape: TypeShape) -> Self {
        Self {
            rust_name: type_name::<T>(),
            alignment: std::mem::align_of::<T>(),
            size: std::mem::size_of::<T>(),
            type_id: TypeId::of::<T>(),
            shape,
        }
    }

    /// The short display name of the type.
    ///
    /// [`Ty::rust_name`] is a full path with possibly some generics.
    /// Neither is useful in a message, so we split at the first `<` (if
    /// any) and take the first part, then split at the last `::` and take
    /// the last part.
    pub fn short_name(&self) -> &'static str {
        let name = match self.rust_name.split_once('<') {
            Some((first, _)) => first,
            None => self.rust_name,
        };
        match name.rsplit_once("::") {
            Some((_, last)) => last,
            None => name,
        }
    }
}

pub static GLOBAL_TYPE_REGISTRY: LazyLock<Mutex<TypeRegistry>> =
    LazyLock::new(|| Mutex::new(TypeRegistry::default()));

/// A map from [`TypeId`] to a [`Ty`], which is a description of the type
#[derive(Default)]
pub struct TypeRegistry {
    map: HashMap<TypeId, Ty>,
}

impl TypeRegistry {
    pub fn store<T: 'static>(&mut self, shape: TypeShape) -> Ty {
        let ty = Ty::new::<T>(shape);
        trace!("storing type descriptor for `{}`", ty.rust_name);
        self.map.entry(ty.type_id).or_insert(ty).clone()
    }

    pub fn get(&self, id: TypeId) -> Option<&Ty> {
        self.map.get(&id)
    }

    /// Resolve a type implementing [`Describe`]
    pub fn resolve<T: Describe>(&mut self) -> Ty {
        T::describe(self)
    }
}

/// Resolve the descriptor for `T` through the global registry.
pub(crate) fn resolve<T: Describe>() -> Ty {
    GLOBAL_TYPE_REGISTRY.lock().unwrap().resolve::<T>()
}

/// A type that can describe its shape to a [`TypeRegistry`].
///
/// Resolution is recursive for the wrapper types, so that the registry ends
/// up holding an entry for the wrapped type as well. Leaf impls are
/// provided for the standard payload types and generated by
/// `#[derive(Payload)]` for user types.
pub trait Describe: 'static {
    /// Put information about this type into the registry
    ///
    /// The information is also returned for direct use.
    fn describe(registry: &mut TypeRegistry) -> Ty;
}

impl<T: Describe> Describe for Option<T> {
    fn describe(registry: &mut TypeRegistry) -> Ty {
        let inner = T::describe(registry).type_id;

        registry.store::<Self>(TypeShape::NativeOption(inner))
    }
}

impl<T: Describe> Describe for Optional<T> {
    fn describe(registry: &mut TypeRegistry) -> Ty {
        let inner = T::describe(registry).type_id;

        registry.store::<Self>(TypeShape::Optional(inner))
    }
}
