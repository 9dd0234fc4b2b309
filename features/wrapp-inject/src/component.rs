use std::{
    fmt::{Debug, Display},
    ops::Deref,
    sync::{Arc, OnceLock},
};

use crate::types::{DynError, Injectable, Instance, TypeInfo};

/// A provider which can take part in weaving
///
/// Components declare their dependency slots, and optionally a one-time setup.
/// Both default to nothing, so a plain value only needs `impl Component for MyType {}`.
pub trait Component: Injectable {
    /// Returns all dependency slots of the component
    ///
    /// Use [slots!](crate::slots) to build the list from field names.
    fn slots(&self) -> Vec<SlotRef<'_>> {
        Vec::new()
    }

    /// Returns whether the component needs to be set up before it can be used
    fn lifecycle(&self) -> Lifecycle<'_> {
        Lifecycle::NoSetup
    }
}

/// One-time setup of a component
///
/// Called exactly once per woven type, after all of its slots have been set up.
pub trait Setup {
    fn setup(&self) -> Result<(), DynError>;
}

/// Setup capability of a component
pub enum Lifecycle<'a> {
    /// The component has to be set up
    NeedsSetup(&'a dyn Setup),
    /// The component is ready as is
    NoSetup,
}

/// How a slot finds its provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// Filled by the provider registered under this name
    Named(String),
    /// Filled by the only anonymous provider exporting the slot type
    Typed,
}
impl Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotKey::Named(name) => write!(f, "named '{name}'"),
            SlotKey::Typed => f.write_str("typed"),
        }
    }
}

/// A dependency of a component, filled during population
///
/// `T` may be a trait object, in which case only providers exporting `dyn Trait` can fill it.
///
/// ### Panics
///
/// Dereferencing panics if the slot was never filled - which can only happen outside of weaving
pub struct Slot<T: ?Sized + Injectable> {
    key: SlotKey,
    filled: OnceLock<FilledSlot<T>>,
}
struct FilledSlot<T: ?Sized> {
    value: Arc<T>,
    source: Instance,
}

impl<T: ?Sized + Injectable> Slot<T> {
    /// Slot filled by the provider registered under `name`
    pub fn named(name: impl Into<String>) -> Self {
        Slot {
            key: SlotKey::Named(name.into()),
            filled: OnceLock::new(),
        }
    }

    /// Slot filled by the only anonymous provider of `T`
    pub fn typed() -> Self {
        Slot {
            key: SlotKey::Typed,
            filled: OnceLock::new(),
        }
    }

    /// Accesses the injected dependency, `None` before population
    pub fn get(&self) -> Option<&Arc<T>> {
        self.filled.get().map(|filled| &filled.value)
    }
}
impl<T: ?Sized + Injectable> Default for Slot<T> {
    fn default() -> Self {
        Self::typed()
    }
}
impl<T: ?Sized + Injectable> Deref for Slot<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
            .expect("Slot accessed before it was populated")
            .as_ref()
    }
}
impl<T: ?Sized + Injectable> Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = self.filled.get().map(|filled| filled.source.info.type_name);
        f.debug_struct("Slot")
            .field("key", &self.key)
            .field("target", &std::any::type_name::<T>())
            .field("source", &source)
            .finish()
    }
}

/// Type erased view of a [Slot]
pub trait DynSlot {
    fn key(&self) -> &SlotKey;

    /// The type the slot requires
    fn target(&self) -> TypeInfo;

    /// Whether the given instance can fill this slot
    fn accepts(&self, instance: &Instance) -> bool {
        instance.exports(self.target().type_id)
    }

    /// Fills the slot with the given instance
    ///
    /// Returns false if the instance does not export the slot's type,
    /// or if the slot was already filled. A filled slot keeps its first value.
    fn fill(&self, instance: &Instance) -> bool;

    /// The provider the slot was filled with
    fn source(&self) -> Option<&Instance>;
}
impl<T: ?Sized + Injectable> DynSlot for Slot<T> {
    fn key(&self) -> &SlotKey {
        &self.key
    }

    fn target(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn fill(&self, instance: &Instance) -> bool {
        let Some(value) = instance.export::<T>() else {
            return false;
        };

        self.filled
            .set(FilledSlot {
                value,
                source: instance.clone(),
            })
            .is_ok()
    }

    fn source(&self) -> Option<&Instance> {
        self.filled.get().map(|filled| &filled.source)
    }
}

/// A slot of a component together with the name of its field
pub struct SlotRef<'a> {
    pub field: &'static str,
    pub slot: &'a dyn DynSlot,
}
impl<'a> SlotRef<'a> {
    pub fn new(field: &'static str, slot: &'a dyn DynSlot) -> Self {
        SlotRef { field, slot }
    }
}
