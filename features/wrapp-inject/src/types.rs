use std::{
    any::{Any, TypeId},
    fmt::Debug,
    sync::Arc,
};

use crate::component::Component;

/// All errors must be Send + Sync so the woven table can be shared afterwards
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Anything that takes part in injection must be shareable across threads once woven,
/// so it needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// A view of a provider as some type `I` - either the concrete type or a trait object.
///
/// `value` always holds an `Arc<I>`.
pub(crate) struct Export {
    pub info: TypeInfo,
    value: Box<dyn Any + Send + Sync>,
}
impl Export {
    pub(crate) fn new<I: ?Sized + Injectable>(value: Arc<I>) -> Self {
        Export {
            info: TypeInfo::of::<I>(),
            value: Box::new(value),
        }
    }
}

/// Instance of a Provider
///
/// Cloning only clones the handle, all clones point to the same provider.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    component: Arc<dyn Component>,
    exports: Arc<Vec<Export>>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let exports: Vec<_> = self.exports.iter().map(|e| e.info.type_name).collect();
        f.debug_struct("Instance")
            .field("type", &self.info.type_name)
            .field("exports", &exports)
            .finish()
    }
}

impl Instance {
    /// Wraps a provider which only exports its own type
    pub fn new<T: Component>(instance: Arc<T>) -> Self {
        Self::with_exports(instance, Vec::new())
    }

    pub(crate) fn with_exports<T: Component>(instance: Arc<T>, mut exports: Vec<Export>) -> Self {
        exports.insert(0, Export::new(instance.clone()));
        Instance {
            info: TypeInfo::of::<T>(),
            component: instance,
            exports: Arc::new(exports),
        }
    }

    /// The provider as a [Component]
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// Returns the provider viewed as `I`, if it was registered as one
    pub fn export<I: ?Sized + Injectable>(&self) -> Option<Arc<I>> {
        let type_id = TypeId::of::<I>();
        self.exports
            .iter()
            .find(|export| export.info.type_id == type_id)
            .and_then(|export| export.value.downcast_ref::<Arc<I>>())
            .cloned()
    }

    /// Whether the provider can be viewed as the given type
    pub fn exports(&self, type_id: TypeId) -> bool {
        self.exports.iter().any(|export| export.info.type_id == type_id)
    }

    /// Both handles point to the same provider
    pub fn same(&self, other: &Instance) -> bool {
        self.addr() == other.addr()
    }

    pub(crate) fn addr(&self) -> *const () {
        Arc::as_ptr(&self.component) as *const ()
    }
}

impl<T: Component> From<Arc<T>> for Instance {
    fn from(instance: Arc<T>) -> Self {
        Instance::new(instance)
    }
}
