use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use crate::{
    errors::RequireError,
    types::{Injectable, Instance, TypeInfo},
};

/// All woven instances, one per concrete type
#[derive(Clone, Default)]
pub struct InitializedDeps {
    instances: HashMap<TypeId, Instance>,
    /// Types in the order they finished construction
    order: Vec<TypeInfo>,
}
impl Debug for InitializedDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.order.iter().map(|info| info.type_name))
            .finish()
    }
}

impl InitializedDeps {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a constructed instance, returns false if its type was already recorded
    pub(crate) fn insert(&mut self, instance: Instance) -> bool {
        let info = instance.info;
        if self.instances.contains_key(&info.type_id) {
            return false;
        }

        self.instances.insert(info.type_id, instance);
        self.order.push(info);
        true
    }

    /// Returns the instance of the requested type, if it was woven
    pub fn get<T: Injectable>(&self) -> Option<Arc<T>> {
        self.instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.export::<T>())
    }

    /// Attempts to get the requested type
    pub fn require<T: Injectable>(&self) -> Result<Arc<T>, RequireError> {
        self.get().ok_or(RequireError::TypeMissing(type_name::<T>()))
    }

    /// Type erased access by type id
    pub fn instance(&self, type_id: TypeId) -> Option<&Instance> {
        self.instances.get(&type_id)
    }

    pub fn contains<T: Injectable>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<T>())
    }

    /// Types in the order they were constructed
    ///
    /// A type always comes after the types it depends on, as long as it needs setup.
    pub fn order(&self) -> &[TypeInfo] {
        &self.order
    }

    /// Iterates all instances in construction order
    pub fn iter(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.order
            .iter()
            .filter_map(|info| self.instances.get(&info.type_id))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
