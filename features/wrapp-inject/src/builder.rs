use std::sync::Arc;

use crate::{
    component::Component,
    config::WeaveConfig,
    container::InitializedDeps,
    errors::WeaveError,
    types::{Export, Injectable, Instance},
    weaver::Weaver,
};

//////////////////////////////////////////////////////////////////////
//
// Weaving consists of three parts.
// 1. The DependencyMap where one registers all providers and the names they go by
// 2. Population, where every slot gets its provider
// 3. Construction, where every provider is set up after its dependencies

/// A provider together with additional views it should be injectable as
///
/// ```
/// use std::sync::Arc;
/// use wrapp_inject::{Component, Provider};
///
/// trait Greeter: Send + Sync {}
/// struct English;
/// impl Greeter for English {}
/// impl Component for English {}
///
/// let provider = Provider::new(Arc::new(English)).export::<dyn Greeter>(|it| it);
/// ```
pub struct Provider<T: Component> {
    instance: Arc<T>,
    exports: Vec<Export>,
}
impl<T: Component> Provider<T> {
    pub fn new(instance: Arc<T>) -> Self {
        Provider {
            instance,
            exports: Vec::new(),
        }
    }

    /// Makes the provider injectable as `I`, usually a trait object
    pub fn export<I: ?Sized + Injectable>(mut self, cast: impl FnOnce(Arc<T>) -> Arc<I>) -> Self {
        self.exports.push(Export::new(cast(self.instance.clone())));
        self
    }
}
impl<T: Component> From<Provider<T>> for Instance {
    fn from(provider: Provider<T>) -> Self {
        Instance::with_exports(provider.instance, provider.exports)
    }
}

/// One possible provider for a slot
#[derive(Debug, Clone)]
pub struct Candidate {
    pub instance: Instance,
    /// Anonymous candidates are matched by type only
    pub name: Option<String>,
}

struct DependencyMapEntry {
    instance: Instance,
    names: Vec<String>,
}

/// Describes which providers exist and under which names they can be injected
#[derive(Default)]
pub struct DependencyMap {
    entries: Vec<DependencyMapEntry>,
}

impl DependencyMap {
    pub fn new() -> Self {
        DependencyMap {
            entries: Vec::new(),
        }
    }
}
impl DependencyMap {
    /// Registers an anonymous provider, it can only fill typed slots
    pub fn provide(self, instance: impl Into<Instance>) -> Self {
        self.provide_named(instance, Vec::<String>::new())
    }

    /// Registers a provider for every given name
    ///
    /// Providing the same instance again adds the names to the existing registration.
    pub fn provide_named<Name: Into<String>>(
        mut self,
        instance: impl Into<Instance>,
        names: impl IntoIterator<Item = Name>,
    ) -> Self {
        let instance = instance.into();
        let names = names.into_iter().map(Into::<String>::into);

        match self
            .entries
            .iter_mut()
            .find(|entry| entry.instance.same(&instance))
        {
            Some(existing) => existing.names.extend(names),
            None => self.entries.push(DependencyMapEntry {
                instance,
                names: names.collect(),
            }),
        }
        self
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the map into one candidate per name
    ///
    /// A provider without names becomes a single anonymous candidate.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for DependencyMapEntry { instance, names } in &self.entries {
            if names.is_empty() {
                candidates.push(Candidate {
                    instance: instance.clone(),
                    name: None,
                });
            }

            for name in names {
                candidates.push(Candidate {
                    instance: instance.clone(),
                    name: Some(name.clone()),
                });
            }
        }
        candidates
    }

    /// Populates and constructs all providers
    pub fn weave(self) -> Result<InitializedDeps, WeaveError> {
        Weaver::new(WeaveConfig::default()).weave(self)
    }

    pub fn weave_with(self, config: WeaveConfig) -> Result<InitializedDeps, WeaveError> {
        Weaver::new(config).weave(self)
    }
}
