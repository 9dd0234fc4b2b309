use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
};

use thiserror::Error;

use crate::{
    builder::Candidate,
    component::{SlotKey, SlotRef},
    types::{Instance, TypeInfo},
};

/// Registry of all candidates
/// Used to fill the slots of every provider with exactly one other provider
pub struct DependencyGraph {
    candidates: Vec<Candidate>,
    /// Named candidates, index into `candidates`
    named: HashMap<String, usize>,
    /// Anonymous candidates by concrete type, index into `candidates`
    unnamed: HashMap<TypeId, usize>,
}
impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            named: HashMap::new(),
            unnamed: HashMap::new(),
        }
    }

    /// Registers candidates
    ///
    /// Fails if a name is taken by another instance, or if two different instances of a type are anonymous
    pub fn provide(
        &mut self,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> Result<(), DependencyGraphError> {
        for candidate in candidates {
            self.add(candidate)?;
        }
        Ok(())
    }

    pub fn add(&mut self, candidate: Candidate) -> Result<(), DependencyGraphError> {
        let index = self.candidates.len();
        let instance = &candidate.instance;

        match &candidate.name {
            Some(name) => {
                if let Some(&existing) = self.named.get(name) {
                    if !self.candidates[existing].instance.same(instance) {
                        return Err(DependencyGraphError::DuplicateName {
                            name: name.clone(),
                            existing: self.candidates[existing].instance.info,
                            provided: instance.info,
                        });
                    }
                    return Ok(());
                }
                self.named.insert(name.clone(), index);
            }
            None => {
                if let Some(&existing) = self.unnamed.get(&instance.info.type_id) {
                    if !self.candidates[existing].instance.same(instance) {
                        return Err(DependencyGraphError::DuplicateUnnamed(instance.info));
                    }
                    return Ok(());
                }
                self.unnamed.insert(instance.info.type_id, index);
            }
        }

        self.candidates.push(candidate);
        Ok(())
    }

    /// All registered candidates, in registration order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Fills all empty slots of all candidates
    ///
    /// Returns a list of all issues
    pub fn populate(&self) -> Result<(), DependencyGraphErrors> {
        let mut visited = HashSet::new();
        let mut errors = Vec::new();

        for candidate in &self.candidates {
            // An instance may be registered under several names
            if !visited.insert(candidate.instance.addr()) {
                continue;
            }

            let instance = &candidate.instance;
            for slot in instance.component().slots() {
                if slot.slot.source().is_some() {
                    continue;
                }

                if let Err(error) = self.populate_slot(instance, &slot) {
                    errors.push(error);
                }
            }
        }

        if !errors.is_empty() {
            return Err(DependencyGraphErrors { errors });
        }

        Ok(())
    }

    fn populate_slot(
        &self,
        required_by: &Instance,
        slot_ref: &SlotRef<'_>,
    ) -> Result<(), DependencyGraphError> {
        let SlotRef { field, slot } = *slot_ref;

        let provider = match slot.key() {
            SlotKey::Named(name) => {
                let Some(&index) = self.named.get(name) else {
                    return Err(DependencyGraphError::MissingNamed {
                        name: name.clone(),
                        field,
                        required_by: required_by.info,
                    });
                };

                let provider = &self.candidates[index].instance;
                if !slot.accepts(provider) {
                    return Err(DependencyGraphError::NotAssignable {
                        name: name.clone(),
                        provided: provider.info,
                        field,
                        target: slot.target(),
                        required_by: required_by.info,
                    });
                }
                provider
            }
            SlotKey::Typed => {
                let mut matching = self
                    .candidates
                    .iter()
                    .filter(|candidate| candidate.name.is_none())
                    .map(|candidate| &candidate.instance)
                    .filter(|instance| slot.accepts(instance));

                let Some(first) = matching.next() else {
                    return Err(DependencyGraphError::NoAssignable {
                        field,
                        target: slot.target(),
                        required_by: required_by.info,
                    });
                };
                if let Some(second) = matching.next() {
                    return Err(DependencyGraphError::Ambiguous {
                        field,
                        target: slot.target(),
                        required_by: required_by.info,
                        first: first.info,
                        second: second.info,
                    });
                }
                first
            }
        };

        tracing::trace!(
            "Filling '{}.{field}' ({}) with {}",
            required_by.info.type_name,
            slot.key(),
            provider.info.type_name
        );
        if !slot.fill(provider) {
            tracing::trace!("'{}.{field}' was already filled", required_by.info.type_name);
        }

        Ok(())
    }
}

#[derive(Error, Debug, Clone)]
pub enum DependencyGraphError {
    #[error("Provided two instances named '{name}': '{existing}' and '{provided}'")]
    DuplicateName {
        name: String,
        existing: TypeInfo,
        provided: TypeInfo,
    },
    #[error("Provided two unnamed instances of type '{0}'")]
    DuplicateUnnamed(TypeInfo),
    #[error("Did not find an instance named '{name}' required by field '{field}' in '{required_by}'")]
    MissingNamed {
        name: String,
        field: &'static str,
        required_by: TypeInfo,
    },
    #[error("Instance named '{name}' of type '{provided}' is not assignable to field '{field}' ({target}) in '{required_by}'")]
    NotAssignable {
        name: String,
        provided: TypeInfo,
        field: &'static str,
        target: TypeInfo,
        required_by: TypeInfo,
    },
    #[error("Found no assignable instance for field '{field}' ({target}) in '{required_by}'")]
    NoAssignable {
        field: &'static str,
        target: TypeInfo,
        required_by: TypeInfo,
    },
    #[error("Found two assignable instances for field '{field}' ({target}) in '{required_by}': '{first}' and '{second}'")]
    Ambiguous {
        field: &'static str,
        target: TypeInfo,
        required_by: TypeInfo,
        first: TypeInfo,
        second: TypeInfo,
    },
}
impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let [error] = self.errors.as_slice() {
            return write!(f, "{error}");
        }

        let mut display = Vec::new();
        display.push("The dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
impl From<DependencyGraphError> for DependencyGraphErrors {
    fn from(error: DependencyGraphError) -> Self {
        DependencyGraphErrors {
            errors: vec![error],
        }
    }
}
