use std::{any::TypeId, collections::HashSet, sync::Arc};

use crate::{
    builder::Candidate,
    component::{Lifecycle, SlotRef},
    config::CycleCheck,
    container::InitializedDeps,
    errors::{combine, ConstructError},
    types::{Instance, TypeInfo},
};

/// State of a single construction pass
struct ConstructState {
    cycle_check: CycleCheck,
    /// Types which completed construction
    constructed: HashSet<TypeId>,
    /// Instances whose dependencies are being constructed, innermost last
    visiting: Vec<Instance>,
    initialized: InitializedDeps,
}

impl ConstructState {
    fn new(cycle_check: CycleCheck) -> Self {
        ConstructState {
            cycle_check,
            constructed: HashSet::new(),
            visiting: Vec::new(),
            initialized: InitializedDeps::new(),
        }
    }

    fn finish(&mut self, instance: &Instance) {
        self.constructed.insert(instance.info.type_id);
        self.initialized.insert(instance.clone());
        tracing::debug!("Constructed instance of {}", instance.info.type_name);
    }

    /// Returns the instance `dependency` loops back to, if any
    fn find_loop(&self, current: &Instance, dependency: &Instance) -> Option<TypeInfo> {
        match self.cycle_check {
            CycleCheck::CurrentRoot => dependency.same(current).then_some(current.info),
            CycleCheck::Chain => self
                .visiting
                .iter()
                .find(|visiting| visiting.same(dependency))
                .map(|visiting| visiting.info),
        }
    }
}

/// Constructs all populated candidates, dependencies first
///
/// Candidates are deduplicated by type, the first candidate of a type wins.
/// Every remaining candidate is a root; a failing root does not stop the others.
/// Returns everything that was constructed, and the combined errors of all failed roots.
pub fn construct(
    candidates: &[Candidate],
    cycle_check: CycleCheck,
) -> (InitializedDeps, Result<(), ConstructError>) {
    let roots = dedup(candidates);
    tracing::debug!(
        "Constructing {} distinct types from {} candidates",
        roots.len(),
        candidates.len()
    );

    let mut state = ConstructState::new(cycle_check);
    let mut results = Vec::with_capacity(roots.len());
    for root in roots {
        results.push(construct_recursive(&mut state, root, root));
    }

    (state.initialized, combine(results))
}

/// Keeps the first candidate of every type
fn dedup(candidates: &[Candidate]) -> Vec<&Instance> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|candidate| &candidate.instance)
        .filter(|instance| seen.insert(instance.info.type_id))
        .collect()
}

fn construct_recursive(
    state: &mut ConstructState,
    current: &Instance,
    object: &Instance,
) -> Result<(), ConstructError> {
    if state.constructed.contains(&object.info.type_id) {
        return Ok(());
    }

    let setup = match object.component().lifecycle() {
        Lifecycle::NeedsSetup(setup) => setup,
        Lifecycle::NoSetup => {
            state.finish(object);
            return Ok(());
        }
    };

    state.visiting.push(object.clone());
    let dependencies = construct_dependencies(state, current, object);
    state.visiting.pop();
    dependencies?;

    tracing::debug!("Setting up {}", object.info.type_name);
    setup
        .setup()
        .map_err(|error| ConstructError::SetupFailed {
            product: object.info,
            error: Arc::new(error),
        })?;

    state.finish(object);
    Ok(())
}

fn construct_dependencies(
    state: &mut ConstructState,
    current: &Instance,
    object: &Instance,
) -> Result<(), ConstructError> {
    for SlotRef { field, slot } in object.component().slots() {
        let Some(dependency) = slot.source() else {
            return Err(ConstructError::UnfilledSlot {
                field,
                object: object.info,
            });
        };

        if let Some(looped) = state.find_loop(current, dependency) {
            return Err(ConstructError::DependencyLoop {
                current: looped,
                object: object.info,
            });
        }

        construct_recursive(state, current, dependency)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        component::{Component, Setup, Slot},
        slots,
        types::DynError,
    };

    #[derive(Default)]
    struct Counted {
        setups: AtomicUsize,
    }
    impl Component for Counted {
        fn lifecycle(&self) -> Lifecycle<'_> {
            Lifecycle::NeedsSetup(self)
        }
    }
    impl Setup for Counted {
        fn setup(&self) -> Result<(), DynError> {
            self.setups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Plain;
    impl Component for Plain {}

    struct Unpopulated {
        plain: Slot<Plain>,
    }
    impl Component for Unpopulated {
        fn slots(&self) -> Vec<SlotRef<'_>> {
            slots!(self; plain)
        }
        fn lifecycle(&self) -> Lifecycle<'_> {
            Lifecycle::NeedsSetup(self)
        }
    }
    impl Setup for Unpopulated {
        fn setup(&self) -> Result<(), DynError> {
            Ok(())
        }
    }

    fn candidate(instance: Instance, name: Option<&str>) -> Candidate {
        Candidate {
            instance,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn dedup_keeps_first_candidate_per_type() {
        let first = Instance::new(Arc::new(Plain));
        let second = Instance::new(Arc::new(Plain));
        let candidates = vec![
            candidate(first.clone(), Some("a")),
            candidate(second, None),
            candidate(first.clone(), Some("b")),
        ];

        let roots = dedup(&candidates);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].same(&first));
    }

    #[test]
    fn same_instance_under_several_names_is_set_up_once() {
        let counted = Arc::new(Counted::default());
        let instance = Instance::new(counted.clone());
        let candidates = vec![
            candidate(instance.clone(), Some("a")),
            candidate(instance, Some("b")),
        ];

        let (deps, result) = construct(&candidates, CycleCheck::CurrentRoot);

        assert!(result.is_ok());
        assert_eq!(counted.setups.load(Ordering::SeqCst), 1);
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn empty_slot_is_reported() {
        let candidates = vec![candidate(
            Instance::new(Arc::new(Unpopulated {
                plain: Slot::typed(),
            })),
            None,
        )];

        let (deps, result) = construct(&candidates, CycleCheck::CurrentRoot);

        assert!(matches!(
            result,
            Err(ConstructError::UnfilledSlot { field: "plain", .. })
        ));
        assert!(deps.is_empty());
    }

    #[test]
    fn no_candidates_construct_nothing() {
        let (deps, result) = construct(&[], CycleCheck::Chain);

        assert!(result.is_ok());
        assert!(deps.is_empty());
    }
}
