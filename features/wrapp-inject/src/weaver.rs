use crate::{
    builder::DependencyMap,
    config::WeaveConfig,
    constructor::construct,
    container::InitializedDeps,
    dependency_graph::DependencyGraph,
    errors::WeaveError,
};

/// Runs a weave: candidates -> population -> construction
pub(crate) struct Weaver {
    config: WeaveConfig,
}

impl Weaver {
    pub(crate) fn new(config: WeaveConfig) -> Weaver {
        Weaver { config }
    }

    pub(crate) fn weave(self, blueprint: DependencyMap) -> Result<InitializedDeps, WeaveError> {
        let candidates = blueprint.candidates();
        tracing::debug!(
            "Weaving {} providers as {} candidates",
            blueprint.len(),
            candidates.len()
        );

        // Build and populate graph
        let mut graph = DependencyGraph::new();
        graph.provide(candidates).map_err(|error| {
            tracing::error!("Failed to register providers: {error}");
            WeaveError::DependencyGraph(error.into())
        })?;

        graph.populate().map_err(|errors| {
            tracing::error!("Failed to populate {} slots", errors.errors.len());
            WeaveError::DependencyGraph(errors)
        })?;
        tracing::debug!("All slots populated");

        // Construct everything, dependencies first
        let (initialized, result) = construct(graph.candidates(), self.config.cycle_check);
        if let Err(error) = result {
            tracing::error!("Construction failed: {error}");
            return Err(error.into());
        }

        tracing::debug!("Weaving completed with {} types", initialized.len());
        Ok(initialized)
    }
}
