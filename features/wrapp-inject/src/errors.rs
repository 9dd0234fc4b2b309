use std::sync::Arc;

use thiserror::Error;

use crate::{
    dependency_graph::DependencyGraphErrors,
    types::{DynError, TypeInfo},
};

/// Errors of a whole weave
#[derive(Error, Debug, Clone)]
pub enum WeaveError {
    /// Slots could not be matched to providers
    #[error(transparent)]
    DependencyGraph(#[from] DependencyGraphErrors),
    /// One or more providers failed to construct
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

/// Errors while constructing providers
#[derive(Error, Debug, Clone)]
pub enum ConstructError {
    /// `object` depends on `current`, which is still being constructed
    #[error("Dep loop: curr[{current}], obj[{object}]")]
    DependencyLoop { current: TypeInfo, object: TypeInfo },

    /// Setup of a provider failed - displays the setup error as is
    #[error("{error}")]
    SetupFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },

    /// A slot was never populated
    #[error("Slot '{field}' of '{object}' is empty, was the graph populated?")]
    UnfilledSlot { field: &'static str, object: TypeInfo },

    /// Several independent providers failed
    #[error(transparent)]
    Multiple(#[from] MultiError),
}

/// Multiple errors, displayed joined by `"; "`
#[derive(Error, Debug, Clone)]
pub struct MultiError {
    pub errors: Vec<ConstructError>,
}
impl std::fmt::Display for MultiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Combines results of independent operations
///
/// Succeeds if all succeeded, returns a single error as is, and wraps several in [MultiError].
pub fn combine(
    results: impl IntoIterator<Item = Result<(), ConstructError>>,
) -> Result<(), ConstructError> {
    let mut errors: Vec<_> = results.into_iter().filter_map(Result::err).collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(MultiError { errors }.into()),
    }
}

/// Errors when trying to require a type from the woven dependencies
#[derive(thiserror::Error, Debug, Clone)]
pub enum RequireError {
    /// The required type was not woven
    #[error("The required type '{0}' is not known.")]
    TypeMissing(&'static str),
}
