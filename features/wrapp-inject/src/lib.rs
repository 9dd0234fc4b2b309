//! Wrapp Inject wires up a set of existing instances and sets them up in dependency order.
//!
//! Weaving is split into three parts:
//! 1. [DependencyMap]: registers every provider and the names it can be injected as
//! 2. Population: fills every [Slot] of every provider, either by name or by type
//! 3. Construction: calls [Setup] on every provider once, after all of its slots were set up
//!
//! The result is an [InitializedDeps] table holding one instance per type.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use wrapp_inject::{slots, Component, DependencyMap, DynError, Lifecycle, Provider, Setup, Slot, SlotRef};
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct StdoutLogger;
//! impl Logger for StdoutLogger {
//!     fn log(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//! impl Component for StdoutLogger {}
//!
//! struct Driver {
//!     logger: Slot<dyn Logger>,
//!     plane: OnceLock<String>,
//! }
//! impl Component for Driver {
//!     fn slots(&self) -> Vec<SlotRef<'_>> {
//!         slots!(self; logger)
//!     }
//!     fn lifecycle(&self) -> Lifecycle<'_> {
//!         Lifecycle::NeedsSetup(self)
//!     }
//! }
//! impl Setup for Driver {
//!     fn setup(&self) -> Result<(), DynError> {
//!         self.plane.set("Boeing787".to_string()).map_err(|_| "plane already set")?;
//!         self.logger.log("driver ready");
//!         Ok(())
//!     }
//! }
//!
//! let driver = Arc::new(Driver {
//!     logger: Slot::named("logger"),
//!     plane: OnceLock::new(),
//! });
//!
//! let deps = DependencyMap::new()
//!     .provide_named(Provider::new(Arc::new(StdoutLogger)).export::<dyn Logger>(|it| it), ["logger"])
//!     .provide(driver.clone())
//!     .weave()
//!     .unwrap();
//!
//! assert_eq!(deps.len(), 2);
//! assert_eq!(driver.plane.get().map(String::as_str), Some("Boeing787"));
//! ```
//!
//! Wrapp Inject consists of the following components:
//!
//! 1. Builder - the dependency map and its flattening into candidates
//! 2. Dependency Graph - matching slots to providers
//! 3. Constructor - dependency ordered setup with loop detection
//! 4. Container - the resulting table
//! 5. Errors - for all of the above

pub mod builder;
pub mod component;
pub mod config;
pub mod constructor;
pub mod container;
pub mod dependency_graph;
pub mod errors;
mod macros;
pub mod types;
mod weaver;

pub use builder::{Candidate, DependencyMap, Provider};
pub use component::{Component, DynSlot, Lifecycle, Setup, Slot, SlotKey, SlotRef};
pub use config::{CycleCheck, WeaveConfig};
pub use container::InitializedDeps;
pub use errors::{ConstructError, MultiError, RequireError, WeaveError};
pub use types::{DynError, Injectable, Instance, TypeInfo};

/// Populates and constructs all providers of the map, using the default [WeaveConfig]
pub fn weave(dependencies: DependencyMap) -> Result<InitializedDeps, WeaveError> {
    dependencies.weave()
}
