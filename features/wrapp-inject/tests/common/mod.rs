#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, OnceLock,
};

use wrapp_inject::{
    slots, Component, DependencyMap, DynError, Lifecycle, Provider, Setup, Slot, SlotRef,
};

// --- Setup recording ---

/// Shared log of setup calls, in call order
#[derive(Clone, Default)]
pub struct SetupLog(Arc<Mutex<Vec<&'static str>>>);

impl SetupLog {
    pub fn record(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.entries().iter().filter(|entry| **entry == name).count()
    }

    /// Position of the first setup of `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries().iter().position(|entry| *entry == name)
    }
}

/// Declares a component type with typed slots, which records its setup and can be made to fail.
///
/// ```ignore
/// node!(A, b: B, c: C);
/// let a = Arc::new(A::new(&log).failing("a broke"));
/// ```
macro_rules! node {
    ($name:ident $(, $field:ident : $dep:ty)* $(,)?) => {
        pub struct $name {
            log: $crate::common::SetupLog,
            fail: Option<&'static str>,
            $(pub $field: wrapp_inject::Slot<$dep>,)*
        }

        impl $name {
            pub fn new(log: &$crate::common::SetupLog) -> Self {
                $name {
                    log: log.clone(),
                    fail: None,
                    $($field: wrapp_inject::Slot::typed(),)*
                }
            }

            pub fn failing(mut self, message: &'static str) -> Self {
                self.fail = Some(message);
                self
            }
        }

        impl wrapp_inject::Component for $name {
            fn slots(&self) -> Vec<wrapp_inject::SlotRef<'_>> {
                wrapp_inject::slots!(self; $($field),*)
            }

            fn lifecycle(&self) -> wrapp_inject::Lifecycle<'_> {
                wrapp_inject::Lifecycle::NeedsSetup(self)
            }
        }

        impl wrapp_inject::Setup for $name {
            fn setup(&self) -> Result<(), wrapp_inject::DynError> {
                self.log.record(stringify!($name));
                match self.fail {
                    Some(message) => Err(message.into()),
                    None => Ok(()),
                }
            }
        }
    };
}

// --- Farm fixtures ---

pub trait Logger: Send + Sync {
    fn log(&self, line: String);
}

pub trait Machine: Send + Sync {
    fn run(&self, hours: u32) -> Result<(), DynError>;
}

pub trait Food: Send + Sync {
    fn get_rice(&self);
}

pub trait Transport: Send + Sync {
    fn fly(&self, src: &str, dst: &str);
}

/// Logger keeping all lines in memory
#[derive(Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}
impl MemoryLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}
impl Logger for MemoryLogger {
    fn log(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}
impl Component for MemoryLogger {}

pub struct TillageMachine {
    pub logger: Slot<dyn Logger>,
    pub setups: AtomicUsize,
}
impl Default for TillageMachine {
    fn default() -> Self {
        TillageMachine {
            logger: Slot::named("logger"),
            setups: AtomicUsize::new(0),
        }
    }
}
impl Machine for TillageMachine {
    fn run(&self, hours: u32) -> Result<(), DynError> {
        if self.setups.load(Ordering::SeqCst) == 0 {
            return Err("machine was not set up".into());
        }
        self.logger.log(format!("Tillage {hours} hours"));
        Ok(())
    }
}
impl Component for TillageMachine {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger)
    }

    fn lifecycle(&self) -> Lifecycle<'_> {
        Lifecycle::NeedsSetup(self)
    }
}
impl Setup for TillageMachine {
    fn setup(&self) -> Result<(), DynError> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Farmer {
    pub logger: Slot<dyn Logger>,
    pub machine: Slot<dyn Machine>,
}
impl Default for Farmer {
    fn default() -> Self {
        Farmer {
            logger: Slot::named("logger"),
            machine: Slot::named("tillage.machine"),
        }
    }
}
impl Food for Farmer {
    fn get_rice(&self) {
        if self.machine.run(3).is_err() {
            self.logger.log("Machine breaks, no rice".to_string());
            return;
        }
        self.logger.log("Got rice".to_string());
    }
}
impl Component for Farmer {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger, machine)
    }
}

pub struct Driver {
    pub logger: Slot<dyn Logger>,
    pub plane: OnceLock<String>,
}
impl Default for Driver {
    fn default() -> Self {
        Driver {
            logger: Slot::named("logger"),
            plane: OnceLock::new(),
        }
    }
}
impl Transport for Driver {
    fn fly(&self, src: &str, dst: &str) {
        let plane = self.plane.get().map(String::as_str).unwrap_or("nothing");
        self.logger.log(format!("{plane} Fly from {src} to {dst}"));
    }
}
impl Component for Driver {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger)
    }

    fn lifecycle(&self) -> Lifecycle<'_> {
        Lifecycle::NeedsSetup(self)
    }
}
impl Setup for Driver {
    fn setup(&self) -> Result<(), DynError> {
        self.plane
            .set("Boeing787".to_string())
            .map_err(|_| "driver was set up twice")?;
        Ok(())
    }
}

pub struct Master {
    pub logger: Slot<dyn Logger>,
    pub food: Slot<dyn Food>,
    pub transport: Slot<dyn Transport>,
}
impl Default for Master {
    fn default() -> Self {
        Master {
            logger: Slot::named("logger"),
            food: Slot::named("master.food"),
            transport: Slot::named("master.transport"),
        }
    }
}
impl Component for Master {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger, food, transport)
    }
}

/// Handles to every provider of the farm
pub struct Farm {
    pub logger: Arc<MemoryLogger>,
    pub machine: Arc<TillageMachine>,
    pub farmer: Arc<Farmer>,
    pub driver: Arc<Driver>,
    pub master: Arc<Master>,
}

impl Farm {
    pub fn new() -> Self {
        Farm {
            logger: Arc::new(MemoryLogger::default()),
            machine: Arc::new(TillageMachine::default()),
            farmer: Arc::new(Farmer::default()),
            driver: Arc::new(Driver::default()),
            master: Arc::new(Master::default()),
        }
    }

    /// Registers every provider under the names its consumers use
    pub fn dependency_map(&self) -> DependencyMap {
        DependencyMap::new()
            .provide_named(
                Provider::new(self.logger.clone()).export::<dyn Logger>(|it| it),
                ["logger"],
            )
            .provide_named(
                Provider::new(self.driver.clone()).export::<dyn Transport>(|it| it),
                ["master.transport"],
            )
            .provide_named(
                Provider::new(self.farmer.clone()).export::<dyn Food>(|it| it),
                ["master.food"],
            )
            .provide_named(
                Provider::new(self.machine.clone()).export::<dyn Machine>(|it| it),
                ["tillage.machine"],
            )
            .provide(self.master.clone())
    }
}
