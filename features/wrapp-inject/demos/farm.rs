use std::sync::{Arc, OnceLock};

use tracing_subscriber::EnvFilter;
use wrapp_inject::{
    slots, Component, DependencyMap, DynError, Lifecycle, Provider, Setup, Slot, SlotRef,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let master = Arc::new(Master {
        logger: Slot::named("logger"),
        food: Slot::named("master.food"),
        transport: Slot::named("master.transport"),
    });

    let deps = DependencyMap::new()
        .provide_named(
            Provider::new(Arc::new(StdoutLogger)).export::<dyn Logger>(|it| it),
            ["logger"],
        )
        .provide_named(
            Provider::new(Arc::new(Driver {
                logger: Slot::named("logger"),
                plane: OnceLock::new(),
            }))
            .export::<dyn Transport>(|it| it),
            ["master.transport"],
        )
        .provide_named(
            Provider::new(Arc::new(Farmer {
                logger: Slot::named("logger"),
                machine: Slot::named("tillage.machine"),
            }))
            .export::<dyn Food>(|it| it),
            ["master.food"],
        )
        .provide_named(
            Provider::new(Arc::new(TillageMachine {
                logger: Slot::named("logger"),
            }))
            .export::<dyn Machine>(|it| it),
            ["tillage.machine"],
        )
        .provide(master.clone())
        .weave();

    let deps = match deps {
        Ok(deps) => deps,
        Err(e) => {
            eprintln!("Weaving failed: {e}");
            return;
        }
    };
    println!("{:?}", deps);

    master.food.get_rice();
    master.transport.fly("C++", "Rust");

    match deps.require::<Farmer>() {
        Ok(farmer) => {
            if let Err(e) = farmer.machine.run(5) {
                eprintln!("{e}");
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}

trait Logger: Send + Sync {
    fn log(&self, line: &str);
}

trait Food: Send + Sync {
    fn get_rice(&self);
}

trait Machine: Send + Sync {
    fn run(&self, hours: u32) -> Result<(), DynError>;
}

trait Transport: Send + Sync {
    fn fly(&self, src: &str, dst: &str);
}

struct StdoutLogger;
impl Logger for StdoutLogger {
    fn log(&self, line: &str) {
        println!("{line}");
    }
}
impl Component for StdoutLogger {}

struct Master {
    logger: Slot<dyn Logger>,
    food: Slot<dyn Food>,
    transport: Slot<dyn Transport>,
}
impl Component for Master {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger, food, transport)
    }
}

struct Farmer {
    logger: Slot<dyn Logger>,
    machine: Slot<dyn Machine>,
}
impl Food for Farmer {
    fn get_rice(&self) {
        if self.machine.run(3).is_err() {
            self.logger.log("Machine breaks, no rice");
            return;
        }
        self.logger.log("Got rice");
    }
}
impl Component for Farmer {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger, machine)
    }
}

struct TillageMachine {
    logger: Slot<dyn Logger>,
}
impl Machine for TillageMachine {
    fn run(&self, hours: u32) -> Result<(), DynError> {
        self.logger.log(&format!("Tillage {hours} hours"));
        Ok(())
    }
}
impl Component for TillageMachine {
    fn slots(&self) -> Vec<SlotRef<'_>> {
        slots!(self; logger)
    }
}

struct Driver {
    logger: Slot<dyn Logger>,
    plane: OnceLock<String>,
}
impl Transport for Driver {
    fn fly(&self, src: &str, dst: &str) {
        let plane = self.plane.get().map(String::as_str).unwrap_or("nothing");
        self.logger.log(&format!("{plane} Fly from {src} to {dst}"));
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
