use prometheus::{IntCounter, Opts, Registry};

use crate::error::Result;

/// Tellere for prosesserte samples, steg og lagringer.
/// Hver komponent eier sitt eget `Registry`; verten kan samle dem selv.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    samples_total: IntCounter,
    simple_steps_total: IntCounter,
    walk_steps_total: IntCounter,
    saves_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let samples_total = counter(
            &registry,
            "pedometer_samples_total",
            "Accelerometer samples consumed",
        )?;
        let simple_steps_total = counter(
            &registry,
            "pedometer_simple_steps_total",
            "SimpleStep events emitted",
        )?;
        let walk_steps_total = counter(
            &registry,
            "pedometer_walk_steps_total",
            "WalkStep events emitted",
        )?;
        let saves_total = counter(&registry, "pedometer_saves_total", "Successful Save() calls")?;
        Ok(Self {
            registry,
            samples_total,
            simple_steps_total,
            walk_steps_total,
            saves_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn samples_total(&self) -> &IntCounter {
        &self.samples_total
    }

    pub fn simple_steps_total(&self) -> &IntCounter {
        &self.simple_steps_total
    }

    pub fn walk_steps_total(&self) -> &IntCounter {
        &self.walk_steps_total
    }

    pub fn saves_total(&self) -> &IntCounter {
        &self.saves_total
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("samples_total", &self.samples_total.get())
            .field("simple_steps_total", &self.simple_steps_total.get())
            .field("walk_steps_total", &self.walk_steps_total.get())
            .finish()
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter> {
    let c = IntCounter::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}
