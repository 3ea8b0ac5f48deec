use serde::{Deserialize, Serialize};

/// Én akselerometer-måling (m/s² per akse).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub timestamp_ms: u64, // ms, monoton klokke fra sensoren
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(timestamp_ms: u64, x: f32, y: f32, z: f32) -> Self {
        Self { timestamp_ms, x, y, z }
    }

    /// Kvadrert magnitude (x² + y² + z²). Rotes ikke: terskelen på 40.0
    /// er kalibrert mot denne skalaen.
    #[inline]
    pub fn magnitude_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// Hvilken sensor en hendelse kommer fra. Kun akselerometeret telles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    Accelerometer,
    Other,
}

/// Øyeblikksbilde av tellerne.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepCounts {
    pub simple_steps: u32,
    pub walk_steps: u32,
    pub distance: f32,      // meter, alle steg
    pub walk_distance: f32, // meter, steg i jevn gange
}

/// Hendelser komponenten sender ut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PedometerEvent {
    /// Hvert detekterte steg.
    SimpleStep { simple_steps: u32, distance: f32 },
    /// Steg som er del av jevn, vedvarende gange.
    WalkStep { walk_steps: u32, distance: f32 },
}

impl PedometerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PedometerEvent::SimpleStep { .. } => "SimpleStep",
            PedometerEvent::WalkStep { .. } => "WalkStep",
        }
    }

    pub fn steps(&self) -> u32 {
        match *self {
            PedometerEvent::SimpleStep { simple_steps, .. } => simple_steps,
            PedometerEvent::WalkStep { walk_steps, .. } => walk_steps,
        }
    }

    pub fn distance(&self) -> f32 {
        match *self {
            PedometerEvent::SimpleStep { distance, .. } | PedometerEvent::WalkStep { distance, .. } => {
                distance
            }
        }
    }
}
