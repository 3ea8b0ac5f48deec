pub mod cli;
pub mod clock;
pub mod config;
pub mod detector;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;
pub mod pedometer;
pub mod registry;
pub mod smoothing;
pub mod storage;

#[cfg(feature = "python")]
mod py;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PedometerConfig;
pub use detector::StepDetector;
pub use error::{PedometerError, Result};
pub use events::ListenerId;
pub use models::{AccelSample, PedometerEvent, SensorType, StepCounts};
pub use pedometer::Pedometer;
pub use registry::{pedometers, Registry, SessionId};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StoredValue};
