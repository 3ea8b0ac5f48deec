use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::{PedometerError, Result};

pub const STRIDE_LENGTH: f32 = 0.73;
pub const STOP_DETECTION_TIMEOUT_MS: u64 = 2000;
pub const WIN_SIZE: usize = 100;
pub const AVG_WINDOW: usize = 10;
pub const PEAK_VALLEY_RANGE: f32 = 40.0;
pub const INTERVAL_VARIATION_MS: u64 = 250;
pub const NUM_INTERVALS: usize = 2;
pub const PREFS_NAME: &str = "PedometerPrefs";

/// Innstillinger for detektor og komponent. Alle felt har default,
/// så en tom JSON `{}` gir fabrikkoppsettet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedometerConfig {
    #[serde(alias = "strideLength")]
    pub stride_length: f32, // meter per steg
    #[serde(alias = "stopDetectionTimeout")]
    pub stop_detection_timeout_ms: u64,
    pub window_size: usize,
    pub average_window: usize,
    pub peak_valley_range: f32,
    pub interval_variation_ms: u64,
    pub num_intervals: usize,
    pub prefs_name: String,
}

impl Default for PedometerConfig {
    fn default() -> Self {
        Self {
            stride_length: STRIDE_LENGTH,
            stop_detection_timeout_ms: STOP_DETECTION_TIMEOUT_MS,
            window_size: WIN_SIZE,
            average_window: AVG_WINDOW,
            peak_valley_range: PEAK_VALLEY_RANGE,
            interval_variation_ms: INTERVAL_VARIATION_MS,
            num_intervals: NUM_INTERVALS,
            prefs_name: PREFS_NAME.to_string(),
        }
    }
}

impl PedometerConfig {
    /// Parse fra JSON-tekst. Feil rapporteres med feltsti (f.eks. `window_size`).
    pub fn from_json_str(s: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(s);
        let cfg: PedometerConfig = spte::deserialize(de).map_err(|e| PedometerError::Config {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Les fra fil. Finnes ikke filen, brukes default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "config {} not found, falling back to defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&contents)?;
        log::info!("config loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 3 {
            return Err(PedometerError::InvalidConfig(format!(
                "window_size must be at least 3, got {}",
                self.window_size
            )));
        }
        if self.average_window == 0 {
            return Err(PedometerError::InvalidConfig(
                "average_window must be non-zero".into(),
            ));
        }
        if self.num_intervals == 0 {
            return Err(PedometerError::InvalidConfig(
                "num_intervals must be non-zero".into(),
            ));
        }
        if !(self.stride_length.is_finite() && self.stride_length > 0.0) {
            return Err(PedometerError::InvalidConfig(format!(
                "stride_length must be positive, got {}",
                self.stride_length
            )));
        }
        Ok(())
    }
}
