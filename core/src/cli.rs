use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::config::PedometerConfig;
use crate::detector::StepDetector;
use crate::models::{AccelSample, PedometerEvent};

/// Resultat av å spille av en innspilt økt.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub samples: usize,
    pub duration_ms: u64,
    pub simple_steps: u32,
    pub walk_steps: u32,
    pub distance_m: f32,
    pub cadence_spm: Option<f32>, // steg per minutt, None for korte/tomme økter
    pub events: Vec<PedometerEvent>,
}

/// Kjør samples gjennom en fersk detektor.
pub fn replay_samples(samples: &[AccelSample], config: &PedometerConfig) -> StepReport {
    let mut detector = StepDetector::new(config);
    let events = detector.process_batch(samples);

    let duration_ms = match (samples.first(), samples.last()) {
        (Some(a), Some(b)) => b.timestamp_ms.saturating_sub(a.timestamp_ms),
        _ => 0,
    };
    let counts = detector.counts();
    let cadence_spm = if duration_ms > 0 && counts.simple_steps > 0 {
        Some(counts.simple_steps as f32 * 60_000.0 / duration_ms as f32)
    } else {
        None
    };

    StepReport {
        samples: samples.len(),
        duration_ms,
        simple_steps: counts.simple_steps,
        walk_steps: counts.walk_steps,
        distance_m: counts.distance,
        cadence_spm,
        events,
    }
}

/// Les en innspilt økt (JSON-liste av samples).
pub fn load_samples_json(path: impl AsRef<Path>) -> anyhow::Result<Vec<AccelSample>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading samples from {}", path.display()))?;
    let samples: Vec<AccelSample> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing samples in {}", path.display()))?;
    Ok(samples)
}

pub fn print_step_report(report: &StepReport) {
    println!("--- Step Report ---");
    println!("Samples: {} ({:.1} s)", report.samples, report.duration_ms as f32 / 1000.0);
    println!("Simple steps: {}", report.simple_steps);
    println!("Walk steps: {}", report.walk_steps);
    println!("Distance: {:.2} m", report.distance_m);
    match report.cadence_spm {
        Some(c) => println!("Cadence: {:.0} steps/min", c),
        None => println!("Cadence: n/a"),
    }
}
