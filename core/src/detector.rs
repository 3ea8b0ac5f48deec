//! Stegdeteksjon: topp/bunn i et glattet magnitude-vindu.
//!
//! Flyt per sample:
//! 1. kvadrert magnitude → glidende snitt (10) → vindu (100) med 3-tap-filter
//! 2. når vinduet er fullt (ARMED) testes midtpunktet for topp/bunn
//! 3. topp − siste bunn > terskel ⇒ steg; jevne intervaller ⇒ også "walk"-steg

use crate::config::PedometerConfig;
use crate::models::{AccelSample, PedometerEvent, StepCounts};
use crate::smoothing::{MovingAverage, SampleWindow};

#[derive(Debug, Clone)]
pub struct StepDetector {
    peak_valley_range: f32,
    interval_variation_ms: u64,
    stop_detection_timeout_ms: u64,
    stride_length: f32,

    // Filtrering
    avg_window: MovingAverage,
    window: SampleWindow,
    start_peaking: bool,

    // Topp/bunn
    found_valley: bool,
    last_valley: f32,

    // Stegtiming
    step_intervals: Vec<u64>,
    interval_pos: usize,
    intervals_recorded: usize,
    step_timestamp: u64, // forrige steg, eller referansen satt av tomgangs-reset
    has_prior_step: bool,
    found_non_step: bool,

    // Tellere
    num_steps_raw: u32,
    num_steps_with_filter: u32,
    total_distance: f32,
    walk_distance: f32,
}

impl StepDetector {
    pub fn new(config: &PedometerConfig) -> Self {
        Self {
            peak_valley_range: config.peak_valley_range,
            interval_variation_ms: config.interval_variation_ms,
            stop_detection_timeout_ms: config.stop_detection_timeout_ms,
            stride_length: config.stride_length,
            avg_window: MovingAverage::new(config.average_window),
            window: SampleWindow::new(config.window_size),
            start_peaking: false,
            found_valley: false,
            last_valley: 0.0,
            step_intervals: vec![0; config.num_intervals.max(1)],
            interval_pos: 0,
            intervals_recorded: 0,
            step_timestamp: 0,
            has_prior_step: false,
            found_non_step: true,
            num_steps_raw: 0,
            num_steps_with_filter: 0,
            total_distance: 0.0,
            walk_distance: 0.0,
        }
    }

    /// Behandle én akselerometer-måling. Returnerer hendelsene den ga,
    /// i rekkefølge (WalkStep før SimpleStep).
    pub fn process_sample(&mut self, sample: &AccelSample) -> Vec<PedometerEvent> {
        self.process_magnitude(sample.timestamp_ms, sample.magnitude_sq())
    }

    /// Som [`StepDetector::process_sample`], men med ferdig kvadrert magnitude.
    pub fn process_magnitude(&mut self, timestamp_ms: u64, magnitude: f32) -> Vec<PedometerEvent> {
        let mut events = Vec::new();
        let mid = self.window.midpoint();

        if self.start_peaking
            && self.found_valley
            && self.window.is_peak(mid)
            && self.window.get(mid) - self.last_valley > self.peak_valley_range
        {
            self.register_step(timestamp_ms, &mut events);
            self.found_valley = false;
        }
        if self.start_peaking && self.window.is_valley(mid) {
            self.found_valley = true;
            self.last_valley = self.window.get(mid);
        }

        self.avg_window.push(magnitude);
        self.window
            .store_smoothed(self.avg_window.average(), self.start_peaking);

        // Lang pause: ikke la den telle som del av takten
        if timestamp_ms.saturating_sub(self.step_timestamp) > self.stop_detection_timeout_ms {
            self.idle_reset(timestamp_ms);
        }

        if !self.start_peaking && self.window.is_last_slot() {
            self.start_peaking = true;
            log::debug!("window filled, peak/valley detection armed");
        }
        self.window.advance();

        events
    }

    /// Ny referanse etter pause. Intervallhistorikken tømmes, så neste steg
    /// har ikke noe forrige steg å måles mot og takten må bygges opp på nytt.
    fn idle_reset(&mut self, timestamp_ms: u64) {
        if self.has_prior_step {
            log::debug!("no step for {} ms, cadence reset", self.stop_detection_timeout_ms);
        }
        self.step_timestamp = timestamp_ms;
        self.has_prior_step = false;
        self.step_intervals.fill(0);
        self.interval_pos = 0;
        self.intervals_recorded = 0;
        self.found_non_step = true;
    }

    /// Behandle en hel serie og samle alle hendelser.
    pub fn process_batch(&mut self, samples: &[AccelSample]) -> Vec<PedometerEvent> {
        let mut events = Vec::new();
        for s in samples {
            events.extend(self.process_sample(s));
        }
        events
    }

    fn register_step(&mut self, timestamp_ms: u64, events: &mut Vec<PedometerEvent>) {
        let n = self.step_intervals.len();
        if self.has_prior_step {
            self.step_intervals[self.interval_pos] =
                timestamp_ms.saturating_sub(self.step_timestamp);
            self.interval_pos = (self.interval_pos + 1) % n;
            self.intervals_recorded += 1;
        }
        self.has_prior_step = true;
        self.step_timestamp = timestamp_ms;

        if self.steps_equally_spaced() {
            if self.found_non_step {
                // Krediter stegene som ble vurdert mens takten ble jevn
                self.num_steps_with_filter += n as u32;
                self.walk_distance += self.stride_length * n as f32;
                self.found_non_step = false;
            }
            self.num_steps_with_filter += 1;
            self.walk_distance += self.stride_length;
            events.push(PedometerEvent::WalkStep {
                walk_steps: self.num_steps_with_filter,
                distance: self.walk_distance,
            });
        } else {
            self.found_non_step = true;
        }

        self.num_steps_raw += 1;
        self.total_distance += self.stride_length;
        events.push(PedometerEvent::SimpleStep {
            simple_steps: self.num_steps_raw,
            distance: self.total_distance,
        });

        log::debug!(
            "step at {} ms: raw={} walk={} intervals={:?}",
            timestamp_ms,
            self.num_steps_raw,
            self.num_steps_with_filter,
            self.step_intervals
        );
    }

    /// Jevn takt: historikken er full av ekte steg-til-steg-intervaller og alle
    /// ligger innenfor toleransen av snittet av de ikke-null intervallene.
    fn steps_equally_spaced(&self) -> bool {
        if self.intervals_recorded < self.step_intervals.len() {
            return false;
        }
        let (sum, num) = self
            .step_intervals
            .iter()
            .filter(|&&i| i > 0)
            .fold((0.0f32, 0usize), |(s, n), &i| (s + i as f32, n + 1));
        if num == 0 {
            return true;
        }
        let avg = sum / num as f32;
        let tolerance = self.interval_variation_ms as f32;
        self.step_intervals
            .iter()
            .all(|&i| (i as f32 - avg).abs() <= tolerance)
    }

    /// Nullstill tellere og distanse. Skrittlengde, timeout og vindu beholdes.
    pub fn reset_counters(&mut self) {
        self.num_steps_raw = 0;
        self.num_steps_with_filter = 0;
        self.total_distance = 0.0;
        self.walk_distance = 0.0;
    }

    /// Gjenopprett tellere fra lagret tilstand. Walk-tellingen starter lik rå-tellingen.
    pub fn restore(&mut self, simple_steps: u32, distance: f32) {
        self.num_steps_raw = simple_steps;
        self.num_steps_with_filter = simple_steps;
        self.total_distance = distance;
        self.walk_distance = distance;
    }

    pub fn counts(&self) -> StepCounts {
        StepCounts {
            simple_steps: self.num_steps_raw,
            walk_steps: self.num_steps_with_filter,
            distance: self.total_distance,
            walk_distance: self.walk_distance,
        }
    }

    pub fn simple_steps(&self) -> u32 {
        self.num_steps_raw
    }

    pub fn walk_steps(&self) -> u32 {
        self.num_steps_with_filter
    }

    pub fn distance(&self) -> f32 {
        self.total_distance
    }

    pub fn stride_length(&self) -> f32 {
        self.stride_length
    }

    pub fn set_stride_length(&mut self, stride_length: f32) {
        self.stride_length = stride_length;
    }

    pub fn stop_detection_timeout(&self) -> u64 {
        self.stop_detection_timeout_ms
    }

    pub fn set_stop_detection_timeout(&mut self, timeout_ms: u64) {
        self.stop_detection_timeout_ms = timeout_ms;
    }

    /// true når vinduet har vært fullt minst én gang.
    pub fn is_armed(&self) -> bool {
        self.start_peaking
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(&PedometerConfig::default())
    }
}
