use crate::clock::{Clock, SystemClock};
use crate::config::PedometerConfig;
use crate::detector::StepDetector;
use crate::error::{PedometerError, Result};
use crate::events::{EventDispatcher, ListenerId};
use crate::metrics::Metrics;
use crate::models::{AccelSample, PedometerEvent, SensorType, StepCounts};
use crate::storage::{KeyValueStore, StoredValue};

pub const KEY_STRIDE_LENGTH: &str = "Pedometer.stridelength";
pub const KEY_DISTANCE: &str = "Pedometer.distance";
pub const KEY_STEP_COUNT: &str = "Pedometer.prevStepCount";
pub const KEY_CLOCK_TIME: &str = "Pedometer.clockTime";
pub const KEY_CLOSE_TIME: &str = "Pedometer.closeTime";

/// Skritteller-komponenten: detektor + klokke + lager + lyttere.
///
/// Én logisk skriver (sensor-callbacken); alle muterende kall tar `&mut self`.
/// `start`/`stop` styrer bare om nye samples konsumeres, vinduet nullstilles ikke.
pub struct Pedometer<S: KeyValueStore> {
    config: PedometerConfig,
    detector: StepDetector,
    store: S,
    clock: Box<dyn Clock>,
    dispatcher: EventDispatcher,
    metrics: Metrics,
    paused: bool,
    start_time: i64,
    prev_stop_clock_time: i64,
}

impl<S: KeyValueStore> Pedometer<S> {
    pub fn new(config: PedometerConfig, store: S) -> Result<Self> {
        Self::with_clock(config, store, Box::new(SystemClock))
    }

    /// Opprett og gjenopprett skrittlengde, distanse, steg og klokketid fra lageret.
    pub fn with_clock(config: PedometerConfig, store: S, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let mut detector = StepDetector::new(&config);

        let stride = match store.get_float(KEY_STRIDE_LENGTH, config.stride_length) {
            s if s.is_finite() && s > 0.0 => s,
            bad => {
                log::warn!("ignoring stored stride length {bad}, using {}", config.stride_length);
                config.stride_length
            }
        };
        let distance = store.get_float(KEY_DISTANCE, 0.0);
        let steps = store.get_int(KEY_STEP_COUNT, 0).max(0) as u32;
        let prev_stop_clock_time = store.get_long(KEY_CLOCK_TIME, 0);
        detector.set_stride_length(stride);
        detector.restore(steps, distance);

        let start_time = clock.now_ms();
        log::info!(
            "pedometer created: stride={:.2} m, distance={:.2} m, steps={}",
            stride,
            distance,
            steps
        );

        Ok(Self {
            config,
            detector,
            store,
            clock,
            dispatcher: EventDispatcher::new(),
            metrics: Metrics::new()?,
            paused: true,
            start_time,
            prev_stop_clock_time,
        })
    }

    /// Begynn å telle. Ingen effekt hvis den allerede går.
    pub fn start(&mut self) {
        if self.paused {
            self.paused = false;
            self.start_time = self.clock.now_ms();
            log::info!("pedometer started");
        }
    }

    /// Slutt å telle og legg aktiv tid til klokketiden. Ingen effekt hvis stoppet.
    pub fn stop(&mut self) {
        if !self.paused {
            self.paused = true;
            self.prev_stop_clock_time += self.clock.now_ms() - self.start_time;
            log::info!("pedometer stopped");
        }
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    pub fn resume(&mut self) {
        self.start();
    }

    /// Nullstill steg, distanse og tid. Skrittlengde og timeout beholdes.
    pub fn reset(&mut self) {
        self.detector.reset_counters();
        self.prev_stop_clock_time = 0;
        self.start_time = self.clock.now_ms();
        log::info!("pedometer reset");
    }

    /// Lagre skrittlengde, distanse, steg og klokketid.
    pub fn save(&mut self) -> Result<()> {
        let clock_time = self.elapsed_time();
        let close_time = self.clock.now_ms();
        let steps = i32::try_from(self.detector.simple_steps()).unwrap_or(i32::MAX);

        self.store
            .put(KEY_STRIDE_LENGTH, StoredValue::Float(self.detector.stride_length()));
        self.store
            .put(KEY_DISTANCE, StoredValue::Float(self.detector.distance()));
        self.store.put(KEY_STEP_COUNT, StoredValue::Int(steps));
        self.store.put(KEY_CLOCK_TIME, StoredValue::Long(clock_time));
        self.store.put(KEY_CLOSE_TIME, StoredValue::Long(close_time));
        self.store.commit()?;

        self.metrics.saves_total().inc();
        log::info!("pedometer saved: steps={}, clock_time={} ms", steps, clock_time);
        Ok(())
    }

    /// Sensor-callback. Ignoreres når stoppet eller når sensoren ikke er
    /// akselerometeret. Hendelsene sendes til lytterne og returneres.
    pub fn on_sensor_changed(
        &mut self,
        sensor: SensorType,
        sample: &AccelSample,
    ) -> Vec<PedometerEvent> {
        if self.paused || sensor != SensorType::Accelerometer {
            return Vec::new();
        }
        self.metrics.samples_total().inc();

        let events = self.detector.process_sample(sample);
        for event in &events {
            match event {
                PedometerEvent::SimpleStep { .. } => self.metrics.simple_steps_total().inc(),
                PedometerEvent::WalkStep { .. } => self.metrics.walk_steps_total().inc(),
            }
            self.dispatcher.dispatch(event);
        }
        events
    }

    pub fn on_accelerometer(&mut self, sample: &AccelSample) -> Vec<PedometerEvent> {
        self.on_sensor_changed(SensorType::Accelerometer, sample)
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&PedometerEvent) + Send + 'static,
    {
        self.dispatcher.add(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.dispatcher.remove(id)
    }

    pub fn is_running(&self) -> bool {
        !self.paused
    }

    pub fn stride_length(&self) -> f32 {
        self.detector.stride_length()
    }

    /// Ny skrittlengde i meter. Gjelder bare for steg som kommer etter.
    pub fn set_stride_length(&mut self, stride_length: f32) -> Result<()> {
        if !(stride_length.is_finite() && stride_length > 0.0) {
            return Err(PedometerError::InvalidStrideLength(stride_length));
        }
        self.detector.set_stride_length(stride_length);
        Ok(())
    }

    pub fn stop_detection_timeout(&self) -> u64 {
        self.detector.stop_detection_timeout()
    }

    pub fn set_stop_detection_timeout(&mut self, timeout_ms: u64) {
        self.detector.set_stop_detection_timeout(timeout_ms);
    }

    pub fn distance(&self) -> f32 {
        self.detector.distance()
    }

    /// Aktiv telletid i ms, inkludert tid lagret fra tidligere økter.
    pub fn elapsed_time(&self) -> i64 {
        if self.paused {
            self.prev_stop_clock_time
        } else {
            self.prev_stop_clock_time + (self.clock.now_ms() - self.start_time)
        }
    }

    pub fn simple_steps(&self) -> u32 {
        self.detector.simple_steps()
    }

    pub fn walk_steps(&self) -> u32 {
        self.detector.walk_steps()
    }

    pub fn counts(&self) -> StepCounts {
        self.detector.counts()
    }

    pub fn detector(&self) -> &StepDetector {
        &self.detector
    }

    pub fn config(&self) -> &PedometerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Pedometer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pedometer")
            .field("running", &!self.paused)
            .field("counts", &self.detector.counts())
            .field("stride_length", &self.detector.stride_length())
            .field("listeners", &self.dispatcher.len())
            .finish()
    }
}
