// Python-binding: samme flate som komponenten i blokkspråket.
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::PedometerConfig;
use crate::error::PedometerError;
use crate::models::AccelSample;
use crate::pedometer::Pedometer;
use crate::storage::JsonFileStore;

fn to_py_err(e: PedometerError) -> PyErr {
    match e {
        PedometerError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

#[pyclass(name = "Pedometer")]
pub struct PyPedometer {
    inner: Pedometer<JsonFileStore>,
}

#[pymethods]
impl PyPedometer {
    /// `prefs_dir`: katalog for `<prefs_name>.json`. `config_json`: valgfri JSON-konfig.
    #[new]
    #[pyo3(signature = (prefs_dir, config_json = None))]
    fn new(prefs_dir: &str, config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(s) => PedometerConfig::from_json_str(s).map_err(to_py_err)?,
            None => PedometerConfig::default(),
        };
        let store = JsonFileStore::open(prefs_dir, &config.prefs_name).map_err(to_py_err)?;
        let inner = Pedometer::new(config, store).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn resume(&mut self) {
        self.inner.resume();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn save(&mut self) -> PyResult<()> {
        self.inner.save().map_err(to_py_err)
    }

    /// Mat inn én akselerometer-måling. Returnerer (navn, steg, distanse) per hendelse.
    fn on_accel(&mut self, timestamp_ms: u64, x: f32, y: f32, z: f32) -> Vec<(String, u32, f32)> {
        self.inner
            .on_accelerometer(&AccelSample::new(timestamp_ms, x, y, z))
            .into_iter()
            .map(|e| (e.name().to_string(), e.steps(), e.distance()))
            .collect()
    }

    #[getter]
    fn stride_length(&self) -> f32 {
        self.inner.stride_length()
    }

    #[setter]
    fn set_stride_length(&mut self, value: f32) -> PyResult<()> {
        self.inner.set_stride_length(value).map_err(to_py_err)
    }

    #[getter]
    fn stop_detection_timeout(&self) -> u64 {
        self.inner.stop_detection_timeout()
    }

    #[setter]
    fn set_stop_detection_timeout(&mut self, value: u64) {
        self.inner.set_stop_detection_timeout(value);
    }

    #[getter]
    fn distance(&self) -> f32 {
        self.inner.distance()
    }

    #[getter]
    fn elapsed_time(&self) -> i64 {
        self.inner.elapsed_time()
    }

    #[getter]
    fn simple_steps(&self) -> u32 {
        self.inner.simple_steps()
    }

    #[getter]
    fn walk_steps(&self) -> u32 {
        self.inner.walk_steps()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}

#[pymodule]
fn pedometer_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyPedometer>()?;
    Ok(())
}
