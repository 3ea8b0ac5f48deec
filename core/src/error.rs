use thiserror::Error;

/// Feil fra persistens, konfigurasjon og registeret.
/// Selve deteksjonsmatematikken feiler aldri.
#[derive(Debug, Error)]
pub enum PedometerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("invalid config at `{path}`: {message}")]
    Config { path: String, message: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("stride length must be a positive number of meters, got {0}")]
    InvalidStrideLength(f32),

    #[error("session {0} is already registered")]
    SessionExists(u64),

    #[error("unknown session {0}")]
    UnknownSession(u64),

    #[error("session {0} is still in use")]
    SessionBusy(u64),
}

pub type Result<T> = std::result::Result<T, PedometerError>;
