use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum CfcError {
    #[error("{0}")]
    Error(String),
    #[error("Unsupported compound '{0}'. Expected one of CFC-11, CFC-12")]
    UnsupportedCompound(String),
    #[error("Wrong units for {quantity}. Expected {expected}, got {got}")]
    UnitMismatch {
        quantity: &'static str,
        expected: &'static str,
        got: String,
    },
    #[error("Extrapolation is not allowed. Target={0}, {1} interpolation range={2}")]
    ExtrapolationNotAllowed(f64, String, f64),
    #[error("Invalid timeseries: {0}")]
    InvalidTimeseries(String),
    #[error("Integration failed at t={time}: {reason}")]
    Integration { time: f64, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<toml::de::Error> for CfcError {
    fn from(value: toml::de::Error) -> Self {
        CfcError::Config(value.to_string())
    }
}

/// Convenience type for `Result<T, CfcError>`.
pub type CfcResult<T> = Result<T, CfcError>;
