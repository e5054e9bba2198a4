use crate::data::SeriesError;
use crate::strategy::{Signal, SignalError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

//errors that abort one simulation task
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("data integrity error for {instrument}: {source}")]
    DataIntegrity {
        instrument: String,
        source: SeriesError,
    },
    #[error("insufficient data for {instrument}: {available} bars, {required} required")]
    InsufficientData {
        instrument: String,
        required: usize,
        available: usize,
    },
    #[error("simulation cancelled before it started")]
    Cancelled,
}

impl SimulationError {
    //stable taxonomy label for aggregated results
    pub fn label(&self) -> &'static str {
        match self {
            SimulationError::DataIntegrity { .. } => "DataIntegrityError",
            SimulationError::InsufficientData { .. } => "InsufficientDataError",
            SimulationError::Cancelled => "Cancelled",
        }
    }
}

//why an individual signal never became a position
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum RejectReason {
    #[error("{0}")]
    InvalidLevels(String),
    #[error("no bar series for instrument")]
    UnknownInstrument,
    #[error("no bar at signal timestamp {0}")]
    UnknownTimestamp(DateTime<Utc>),
    #[error("signal precedes simulation cursor {0}")]
    BehindCursor(DateTime<Utc>),
    #[error("signal on the last bar, nothing to walk forward")]
    NoBarsAfterEntry,
    #[error("position already open until {0}")]
    PositionOpen(DateTime<Utc>),
    #[error("account balance exhausted")]
    ExhaustedCapital,
    #[error("position size resolved to zero")]
    ZeroSize,
    #[error("entry fill {0} is not between the stop and the target")]
    FillBeyondLevels(f64),
}

impl RejectReason {
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::ExhaustedCapital => "ExhaustedCapitalError",
            _ => "InvalidSignalError",
        }
    }
}

impl From<SignalError> for RejectReason {
    fn from(err: SignalError) -> Self {
        RejectReason::InvalidLevels(err.to_string())
    }
}

//a dropped signal and the reason it was dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSignal {
    pub signal: Signal,
    pub reason: RejectReason,
}
