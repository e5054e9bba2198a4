use crate::data::bar::{Bar, BarError};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("bar {index} at {timestamp}: {source}")]
    InvalidBar {
        index: usize,
        timestamp: DateTime<Utc>,
        source: BarError,
    },
    #[error("timestamps not strictly increasing at bar {index}: {previous} then {current}")]
    NonMonotonic {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

//a validated, strictly time-ordered bar series for one instrument
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    //validates every bar and the ordering, rejecting the whole series on the first fault
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|source| SeriesError::InvalidBar {
                index,
                timestamp: bar.timestamp,
                source,
            })?;
        }

        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SeriesError::NonMonotonic {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }

        Ok(BarSeries { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    //exact-match lookup, no nearest-bar fallback
    pub fn index_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.bars
            .binary_search_by(|bar| bar.timestamp.cmp(&timestamp))
            .ok()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
