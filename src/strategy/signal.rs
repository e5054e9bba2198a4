use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    //converts to a price-delta sign (Long = +1, Short = -1)
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    //parse direction from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Some(Direction::Long),
            "short" | "sell" => Some(Direction::Short),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("{direction:?} signal needs stop < entry < target, got stop={stop_loss} entry={entry_price} target={take_profit}")]
    InvalidLongLevels {
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    },
    #[error("{direction:?} signal needs target < entry < stop, got stop={stop_loss} entry={entry_price} target={take_profit}")]
    InvalidShortLevels {
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    },
    #[error("confidence {0} outside 0-100")]
    InvalidConfidence(f64),
    #[error("trailing stop distance {0} is negative or not finite")]
    InvalidTrailingDistance(f64),
}

//a proposed trade entry with its risk levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub instrument: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,

    //distance in atr units, 0 or none disables trailing
    #[serde(default)]
    pub trailing_stop_distance: Option<f64>,

    #[serde(default)]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub strategy_tag: Option<String>,
}

impl Signal {
    //creates a signal and validates its price ordering
    pub fn new(
        instrument: impl Into<String>,
        timestamp: DateTime<Utc>,
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Result<Self, SignalError> {
        let signal = Signal {
            instrument: instrument.into(),
            timestamp,
            direction,
            entry_price,
            stop_loss,
            take_profit,
            trailing_stop_distance: None,
            confidence: None,
            strategy_tag: None,
        };
        signal.validate()?;
        Ok(signal)
    }

    pub fn with_trailing_stop(mut self, atr_multiple: f64) -> Self {
        self.trailing_stop_distance = Some(atr_multiple);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_strategy_tag(mut self, tag: impl Into<String>) -> Self {
        self.strategy_tag = Some(tag.into());
        self
    }

    //checks the directional ordering of stop, entry and target
    pub fn validate(&self) -> Result<(), SignalError> {
        let (entry, stop, target) = (self.entry_price, self.stop_loss, self.take_profit);

        match self.direction {
            Direction::Long => {
                if !(stop < entry && entry < target) {
                    return Err(SignalError::InvalidLongLevels {
                        direction: self.direction,
                        entry_price: entry,
                        stop_loss: stop,
                        take_profit: target,
                    });
                }
            }
            Direction::Short => {
                if !(target < entry && entry < stop) {
                    return Err(SignalError::InvalidShortLevels {
                        direction: self.direction,
                        entry_price: entry,
                        stop_loss: stop,
                        take_profit: target,
                    });
                }
            }
        }

        if let Some(confidence) = self.confidence {
            if !(0.0..=100.0).contains(&confidence) {
                return Err(SignalError::InvalidConfidence(confidence));
            }
        }

        if let Some(distance) = self.trailing_stop_distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(SignalError::InvalidTrailingDistance(distance));
            }
        }

        Ok(())
    }

    //trailing distance when trailing is actually enabled
    pub fn trailing_distance(&self) -> Option<f64> {
        self.trailing_stop_distance.filter(|d| *d > 0.0)
    }
}
