use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("Non-positive price in bar: open={open} high={high} low={low} close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Invalid OHLC values: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose { close: f64, high: f64, low: f64 },
    #[error("Invalid OHLC values: open ({open}) outside high-low range [{low}, {high}]")]
    InvalidOpen { open: f64, high: f64, low: f64 },
    #[error("Non-finite value in bar: open={open} high={high} low={low} close={close} volume={volume}")]
    NonFinite {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    },
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
}

//represents a single ohlcv bar (candlestick) of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        let bar = Bar::new_unchecked(timestamp, open, high, low, close, volume);
        bar.validate()?;
        Ok(bar)
    }

    //creates a Bar without validation (the series validates on construction)
    pub fn new_unchecked(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //checks low <= min(open, close) <= max(open, close) <= high and positive prices
    pub fn validate(&self) -> Result<(), BarError> {
        let (open, high, low, close) = (self.open, self.high, self.low, self.close);

        if ![open, high, low, close, self.volume].iter().all(|v| v.is_finite()) {
            return Err(BarError::NonFinite {
                open,
                high,
                low,
                close,
                volume: self.volume,
            });
        }

        if !(open > 0.0 && high > 0.0 && low > 0.0 && close > 0.0) {
            return Err(BarError::NonPositivePrice {
                open,
                high,
                low,
                close,
            });
        }

        if high < low {
            return Err(BarError::InvalidHighLow { high, low });
        }

        if close < low || close > high {
            return Err(BarError::InvalidClose { close, high, low });
        }

        if open < low || open > high {
            return Err(BarError::InvalidOpen { open, high, low });
        }

        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume(self.volume));
        }

        Ok(())
    }

    //returns the range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    //true range against the previous close
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(prev) => self
                .range()
                .max((self.high - prev).abs())
                .max((self.low - prev).abs()),
            None => self.range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn accepts_consistent_bar() {
        let bar = Bar::new(ts(), 1.10, 1.12, 1.09, 1.11, 500.0).unwrap();
        assert!((bar.range() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = Bar::new(ts(), 1.10, 1.12, 1.09, 1.13, 0.0).unwrap_err();
        assert!(matches!(err, BarError::InvalidClose { .. }));
    }

    #[test]
    fn rejects_inverted_high_low() {
        let err = Bar::new(ts(), 1.10, 1.05, 1.09, 1.07, 0.0).unwrap_err();
        assert!(matches!(err, BarError::InvalidHighLow { .. }));
    }

    #[test]
    fn rejects_zero_price_and_negative_volume() {
        assert!(matches!(
            Bar::new(ts(), 0.0, 1.0, 0.0, 0.5, 0.0).unwrap_err(),
            BarError::NonPositivePrice { .. }
        ));
        assert!(matches!(
            Bar::new(ts(), 1.0, 1.0, 1.0, 1.0, -1.0).unwrap_err(),
            BarError::NegativeVolume(_)
        ));
    }

    #[test]
    fn rejects_non_finite_prices_and_volume() {
        for bar in [
            Bar::new_unchecked(ts(), 1.0, f64::INFINITY, 1.0, 1.0, 0.0),
            Bar::new_unchecked(ts(), 1.0, 1.0, 1.0, 1.0, f64::NAN),
            Bar::new_unchecked(ts(), f64::NAN, 1.0, 1.0, 1.0, 0.0),
            Bar::new_unchecked(ts(), 1.0, 1.0, 1.0, 1.0, f64::INFINITY),
        ] {
            assert!(matches!(bar.validate(), Err(BarError::NonFinite { .. })));
        }
    }

    #[test]
    fn true_range_uses_gap_from_previous_close() {
        let bar = Bar::new(ts(), 105.0, 106.0, 104.0, 105.5, 0.0).unwrap();
        assert_eq!(bar.true_range(None), 2.0);
        assert_eq!(bar.true_range(Some(100.0)), 6.0);
    }
}
