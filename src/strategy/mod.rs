pub mod rsi_reversion;
pub mod signal;
pub mod sma_crossover;

pub use signal::{Direction, Signal, SignalError};

use crate::data::indicators::ATR;
use crate::data::InstrumentData;
use serde::{Deserialize, Serialize};

//signal generator interface that all strategies must implement
//signals come out lazily and in bar order
pub trait SignalGenerator: Send + Sync {
    //returns the strategy name, used as the signal strategy tag
    fn name(&self) -> &str;

    //bars needed before the first signal can be produced
    fn warmup(&self) -> usize;

    //lazily produces signals over one instrument's bars
    fn signals<'a>(&'a self, data: &'a InstrumentData) -> Box<dyn Iterator<Item = Signal> + 'a>;
}

//strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    SmaCrossover,
    RsiReversion,
}

impl StrategyType {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sma" | "sma_crossover" => Some(StrategyType::SmaCrossover),
            "rsi" | "rsi_reversion" => Some(StrategyType::RsiReversion),
            _ => None,
        }
    }
}

//stop, target and trailing distances in atr multiples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub stop_atr: f64,
    pub target_atr: f64,
    pub trailing_atr: Option<f64>,
}

impl Default for RiskLevels {
    fn default() -> Self {
        RiskLevels {
            stop_atr: 1.5,
            target_atr: 3.0,
            trailing_atr: None,
        }
    }
}

impl RiskLevels {
    //builds a signal at a bar's close with atr-scaled stop and target
    //none while the atr is still warming up
    pub fn bracket(
        &self,
        data: &InstrumentData,
        index: usize,
        direction: Direction,
        strategy: &str,
    ) -> Option<Signal> {
        let bar = data.series.get(index)?;
        let atr = data.indicators.value(ATR, index)?;
        let sign = direction.sign();

        let signal = Signal::new(
            data.symbol(),
            bar.timestamp,
            direction,
            bar.close,
            bar.close - sign * self.stop_atr * atr,
            bar.close + sign * self.target_atr * atr,
        )
        .ok()?
        .with_strategy_tag(strategy);

        Some(match self.trailing_atr {
            Some(distance) => signal.with_trailing_stop(distance),
            None => signal,
        })
    }
}
