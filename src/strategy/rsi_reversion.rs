use crate::data::indicators::rsi_series;
use crate::data::InstrumentData;
use crate::strategy::{Direction, RiskLevels, Signal, SignalGenerator};

//rsi mean reversion strategy
//buys when rsi drops into the oversold zone
//sells when rsi rises into the overbought zone
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    lookback: usize,
    oversold: f64,
    overbought: f64,
    levels: RiskLevels,
}

impl RsiReversionStrategy {
    pub fn new(lookback: usize, oversold: f64, overbought: f64, levels: RiskLevels) -> Self {
        RsiReversionStrategy {
            lookback,
            oversold,
            overbought,
            levels,
        }
    }

    //default rsi strategy with standard parameters
    pub fn standard(levels: RiskLevels) -> Self {
        RsiReversionStrategy::new(14, 30.0, 70.0, levels)
    }

    //fires only on the bar the zone is entered
    fn zone_entry(&self, prev: f64, rsi: f64) -> Option<Direction> {
        if prev.is_nan() || rsi.is_nan() {
            return None;
        }
        if rsi < self.oversold && prev >= self.oversold {
            return Some(Direction::Long);
        }
        if rsi > self.overbought && prev <= self.overbought {
            return Some(Direction::Short);
        }
        None
    }
}

impl SignalGenerator for RsiReversionStrategy {
    fn name(&self) -> &str {
        "rsi_reversion"
    }

    fn warmup(&self) -> usize {
        self.lookback + 2
    }

    fn signals<'a>(&'a self, data: &'a InstrumentData) -> Box<dyn Iterator<Item = Signal> + 'a> {
        let rsi = rsi_series(&data.series.closes(), self.lookback);

        Box::new((1..rsi.len()).filter_map(move |i| {
            let direction = self.zone_entry(rsi[i - 1], rsi[i])?;

            //deeper into the zone reads as higher confidence
            let confidence = match direction {
                Direction::Long => 100.0 - rsi[i],
                Direction::Short => rsi[i],
            };

            self.levels
                .bracket(data, i, direction, self.name())
                .map(|s| s.with_confidence(confidence.clamp(0.0, 100.0)))
        }))
    }
}
