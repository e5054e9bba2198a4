use crate::data::indicators::sma_series;
use crate::data::InstrumentData;
use crate::strategy::{Direction, RiskLevels, Signal, SignalGenerator};

//sma crossover strategy
//goes long when fast sma crosses above slow sma
//goes short when fast sma crosses below slow sma
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    fast_window: usize,
    slow_window: usize,
    levels: RiskLevels,
    name: String,
}

impl SmaCrossoverStrategy {
    pub fn new(fast_window: usize, slow_window: usize, levels: RiskLevels) -> Self {
        SmaCrossoverStrategy {
            fast_window,
            slow_window,
            levels,
            name: format!("sma_{}_{}", fast_window, slow_window),
        }
    }

    //checks for crossover between two consecutive bars
    //returns some(long) for bullish crossover
    //returns some(short) for bearish crossover
    fn check_crossover(prev: (f64, f64), current: (f64, f64)) -> Option<Direction> {
        let ((prev_fast, prev_slow), (fast, slow)) = (prev, current);
        if [prev_fast, prev_slow, fast, slow].iter().any(|v| v.is_nan()) {
            return None;
        }
        if prev_fast <= prev_slow && fast > slow {
            return Some(Direction::Long);
        }
        if prev_fast >= prev_slow && fast < slow {
            return Some(Direction::Short);
        }
        None
    }
}

impl SignalGenerator for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    //one extra bar to see the previous sma pair
    fn warmup(&self) -> usize {
        self.slow_window.max(self.fast_window) + 1
    }

    fn signals<'a>(&'a self, data: &'a InstrumentData) -> Box<dyn Iterator<Item = Signal> + 'a> {
        let closes = data.series.closes();
        let fast = sma_series(&closes, self.fast_window);
        let slow = sma_series(&closes, self.slow_window);

        Box::new((1..closes.len()).filter_map(move |i| {
            let direction =
                Self::check_crossover((fast[i - 1], slow[i - 1]), (fast[i], slow[i]))?;
            self.levels.bracket(data, i, direction, &self.name)
        }))
    }
}
