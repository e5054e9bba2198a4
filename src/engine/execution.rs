use crate::config::IntrabarPriority;
use crate::data::Bar;
use crate::instrument::Instrument;
use crate::portfolio::{ExitReason, Position};
use crate::strategy::{Direction, Signal};

//entry fill: the quoted entry moved against the position by half spread plus slippage
pub fn entry_fill_price(signal: &Signal, instrument: &Instrument, slippage: f64) -> f64 {
    signal.entry_price + signal.direction.sign() * instrument.entry_offset(slippage)
}

//long stop triggers if low <= stop, short stop if high >= stop
pub fn stop_touched(direction: Direction, stop: f64, bar: &Bar) -> bool {
    match direction {
        Direction::Long => bar.low <= stop,
        Direction::Short => bar.high >= stop,
    }
}

//long target fills if high >= target, short target if low <= target
pub fn target_touched(direction: Direction, target: f64, bar: &Bar) -> bool {
    match direction {
        Direction::Long => bar.high >= target,
        Direction::Short => bar.low <= target,
    }
}

//decides whether the bar closes the position at its stop or target
//both levels fill at the level itself, gaps included
pub fn level_exit(
    position: &Position,
    bar: &Bar,
    priority: IntrabarPriority,
) -> Option<(ExitReason, f64)> {
    let stop = stop_touched(position.direction, position.stop_loss, bar);
    let target = target_touched(position.direction, position.take_profit, bar);

    match (stop, target, priority) {
        (true, true, IntrabarPriority::StopFirst) | (true, false, _) => {
            Some((ExitReason::StopLoss, position.stop_loss))
        }
        (true, true, IntrabarPriority::TargetFirst) | (false, true, _) => {
            Some((ExitReason::TakeProfit, position.take_profit))
        }
        (false, false, _) => None,
    }
}

//max hold horizon in bars and/or seconds since entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldLimit {
    pub max_bars: Option<usize>,
    pub max_secs: Option<i64>,
}

impl HoldLimit {
    pub fn expired(&self, position: &Position, bar_index: usize, bar: &Bar) -> bool {
        let by_bars = self
            .max_bars
            .map(|n| bar_index.saturating_sub(position.entry_index) >= n)
            .unwrap_or(false);
        let by_time = self
            .max_secs
            .map(|secs| (bar.timestamp - position.entry_time).num_seconds() >= secs)
            .unwrap_or(false);
        by_bars || by_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bar(low: f64, high: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        Bar::new_unchecked(ts, (low + high) / 2.0, high, low, (low + high) / 2.0, 0.0)
    }

    fn position(direction: Direction) -> Position {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let signal = match direction {
            Direction::Long => Signal::new("X", ts, direction, 100.0, 98.0, 108.0),
            Direction::Short => Signal::new("X", ts, direction, 100.0, 102.0, 92.0),
        }
        .unwrap();
        Position::open(1, &signal, 0, 100.0, 1.0)
    }

    #[test]
    fn stop_wins_when_both_touched_by_default() {
        let p = position(Direction::Long);
        let wide = bar(97.0, 109.0);
        assert_eq!(
            level_exit(&p, &wide, IntrabarPriority::StopFirst),
            Some((ExitReason::StopLoss, 98.0))
        );
        assert_eq!(
            level_exit(&p, &wide, IntrabarPriority::TargetFirst),
            Some((ExitReason::TakeProfit, 108.0))
        );
    }

    #[test]
    fn short_levels_mirror_long() {
        let p = position(Direction::Short);
        assert_eq!(
            level_exit(&p, &bar(99.0, 102.5), IntrabarPriority::StopFirst),
            Some((ExitReason::StopLoss, 102.0))
        );
        assert_eq!(
            level_exit(&p, &bar(91.0, 99.0), IntrabarPriority::StopFirst),
            Some((ExitReason::TakeProfit, 92.0))
        );
        assert_eq!(level_exit(&p, &bar(95.0, 101.0), IntrabarPriority::StopFirst), None);
    }

    #[test]
    fn entry_fill_moves_against_position() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let instrument = Instrument::new("X".to_string(), 0.01, 0.01, 0.2);
        let long = Signal::new("X", ts, Direction::Long, 100.0, 98.0, 108.0).unwrap();
        let short = Signal::new("X", ts, Direction::Short, 100.0, 102.0, 92.0).unwrap();

        assert!((entry_fill_price(&long, &instrument, 0.05) - 100.15).abs() < 1e-9);
        assert!((entry_fill_price(&short, &instrument, 0.05) - 99.85).abs() < 1e-9);
    }

    #[test]
    fn hold_limit_by_bars_or_time() {
        let p = position(Direction::Long);
        let later = bar(99.0, 101.0);

        let by_bars = HoldLimit {
            max_bars: Some(3),
            max_secs: None,
        };
        assert!(!by_bars.expired(&p, 2, &later));
        assert!(by_bars.expired(&p, 3, &later));

        let by_time = HoldLimit {
            max_bars: None,
            max_secs: Some(Duration::minutes(30).num_seconds()),
        };
        assert!(by_time.expired(&p, 1, &later));
        assert!(!HoldLimit::default().expired(&p, 1000, &later));
    }
}
