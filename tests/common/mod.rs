#![allow(dead_code)]

use auric::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn ts(hour: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour as i64)
}

pub fn bar(hour: usize, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(ts(hour), open, high, low, close, 100.0).unwrap()
}

//one price unit = one unit of pnl per unit of size, no spread
pub fn unit_instrument(symbol: &str) -> Instrument {
    Instrument::new(symbol.to_string(), 1.0, 1.0, 0.0)
}

pub fn market_with(symbol: &str, bars: Vec<Bar>, atr_period: usize) -> MarketData {
    let data = InstrumentData::new(unit_instrument(symbol), bars, atr_period).unwrap();
    MarketData::new().with(data)
}

pub fn long(symbol: &str, hour: usize, entry: f64, stop: f64, target: f64) -> Signal {
    Signal::new(symbol, ts(hour), Direction::Long, entry, stop, target).unwrap()
}

pub fn short(symbol: &str, hour: usize, entry: f64, stop: f64, target: f64) -> Signal {
    Signal::new(symbol, ts(hour), Direction::Short, entry, stop, target).unwrap()
}

//a closed trade with only pnl and exit time varying
pub fn trade(id: u64, pnl: f64, exit: DateTime<Utc>) -> Trade {
    Trade {
        id,
        instrument: "XAUUSD".to_string(),
        direction: Direction::Long,
        entry_time: exit - Duration::hours(4),
        exit_time: exit,
        entry_price: 2000.0,
        exit_price: 2000.0 + pnl,
        stop_loss: 1990.0,
        take_profit: 2030.0,
        size: 1.0,
        pnl,
        pnl_pips: pnl * 10.0,
        costs: 0.0,
        exit_reason: if pnl > 0.0 {
            ExitReason::TakeProfit
        } else {
            ExitReason::StopLoss
        },
        duration_bars: 4,
        duration_secs: 4 * 3600,
        confidence: None,
        strategy_tag: None,
    }
}

//trades exiting one day apart
pub fn daily_trades(pnls: &[f64]) -> Vec<Trade> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
    pnls.iter()
        .enumerate()
        .map(|(i, &pnl)| trade(i as u64 + 1, pnl, start + Duration::days(i as i64)))
        .collect()
}
