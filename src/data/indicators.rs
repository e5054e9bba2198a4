use crate::data::bar::Bar;
use indexmap::IndexMap;

pub const ATR: &str = "atr";

//named indicator columns aligned bar-for-bar with a series
//warm-up values are NaN
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    len: usize,
    columns: IndexMap<String, Vec<f64>>,
}

impl IndicatorTable {
    pub fn new(len: usize) -> Self {
        IndicatorTable {
            len,
            columns: IndexMap::new(),
        }
    }

    //the table every simulation needs (atr for trailing stops)
    pub fn standard(bars: &[Bar], atr_period: usize) -> Self {
        let mut table = IndicatorTable::new(bars.len());
        table.insert(ATR, atr_series(bars, atr_period));
        table
    }

    //inserts or replaces a column, padding/truncating to the table length
    pub fn insert(&mut self, name: impl Into<String>, mut values: Vec<f64>) {
        values.resize(self.len, f64::NAN);
        self.columns.insert(name.into(), values);
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    //finite value of a column at a bar, None during warm-up
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns
            .get(name)
            .and_then(|v| v.get(index))
            .copied()
            .filter(|v| v.is_finite())
    }

    //every named value at one bar, in column insertion order
    pub fn row(&self, index: usize) -> Vec<(&str, f64)> {
        self.columns
            .iter()
            .filter_map(|(name, values)| values.get(index).map(|v| (name.as_str(), *v)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

//simple moving average over a trailing window
pub fn sma_series(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = sum / window as f64;
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = sum / window as f64;
    }
    out
}

//relative strength index from average gain/loss over the last `period` changes
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for i in period..closes.len() {
        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
    }
    out
}

//wilder average true range
pub fn atr_series(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let true_ranges: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| bar.true_range(i.checked_sub(1).map(|p| bars[p].close)))
        .collect();

    let mut atr = true_ranges[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = atr;
    for i in period..bars.len() {
        atr = (atr * (period as f64 - 1.0) + true_ranges[i]) / period as f64;
        out[i] = atr;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn flat_bars(n: usize, range: f64) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                Bar::new_unchecked(
                    start + Duration::hours(i as i64),
                    100.0,
                    100.0 + range / 2.0,
                    100.0 - range / 2.0,
                    100.0,
                    0.0,
                )
            })
            .collect()
    }

    #[test]
    fn sma_warms_up_then_rolls() {
        let out = sma_series(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(out[0].is_nan());
        assert_eq!(&out[1..], &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn rsi_saturates_on_monotonic_rise() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi_series(&closes, 14);
        assert!(out[13].is_nan());
        assert_eq!(out[14], 100.0);
    }

    #[test]
    fn atr_of_constant_range_is_that_range() {
        let out = atr_series(&flat_bars(30, 2.0), 14);
        assert!(out[12].is_nan());
        assert!((out[13] - 2.0).abs() < 1e-12);
        assert!((out[29] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn table_rows_follow_insertion_order() {
        let bars = flat_bars(20, 1.0);
        let mut table = IndicatorTable::standard(&bars, 5);
        table.insert("sma_fast", sma_series(&[1.0; 20], 3));

        let row = table.row(10);
        assert_eq!(row[0].0, ATR);
        assert_eq!(row[1], ("sma_fast", 1.0));
        assert_eq!(table.value(ATR, 2), None);
        assert!(table.value(ATR, 4).is_some());
    }
}
