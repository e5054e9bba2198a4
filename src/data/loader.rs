use crate::data::bar::Bar;
use crate::metrics::PnlPoint;
use crate::portfolio::Trade;
use crate::strategy::{Direction, Signal};
use crate::validation::NewsEvent;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Writer};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct SignalRecord {
    instrument: String,
    timestamp: String,
    direction: String,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    #[serde(default)]
    trailing_stop_distance: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    strategy_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsRecord {
    timestamp: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    impact: Option<String>,
}

fn parse_timestamp(raw: &str, line: usize) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Failed to parse timestamp '{}' at line {}", raw, line))?
        .with_timezone(&Utc))
}

//loads bars from a csv file, grouped by symbol in file order
//ordering is left as-is so the series check can reject bad files
pub fn load_bars_csv<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, Vec<Bar>>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut grouped: IndexMap<String, Vec<Bar>> = IndexMap::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: BarRecord =
            result.with_context(|| format!("Failed to parse CSV record at line {}", line))?;

        let timestamp = parse_timestamp(&record.timestamp, line)?;

        let bar = Bar::new_unchecked(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        );

        grouped.entry(record.symbol).or_default().push(bar);
    }

    Ok(grouped)
}

//loads a signal stream, price levels are validated later by the simulator
pub fn load_signals_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Signal>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut signals = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: SignalRecord =
            result.with_context(|| format!("Failed to parse CSV record at line {}", line))?;

        let direction = Direction::parse(&record.direction).ok_or_else(|| {
            anyhow!(
                "Unknown direction '{}' at line {}",
                record.direction,
                line
            )
        })?;

        signals.push(Signal {
            instrument: record.instrument,
            timestamp: parse_timestamp(&record.timestamp, line)?,
            direction,
            entry_price: record.entry_price,
            stop_loss: record.stop_loss,
            take_profit: record.take_profit,
            trailing_stop_distance: record.trailing_stop_distance,
            confidence: record.confidence,
            strategy_tag: record.strategy_tag.filter(|t| !t.is_empty()),
        });
    }

    Ok(signals)
}

//loads time-stamped news records from an external feed dump
pub fn load_news_csv<P: AsRef<Path>>(path: P) -> Result<Vec<NewsEvent>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut events = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: NewsRecord =
            result.with_context(|| format!("Failed to parse CSV record at line {}", line))?;
        events.push(NewsEvent {
            timestamp: parse_timestamp(&record.timestamp, line)?,
            title: record.title,
            impact: record.impact,
        });
    }

    events.sort_by_key(|e| e.timestamp);
    Ok(events)
}

//writes the trade list, one row per trade
pub fn save_trades_csv<P: AsRef<Path>>(trades: &[Trade], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for trade in trades {
        writer.serialize(trade)?;
    }
    writer.flush()?;
    Ok(())
}

//reads back a trade list written by save_trades_csv
pub fn load_trades_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Trade>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut trades = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        let trade: Trade =
            result.with_context(|| format!("Failed to parse trade at line {}", index + 2))?;
        trades.push(trade);
    }
    Ok(trades)
}

//writes the cumulative pnl curve
pub fn save_pnl_curve_csv<P: AsRef<Path>>(curve: &[PnlPoint], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for point in curve {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn groups_bars_by_symbol_in_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume,symbol").unwrap();
        writeln!(file, "2024-01-02T00:00:00Z,1.10,1.11,1.09,1.105,100,EURUSD").unwrap();
        writeln!(file, "2024-01-02T00:00:00Z,2050,2060,2040,2055,5,XAUUSD").unwrap();
        writeln!(file, "2024-01-02T01:00:00Z,1.105,1.12,1.10,1.11,120,EURUSD").unwrap();

        let grouped = load_bars_csv(file.path()).unwrap();
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["EURUSD", "XAUUSD"]);
        assert_eq!(grouped["EURUSD"].len(), 2);
        assert_eq!(grouped["XAUUSD"][0].close, 2055.0);
    }

    #[test]
    fn parses_signals_with_optional_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "instrument,timestamp,direction,entry_price,stop_loss,take_profit,trailing_stop_distance,confidence,strategy_tag"
        )
        .unwrap();
        writeln!(file, "XAUUSD,2024-01-02T00:00:00Z,long,2050,2040,2080,,70,breakout").unwrap();
        writeln!(file, "EURUSD,2024-01-02T01:00:00Z,SHORT,1.10,1.11,1.08,1.5,,").unwrap();

        let signals = load_signals_csv(file.path()).unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].direction, Direction::Long);
        assert_eq!(signals[0].confidence, Some(70.0));
        assert_eq!(signals[0].strategy_tag.as_deref(), Some("breakout"));
        assert_eq!(signals[1].direction, Direction::Short);
        assert_eq!(signals[1].trailing_stop_distance, Some(1.5));
        assert_eq!(signals[1].strategy_tag, None);
    }

    #[test]
    fn rejects_unknown_direction() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "instrument,timestamp,direction,entry_price,stop_loss,take_profit"
        )
        .unwrap();
        writeln!(file, "XAUUSD,2024-01-02T00:00:00Z,sideways,2050,2040,2080").unwrap();

        let err = load_signals_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }
}
