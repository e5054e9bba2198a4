use crate::portfolio::Trade;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

//a time-stamped record from an external news or calendar feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
}

impl NewsEvent {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        NewsEvent {
            timestamp,
            title: None,
            impact: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSensitivity {
    pub news_trades: usize,
    pub base_return: f64,
    pub filtered_return: f64,

    //relative pnl drop after removing news-driven trades, 0 when base pnl is not positive
    pub collapse: f64,
}

//true when the trade was entered within the window around any event
//`event_times` must be sorted
pub fn is_news_driven(trade: &Trade, event_times: &[DateTime<Utc>], window: Duration) -> bool {
    let from = trade.entry_time - window;
    let idx = event_times.partition_point(|t| *t < from);
    event_times
        .get(idx)
        .is_some_and(|t| *t <= trade.entry_time + window)
}

//how much of the edge disappears once news-driven trades are dropped
pub fn news_sensitivity(
    trades: &[Trade],
    events: &[NewsEvent],
    window_minutes: i64,
) -> NewsSensitivity {
    let mut times: Vec<DateTime<Utc>> = events.iter().map(|e| e.timestamp).collect();
    times.sort();
    let window = Duration::minutes(window_minutes.max(0));

    let base_return: f64 = trades.iter().map(|t| t.pnl).sum();
    let (news, quiet): (Vec<&Trade>, Vec<&Trade>) = trades
        .iter()
        .partition(|t| is_news_driven(t, &times, window));
    let filtered_return: f64 = quiet.iter().map(|t| t.pnl).sum();

    let collapse = if base_return > 0.0 {
        ((base_return - filtered_return) / base_return).max(0.0)
    } else {
        0.0
    };

    NewsSensitivity {
        news_trades: news.len(),
        base_return,
        filtered_return,
        collapse,
    }
}
