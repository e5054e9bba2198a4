pub mod bar;
pub mod indicators;
pub mod loader;
pub mod market;
pub mod series;

pub use bar::{Bar, BarError};
pub use indicators::IndicatorTable;
pub use loader::{
    load_bars_csv, load_news_csv, load_signals_csv, load_trades_csv, save_pnl_curve_csv,
    save_trades_csv,
};
pub use market::{InstrumentData, MarketData};
pub use series::{BarSeries, SeriesError};
