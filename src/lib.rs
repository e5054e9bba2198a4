//an event-driven trade simulator and robustness validator for forex and gold

pub mod config;
pub mod data;
pub mod engine;
pub mod instrument;
pub mod metrics;
pub mod portfolio;
pub mod strategy;
pub mod validation;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        EngineConfig, IntrabarPriority, SimulationConfig, SizingPolicy, Thresholds,
        ValidationConfig,
    };
    pub use crate::data::{
        load_bars_csv, load_news_csv, load_signals_csv, load_trades_csv, save_pnl_curve_csv,
        save_trades_csv, Bar, BarSeries, IndicatorTable, InstrumentData, MarketData,
        SeriesError,
    };
    pub use crate::engine::{
        run_scenario, simulate, sma_grid, BacktestResult, CancellationToken, PositionSimulator,
        RejectReason, RejectedSignal, Scenario, ScenarioOutcome, SimulationError, Sweep,
    };
    pub use crate::instrument::Instrument;
    pub use crate::metrics::{calculate_pnl_curve, PerformanceMetrics, PnlPoint};
    pub use crate::portfolio::{Account, ExitReason, Position, Trade};
    pub use crate::strategy::{
        rsi_reversion::RsiReversionStrategy, sma_crossover::SmaCrossoverStrategy, Direction,
        RiskLevels, Signal, SignalGenerator, StrategyType,
    };
    pub use crate::validation::{validate, CheckResult, NewsEvent, ValidationReport};
}
