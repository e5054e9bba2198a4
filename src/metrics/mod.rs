pub mod performance;
pub mod timeseries;

pub use performance::{sharpe_ratio, sortino_ratio, PerformanceMetrics};
pub use timeseries::{calculate_pnl_curve, max_drawdown, PnlPoint};
