pub mod error;
pub mod execution;
pub mod simulator;
pub mod sweep;

pub use error::{RejectReason, RejectedSignal, SimulationError};
pub use execution::{entry_fill_price, level_exit, HoldLimit};
pub use simulator::{simulate, BacktestResult, PositionSimulator};
pub use sweep::{
    run_scenario, sma_grid, CancellationToken, Scenario, ScenarioOutcome, ScenarioReport, Sweep,
};
