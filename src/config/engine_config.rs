use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

//which level wins when a bar touches both stop and target
//intrabar order is unknown from ohlc, StopFirst assumes the worse outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IntrabarPriority {
    #[default]
    StopFirst,
    TargetFirst,
}

//how position size is derived at entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SizingPolicy {
    //risk_fraction * balance / |entry - stop|
    #[default]
    FixedFractional,
    //risk_fraction * balance / (stop distance in pips * pip value)
    PipRisk,
    //constant size regardless of balance
    FixedUnits { units: f64 },
}

//settings for the position simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_balance: f64,
    pub risk_per_trade_fraction: f64,

    //cap on entry notional as a multiple of balance
    pub max_position_fraction: f64,

    //per unit of size, charged once per round trip
    pub transaction_cost: f64,

    //price units added to the entry fill against the position
    pub slippage: f64,

    pub max_hold_bars: Option<usize>,
    pub max_hold_duration_secs: Option<i64>,

    pub atr_period: usize,
    pub intrabar_priority: IntrabarPriority,
    pub sizing: SizingPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_balance: 100000.0,
            risk_per_trade_fraction: 0.02,
            max_position_fraction: 50.0,
            transaction_cost: 0.0,
            slippage: 0.0,
            max_hold_bars: None,
            max_hold_duration_secs: None,
            atr_period: 14,
            intrabar_priority: IntrabarPriority::StopFirst,
            sizing: SizingPolicy::FixedFractional,
        }
    }
}

//pass/fail thresholds for each robustness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    //minimum fraction of monte carlo runs ending positive
    pub min_mc_survival_rate: f64,
    //minimum fraction of bootstrap runs ending positive
    pub min_bootstrap_survival_rate: f64,
    pub min_deflated_sharpe: f64,
    pub min_edge_stability: f64,
    pub max_risk_of_ruin: f64,
    //minimum fraction of out-of-sample folds with positive pnl
    pub min_walk_forward_consistency: f64,
    //maximum share of pnl from the best quarter
    pub max_regime_concentration: f64,
    //maximum relative pnl drop when news trades are removed
    pub max_news_collapse: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_mc_survival_rate: 0.95,
            min_bootstrap_survival_rate: 0.80,
            min_deflated_sharpe: 0.0,
            min_edge_stability: 0.5,
            max_risk_of_ruin: 0.01,
            min_walk_forward_consistency: 0.6,
            max_regime_concentration: 0.5,
            max_news_collapse: 0.5,
        }
    }
}

//settings for the robustness validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mc_runs: usize,
    pub mc_block_size: usize,
    pub seed: u64,
    pub deflation_n_trials: usize,
    pub initial_capital: f64,
    pub risk_per_trade_fraction: f64,
    pub max_drawdown_limit_fraction: f64,
    pub walk_forward_folds: usize,
    pub regime_window: usize,
    pub news_window_minutes: i64,
    pub thresholds: Thresholds,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            mc_runs: 1000,
            mc_block_size: 10,
            seed: 42,
            deflation_n_trials: 1,
            initial_capital: 100000.0,
            risk_per_trade_fraction: 0.02,
            max_drawdown_limit_fraction: 0.15,
            walk_forward_folds: 5,
            regime_window: 20,
            news_window_minutes: 30,
            thresholds: Thresholds::default(),
        }
    }
}

//complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    //load configuration from a JSON file, missing keys take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
