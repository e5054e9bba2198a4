pub mod deflated_sharpe;
pub mod monte_carlo;
pub mod news;
pub mod report;
pub mod ruin;
pub mod stability;
pub mod walk_forward;

pub use deflated_sharpe::{deflated_sharpe, DeflatedSharpe};
pub use monte_carlo::{
    block_bootstrap, monte_carlo, trade_shuffle, Distribution, MonteCarloResult, ResampleMode,
};
pub use news::{is_news_driven, news_sensitivity, NewsEvent, NewsSensitivity};
pub use report::{validate, CheckResult, ValidationReport};
pub use ruin::{risk_of_ruin, risk_of_ruin_from_metrics};
pub use stability::{
    edge_stability, edge_stability_by_label, regime_concentration, rolling_volatility,
    volatility_regimes, EdgeStability, RegimeConcentration, VolatilityRegime,
};
pub use walk_forward::{walk_forward, FoldResult, WalkForwardResult};
