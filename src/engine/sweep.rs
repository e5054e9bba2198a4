use crate::config::SimulationConfig;
use crate::data::{Bar, InstrumentData, MarketData};
use crate::engine::error::SimulationError;
use crate::engine::simulator::{BacktestResult, PositionSimulator};
use crate::instrument::Instrument;
use crate::metrics::PerformanceMetrics;
use crate::strategy::sma_crossover::SmaCrossoverStrategy;
use crate::strategy::{RiskLevels, Signal, SignalGenerator};
use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

//one independent simulation task: an instrument, a generator and its settings
//bars are shared read-only between scenarios of the same instrument
#[derive(Clone)]
pub struct Scenario {
    pub name: String,
    pub instrument: Instrument,
    pub bars: Arc<Vec<Bar>>,
    pub generator: Arc<dyn SignalGenerator>,
    pub config: SimulationConfig,
}

//shared flag that stops a sweep from starting further scenarios
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

//result of one scenario, failures included
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub instrument: String,
    pub result: Result<BacktestResult, SimulationError>,
}

//flat, serializable view of an outcome
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub instrument: String,
    //"ok" or the error taxonomy label
    pub status: String,
    pub message: Option<String>,
    pub summary: Option<PerformanceMetrics>,
}

impl ScenarioOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn report(&self) -> ScenarioReport {
        let (status, message, summary) = match &self.result {
            Ok(result) => ("ok".to_string(), None, Some(result.summary.clone())),
            Err(err) => (err.label().to_string(), Some(err.to_string()), None),
        };
        ScenarioReport {
            name: self.name.clone(),
            instrument: self.instrument.clone(),
            status,
            message,
            summary,
        }
    }
}

//validates the bars, generates signals and simulates a single scenario
pub fn run_scenario(
    scenario: &Scenario,
    cancel: &CancellationToken,
) -> Result<BacktestResult, SimulationError> {
    if cancel.is_cancelled() {
        return Err(SimulationError::Cancelled);
    }

    let symbol = scenario.instrument.symbol.clone();
    let data = InstrumentData::new(
        scenario.instrument.clone(),
        scenario.bars.as_ref().clone(),
        scenario.config.atr_period,
    )
    .map_err(|source| SimulationError::DataIntegrity {
        instrument: symbol.clone(),
        source,
    })?;

    let required = scenario.generator.warmup().max(2);
    if data.series.len() < required {
        return Err(SimulationError::InsufficientData {
            instrument: symbol,
            required,
            available: data.series.len(),
        });
    }

    let signals: Vec<Signal> = scenario.generator.signals(&data).collect();
    let market = MarketData::new().with(data);
    Ok(PositionSimulator::new(scenario.config.clone(), &market).run(signals))
}

//runs independent scenarios on a bounded worker pool
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    threads: Option<usize>,
    cancel: CancellationToken,
}

impl Sweep {
    pub fn new() -> Self {
        Sweep::default()
    }

    //caps the pool size, otherwise the global rayon pool is used
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    //outcomes come back in scenario order; a failed task never stops its siblings
    pub fn run(&self, scenarios: &[Scenario]) -> anyhow::Result<Vec<ScenarioOutcome>> {
        info!(scenarios = scenarios.len(), threads = ?self.threads, "starting sweep");

        let outcomes = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .context("Failed to build sweep thread pool")?;
                pool.install(|| self.run_all(scenarios))
            }
            None => self.run_all(scenarios),
        };

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(
            completed = outcomes.len() - failed,
            failed,
            "sweep finished"
        );
        Ok(outcomes)
    }

    fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| {
                let result = run_scenario(scenario, &self.cancel);
                if let Err(err) = &result {
                    warn!(
                        scenario = %scenario.name,
                        label = err.label(),
                        %err,
                        "scenario failed"
                    );
                }
                ScenarioOutcome {
                    name: scenario.name.clone(),
                    instrument: scenario.instrument.symbol.clone(),
                    result,
                }
            })
            .collect()
    }
}

//enumerates instrument x fast x slow sma crossover scenarios, skipping fast >= slow
pub fn sma_grid(
    markets: &[(Instrument, Arc<Vec<Bar>>)],
    fast_windows: &[usize],
    slow_windows: &[usize],
    levels: RiskLevels,
    config: &SimulationConfig,
) -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    for (instrument, bars) in markets {
        for &fast in fast_windows {
            for &slow in slow_windows {
                if fast >= slow {
                    continue;
                }
                let generator = SmaCrossoverStrategy::new(fast, slow, levels);
                scenarios.push(Scenario {
                    name: format!("{}_{}", instrument.symbol, generator.name()),
                    instrument: instrument.clone(),
                    bars: Arc::clone(bars),
                    generator: Arc::new(generator),
                    config: config.clone(),
                });
            }
        }
    }

    scenarios
}
