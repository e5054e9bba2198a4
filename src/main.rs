use anyhow::{Context, Result};
use auric::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auric")]
#[command(about = "Event-driven trade simulator and robustness validator for forex and gold", long_about = None)]
struct Cli {
    //engine configuration json, missing keys take defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

//instrument conventions, presets are used when pip size is not given
#[derive(Args, Clone)]
struct InstrumentArgs {
    #[arg(long)]
    pip_size: Option<f64>,

    #[arg(long)]
    pip_value: Option<f64>,

    #[arg(long)]
    spread: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    //simulate a signal stream or a built-in strategy
    Run {
        //path to bars csv (timestamp,open,high,low,close,volume,symbol)
        #[arg(long)]
        bars: PathBuf,

        //restrict to one symbol, defaults to every symbol in the file
        #[arg(long)]
        symbol: Option<String>,

        //signals csv, takes precedence over --strategy
        #[arg(long)]
        signals: Option<PathBuf>,

        //built-in strategy (sma, rsi)
        #[arg(long, default_value = "sma")]
        strategy: String,

        #[arg(long, default_value = "10")]
        fast: usize,

        #[arg(long, default_value = "30")]
        slow: usize,

        #[arg(long, default_value = "14")]
        rsi_lookback: usize,

        #[arg(long, default_value = "30")]
        rsi_lower: f64,

        #[arg(long, default_value = "70")]
        rsi_upper: f64,

        //stop and target distances in atr multiples
        #[arg(long, default_value = "1.5")]
        stop_atr: f64,

        #[arg(long, default_value = "3.0")]
        target_atr: f64,

        #[arg(long)]
        trailing_atr: Option<f64>,

        #[command(flatten)]
        instrument: InstrumentArgs,

        //output options
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        #[arg(long)]
        output_trades_json: Option<PathBuf>,

        #[arg(long)]
        output_curve_csv: Option<PathBuf>,

        #[arg(long)]
        output_metrics_json: Option<PathBuf>,
    },

    //run the robustness checks over a trades csv
    Validate {
        #[arg(long)]
        trades: PathBuf,

        //news feed csv (timestamp,title,impact)
        #[arg(long)]
        news: Option<PathBuf>,

        #[arg(long)]
        mc_runs: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        //number of strategy variants tried before this one
        #[arg(long)]
        n_trials: Option<usize>,

        #[arg(long)]
        output_report_json: Option<PathBuf>,
    },

    //parallel sma crossover grid over symbols
    Sweep {
        #[arg(long)]
        bars: PathBuf,

        #[arg(long, value_delimiter = ',', default_value = "5,10,20")]
        fast: Vec<usize>,

        #[arg(long, value_delimiter = ',', default_value = "30,50,100")]
        slow: Vec<usize>,

        #[arg(long, default_value = "1.5")]
        stop_atr: f64,

        #[arg(long, default_value = "3.0")]
        target_atr: f64,

        #[arg(long)]
        threads: Option<usize>,

        #[command(flatten)]
        instrument: InstrumentArgs,

        #[arg(long)]
        output_json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Run {
            bars,
            symbol,
            signals,
            strategy,
            fast,
            slow,
            rsi_lookback,
            rsi_lower,
            rsi_upper,
            stop_atr,
            target_atr,
            trailing_atr,
            instrument,
            output_trades_csv,
            output_trades_json,
            output_curve_csv,
            output_metrics_json,
        } => {
            let levels = RiskLevels {
                stop_atr,
                target_atr,
                trailing_atr,
            };
            let generator: Box<dyn SignalGenerator> = match StrategyType::parse(&strategy)
                .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?
            {
                StrategyType::SmaCrossover => {
                    Box::new(SmaCrossoverStrategy::new(fast, slow, levels))
                }
                StrategyType::RsiReversion => Box::new(RsiReversionStrategy::new(
                    rsi_lookback,
                    rsi_lower,
                    rsi_upper,
                    levels,
                )),
            };

            run_simulation(
                &config.simulation,
                &bars,
                symbol.as_deref(),
                signals.as_deref(),
                generator.as_ref(),
                &instrument,
            )
            .and_then(|result| {
                write_run_outputs(
                    &result,
                    output_trades_csv,
                    output_trades_json,
                    output_curve_csv,
                    output_metrics_json,
                )
            })?;
        }
        Commands::Validate {
            trades,
            news,
            mc_runs,
            seed,
            n_trials,
            output_report_json,
        } => {
            let mut validation = config.validation.clone();
            if let Some(runs) = mc_runs {
                validation.mc_runs = runs;
            }
            if let Some(seed) = seed {
                validation.seed = seed;
            }
            if let Some(n) = n_trials {
                validation.deflation_n_trials = n;
            }
            run_validation(&validation, &trades, news.as_deref(), output_report_json)?;
        }
        Commands::Sweep {
            bars,
            fast,
            slow,
            stop_atr,
            target_atr,
            threads,
            instrument,
            output_json,
        } => {
            let levels = RiskLevels {
                stop_atr,
                target_atr,
                trailing_atr: None,
            };
            run_sweep(
                &config.simulation,
                &bars,
                &fast,
                &slow,
                levels,
                threads,
                &instrument,
                output_json,
            )?;
        }
    }

    Ok(())
}

//preset conventions for known symbols, explicit pip size overrides them
fn resolve_instrument(symbol: &str, args: &InstrumentArgs) -> Result<Instrument> {
    if let Some(pip_size) = args.pip_size {
        return Ok(Instrument::from_params(
            symbol.to_string(),
            pip_size,
            args.pip_value,
            args.spread,
        ));
    }

    let mut instrument = Instrument::preset(symbol).ok_or_else(|| {
        anyhow::anyhow!("No preset for {}, pass --pip-size to define it", symbol)
    })?;
    instrument.symbol = symbol.to_string();
    if let Some(spread) = args.spread {
        instrument.spread = spread;
    }
    Ok(instrument)
}

fn run_simulation(
    config: &SimulationConfig,
    bars_path: &Path,
    symbol: Option<&str>,
    signals_path: Option<&Path>,
    generator: &dyn SignalGenerator,
    instrument_args: &InstrumentArgs,
) -> Result<BacktestResult> {
    println!("Auric Trade Simulator");
    println!("=====================\n");

    println!("Loading bars from {:?}...", bars_path);
    let grouped = load_bars_csv(bars_path)?;

    let mut market = MarketData::new();
    for (name, bars) in grouped {
        if symbol.is_some_and(|s| s != name) {
            continue;
        }
        let instrument = resolve_instrument(&name, instrument_args)?;
        let count = bars.len();
        let data = InstrumentData::new(instrument, bars, config.atr_period)
            .with_context(|| format!("Rejected bar series for {}", name))?;
        println!("Loaded {} bars for {}", count, name);
        market.insert(data);
    }

    if market.is_empty() {
        anyhow::bail!("No bars found for the requested symbol(s)");
    }

    let signals = match signals_path {
        Some(path) => {
            let signals = load_signals_csv(path)?;
            println!("Loaded {} signals from {:?}\n", signals.len(), path);
            signals
        }
        None => {
            //merge per-instrument streams into one time-ordered stream
            let mut signals: Vec<Signal> = market
                .symbols()
                .filter_map(|s| market.get(s))
                .flat_map(|data| generator.signals(data))
                .collect();
            signals.sort_by_key(|s| s.timestamp);
            println!(
                "Strategy {} produced {} signals\n",
                generator.name(),
                signals.len()
            );
            signals
        }
    };

    println!("Running simulation...\n");
    let result = simulate(&market, signals, config);

    println!("Simulation Results");
    println!("==================\n");
    result.summary.pretty_print_table();
    println!(
        "\nBalance: {:.2} -> {:.2}",
        result.initial_balance, result.final_balance
    );
    if !result.rejected.is_empty() {
        println!("Rejected signals: {}", result.rejected.len());
    }
    if result.capital_exhausted {
        println!("Capital exhausted: later signals were refused");
    }

    Ok(result)
}

fn write_run_outputs(
    result: &BacktestResult,
    trades_csv: Option<PathBuf>,
    trades_json: Option<PathBuf>,
    curve_csv: Option<PathBuf>,
    metrics_json: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = trades_csv {
        save_trades_csv(&result.trades, &path)?;
        println!("\nTrades saved to {:?}", path);
    }

    if let Some(path) = trades_json {
        write_json(&result.trades, &path)?;
        println!("Trades saved to {:?}", path);
    }

    if let Some(path) = curve_csv {
        save_pnl_curve_csv(&result.pnl_curve, &path)?;
        println!("PnL curve saved to {:?}", path);
    }

    if let Some(path) = metrics_json {
        write_json(&result.summary, &path)?;
        println!("Metrics saved to {:?}", path);
    }

    Ok(())
}

fn run_validation(
    config: &ValidationConfig,
    trades_path: &Path,
    news_path: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("Auric Robustness Validator");
    println!("==========================\n");

    let trades = load_trades_csv(trades_path)?;
    println!("Loaded {} trades from {:?}", trades.len(), trades_path);

    let news = news_path.map(load_news_csv).transpose()?;
    if let Some(events) = &news {
        println!("Loaded {} news events", events.len());
    }

    println!("Running {} Monte Carlo runs (seed {})...\n", config.mc_runs, config.seed);
    let report = validate(&trades, news.as_deref(), config);

    report.metrics.pretty_print_table();
    println!();
    report.pretty_print_table();
    println!(
        "\nOverall: {}",
        if report.passed() { "PASS" } else { "FAIL" }
    );

    if let Some(path) = output {
        write_json(&report, &path)?;
        println!("Report saved to {:?}", path);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_sweep(
    config: &SimulationConfig,
    bars_path: &Path,
    fast: &[usize],
    slow: &[usize],
    levels: RiskLevels,
    threads: Option<usize>,
    instrument_args: &InstrumentArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("Auric Parameter Sweep");
    println!("=====================\n");

    let grouped = load_bars_csv(bars_path)?;
    let mut markets = Vec::new();
    for (name, bars) in grouped {
        markets.push((resolve_instrument(&name, instrument_args)?, Arc::new(bars)));
    }

    let scenarios = sma_grid(&markets, fast, slow, levels, config);
    println!("Running {} scenarios...\n", scenarios.len());

    let mut sweep = Sweep::new();
    if let Some(threads) = threads {
        sweep = sweep.with_threads(threads);
    }
    let outcomes = sweep.run(&scenarios)?;

    let mut table = prettytable::Table::new();
    table.add_row(prettytable::row![
        "Scenario", "Status", "Trades", "Return", "Sharpe", "Max DD"
    ]);
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => table.add_row(prettytable::row![
                outcome.name,
                "ok",
                result.summary.total_trades,
                format!("{:.2}", result.summary.total_return),
                format!("{:.3}", result.summary.sharpe_ratio),
                format!("{:.2}", result.summary.max_drawdown)
            ]),
            Err(err) => table.add_row(prettytable::row![
                outcome.name,
                err.label(),
                "-",
                "-",
                "-",
                "-"
            ]),
        };
    }
    table.printstd();

    if let Some(path) = output {
        let reports: Vec<_> = outcomes.iter().map(|o| o.report()).collect();
        write_json(&reports, &path)?;
        println!("\nSweep report saved to {:?}", path);
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
