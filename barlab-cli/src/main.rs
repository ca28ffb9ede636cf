//! BarLab CLI: run backtests and list strategies.
//!
//! Commands:
//! - `run`: execute a backtest from a TOML config file and/or flags
//! - `strategies`: print the strategy catalogue with parameter defaults

mod logging;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use barlab_core::strategy::{available_strategies, ParamKind, StrategyParams};
use barlab_runner::market_data::MarketData;
use barlab_runner::{run_backtest, BacktestConfig, BacktestResult, CsvMarketData, SyntheticMarketData};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "barlab", about = "BarLab CLI: single-asset strategy backtester")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest. Flags override values loaded from --config.
    Run(RunArgs),
    /// List available strategies and their parameters.
    Strategies {
        /// Print the catalogue as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Strategy identifier (see `barlab strategies`).
    #[arg(long)]
    strategy: Option<String>,

    /// Ticker symbol.
    #[arg(long)]
    ticker: Option<String>,

    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Initial capital.
    #[arg(long)]
    capital: Option<f64>,

    /// Fraction of cash committed per entry, in (0, 1].
    #[arg(long)]
    position_size: Option<f64>,

    /// Commission as a fraction of notional, per side.
    #[arg(long)]
    commission: Option<f64>,

    /// Slippage as a fraction of price, per side.
    #[arg(long)]
    slippage: Option<f64>,

    /// Stop-loss as a fraction below entry.
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Take-profit as a fraction above entry.
    #[arg(long)]
    take_profit: Option<f64>,

    /// Strategy parameter override, e.g. `--param fast_period=20`. Repeatable.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// Directory of `<TICKER>.csv` files.
    #[arg(long, conflicts_with = "synthetic")]
    data_dir: Option<PathBuf>,

    /// Use deterministic synthetic data.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Print the full result as JSON instead of a summary.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Run(args) => run_backtest_cmd(args),
        Commands::Strategies { json } => run_strategies_cmd(json),
    }
}

fn run_backtest_cmd(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;

    let source: Box<dyn MarketData> = match (&args.data_dir, args.synthetic) {
        (Some(dir), _) => Box::new(CsvMarketData::new(dir)),
        (None, true) => Box::new(SyntheticMarketData::default()),
        (None, false) => bail!("one of --data-dir or --synthetic is required"),
    };

    let result = run_backtest(&config, source.as_ref())
        .with_context(|| format!("backtest of '{}' on {} failed", config.strategy_type, config.ticker))?;

    if args.json {
        println!("{}", result.to_json()?);
    } else {
        print_summary(&result);
        if args.synthetic {
            println!("WARNING: Results based on SYNTHETIC data");
            println!();
        }
    }
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<BacktestConfig> {
    let mut config = match &args.config {
        Some(path) => BacktestConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let (Some(strategy), Some(ticker), Some(start), Some(end)) =
                (&args.strategy, &args.ticker, args.start, args.end)
            else {
                bail!("without --config, --strategy, --ticker, --start and --end are all required");
            };
            BacktestConfig::new(strategy.as_str(), ticker.as_str(), start, end)
        }
    };

    if let Some(strategy) = &args.strategy {
        config.strategy_type = strategy.clone();
    }
    if let Some(ticker) = &args.ticker {
        config.ticker = ticker.clone();
    }
    if let Some(start) = args.start {
        config.start_date = start;
    }
    if let Some(end) = args.end {
        config.end_date = end;
    }
    if let Some(capital) = args.capital {
        config.initial_capital = capital;
    }
    if let Some(position_size) = args.position_size {
        config.position_size = position_size;
    }
    if let Some(commission) = args.commission {
        config.commission = commission;
    }
    if let Some(slippage) = args.slippage {
        config.slippage = slippage;
    }
    if args.stop_loss.is_some() {
        config.stop_loss = args.stop_loss;
    }
    if args.take_profit.is_some() {
        config.take_profit = args.take_profit;
    }
    if !args.params.is_empty() {
        config.params = apply_param_overrides(&config.params, &args.params)?;
    }

    Ok(config)
}

/// Merge `NAME=VALUE` pairs into `base`. Unknown names are rejected.
fn apply_param_overrides(base: &StrategyParams, overrides: &[String]) -> Result<StrategyParams> {
    let mut value = serde_json::to_value(base)?;
    let Some(table) = value.as_object_mut() else {
        bail!("strategy parameters did not serialize to a table");
    };

    for pair in overrides {
        let Some((name, raw)) = pair.split_once('=') else {
            bail!("invalid --param '{pair}', expected NAME=VALUE");
        };
        let name = name.trim();
        if !table.contains_key(name) {
            bail!("unknown strategy parameter '{name}'");
        }
        let number: serde_json::Value = serde_json::from_str(raw.trim())
            .with_context(|| format!("invalid value for parameter '{name}': '{raw}'"))?;
        table.insert(name.to_string(), number);
    }

    serde_json::from_value(value).context("invalid strategy parameters")
}

fn run_strategies_cmd(json: bool) -> Result<()> {
    let catalogue = available_strategies();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    for info in &catalogue {
        println!("{:<14} {}", info.id, info.display_name);
        println!("{:<14} {}", "", info.description);
        for param in &info.parameters {
            let default = match param.kind {
                ParamKind::Integer => format!("{}", param.default as i64),
                ParamKind::Float => format!("{}", param.default),
            };
            println!(
                "{:<14}   {:<16} {:>6}  {}",
                "", param.name, default, param.description
            );
        }
        println!();
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    println!();
    println!("=== Backtest Result ===");
    println!("Ticker:         {}", result.ticker);
    println!("Strategy:       {}", result.strategy_type);
    println!("Period:         {} to {}", result.start_date, result.end_date);
    println!("Bars:           {}", result.total_days);
    println!("Trades:         {} ({} won, {} lost)", m.total_trades, m.winning_trades, m.losing_trades);
    println!();
    println!("--- Performance ---");
    println!("Initial:        {:.2}", result.initial_capital);
    println!("Final:          {:.2}", m.final_value);
    println!("Total Return:   {:.2}%", m.total_return * 100.0);
    println!("Annual Return:  {:.2}%", m.annual_return * 100.0);
    println!("Volatility:     {:.2}%", m.volatility * 100.0);
    println!("Sharpe:         {:.3}", m.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", m.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", m.win_rate * 100.0);
    println!("Profit Factor:  {:.2}", m.profit_factor);
    println!("Avg Win/Loss:   {:.2}", m.avg_win_loss_ratio);
    println!("Commission:     {:.2}", result.total_commission);
    println!();
    println!("--- Benchmark (buy & hold) ---");
    println!("Return:         {:.2}%", m.benchmark_return * 100.0);
    println!("Alpha:          {:.2}%", m.alpha * 100.0);
    println!();
}
