//! CLI definition and dispatch.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::trade_report::CsvReportAdapter;
use crate::domain::analysis::{analyze_universe, AnalysisConfig, AnalysisReport};
use crate::domain::config_validation::{parse_date, validate_analysis_config, validate_strategy_config};
use crate::domain::error::TradestatError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::series::Field;
use crate::domain::signal::SignalWindow;
use crate::domain::strategy::{AverageKind, Strategy, StrategyKind};
use crate::domain::trade_stats::StatsConfig;
use crate::domain::universe::{load_universe, parse_codes, Universe, MIN_OHLCV_BARS};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradestat",
    version,
    about = "End-of-day crossover signals and trade statistics"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured strategy over every code and report trade statistics
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Write per-symbol summaries as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write every completed trade as CSV
        #[arg(long)]
        trades_out: Option<PathBuf>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        /// Override [strategy] window (even, >= 2)
        #[arg(long)]
        window: Option<usize>,
    },
    /// Load <CODE>_<EXCHANGE>.csv files from a directory into the SQLite store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        dir: PathBuf,
        /// Only import files for this exchange
        #[arg(long)]
        exchange: Option<String>,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        exchange: Option<String>,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
    },
    /// Validate a configuration file and print the resolved strategy
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Analyze {
            config,
            output,
            trades_out,
            code,
            exchange,
            window,
        } => run_analyze(
            &config,
            output.as_deref(),
            trades_out.as_deref(),
            code.as_deref(),
            exchange.as_deref(),
            window,
        ),
        Command::Import {
            config,
            dir,
            exchange,
        } => run_import(&config, &dir, exchange.as_deref()),
        Command::ListSymbols { config, exchange } => {
            run_list_symbols(&config, exchange.as_deref())
        }
        Command::Info {
            config,
            code,
            exchange,
        } => run_info(&config, code.as_deref(), exchange.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// `RUST_LOG` wins when no `-v` is given; otherwise verbosity picks the level.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradestatError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, TradestatError> {
    let min_bars = config.get_int("analysis", "min_bars", MIN_OHLCV_BARS as i64);
    Ok(AnalysisConfig {
        start_date: parse_date(config, "start_date")?,
        end_date: parse_date(config, "end_date")?,
        min_bars: min_bars.max(1) as usize,
        stats: StatsConfig {
            initial_capital: config.get_double("analysis", "initial_capital", 10_000.0),
            brokerage: config.get_double("analysis", "brokerage", 0.0),
            static_invest: config.get_double("analysis", "static_invest", 1_000.0),
            subtract: config.get_double("analysis", "subtract", 0.0),
            weighted: config.get_bool("analysis", "weighted", false),
        },
    })
}

fn config_invalid(section: &str, key: &str, reason: String) -> TradestatError {
    TradestatError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    config.get_int("strategy", key, default as i64).max(1) as usize
}

pub fn build_strategy(
    config: &dyn ConfigPort,
    window_override: Option<usize>,
) -> Result<Strategy, TradestatError> {
    let kind_name = config
        .get_string("strategy", "kind")
        .unwrap_or_else(|| "macd".to_string())
        .trim()
        .to_lowercase();

    let kind = match kind_name.as_str() {
        "macd" => StrategyKind::Macd {
            fast: period(config, "fast", DEFAULT_FAST),
            slow: period(config, "slow", DEFAULT_SLOW),
            signal: period(config, "signal", DEFAULT_SIGNAL),
        },
        "ma_cross" => {
            let average = match config.get_string("strategy", "average") {
                Some(s) => s
                    .parse::<AverageKind>()
                    .map_err(|reason| config_invalid("strategy", "average", reason))?,
                None => AverageKind::Ema,
            };
            StrategyKind::MovingAverageCross {
                average,
                fast: period(config, "fast", DEFAULT_FAST),
                slow: period(config, "slow", DEFAULT_SLOW),
            }
        }
        "stochastic" => StrategyKind::Stochastic {
            lookback: period(config, "lookback", 14),
            k_period: period(config, "k_period", 3),
            d_period: period(config, "d_period", 3),
        },
        "rsi" => StrategyKind::Rsi {
            period: period(config, "period", 14),
            level: config.get_double("strategy", "level", 50.0),
        },
        other => {
            return Err(config_invalid(
                "strategy",
                "kind",
                format!("unknown strategy kind '{}'", other),
            ));
        }
    };

    let field = match config.get_string("analysis", "field") {
        Some(s) => s
            .parse::<Field>()
            .map_err(|reason| config_invalid("analysis", "field", reason))?,
        None => Field::Close,
    };

    let size = match window_override {
        Some(size) => size,
        None => config.get_int("strategy", "window", 2).max(0) as usize,
    };
    let window = SignalWindow::new(size)?;

    let mut strategy = Strategy::new(kind, field, window);
    if let Some(name) = config
        .get_string("strategy", "name")
        .filter(|s| !s.trim().is_empty())
    {
        strategy.name = name.trim().to_string();
    }
    Ok(strategy)
}

/// `--code` wins over `[analysis] codes`, which wins over `[analysis] code`.
pub fn resolve_codes(
    code_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, TradestatError> {
    let (key, list) = match code_override {
        Some(c) => ("code", c.to_string()),
        None => match (
            config.get_string("analysis", "codes"),
            config.get_string("analysis", "code"),
        ) {
            (Some(c), _) if !c.trim().is_empty() => ("codes", c),
            (_, Some(c)) if !c.trim().is_empty() => ("code", c),
            _ => {
                return Err(TradestatError::ConfigMissing {
                    section: "analysis".into(),
                    key: "code".into(),
                });
            }
        },
    };
    parse_codes(&list).map_err(|e| config_invalid("analysis", key, e.to_string()))
}

pub fn resolve_exchange(
    exchange_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, TradestatError> {
    match exchange_override {
        Some(e) if !e.trim().is_empty() => Ok(e.trim().to_uppercase()),
        _ => config
            .require_string("analysis", "exchange")
            .map(|e| e.to_uppercase()),
    }
}

/// Data source named by `[data] source` (default `csv`).
pub fn open_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, TradestatError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .trim()
        .to_lowercase();

    match source.as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| "./data".to_string());
            tracing::info!(dir = %dir, "using csv data source");
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir.trim()))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;
            tracing::info!("using sqlite data source");
            Ok(Box::new(SqliteAdapter::from_config(config)?))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(config_invalid(
            "data",
            "source",
            "sqlite feature is not enabled in this build".to_string(),
        )),
        other => Err(config_invalid(
            "data",
            "source",
            format!("unknown data source '{}', expected csv or sqlite", other),
        )),
    }
}

fn run_analyze(
    config_path: &Path,
    output: Option<&Path>,
    trades_out: Option<&Path>,
    code_override: Option<&str>,
    exchange_override: Option<&str>,
    window_override: Option<usize>,
) -> Result<(), TradestatError> {
    let config = load_config(config_path)?;
    validate_analysis_config(&config)?;
    validate_strategy_config(&config)?;

    let strategy = build_strategy(&config, window_override)?;
    let analysis = build_analysis_config(&config)?;
    let universe = Universe {
        codes: resolve_codes(code_override, &config)?,
        exchange: resolve_exchange(exchange_override, &config)?,
    };
    eprintln!("Strategy: {}", strategy);

    let data_port = open_data_port(&config)?;
    let report = run_analysis_pipeline(data_port.as_ref(), &strategy, &analysis, &universe)?;
    print_report(&report);

    let writer = CsvReportAdapter;
    if let Some(path) = output {
        writer.write_summary(&report, path)?;
        eprintln!("Summary written to: {}", path.display());
    }
    if let Some(path) = trades_out {
        writer.write_trades(&report, path)?;
        eprintln!("Trades written to: {}", path.display());
    }
    Ok(())
}

/// Load the universe, then analyze every surviving code.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    strategy: &Strategy,
    analysis: &AnalysisConfig,
    universe: &Universe,
) -> Result<AnalysisReport, TradestatError> {
    eprintln!(
        "Loading {} codes on {} ({} to {})",
        universe.count(),
        universe.exchange,
        analysis.start_date,
        analysis.end_date
    );
    let loaded = load_universe(
        data_port,
        universe,
        analysis.start_date,
        analysis.end_date,
        analysis.min_bars,
    )?;
    for skipped in &loaded.skipped {
        eprintln!("  skipped {}: {:?}", skipped.code, skipped.reason);
    }

    Ok(analyze_universe(&loaded, strategy, &analysis.stats))
}

fn fmt_opt(value: Option<f64>, scale: f64) -> String {
    match value {
        Some(v) => format!("{:.2}", v * scale),
        None => "-".to_string(),
    }
}

pub fn print_report(report: &AnalysisReport) {
    println!(
        "{:<12} {:>6} {:>6} {:>7} {:>7} {:>7} {:>8} {:>8} {:>6} {:>8} {:>10}",
        "symbol", "vol%", "trades", "win%", "loss%", "pf", "expect%", "irr%", "maxcl", "market%", "static$"
    );
    for s in &report.symbols {
        let m = &s.summary;
        println!(
            "{:<12} {:>6} {:>6} {:>7.1} {:>7.1} {:>7} {:>8.2} {:>8.2} {:>6} {:>8.2} {:>10.2}",
            format!("{}.{}", s.code, s.exchange),
            fmt_opt(s.volatility, 100.0),
            m.trades,
            m.win_rate * 100.0,
            m.loss_rate * 100.0,
            fmt_opt(m.profit_factor, 1.0),
            m.expectancy * 100.0,
            m.irr * 100.0,
            m.max_consecutive_losses,
            m.market_return * 100.0,
            m.static_pnl,
        );
    }
    let a = &report.aggregate;
    println!(
        "\n{} codes, {} trades, mean IRR {:.2}%, total static P&L {:.2}",
        a.codes,
        a.total_trades,
        a.mean_irr * 100.0,
        a.total_static_pnl
    );
}

#[cfg(feature = "sqlite")]
fn run_import(
    config_path: &Path,
    dir: &Path,
    exchange: Option<&str>,
) -> Result<(), TradestatError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let config = load_config(config_path)?;
    let store = SqliteAdapter::from_config(&config)?;
    let total = import_dir(&store, dir, exchange)?;
    eprintln!("Imported {} bars from {}", total, dir.display());
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
fn run_import(
    _config_path: &Path,
    _dir: &Path,
    _exchange: Option<&str>,
) -> Result<(), TradestatError> {
    Err(config_invalid(
        "data",
        "source",
        "sqlite feature is required for import".to_string(),
    ))
}

/// Import every `<CODE>_<EXCHANGE>.csv` in `dir`. Returns rows written.
#[cfg(feature = "sqlite")]
pub fn import_dir(
    store: &crate::adapters::sqlite_adapter::SqliteAdapter,
    dir: &Path,
    exchange: Option<&str>,
) -> Result<usize, TradestatError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    files.sort();

    let mut total = 0;
    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some((code, ex)) = CsvAdapter::parse_file_name(&name) else {
            tracing::debug!(file = %name, "not a bar file, skipping");
            continue;
        };
        if exchange.is_some_and(|e| !e.eq_ignore_ascii_case(&ex)) {
            continue;
        }
        let bars = CsvAdapter::read_file(&path, &code, &ex)?;
        let written = store.insert_bars(&bars)?;
        eprintln!("  {}.{}: {} bars", code, ex, written);
        total += written;
    }
    Ok(total)
}

fn run_list_symbols(config_path: &Path, exchange: Option<&str>) -> Result<(), TradestatError> {
    let config = load_config(config_path)?;
    let exchange = resolve_exchange(exchange, &config)?;
    let data_port = open_data_port(&config)?;

    let symbols = data_port.list_symbols(&exchange)?;
    if symbols.is_empty() {
        eprintln!("No symbols found for exchange {}", exchange);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(
    config_path: &Path,
    code: Option<&str>,
    exchange: Option<&str>,
) -> Result<(), TradestatError> {
    let config = load_config(config_path)?;
    let codes = resolve_codes(code, &config)?;
    let exchange = resolve_exchange(exchange, &config)?;
    let data_port = open_data_port(&config)?;

    for c in &codes {
        match data_port.get_data_range(c, &exchange) {
            Ok(Some(range)) => println!(
                "{}.{}: {} bars, {} to {}",
                c, exchange, range.bars, range.first, range.last
            ),
            Ok(None) => eprintln!("{}.{}: no data found", c, exchange),
            Err(e) => eprintln!("error querying {}.{}: {}", c, exchange, e),
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TradestatError> {
    let config = load_config(config_path)?;
    validate_analysis_config(&config)?;
    validate_strategy_config(&config)?;

    let strategy = build_strategy(&config, None)?;
    let analysis = build_analysis_config(&config)?;
    let codes = resolve_codes(None, &config)?;
    let exchange = resolve_exchange(None, &config)?;

    eprintln!("\nStrategy:");
    eprintln!("  {}", strategy);
    eprintln!("  warmup: {} bars", strategy.warmup());
    eprintln!("\nUniverse:");
    eprintln!("  exchange: {}", exchange);
    eprintln!("  codes: {}", codes.join(", "));
    eprintln!("  period: {} to {}", analysis.start_date, analysis.end_date);
    eprintln!("\nStatistics:");
    eprintln!("  initial capital: {:.2}", analysis.stats.initial_capital);
    eprintln!("  brokerage: {:.2}", analysis.stats.brokerage);
    eprintln!("  static invest: {:.2}", analysis.stats.static_invest);
    eprintln!("  subtract: {}", analysis.stats.subtract);
    eprintln!("  weighted: {}", analysis.stats.weighted);

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
