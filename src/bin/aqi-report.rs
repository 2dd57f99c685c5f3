//! CLI tool to print pollutant shares and state AQI trends for a dataset.
//!
//! Usage:
//!   aqi-report [dataset.csv] [--chart-dir charts] [--no-charts]
//!
//! Tables go to stdout, logs to stderr, charts to the chart directory.

use aqi_trends::config::{DEFAULT_CHART_DIR, DEFAULT_INPUT};
use aqi_trends::{ChartOrder, Config, run};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;

/// Report each pollutant's share of yearly AQI load and AQI trends by state.
#[derive(Parser)]
#[command(name = "aqi-report")]
struct Cli {
    /// Comma-separated dataset (header row, fixed column layout)
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory to write SVG charts into
    #[arg(long, default_value = DEFAULT_CHART_DIR)]
    chart_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Series order in the state line chart
    #[arg(long, value_enum, default_value_t = ChartOrder::Sorted)]
    chart_order: ChartOrder,

    /// Omit the per-state Year/AQI tables
    #[arg(long)]
    skip_state_tables: bool,

    /// Log debug details on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config::new(cli.input)
            .with_chart_dir((!cli.no_charts).then_some(cli.chart_dir))
            .with_chart_order(cli.chart_order)
            .with_state_tables(!cli.skip_state_tables)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from(cli);
    let stdout = io::stdout();
    if let Err(e) = run(&config, &mut stdout.lock()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
