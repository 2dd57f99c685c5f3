//! Run configuration for the report pipeline.

use std::path::PathBuf;

/// Dataset read when no path is given.
pub const DEFAULT_INPUT: &str = "dataset.csv";
/// Directory charts are written to when none is given.
pub const DEFAULT_CHART_DIR: &str = "charts";

/// Series order in the state line chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartOrder {
    /// Alphabetical, matching the text report.
    #[default]
    Sorted,
    /// Order in which states first appear in the dataset.
    Encounter,
}

/// Everything a single report run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    /// `None` disables chart rendering.
    pub chart_dir: Option<PathBuf>,
    pub chart_order: ChartOrder,
    pub state_tables: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            chart_dir: Some(PathBuf::from(DEFAULT_CHART_DIR)),
            chart_order: ChartOrder::default(),
            state_tables: true,
        }
    }
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Config {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_chart_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.chart_dir = dir;
        self
    }

    pub fn with_chart_order(mut self, order: ChartOrder) -> Self {
        self.chart_order = order;
        self
    }

    pub fn with_state_tables(mut self, enabled: bool) -> Self {
        self.state_tables = enabled;
        self
    }
}
