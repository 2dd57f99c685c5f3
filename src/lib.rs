//! # aqi-trends
//!
//! Descriptive reports over an air-quality monitoring dataset.
//!
//! The dataset is a comma-separated file whose columns are addressed by
//! position. Two independent analyses run over the same rows:
//!
//! - **Pollutant shares**: per year, each pollutant's percentage of the
//!   summed pollutant load.
//! - **State trends**: per state, the (year, AQI) readings in file order and
//!   their average.
//!
//! Results are printed as tab-delimited tables and drawn as SVG charts.
//!
//! ## Example
//!
//! ```
//! use aqi_trends::{PollutantTotals, Record, StateTrends};
//!
//! let records = vec![
//!     Record { year: 2019, state: "CA".into(), aqi: 50, pollutants: vec![2.0, 3.0] },
//!     Record { year: 2019, state: "CA".into(), aqi: 60, pollutants: vec![1.0, 4.0] },
//!     Record { year: 2019, state: "TX".into(), aqi: 40, pollutants: vec![5.0, 5.0] },
//! ];
//!
//! let mut totals = PollutantTotals::new(vec!["CO".into(), "NO2".into()]);
//! totals.ingest(&records);
//! let shares = totals.finalize();
//! assert_eq!(shares.share(2019, "CO").unwrap().to_string(), "40.00%");
//!
//! let mut trends = StateTrends::new();
//! trends.ingest(&records);
//! assert_eq!(trends.sorted_states(), ["CA", "TX"]);
//! assert_eq!(trends.average("CA").unwrap(), 55.0);
//! ```

pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod pollutant;
pub mod reader;
pub mod record;
pub mod report;
pub mod state;

pub use analysis::{Analysis, RunSummary, run};
pub use chart::{Chart, pollutant_bar_charts, state_line_chart, write_charts};
pub use config::{ChartOrder, Config};
pub use error::{AqiError, Result};
pub use pollutant::{Percentage, PollutantShares, PollutantTotals, YearShares};
pub use reader::{Dataset, RecordReader, read_dataset};
pub use record::{AQI_COLUMN, POLLUTANT_START, Record, STATE_COLUMN, YEAR_COLUMN};
pub use state::{StateSeries, StateTrends};
