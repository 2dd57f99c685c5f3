//! Pipeline driver: read the dataset, aggregate, print tables, draw charts.
//!
//! Both aggregators consume the same records independently. Text goes to the
//! caller's writer; charts go to the configured directory.

use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};

use crate::chart::{self, Chart};
use crate::config::Config;
use crate::error::{AqiError, Result};
use crate::pollutant::{PollutantShares, PollutantTotals};
use crate::reader::{Dataset, read_dataset};
use crate::report;
use crate::state::StateTrends;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub years: usize,
    pub states: usize,
    pub charts: Vec<PathBuf>,
}

/// Both analyses over one dataset.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub shares: PollutantShares,
    pub trends: StateTrends,
}

impl Analysis {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut totals = PollutantTotals::new(dataset.pollutants.clone());
        totals.ingest(&dataset.records);

        let mut trends = StateTrends::new();
        trends.ingest(&dataset.records);

        Analysis {
            shares: totals.finalize(),
            trends,
        }
    }

    /// Every text table, in report order.
    pub fn write_report<W: Write>(&self, out: &mut W, state_tables: bool) -> std::io::Result<()> {
        report::write_pollutant_table(out, &self.shares)?;
        if state_tables {
            writeln!(out)?;
            report::write_state_tables(out, &self.trends)?;
        }
        report::write_averages(out, &self.trends)
    }

    pub fn charts(&self, config: &Config) -> Vec<Chart> {
        let mut charts = chart::pollutant_bar_charts(&self.shares);
        charts.extend(chart::state_line_chart(&self.trends, config.chart_order));
        charts
    }
}

/// Run the whole report for `config`, printing tables to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary> {
    let dataset = read_dataset(&config.input)?;
    if dataset.is_empty() {
        warn!("{} has no data rows", config.input.display());
    }

    let analysis = Analysis::from_dataset(&dataset);
    analysis
        .write_report(out, config.state_tables)
        .and_then(|()| out.flush())
        .map_err(|e| AqiError::io("<output>", e))?;

    let charts = match &config.chart_dir {
        Some(dir) => chart::write_charts(dir, &analysis.charts(config))?,
        None => Vec::new(),
    };

    let summary = RunSummary {
        rows: dataset.records.len(),
        years: analysis.shares.years().len(),
        states: analysis.trends.len(),
        charts,
    };
    info!(
        "{} rows, {} years, {} states, {} charts",
        summary.rows,
        summary.years,
        summary.states,
        summary.charts.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartOrder;
    use std::fs;
    use std::path::Path;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/sample-aqi.csv")
    }

    fn run_to_string(config: &Config) -> (String, RunSummary) {
        let mut out = Vec::new();
        let summary = run(config, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_fixture_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(fixture()).with_chart_dir(Some(dir.path().join("charts")));
        let (text, summary) = run_to_string(&config);

        assert_eq!(summary.rows, 8);
        assert_eq!(summary.years, 3);
        assert_eq!(summary.states, 3);
        // four pollutant bar charts plus the state line chart
        assert_eq!(summary.charts.len(), 5);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Pollutant Percentages for Each Year:");
        assert_eq!(lines[1], "Year\tNO2 AQI\tO3 AQI\tSO2 AQI\tCO AQI");
        assert_eq!(lines[2], "2019\t25.00%\t50.00%\t12.50%\t12.50%");
        assert_eq!(lines[3], "2018\t0.00%\t0.00%\t0.00%\t0.00%");
        assert_eq!(lines[4], "2020\t40.00%\t40.00%\t10.00%\t10.00%");

        assert!(text.contains("State: Arizona\nYear\tAQI\n2019\t40\n2020\t50\n"));
        assert!(text.ends_with(
            "Average AQI For Each State:\nArizona: 45.00\nCalifornia: 55.00\nTexas: 39.33\n"
        ));

        let state_chart = dir.path().join("charts").join(chart::STATE_CHART_FILE);
        let svg = fs::read_to_string(state_chart).unwrap();
        assert!(svg.contains("AQI Trends by State"));
    }

    #[test]
    fn test_state_tables_sorted() {
        let config = Config::new(fixture()).with_chart_dir(None);
        let (text, summary) = run_to_string(&config);
        assert!(summary.charts.is_empty());

        let arizona = text.find("State: Arizona").unwrap();
        let california = text.find("State: California").unwrap();
        let texas = text.find("State: Texas").unwrap();
        assert!(arizona < california && california < texas);
    }

    #[test]
    fn test_skip_state_tables() {
        let config = Config::new(fixture())
            .with_chart_dir(None)
            .with_state_tables(false);
        let (text, _) = run_to_string(&config);
        assert!(!text.contains("State: "));
        assert!(text.contains("Average AQI For Each State:"));
    }

    #[test]
    fn test_header_only_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        let header = fs::read_to_string(fixture()).unwrap();
        let header = header.lines().next().unwrap();
        fs::write(&input, format!("{header}\n")).unwrap();

        let charts = dir.path().join("charts");
        let config = Config::new(&input).with_chart_dir(Some(charts.clone()));
        let (text, summary) = run_to_string(&config);

        assert_eq!(
            text,
            "Pollutant Percentages for Each Year:\n\
             Year\tNO2 AQI\tO3 AQI\tSO2 AQI\tCO AQI\n\
             \n\
             \n\
             Average AQI For Each State:\n"
        );
        assert_eq!(summary.rows, 0);
        assert!(summary.charts.is_empty());
        assert!(!charts.exists());
    }

    #[test]
    fn test_malformed_row_aborts_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        let text = fs::read_to_string(fixture()).unwrap();
        fs::write(&input, text.replacen(",2019,Texas,", ",20x9,Texas,", 1)).unwrap();

        let mut out = Vec::new();
        let err = run(&Config::new(&input).with_chart_dir(None), &mut out).unwrap_err();
        assert!(matches!(err, AqiError::ParseInt { column: 1, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_repeated_pollutant_columns_merge_in_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("repeated.csv");
        let mut header: Vec<String> = (0..19).map(|i| format!("Col{i}")).collect();
        header.extend(["CO", "CO", "NO2"].map(String::from));
        let mut row: Vec<String> = (0..19).map(|_| "0".to_string()).collect();
        row[1] = "2019".to_string();
        row[2] = "Ohio".to_string();
        row[16] = "30".to_string();
        row.extend(["1", "2", "3"].map(String::from));
        fs::write(&input, format!("{}\n{}\n", header.join(","), row.join(","))).unwrap();

        let (text, summary) = run_to_string(&Config::new(&input).with_chart_dir(None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Year\tCO\tNO2");
        assert_eq!(lines[2], "2019\t50.00%\t50.00%");
        assert_eq!(summary.years, 1);
    }

    #[test]
    fn test_missing_input() {
        let mut out = Vec::new();
        let err = run(&Config::new("/nonexistent/aqi.csv"), &mut out).unwrap_err();
        assert!(matches!(err, AqiError::Io { .. }));
    }

    #[test]
    fn test_analysis_charts_follow_order() {
        let dataset = read_dataset(fixture()).unwrap();
        let analysis = Analysis::from_dataset(&dataset);
        let config = Config::new(fixture()).with_chart_order(ChartOrder::Encounter);
        let charts = analysis.charts(&config);
        assert_eq!(charts.len(), 5);

        let svg = &charts[4].svg;
        // fixture encounters California, Texas, Arizona
        let ca = svg.find(">California<").unwrap();
        let tx = svg.find(">Texas<").unwrap();
        let az = svg.find(">Arizona<").unwrap();
        assert!(ca < tx && tx < az);
    }
}
