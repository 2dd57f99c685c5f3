//! Report Renderer: tab-delimited text tables.
//!
//! The `*_lines` functions build the table text; the `write_*` functions
//! print it to any [`Write`] sink. Neither touches the aggregates.

use std::io::Write;

use crate::pollutant::PollutantShares;
use crate::state::StateTrends;

/// Caption printed above the pollutant table.
pub const POLLUTANT_CAPTION: &str = "Pollutant Percentages for Each Year:";
/// Caption printed above the per-state averages.
pub const AVERAGE_CAPTION: &str = "Average AQI For Each State:";

/// `Year<TAB>pollutant...` header followed by one row per year.
///
/// Years keep first-seen order. With no years only the header is produced.
pub fn pollutant_table_lines(shares: &PollutantShares) -> Vec<String> {
    let mut header = vec!["Year"];
    header.extend(shares.pollutants().iter().map(String::as_str));

    let mut lines = vec![header.join("\t")];
    for year in shares.years() {
        let mut row = vec![year.year.to_string()];
        row.extend(year.shares.iter().map(ToString::to_string));
        lines.push(row.join("\t"));
    }
    lines
}

/// One block per state in sorted order: `State: <name>`, `Year<TAB>AQI`,
/// then the state's readings in encounter order.
pub fn state_table_lines(trends: &StateTrends) -> Vec<String> {
    let mut lines = Vec::new();
    for state in trends.sorted_states() {
        lines.push(format!("State: {state}"));
        lines.push("Year\tAQI".to_string());
        if let Some(series) = trends.series(state) {
            lines.extend(series.points().map(|(year, aqi)| format!("{year}\t{aqi}")));
        }
    }
    lines
}

/// `<state>: <mean>` per state in sorted order, two decimals.
pub fn average_lines(trends: &StateTrends) -> Vec<String> {
    trends
        .sorted_states()
        .into_iter()
        .filter_map(|state| {
            let avg = trends.average(state).ok()?;
            Some(format!("{state}: {avg:.2}"))
        })
        .collect()
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn write_pollutant_table<W: Write>(
    out: &mut W,
    shares: &PollutantShares,
) -> std::io::Result<()> {
    writeln!(out, "{POLLUTANT_CAPTION}")?;
    write_lines(out, &pollutant_table_lines(shares))
}

pub fn write_state_tables<W: Write>(out: &mut W, trends: &StateTrends) -> std::io::Result<()> {
    write_lines(out, &state_table_lines(trends))
}

/// Blank line, caption, then the averages.
pub fn write_averages<W: Write>(out: &mut W, trends: &StateTrends) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{AVERAGE_CAPTION}")?;
    write_lines(out, &average_lines(trends))
}
