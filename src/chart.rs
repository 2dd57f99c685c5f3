//! Chart Renderer: SVG bar and line charts.
//!
//! Every figure is a standalone SVG document. Charts are built in memory as
//! [`Chart`] values and written to a directory afterwards, one file per
//! figure: one bar chart per pollutant and one line chart across states.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::ChartOrder;
use crate::error::{AqiError, Result};
use crate::pollutant::PollutantShares;
use crate::state::StateTrends;

/// File name of the state line chart.
pub const STATE_CHART_FILE: &str = "aqi-trends-by-state.svg";
/// Title of the state line chart.
pub const STATE_CHART_TITLE: &str = "AQI Trends by State";

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 520.0;
const LEFT: f64 = 80.0;
const TOP: f64 = 50.0;
const BOTTOM: f64 = 100.0;
const BAR_RIGHT: f64 = 40.0;
// Room for the legend.
const LINE_RIGHT: f64 = 190.0;
const Y_TICKS: usize = 5;

const BAR_COLOR: &str = "#87ceeb";
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// One rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub file_name: String,
    pub title: String,
    pub svg: String,
}

/// One bar chart per pollutant, x = year (first-seen order), y = percentage.
pub fn pollutant_bar_charts(shares: &PollutantShares) -> Vec<Chart> {
    if shares.is_empty() {
        return Vec::new();
    }
    let mut taken = HashSet::new();
    shares
        .pollutants()
        .iter()
        .filter_map(|pollutant| {
            let bars: Vec<(String, f64)> = shares
                .series(pollutant)?
                .into_iter()
                .map(|(year, pct)| (year.to_string(), pct))
                .collect();
            let title = format!("{pollutant} Percentage Over Years");
            let svg = bar_chart_svg(&title, "Year", "Pollutant Percentage", &bars);
            Some(Chart {
                file_name: unique_file_name(&mut taken, &slug(pollutant)),
                title,
                svg,
            })
        })
        .collect()
}

/// All states overlaid on one line chart, x = year, y = AQI.
///
/// Returns `None` when no state has readings.
pub fn state_line_chart(trends: &StateTrends, order: ChartOrder) -> Option<Chart> {
    if trends.is_empty() {
        return None;
    }
    let names: Vec<&str> = match order {
        ChartOrder::Sorted => trends.sorted_states(),
        ChartOrder::Encounter => trends.states_in_encounter_order().collect(),
    };
    let series: Vec<(&str, Vec<(f64, f64)>)> = names
        .into_iter()
        .filter_map(|name| {
            let points = trends
                .series(name)?
                .points()
                .map(|(year, aqi)| (f64::from(year), aqi as f64))
                .collect();
            Some((name, points))
        })
        .collect();

    Some(Chart {
        file_name: STATE_CHART_FILE.to_string(),
        title: STATE_CHART_TITLE.to_string(),
        svg: line_chart_svg(STATE_CHART_TITLE, "Year", "AQI", &series),
    })
}

/// Write each chart into `dir`, creating it if needed.
pub fn write_charts(dir: &Path, charts: &[Chart]) -> Result<Vec<PathBuf>> {
    if charts.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir).map_err(|e| AqiError::io(dir, e))?;

    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = dir.join(&chart.file_name);
        fs::write(&path, &chart.svg).map_err(|e| AqiError::io(&path, e))?;
        debug!("wrote '{}' to {}", chart.title, path.display());
        written.push(path);
    }
    info!("wrote {} charts to {}", written.len(), dir.display());
    Ok(written)
}

fn bar_chart_svg(title: &str, x_label: &str, y_label: &str, bars: &[(String, f64)]) -> String {
    let plot_w = WIDTH - LEFT - BAR_RIGHT;
    let plot_h = HEIGHT - TOP - BOTTOM;
    let base = TOP + plot_h;
    let y_max = nice_max(bars.iter().map(|(_, v)| *v).fold(0.0, f64::max));

    let mut body = y_grid(y_max, LEFT + plot_w);

    let slot = plot_w / bars.len().max(1) as f64;
    for (i, (label, value)) in bars.iter().enumerate() {
        let h = (value.max(0.0) / y_max) * plot_h;
        let x = LEFT + i as f64 * slot + slot * 0.1;
        let cx = LEFT + (i as f64 + 0.5) * slot;
        body.push_str(&format!(
            r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{BAR_COLOR}"><title>{}: {:.2}</title></rect>
"##,
            x,
            base - h,
            slot * 0.8,
            h,
            escape(label),
            value
        ));
        body.push_str(&rotated_tick(cx, base, label));
    }

    frame(title, x_label, y_label, LEFT + plot_w, &body)
}

fn line_chart_svg(
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[(&str, Vec<(f64, f64)>)],
) -> String {
    let plot_w = WIDTH - LEFT - LINE_RIGHT;
    let plot_h = HEIGHT - TOP - BOTTOM;
    let base = TOP + plot_h;

    let all = series.iter().flat_map(|(_, pts)| pts.iter());
    let (mut x_min, mut x_max) = all
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        });
    if !x_min.is_finite() {
        (x_min, x_max) = (0.0, 1.0);
    }
    if x_min == x_max {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let y_max = nice_max(all.clone().map(|(_, y)| *y).fold(0.0, f64::max));

    let sx = |x: f64| LEFT + (x - x_min) / (x_max - x_min) * plot_w;
    let sy = |y: f64| base - (y.max(0.0) / y_max) * plot_h;

    let mut body = y_grid(y_max, LEFT + plot_w);

    let mut years: Vec<f64> = all.map(|(x, _)| *x).collect();
    years.sort_by(f64::total_cmp);
    years.dedup();
    let step = years.len().div_ceil(15).max(1);
    for year in years.iter().step_by(step) {
        body.push_str(&rotated_tick(sx(*year), base, &format!("{year:.0}")));
    }

    for (i, (name, points)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let path: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", sx(*x), sy(*y)))
            .collect();
        body.push_str(&format!(
            r##"  <polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>
"##,
            path.join(" ")
        ));
        for (x, y) in points {
            body.push_str(&format!(
                r##"  <circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{color}"/>
"##,
                sx(*x),
                sy(*y)
            ));
        }

        let ly = TOP + 10.0 + i as f64 * 18.0;
        let lx = LEFT + plot_w + 20.0;
        body.push_str(&format!(
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{color}" stroke-width="3"/>
  <text x="{:.1}" y="{:.1}" font-size="12" fill="#374151">{}</text>
"##,
            lx,
            ly,
            lx + 20.0,
            ly,
            lx + 26.0,
            ly + 4.0,
            escape(name)
        ));
    }

    frame(title, x_label, y_label, LEFT + plot_w, &body)
}

/// Outer document: title, axis labels, axes, then `body`.
fn frame(title: &str, x_label: &str, y_label: &str, right: f64, body: &str) -> String {
    let base = HEIGHT - BOTTOM;
    let mid_x = (LEFT + right) / 2.0;
    let mid_y = (TOP + base) / 2.0;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background:white">
  <text x="{mid_x:.1}" y="28" text-anchor="middle" font-size="16" font-weight="600" fill="#111827">{title}</text>
  <text x="{mid_x:.1}" y="{xl:.1}" text-anchor="middle" font-size="13" fill="#374151">{x_label}</text>
  <text x="20" y="{mid_y:.1}" text-anchor="middle" font-size="13" fill="#374151" transform="rotate(-90, 20, {mid_y:.1})">{y_label}</text>
{body}  <line x1="{LEFT}" y1="{base}" x2="{right:.1}" y2="{base}" stroke="#374151" stroke-width="1"/>
  <line x1="{LEFT}" y1="{TOP}" x2="{LEFT}" y2="{base}" stroke="#374151" stroke-width="1"/>
</svg>
"##,
        w = WIDTH,
        h = HEIGHT,
        xl = HEIGHT - 12.0,
        title = escape(title),
        x_label = escape(x_label),
        y_label = escape(y_label),
    )
}

/// Horizontal grid lines with value labels on the y axis.
fn y_grid(y_max: f64, right: f64) -> String {
    let plot_h = HEIGHT - TOP - BOTTOM;
    let mut out = String::new();
    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = TOP + plot_h - plot_h * i as f64 / Y_TICKS as f64;
        out.push_str(&format!(
            r##"  <line x1="{LEFT}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#e5e7eb" stroke-width="1"/>
  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#6b7280">{}</text>
"##,
            LEFT - 6.0,
            y + 4.0,
            tick_label(value)
        ));
    }
    out
}

/// X tick label rotated 45 degrees below the axis.
fn rotated_tick(x: f64, base: f64, label: &str) -> String {
    let y = base + 16.0;
    format!(
        r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" fill="#6b7280" transform="rotate(-45, {x:.1}, {y:.1})">{}</text>
"##,
        escape(label)
    )
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Smallest 1, 2 or 5 times a power of ten that is >= `value`.
fn nice_max(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `pollutant-<slug>.svg`, with `-2`, `-3`, ... appended when another
/// pollutant already claimed the name.
fn unique_file_name(taken: &mut HashSet<String>, slug: &str) -> String {
    let mut name = format!("pollutant-{slug}.svg");
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("pollutant-{slug}-{n}.svg");
        n += 1;
    }
    name
}

/// Lowercase file-name fragment: alphanumerics kept, runs of anything else
/// collapsed to one `-`.
fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
