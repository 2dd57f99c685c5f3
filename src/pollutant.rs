//! Pollutant Aggregator: per-year pollutant totals and their percentage shares.
//!
//! Aggregation is a one-way transition between two types:
//!
//! - [`PollutantTotals`] accumulates raw sums per (year, pollutant).
//! - [`PollutantShares`] is produced by [`PollutantTotals::finalize`] and only
//!   holds percentages. It cannot be accumulated into or finalized again.
//!
//! Years keep the order in which they were first seen; pollutants keep header
//! order for every year.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::record::Record;

/// A pollutant's share of one year's total load, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.0);

    pub fn new(value: f64) -> Self {
        Percentage(value)
    }

    /// The value as it is printed, two decimals. Charts plot this.
    pub fn rounded(self) -> f64 {
        format!("{:.2}", self.0).parse().unwrap_or(self.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Running pollutant totals keyed by year, then by pollutant name.
///
/// Header columns sharing a name feed a single total.
#[derive(Debug, Clone, Default)]
pub struct PollutantTotals {
    columns: Vec<String>,
    pollutants: Vec<String>,
    slots: HashMap<String, usize>,
    years: Vec<(i32, Vec<f64>)>,
    index: HashMap<i32, usize>,
}

impl PollutantTotals {
    /// Start an empty aggregate for the header's pollutant columns, one
    /// name per column in file order.
    pub fn new(columns: Vec<String>) -> Self {
        let mut pollutants = Vec::new();
        let mut slots = HashMap::new();
        for name in &columns {
            if !slots.contains_key(name) {
                slots.insert(name.clone(), pollutants.len());
                pollutants.push(name.clone());
            }
        }
        PollutantTotals {
            columns,
            pollutants,
            slots,
            years: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Distinct pollutant names in first-seen header order.
    pub fn pollutants(&self) -> &[String] {
        &self.pollutants
    }

    /// Add one record's pollutant values to its year's running totals.
    ///
    /// Repeated records are not deduplicated; they add again.
    pub fn add(&mut self, record: &Record) {
        let width = self.pollutants.len();
        let slot = *self.index.entry(record.year).or_insert_with(|| {
            self.years.push((record.year, vec![0.0; width]));
            self.years.len() - 1
        });
        let totals = &mut self.years[slot].1;
        for (name, value) in record.pollutant_values(&self.columns) {
            if let Some(&column) = self.slots.get(name) {
                totals[column] += value;
            }
        }
    }

    /// Accumulate every record in `records`.
    pub fn ingest<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.add(record);
        }
    }

    /// Years in first-seen order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().map(|(year, _)| *year)
    }

    /// Accumulated total for one (year, pollutant) pair.
    pub fn total(&self, year: i32, pollutant: &str) -> Option<f64> {
        let column = *self.slots.get(pollutant)?;
        let slot = *self.index.get(&year)?;
        Some(self.years[slot].1[column])
    }

    /// Convert every year's totals into percentage shares.
    ///
    /// A year whose totals sum to exactly zero gets `0.00%` for every
    /// pollutant.
    pub fn finalize(self) -> PollutantShares {
        let years = self
            .years
            .into_iter()
            .map(|(year, totals)| {
                let sum: f64 = totals.iter().sum();
                let shares = if sum == 0.0 {
                    warn!("pollutant totals for {year} sum to zero");
                    vec![Percentage::ZERO; totals.len()]
                } else {
                    totals
                        .iter()
                        .map(|value| Percentage::new(value / sum * 100.0))
                        .collect()
                };
                debug!("{year}: pollutant sum {sum}");
                YearShares { year, shares }
            })
            .collect();

        PollutantShares {
            pollutants: self.pollutants,
            years,
        }
    }
}

/// Percentage shares for a single year, aligned with the pollutant schema.
#[derive(Debug, Clone, PartialEq)]
pub struct YearShares {
    pub year: i32,
    pub shares: Vec<Percentage>,
}

/// Finalized pollutant report. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantShares {
    pollutants: Vec<String>,
    years: Vec<YearShares>,
}

impl PollutantShares {
    pub fn pollutants(&self) -> &[String] {
        &self.pollutants
    }

    /// Per-year shares in first-seen year order.
    pub fn years(&self) -> &[YearShares] {
        &self.years
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn share(&self, year: i32, pollutant: &str) -> Option<Percentage> {
        let column = self.pollutants.iter().position(|p| p == pollutant)?;
        self.years
            .iter()
            .find(|y| y.year == year)
            .map(|y| y.shares[column])
    }

    /// One pollutant's series across years, as plotted: `(year, percent)`.
    pub fn series(&self, pollutant: &str) -> Option<Vec<(i32, f64)>> {
        let column = self.pollutants.iter().position(|p| p == pollutant)?;
        Some(
            self.years
                .iter()
                .map(|y| (y.year, y.shares[column].rounded()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, state: &str, aqi: i64, pollutants: &[f64]) -> Record {
        Record {
            year,
            state: state.to_string(),
            aqi,
            pollutants: pollutants.to_vec(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn example_records() -> Vec<Record> {
        vec![
            record(2019, "CA", 50, &[2.0, 3.0]),
            record(2019, "CA", 60, &[1.0, 4.0]),
            record(2019, "TX", 40, &[5.0, 5.0]),
        ]
    }

    #[test]
    fn test_worked_example() {
        let mut totals = PollutantTotals::new(names(&["CO", "NO2"]));
        totals.ingest(&example_records());
        assert_eq!(totals.total(2019, "CO"), Some(8.0));
        assert_eq!(totals.total(2019, "NO2"), Some(12.0));

        let shares = totals.finalize();
        assert_eq!(shares.share(2019, "CO").unwrap().to_string(), "40.00%");
        assert_eq!(shares.share(2019, "NO2").unwrap().to_string(), "60.00%");
    }

    #[test]
    fn test_zero_sum_year_is_all_zero() {
        let mut totals = PollutantTotals::new(names(&["CO", "NO2", "O3"]));
        totals.add(&record(2018, "OH", 10, &[0.0, 0.0, 0.0]));
        totals.add(&record(2019, "OH", 10, &[1.0, 0.0, 1.0]));
        let shares = totals.finalize();

        for share in &shares.years()[0].shares {
            assert_eq!(share.to_string(), "0.00%");
        }
        assert_eq!(shares.share(2019, "CO").unwrap().to_string(), "50.00%");
        assert_eq!(shares.share(2019, "NO2").unwrap().to_string(), "0.00%");
    }

    #[test]
    fn test_nonzero_years_sum_to_hundred() {
        let mut totals = PollutantTotals::new(names(&["A", "B", "C", "D"]));
        totals.add(&record(2000, "X", 1, &[1.0, 1.0, 1.0, 0.0]));
        totals.add(&record(2001, "X", 1, &[3.3, 7.1, 0.2, 9.9]));
        totals.add(&record(2001, "Y", 1, &[0.01, 2.5, 11.0, 4.0]));
        let shares = totals.finalize();

        for year in shares.years() {
            let sum: f64 = year.shares.iter().map(|p| p.rounded()).sum();
            let tolerance = 0.01 * year.shares.len() as f64;
            assert!((sum - 100.0).abs() <= tolerance, "{} sums to {sum}", year.year);
        }
    }

    #[test]
    fn test_order_independent() {
        let rows = vec![
            record(2019, "CA", 50, &[2.0, 3.0]),
            record(2020, "TX", 40, &[5.0, 1.0]),
            record(2019, "TX", 45, &[0.5, 9.0]),
            record(2020, "CA", 30, &[7.0, 2.0]),
        ];
        let mut forward = PollutantTotals::new(names(&["CO", "NO2"]));
        forward.ingest(&rows);
        let mut backward = PollutantTotals::new(names(&["CO", "NO2"]));
        backward.ingest(rows.iter().rev());

        let forward = forward.finalize();
        let backward = backward.finalize();
        for year in [2019, 2020] {
            for pollutant in ["CO", "NO2"] {
                assert_eq!(
                    forward.share(year, pollutant).unwrap().to_string(),
                    backward.share(year, pollutant).unwrap().to_string()
                );
            }
        }
    }

    #[test]
    fn test_years_keep_first_seen_order() {
        let mut totals = PollutantTotals::new(names(&["CO"]));
        totals.add(&record(2021, "A", 1, &[1.0]));
        totals.add(&record(2019, "A", 1, &[1.0]));
        totals.add(&record(2021, "A", 1, &[1.0]));
        totals.add(&record(2020, "A", 1, &[1.0]));
        assert_eq!(totals.years().collect::<Vec<_>>(), vec![2021, 2019, 2020]);
    }

    #[test]
    fn test_duplicates_add_again() {
        let mut totals = PollutantTotals::new(names(&["CO"]));
        let row = record(2019, "A", 1, &[2.5]);
        totals.ingest([&row, &row]);
        assert_eq!(totals.total(2019, "CO"), Some(5.0));
    }

    #[test]
    fn test_series_uses_printed_precision() {
        let mut totals = PollutantTotals::new(names(&["A", "B"]));
        totals.add(&record(2019, "X", 1, &[1.0, 2.0]));
        let shares = totals.finalize();
        assert_eq!(shares.series("A"), Some(vec![(2019, 33.33)]));
        assert_eq!(shares.series("B"), Some(vec![(2019, 66.67)]));
        assert_eq!(shares.series("C"), None);
    }

    #[test]
    fn test_repeated_header_names_share_one_total() {
        let mut totals = PollutantTotals::new(names(&["CO", "CO", "NO2"]));
        assert_eq!(totals.pollutants(), ["CO", "NO2"]);
        totals.add(&record(2019, "CA", 50, &[1.0, 2.0, 3.0]));
        assert_eq!(totals.total(2019, "CO"), Some(3.0));

        let shares = totals.finalize();
        assert_eq!(shares.pollutants(), ["CO", "NO2"]);
        assert_eq!(shares.years()[0].shares.len(), 2);
        assert_eq!(shares.share(2019, "CO").unwrap().to_string(), "50.00%");
        assert_eq!(shares.share(2019, "NO2").unwrap().to_string(), "50.00%");
    }

    #[test]
    fn test_empty_aggregate() {
        let shares = PollutantTotals::new(names(&["CO"])).finalize();
        assert!(shares.is_empty());
        assert_eq!(shares.pollutants(), ["CO"]);
        assert_eq!(shares.share(2019, "CO"), None);
    }
}
