//! State Trend Aggregator: per-state (year, AQI) series.

use std::collections::HashMap;

use log::debug;

use crate::error::{AqiError, Result};
use crate::record::Record;

/// Years and AQI values for one state, in file-encounter order.
///
/// Both sequences grow together, index `i` is one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSeries {
    years: Vec<i32>,
    aqi_values: Vec<i64>,
}

impl StateSeries {
    pub fn push(&mut self, year: i32, aqi: i64) {
        self.years.push(year);
        self.aqi_values.push(aqi);
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn aqi_values(&self) -> &[i64] {
        &self.aqi_values
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// `(year, aqi)` pairs in encounter order.
    pub fn points(&self) -> impl Iterator<Item = (i32, i64)> + '_ {
        self.years
            .iter()
            .copied()
            .zip(self.aqi_values.iter().copied())
    }

    /// Arithmetic mean of the AQI values, `None` for an empty series.
    pub fn average(&self) -> Option<f64> {
        if self.aqi_values.is_empty() {
            return None;
        }
        let sum: i64 = self.aqi_values.iter().sum();
        Some(sum as f64 / self.aqi_values.len() as f64)
    }
}

/// State directory: every state's series plus its first-seen position.
#[derive(Debug, Clone, Default)]
pub struct StateTrends {
    states: Vec<(String, StateSeries)>,
    index: HashMap<String, usize>,
}

impl StateTrends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record's year and AQI to its state's series.
    pub fn add(&mut self, record: &Record) {
        let slot = match self.index.get(&record.state) {
            Some(&slot) => slot,
            None => {
                debug!("new state '{}'", record.state);
                self.states
                    .push((record.state.clone(), StateSeries::default()));
                self.index
                    .insert(record.state.clone(), self.states.len() - 1);
                self.states.len() - 1
            }
        };
        self.states[slot].1.push(record.year, record.aqi);
    }

    pub fn ingest<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.add(record);
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn series(&self, state: &str) -> Option<&StateSeries> {
        self.index.get(state).map(|&slot| &self.states[slot].1)
    }

    /// State names sorted lexicographically. The directory is unchanged.
    pub fn sorted_states(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.iter().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// State names in the order they first appeared in the input.
    pub fn states_in_encounter_order(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|(name, _)| name.as_str())
    }

    /// Mean AQI for `state`.
    pub fn average(&self, state: &str) -> Result<f64> {
        self.series(state)
            .and_then(StateSeries::average)
            .ok_or_else(|| AqiError::UnknownState(state.to_string()))
    }
}
