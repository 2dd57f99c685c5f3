//! Dataset rows and the fixed column layout they are read with.
//!
//! The input file is addressed by position, never by header name:
//!
//! | Column | Content                          |
//! |--------|----------------------------------|
//! | 1      | year (integer)                   |
//! | 2      | state name                       |
//! | 16     | AQI (integer)                    |
//! | 19..   | pollutant values (real numbers)  |
//!
//! Every other column in `0..19` is carried by the file but unused here.

use std::str::FromStr;

use crate::error::{AqiError, Result};

/// Column holding the observation year.
pub const YEAR_COLUMN: usize = 1;
/// Column holding the state name.
pub const STATE_COLUMN: usize = 2;
/// Column holding the overall AQI value.
pub const AQI_COLUMN: usize = 16;
/// First pollutant column; pollutants run from here to the end of the header.
pub const POLLUTANT_START: usize = 19;

/// One data row of the dataset.
///
/// `pollutants` holds one value per header pollutant, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub state: String,
    pub aqi: i64,
    pub pollutants: Vec<f64>,
}

impl Record {
    /// Build a record from already-split, trimmed fields.
    ///
    /// `line` is the 1-based file line used in error messages and
    /// `pollutant_count` is the number of pollutant columns named by the
    /// header. Fields past the pollutant schema are ignored.
    pub fn from_fields<'a, I>(line: u64, fields: I, pollutant_count: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let field = |column: usize| {
            fields.get(column).copied().ok_or(AqiError::MissingField {
                line,
                column,
                found: fields.len(),
            })
        };

        let year = parse_int(line, YEAR_COLUMN, field(YEAR_COLUMN)?)?;
        let state = field(STATE_COLUMN)?.to_string();
        let aqi = parse_int(line, AQI_COLUMN, field(AQI_COLUMN)?)?;

        let pollutants = (POLLUTANT_START..POLLUTANT_START + pollutant_count)
            .map(|column| {
                let value = field(column)?;
                value.parse::<f64>().map_err(|_| AqiError::ParseFloat {
                    line,
                    column,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Record {
            year,
            state,
            aqi,
            pollutants,
        })
    }

    /// Pair each pollutant value with its name from the header schema.
    pub fn pollutant_values<'a>(
        &'a self,
        names: &'a [String],
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        names
            .iter()
            .map(String::as_str)
            .zip(self.pollutants.iter().copied())
    }
}

fn parse_int<T: FromStr>(line: u64, column: usize, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| AqiError::ParseInt {
        line,
        column,
        value: value.to_string(),
    })
}
