//! Record Reader: turns a comma-separated dataset into [`Record`]s.
//!
//! The first line is the header. Its columns from [`POLLUTANT_START`] to the
//! end name the pollutants, and fix how many trailing values every data row
//! contributes. All other fields are taken by position, see [`crate::record`].
//!
//! ```
//! use aqi_trends::RecordReader;
//!
//! let mut header: Vec<String> = (0..19).map(|i| format!("c{i}")).collect();
//! header.extend(["CO".to_string(), "NO2".to_string()]);
//! let mut row: Vec<String> = (0..19).map(|_| "0".to_string()).collect();
//! row[1] = "2019".into();
//! row[2] = "CA".into();
//! row[16] = "50".into();
//! row.extend(["2.0".to_string(), "3.0".to_string()]);
//! let text = format!("{}\n{}\n", header.join(","), row.join(","));
//!
//! let mut reader = RecordReader::from_reader(text.as_bytes()).unwrap();
//! assert_eq!(reader.pollutants(), ["CO", "NO2"]);
//! let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
//! assert_eq!(records[0].state, "CA");
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

use crate::error::{AqiError, Result};
use crate::record::{POLLUTANT_START, Record};

/// Positional reader over a delimited AQI dataset.
pub struct RecordReader<R> {
    inner: csv::Reader<R>,
    pollutants: Vec<String>,
}

impl RecordReader<io::Cursor<Vec<u8>>> {
    /// Load the whole file at `path` into memory and read its header.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| AqiError::io(path, e))?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_reader(io::Cursor::new(bytes))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap any byte source. The header line is consumed immediately so
    /// that the pollutant schema is known before the first record.
    pub fn from_reader(source: R) -> Result<Self> {
        let mut inner = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);

        let header = inner
            .headers()
            .map_err(|source| AqiError::Csv { line: 1, source })?;
        let pollutants = pollutant_names(header)?;

        Ok(RecordReader { inner, pollutants })
    }

    /// Pollutant column names from the header, one per column in file
    /// order. A name may repeat; the pollutant aggregate merges repeats.
    pub fn pollutants(&self) -> &[String] {
        &self.pollutants
    }

    /// Iterate the data rows. The first malformed row yields an error;
    /// callers are expected to stop there.
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record>> + '_ {
        let count = self.pollutants.len();
        self.inner
            .records()
            .enumerate()
            .map(move |(idx, row)| {
                // Fallback when the decoder has no position: header is line 1.
                let fallback = idx as u64 + 2;
                let row = row.map_err(|source| AqiError::Csv {
                    line: source.position().map_or(fallback, |p| p.line()),
                    source,
                })?;
                let line = row.position().map_or(fallback, |p| p.line());
                Record::from_fields(line, row.iter(), count)
            })
    }
}

fn pollutant_names(header: &StringRecord) -> Result<Vec<String>> {
    if header.len() < POLLUTANT_START {
        return Err(AqiError::Schema {
            columns: header.len(),
            required: POLLUTANT_START,
        });
    }
    Ok(header
        .iter()
        .skip(POLLUTANT_START)
        .map(str::to_string)
        .collect())
}

/// A fully loaded dataset: the pollutant schema plus every data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub pollutants: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read every record from `path`, aborting on the first bad row.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = RecordReader::from_path(path)?;
    let records = reader.records().collect::<Result<Vec<_>>>()?;
    let pollutants = reader.pollutants;

    info!(
        "loaded {} rows with {} pollutants from {}",
        records.len(),
        pollutants.len(),
        path.display()
    );
    Ok(Dataset {
        pollutants,
        records,
    })
}
