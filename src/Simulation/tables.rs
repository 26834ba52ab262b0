//! Tab-delimited per-timestep tables produced by the simulator.
//!
//! Both tables share a layout: a header row, then one row per timestep whose first
//! two columns are metadata (timestep label and, for the usage table, the event
//! count) and whose remaining columns are percentages.
use crate::Utils::load_from_file::ensure_exists;
use crate::errors::Model2Error;
use log::info;
use std::path::{Path, PathBuf};

/// number of leading metadata columns in poe/por tables
pub const META_COLUMNS: usize = 2;

/// Raw rows of a tab-delimited table, trailing empty fields dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub path: PathBuf,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn trim_trailing_empty(mut fields: Vec<String>) -> Vec<String> {
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

impl RawTable {
    pub fn from_file(path: &Path) -> Result<Self, Model2Error> {
        ensure_exists(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Model2Error::csv(path, e))?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Model2Error::csv(path, e))?;
            let fields = trim_trailing_empty(record.iter().map(str::to_string).collect());
            if fields.is_empty() {
                continue;
            }
            records.push(fields);
        }
        let mut records = records.into_iter();
        let header = records.next().ok_or_else(|| Model2Error::EmptyTable {
            path: path.to_path_buf(),
        })?;
        if header.len() < META_COLUMNS {
            return Err(Model2Error::MissingColumns {
                path: path.to_path_buf(),
                found: header.len(),
                expected: META_COLUMNS,
            });
        }
        let table = RawTable {
            path: path.to_path_buf(),
            header,
            rows: records.collect(),
        };
        table.check_widths()?;
        Ok(table)
    }

    fn check_widths(&self) -> Result<(), Model2Error> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.header.len() {
                return Err(Model2Error::RaggedRow {
                    path: self.path.clone(),
                    row: i + 2,
                    found: row.len(),
                    expected: self.header.len(),
                });
            }
        }
        Ok(())
    }

    /// value column names (header entries after the metadata columns)
    pub fn value_columns(&self) -> Vec<String> {
        self.header.iter().skip(META_COLUMNS).cloned().collect()
    }

    /// Parses a percentage cell; `row` and `column` are 0-based data coordinates.
    fn number(&self, row: usize, column: usize) -> Result<f64, Model2Error> {
        let value = &self.rows[row][column];
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Model2Error::MalformedNumber {
                path: self.path.clone(),
                row: row + 2,
                column: column + 1,
                value: value.clone(),
            })
    }

    fn value_row(&self, row: usize) -> Result<Vec<f64>, Model2Error> {
        (META_COLUMNS..self.header.len())
            .map(|column| self.number(row, column))
            .collect()
    }
}

/// Element names from the header of a presence table, without loading its rows.
pub fn read_element_names(path: &Path) -> Result<Vec<String>, Model2Error> {
    ensure_exists(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Model2Error::csv(path, e))?;
    let header = reader.headers().map_err(|e| Model2Error::csv(path, e))?;
    let header = trim_trailing_empty(header.iter().map(str::to_string).collect());
    if header.is_empty() {
        return Err(Model2Error::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    Ok(header.into_iter().skip(META_COLUMNS).collect())
}

/// presence percentages of every element at one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// per-timestep element presence table (poe)
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceTable {
    pub elements: Vec<String>,
    pub timesteps: Vec<PresenceRow>,
}

impl PresenceTable {
    pub fn from_file(path: &Path) -> Result<Self, Model2Error> {
        let raw = RawTable::from_file(path)?;
        let mut timesteps = Vec::with_capacity(raw.rows.len());
        for (i, row) in raw.rows.iter().enumerate() {
            timesteps.push(PresenceRow {
                label: row[0].clone(),
                values: raw.value_row(i)?,
            });
        }
        let table = PresenceTable {
            elements: raw.value_columns(),
            timesteps,
        };
        info!(
            "Loaded presence of {} elements over {} timesteps from '{}'",
            table.elements.len(),
            table.timesteps.len(),
            path.display()
        );
        Ok(table)
    }
}

/// event count of one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct TimestepEvents {
    pub label: String,
    pub events: u64,
}

/// per-timestep rule usage table (por)
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTable {
    pub rule_names: Vec<String>,
    pub events: Vec<TimestepEvents>,
    /// usage percentages, one row per timestep, one column per rule
    pub usage: Vec<Vec<f64>>,
}

impl UsageTable {
    pub fn from_file(path: &Path) -> Result<Self, Model2Error> {
        let raw = RawTable::from_file(path)?;
        let mut events = Vec::with_capacity(raw.rows.len());
        let mut usage = Vec::with_capacity(raw.rows.len());
        for (i, row) in raw.rows.iter().enumerate() {
            let count = raw.number(i, 1)?;
            if count < 0.0 {
                return Err(Model2Error::MalformedNumber {
                    path: raw.path.clone(),
                    row: i + 2,
                    column: 2,
                    value: row[1].clone(),
                });
            }
            events.push(TimestepEvents {
                label: row[0].clone(),
                // event counts are written as floats; the fraction is dropped
                events: count.trunc() as u64,
            });
            usage.push(raw.value_row(i)?);
        }
        let table = UsageTable {
            rule_names: raw.value_columns(),
            events,
            usage,
        };
        info!(
            "Loaded usage of {} rules over {} timesteps from '{}'",
            table.rule_names.len(),
            table.events.len(),
            path.display()
        );
        Ok(table)
    }

    /// usage of rule column `rule` across all timesteps
    pub fn column(&self, rule: usize) -> Vec<f64> {
        self.usage.iter().map(|row| row[rule]).collect()
    }
}
