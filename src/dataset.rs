//! Tabular, discretized time-series data.
//!
//! A `Dataset` is a table of named columns, one row per time step. Column names are stable
//! identifiers: they become the node names of learned network structures. Values are
//! categorical; each column stores its sorted distinct *levels* and a per-row code into them.

use crate::util::{PearlError, Result};

use indexmap::IndexMap;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single discrete column.
#[derive(Clone, Debug)]
pub struct Column {
    /// The sorted distinct values observed in this column
    levels: Vec<String>,

    /// Per-row index into `levels`
    codes: Vec<usize>,
}

impl Column {
    /// The sorted distinct values of the column
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// The number of distinct values of the column
    pub fn cardinality(&self) -> usize {
        self.levels.len()
    }

    /// Per-row level indices
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    /// The label of the value in the given row
    pub fn label(&self, row: usize) -> &str {
        &self.levels[self.codes[row]]
    }

    /// All row values as labels, in row order
    pub fn labels(&self) -> Vec<String> {
        self.codes.iter().map(|&c| self.levels[c].clone()).collect()
    }
}

/// A table of named discrete columns.
#[derive(Clone, Debug)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Dataset {
    /// Read a `Dataset` from a CSV file.
    ///
    /// The first CSV column is the time index and is skipped; the remaining header names
    /// become the column identifiers.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        Dataset::from_csv_reader(file)
    }

    /// Read a `Dataset` from any CSV source (see `from_csv_path` for the expected layout).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let names: Vec<String> = csv
            .headers()?
            .iter()
            .skip(1)
            .map(String::from)
            .collect();

        if names.is_empty() {
            return Err(PearlError::General(String::from(
                "input table has no feature columns",
            )));
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in csv.records() {
            let record = record?;
            if record.len() != names.len() + 1 {
                return Err(PearlError::General(format!(
                    "expected {} fields per row, found {}",
                    names.len() + 1,
                    record.len()
                )));
            }

            for (col, field) in raw.iter_mut().zip(record.iter().skip(1)) {
                col.push(String::from(field.trim()));
            }
        }

        Dataset::from_raw_columns(names, raw)
    }

    fn from_raw_columns(names: Vec<String>, raw: Vec<Vec<String>>) -> Result<Dataset> {
        let rows = raw.first().map_or(0, |c| c.len());
        if let Some(short) = raw.iter().find(|c| c.len() != rows) {
            return Err(PearlError::General(format!(
                "expected {} rows per column, found {}",
                rows,
                short.len()
            )));
        }

        let mut columns = IndexMap::new();
        for (name, values) in names.into_iter().zip(raw) {
            let mut levels: Vec<String> = values.to_vec();
            levels.sort();
            levels.dedup();

            let codes = values
                .iter()
                .map(|v| levels.binary_search(v).unwrap())
                .collect();

            if columns
                .insert(name.clone(), Column { levels, codes })
                .is_some()
            {
                return Err(PearlError::DuplicateVariable);
            }
        }

        Ok(Dataset { columns, rows })
    }

    /// Build a `Dataset` directly from (name, row values) pairs. Intended for tests and
    /// programmatic use; levels are derived exactly as in CSV loading.
    pub fn from_columns<I, S>(columns: I) -> Result<Dataset>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut raw = Vec::new();
        for (name, values) in columns {
            names.push(name.into());
            raw.push(values.into_iter().map(Into::into).collect());
        }

        Dataset::from_raw_columns(names, raw)
    }

    /// The number of rows (time steps)
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// The number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Lookup a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| PearlError::UnknownVariable(String::from(name)))
    }

    /// The cardinality of the named column
    pub fn cardinality(&self, name: &str) -> Result<usize> {
        self.column(name).map(Column::cardinality)
    }
}
