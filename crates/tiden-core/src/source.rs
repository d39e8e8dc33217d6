// File: crates/tiden-core/src/source.rs
// Summary: Tabular data boundary (Table/Row) and a CSV-backed data source.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// One raw record; cells are aligned with `Table::columns`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { cells: cells.into_iter().map(Into::into).collect() }
    }

    /// Cell at `index`; ragged rows read as empty.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// An already-parsed table with a stable column ordering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(Row::new(cells));
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can produce a table. Failures are surfaced to the caller;
/// the chart performs no retry.
pub trait DataSource {
    fn load(&mut self) -> Result<Table, SourceError>;
}

impl DataSource for Table {
    fn load(&mut self) -> Result<Table, SourceError> {
        Ok(self.clone())
    }
}

enum CsvInput {
    Path(PathBuf),
    Reader(Box<dyn Read>),
}

/// CSV source with a header row. Rows may be ragged.
pub struct CsvSource {
    input: Option<CsvInput>,
    location: String,
}

impl CsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();
        Self { input: Some(CsvInput::Path(path)), location }
    }

    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Self { input: Some(CsvInput::Reader(Box::new(reader))), location: "<reader>".to_string() }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn read_table<R: Read>(reader: R) -> Result<Table, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
        if columns.is_empty() {
            return Err(SourceError::MissingHeader);
        }
        let mut table = Table::new(columns);
        for rec in rdr.records() {
            let rec = rec?;
            table.push_row(Row::new(rec.iter()));
        }
        Ok(table)
    }
}

impl DataSource for CsvSource {
    /// One-shot: a second call reads nothing and returns an empty table.
    fn load(&mut self) -> Result<Table, SourceError> {
        let table = match self.input.take() {
            Some(CsvInput::Path(path)) => {
                let file = File::open(&path).map_err(|source| SourceError::Io {
                    location: path.display().to_string(),
                    source,
                })?;
                Self::read_table(file)?
            }
            Some(CsvInput::Reader(reader)) => Self::read_table(reader)?,
            None => Table::default(),
        };
        tracing::info!(location = %self.location, rows = table.rows.len(), columns = table.columns.len(), "loaded table");
        Ok(table)
    }
}
