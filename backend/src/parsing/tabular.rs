//! Tab-delimited table reader.
//!
//! An upload is treated as tabular text only when its display name ends with
//! the configured suffix (`.txt` by default). The first non-blank line is the
//! header; every following line must have exactly as many fields as the
//! header. A row of a different width fails the whole read rather than being
//! padded or truncated.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ErrorContext, IngestError, IngestResult};
use crate::logging::FailureLog;
use crate::storage::ScratchFile;

/// A single parsed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Type a raw field: blank is `Empty`, a finite float is `Number`,
    /// anything else is kept as `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A parsed table: one header and rows of equal width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Rows as ordered column-name → value maps.
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows().map(|r| r.to_map()).collect()
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let cells = self.cells;
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &cells[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        let (columns, cells) = (self.columns, self.cells);
        columns.iter().map(String::as_str).zip(cells.iter())
    }

    pub fn to_map(&self) -> IndexMap<String, CellValue> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Parse tab-delimited bytes. `source` identifies the input in error context.
pub fn parse_tab_delimited(bytes: &[u8], source: &str) -> IngestResult<TabularTable> {
    let ctx = || ErrorContext::new("parse_table").with_file(source);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| IngestError::malformed(e.to_string(), ctx()))?,
        None => return Err(IngestError::malformed("missing header row", ctx())),
    };

    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for (idx, name) in header.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(IngestError::malformed(
                format!("column {} has an empty name", idx),
                ctx(),
            ));
        }
        if columns.iter().any(|c| c == name) {
            return Err(IngestError::malformed(
                format!("duplicate column name {:?}", name),
                ctx(),
            ));
        }
        columns.push(name.to_string());
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| IngestError::malformed(e.to_string(), ctx()))?;
        if record.len() != columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(IngestError::malformed(
                format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    columns.len(),
                    record.len()
                ),
                ctx(),
            ));
        }
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(TabularTable { columns, rows })
}

/// Reads scratch files into [`TabularTable`]s.
pub struct TabularReader {
    suffix: String,
    log: Arc<dyn FailureLog>,
}

impl TabularReader {
    pub fn new(suffix: impl Into<String>, log: Arc<dyn FailureLog>) -> Self {
        Self {
            suffix: suffix.into(),
            log,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether a display name marks the file as tab-delimited text.
    pub fn accepts(&self, name: &str) -> bool {
        name.ends_with(&self.suffix)
    }

    /// Read and parse a scratch file. Failures are logged before returning.
    pub async fn read(&self, file: &ScratchFile) -> IngestResult<TabularTable> {
        let result = self.read_unlogged(file).await;
        if let Err(ref e) = result {
            tracing::error!(
                path = %file.path().display(),
                name = file.display_name(),
                error = %e,
                "failed to read tabular file"
            );
            self.log
                .record(&format!("Error reading file {}: {}", file.path().display(), e));
        }
        result
    }

    async fn read_unlogged(&self, file: &ScratchFile) -> IngestResult<TabularTable> {
        if !self.accepts(file.display_name()) {
            return Err(IngestError::unsupported_format(file.display_name()));
        }
        let bytes = file.read_bytes().await?;
        parse_tab_delimited(&bytes, &file.path().display().to_string())
    }
}
