//! In-memory phrase table
//!
//! The table is loaded from disk once at program startup and never mutated
//! afterwards. Row indices handed out by a search therefore remain valid for
//! the whole session, which lets search results reference their source rows
//! by position instead of copying them around.

mod load;

pub use load::load;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Name of the column that fuzzy search runs against
pub const PHRASE_COLUMN: &str = "phrase";

/// Name of the column that ranks the idle preview
pub const TOTAL_COUNT_COLUMN: &str = "total_count";

/// Name of one column of the table
pub type ColumnName = Box<str>;

/// Value of one table cell
///
/// Fields are typed the way a spreadsheet import would type them: integers
/// and floating-point numbers are recognized, anything else stays text. The
/// phrase column is exempt from this inference and always holds text, so
/// that numeric-looking phrases still go through fuzzy matching.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Integer field
    Int(i64),

    /// Floating-point field
    Float(f64),

    /// Anything that does not parse as a number
    Text(Box<str>),

    /// Empty field
    Empty,
}
//
impl Cell {
    /// Infer a typed value from one raw field
    fn parse(field: &str) -> Self {
        if field.is_empty() {
            return Self::Empty;
        }
        if let Ok(int) = field.parse::<i64>() {
            return Self::Int(int);
        }
        if let Ok(float) = field.parse::<f64>() {
            return Self::Float(float);
        }
        Self::Text(field.into())
    }

    /// JSON rendition of the cell (non-finite floats degrade to null)
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(int) => Value::from(*int),
            Self::Float(float) => Value::from(*float),
            Self::Text(text) => Value::from(&**text),
            Self::Empty => Value::Null,
        }
    }
}
//
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) => write!(f, "{float}"),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

/// One row of the table
#[derive(Clone, Debug, PartialEq)]
pub struct Row(Box<[Cell]>);
//
impl Row {
    /// Cells of this row, in the same order as [`Table::columns()`]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }
}

/// Phrase frequency table
///
/// Guaranteed to have a "phrase" column whose cells all hold text, and at
/// least one data row.
#[derive(Debug)]
pub struct Table {
    /// Column names, in file order
    columns: Box<[ColumnName]>,

    /// Position of [`PHRASE_COLUMN`] within `columns`
    phrase_col: usize,

    /// Position of [`TOTAL_COUNT_COLUMN`] within `columns`, if present
    total_count_col: Option<usize>,

    /// Data rows, in file order
    rows: Box<[Row]>,
}
//
impl Table {
    /// Column names, in file order
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Row at a given index, which must come from this table
    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// Phrase of the row at a given index
    pub fn phrase(&self, index: usize) -> &str {
        match &self.rows[index].0[self.phrase_col] {
            Cell::Text(text) => text,
            _ => unreachable!("phrase cells are forced to text at load time"),
        }
    }

    /// All phrases, in row order
    pub fn phrases(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(|index| self.phrase(index))
    }

    /// Truth that the idle preview can rank rows by total count
    pub fn has_total_counts(&self) -> bool {
        self.total_count_col.is_some()
    }

    /// Preview ranking value of the row at a given index
    ///
    /// None when the table has no total count column, or when the cell does
    /// not hold a usable count.
    pub fn total_count(&self, index: usize) -> Option<u64> {
        let col = self.total_count_col?;
        match &self.rows[index].0[col] {
            Cell::Int(int) => u64::try_from(*int).ok(),
            Cell::Float(float) if float.is_finite() && *float >= 0.0 => Some(*float as u64),
            _ => None,
        }
    }
}

/// Step by step table construction as the loader streams records in
pub(crate) struct TableBuilder {
    /// Column names from the header row
    columns: Box<[ColumnName]>,

    /// Position of [`PHRASE_COLUMN`] within `columns`
    phrase_col: usize,

    /// Position of [`TOTAL_COUNT_COLUMN`] within `columns`, if present
    total_count_col: Option<usize>,

    /// Rows integrated so far
    rows: Vec<Row>,
}
//
impl TableBuilder {
    /// Check the header row and prepare to accumulate records
    pub fn new(columns: impl IntoIterator<Item = ColumnName>) -> Result<Self, LoadError> {
        let columns = columns.into_iter().collect::<Box<[ColumnName]>>();
        let Some(phrase_col) = columns.iter().position(|c| &**c == PHRASE_COLUMN) else {
            return Err(LoadError::MissingPhraseColumn {
                columns: columns.join(", ").into(),
            });
        };
        let total_count_col = columns.iter().position(|c| &**c == TOTAL_COUNT_COLUMN);
        Ok(Self {
            columns,
            phrase_col,
            total_count_col,
            rows: Vec::new(),
        })
    }

    /// Integrate one record's raw fields, in column order
    ///
    /// The phrase field is kept as text unconditionally, every other field
    /// goes through type inference.
    pub fn push_record<'fields>(&mut self, fields: impl IntoIterator<Item = &'fields str>) {
        let cells = (fields.into_iter().enumerate())
            .map(|(col, field)| {
                if col == self.phrase_col {
                    Cell::Text(field.into())
                } else {
                    Cell::parse(field)
                }
            })
            .collect::<Box<[Cell]>>();
        debug_assert_eq!(
            cells.len(),
            self.columns.len(),
            "ragged records are rejected by the reader before they get here"
        );
        self.rows.push(Row(cells));
    }

    /// Finalize the table once every record has been integrated
    pub fn finish(self) -> Result<Table, LoadError> {
        if self.rows.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Table {
            columns: self.columns,
            phrase_col: self.phrase_col,
            total_count_col: self.total_count_col,
            rows: self.rows.into(),
        })
    }
}

/// Failure modes of the initial table load
///
/// Any of these aborts startup: the interactive session never begins with a
/// partially loaded table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Dataset file could not be opened
    #[error("could not open {path}")]
    Open {
        /// Path that was requested
        path: Box<str>,

        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Dataset file could not be decoded as delimiter-separated values
    #[error("could not parse {path}")]
    Parse {
        /// Path that was being read
        path: Box<str>,

        /// Underlying decoding error
        source: csv_async::Error,
    },

    /// Table has no phrase column to search against
    #[error("no \"phrase\" column to search against (found: {columns})")]
    MissingPhraseColumn {
        /// Comma-separated list of the columns that were found
        columns: Box<str>,
    },

    /// Table has a header but no data rows
    #[error("the table contains no data rows")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(columns: &[&str], records: &[&[&str]]) -> Result<Table, LoadError> {
        let mut builder = TableBuilder::new(columns.iter().copied().map(Box::from))?;
        for record in records {
            builder.push_record(record.iter().copied());
        }
        builder.finish()
    }

    #[test]
    fn cell_inference_recognizes_numbers() {
        assert_eq!(Cell::parse("42"), Cell::Int(42));
        assert_eq!(Cell::parse("-7"), Cell::Int(-7));
        assert_eq!(Cell::parse("3.5"), Cell::Float(3.5));
        assert_eq!(Cell::parse("1e3"), Cell::Float(1000.0));
        assert_eq!(Cell::parse("kalkınma"), Cell::Text("kalkınma".into()));
        assert_eq!(Cell::parse(""), Cell::Empty);
    }

    #[test]
    fn numeric_phrases_stay_text() {
        let table = build(&["phrase", "total_count"], &[&["12345", "10"]])
            .expect("a well formed table should build");
        assert_eq!(table.phrase(0), "12345");
        assert_eq!(table.total_count(0), Some(10));
    }

    #[test]
    fn missing_phrase_column_is_rejected() {
        let result = build(&["word", "count"], &[&["a", "1"]]);
        assert!(matches!(result, Err(LoadError::MissingPhraseColumn { .. })));
    }

    #[test]
    fn tables_without_rows_are_rejected() {
        assert!(matches!(
            build(&["phrase", "total_count"], &[]),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn total_counts_tolerate_junk_cells() {
        let table = build(
            &["phrase", "total_count"],
            &[
                &["a", "10"],
                &["b", "2.0"],
                &["c", "lots"],
                &["d", ""],
                &["e", "-3"],
            ],
        )
        .expect("a well formed table should build");
        assert_eq!(table.total_count(0), Some(10));
        assert_eq!(table.total_count(1), Some(2));
        assert_eq!(table.total_count(2), None);
        assert_eq!(table.total_count(3), None);
        assert_eq!(table.total_count(4), None);
    }

    #[test]
    fn total_counts_are_optional() {
        let table =
            build(&["phrase"], &[&["a"], &["b"]]).expect("a well formed table should build");
        assert!(!table.has_total_counts());
        assert_eq!(table.total_count(0), None);
    }

    #[test]
    fn cells_render_to_json() {
        assert_eq!(Cell::Int(5).to_json(), json!(5));
        assert_eq!(Cell::Text("ok".into()).to_json(), json!("ok"));
        assert_eq!(Cell::Empty.to_json(), Value::Null);
        assert_eq!(Cell::Float(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn phrases_come_out_in_row_order() {
        let table = build(
            &["phrase", "total_count"],
            &[&["bir", "3"], &["iki", "2"], &["üç", "1"]],
        )
        .expect("a well formed table should build");
        assert_eq!(table.phrases().collect::<Vec<_>>(), ["bir", "iki", "üç"]);
    }
}
