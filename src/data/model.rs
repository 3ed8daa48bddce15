use std::collections::BTreeMap;

use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Dataset – one loaded table of benchmark measurements
// ---------------------------------------------------------------------------

/// A named table of numeric columns, all with the same number of rows.
///
/// Row order is the order of the source table and is never changed.
/// Blank cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Label used in log lines and errors (usually the file stem).
    pub name: String,
    /// Column names in source order.
    column_names: Vec<String>,
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from `(column name, values)` pairs in source order.
    ///
    /// Fails with [`PlotError::ColumnLengthMismatch`] when the columns
    /// disagree on the row count. A repeated column name keeps the first
    /// occurrence.
    pub fn from_columns<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let name = name.into();
        let mut column_names = Vec::new();
        let mut map = BTreeMap::new();
        let mut rows = None;

        for (col, values) in columns {
            let col = col.into();
            if map.contains_key(&col) {
                log::warn!("dataset '{name}': duplicate column '{col}' ignored");
                continue;
            }
            match rows {
                None => rows = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(PlotError::ColumnLengthMismatch {
                        dataset: name,
                        column: col,
                        expected,
                        found: values.len(),
                    });
                }
                Some(_) => {}
            }
            column_names.push(col.clone());
            map.insert(col, values);
        }

        Ok(Dataset {
            name,
            column_names,
            columns: map,
            rows: rows.unwrap_or(0),
        })
    }

    /// Look up a column by name.
    pub fn column(&self, column: &str) -> Result<&[f64]> {
        self.columns
            .get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| PlotError::ColumnNotFound {
                dataset: self.name.clone(),
                column: column.to_string(),
                available: self.column_names.clone(),
            })
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}
