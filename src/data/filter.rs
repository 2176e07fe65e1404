use std::collections::HashSet;
use std::fmt;

use super::model::{CellValue, Table};
use super::select;
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Filter predicate: exactly one active at a time
// ---------------------------------------------------------------------------

/// The single active row predicate (or projection) applied to the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// No predicate. `columns` optionally projects to a subset of columns.
    AllRows { columns: Option<Vec<String>> },
    /// Keep rows whose categorical `column` equals `value`.
    Equality { column: String, value: CellValue },
    /// Keep rows whose numeric `column` lies in `[min, max]`.
    Range { column: String, min: f64, max: f64 },
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::AllRows { columns: None }
    }
}

impl FilterSpec {
    /// `AllRows` restricted to `columns`.
    pub fn all_rows_with(columns: Vec<String>) -> Self {
        FilterSpec::AllRows {
            columns: Some(columns),
        }
    }

    /// True when applying this spec gives back the loaded table untouched.
    pub fn is_identity(&self) -> bool {
        matches!(self, FilterSpec::AllRows { columns: None })
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::AllRows { columns: None } => write!(f, "all rows"),
            FilterSpec::AllRows {
                columns: Some(columns),
            } => write!(f, "all rows, columns {}", columns.join(", ")),
            FilterSpec::Equality { column, value } => write!(f, "{column} = {value}"),
            FilterSpec::Range { column, min, max } => write!(f, "{column} in [{min}, {max}]"),
        }
    }
}

/// Apply `spec` to `table`. Row order is preserved and the column set is only
/// narrowed by an explicit projection.
pub fn apply(table: &Table, spec: &FilterSpec) -> DataResult<Table> {
    match spec {
        FilterSpec::AllRows { columns: None } => Ok(table.clone()),
        FilterSpec::AllRows {
            columns: Some(columns),
        } => select::project(table, columns),
        FilterSpec::Equality { column, value } => {
            let col = table.column(column)?;
            if !col.kind.is_categorical() {
                return Err(DataError::TypeMismatch {
                    column: column.clone(),
                    expected: "equality",
                    actual: col.kind,
                });
            }
            let keep: Vec<usize> = col
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_missing() && *v == value)
                .map(|(i, _)| i)
                .collect();
            Ok(table.take_rows(&keep))
        }
        FilterSpec::Range { column, min, max } => {
            let col = table.column(column)?;
            if !col.kind.is_numeric() {
                return Err(DataError::TypeMismatch {
                    column: column.clone(),
                    expected: "range",
                    actual: col.kind,
                });
            }
            if min > max || min.is_nan() || max.is_nan() {
                return Err(DataError::InvalidRange {
                    column: column.clone(),
                    min: *min,
                    max: *max,
                });
            }
            let keep: Vec<usize> = col
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.as_f64().is_some_and(|x| *min <= x && x <= *max))
                .map(|(i, _)| i)
                .collect();
            Ok(table.take_rows(&keep))
        }
    }
}

// ---------------------------------------------------------------------------
// Choices offered to the caller
// ---------------------------------------------------------------------------

/// Distinct non-missing values of `column`, in first-seen order.
pub fn distinct_values(table: &Table, column: &str) -> DataResult<Vec<CellValue>> {
    let col = table.column(column)?;
    let mut seen = HashSet::new();
    Ok(col
        .values
        .iter()
        .filter(|v| !v.is_missing() && seen.insert(*v))
        .cloned()
        .collect())
}

/// `(min, max)` over the non-missing values of a numeric column.
///
/// `None` when the column holds no values at all.
pub fn numeric_bounds(table: &Table, column: &str) -> DataResult<Option<(f64, f64)>> {
    let col = table.column(column)?;
    if !col.kind.is_numeric() {
        return Err(DataError::TypeMismatch {
            column: column.to_string(),
            expected: "range",
            actual: col.kind,
        });
    }
    Ok(col
        .values
        .iter()
        .filter_map(CellValue::as_f64)
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        }))
}
