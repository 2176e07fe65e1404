use std::collections::HashSet;

use super::model::Table;
use crate::error::{DataError, DataResult};

/// Project `table` onto `selected`, in the order the caller supplied.
///
/// Rows are untouched; an empty selection or an unknown name is rejected.
/// A name listed twice is kept at its first position.
pub fn project(table: &Table, selected: &[String]) -> DataResult<Table> {
    if selected.is_empty() {
        return Err(DataError::EmptySelection);
    }
    let mut seen = HashSet::new();
    let columns = selected
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| table.column(name).cloned())
        .collect::<DataResult<Vec<_>>>()?;
    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnKind};

    fn sample() -> Table {
        Table::new(vec![
            Column::new("city", ColumnKind::Text, vec![CellValue::Text("Rio".into())]),
            Column::new("visitors", ColumnKind::Integer, vec![CellValue::Integer(100)]),
            Column::new("year", ColumnKind::Integer, vec![CellValue::Integer(2023)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_projection_follows_caller_order() {
        let out = project(&sample(), &["year".into(), "city".into()]).unwrap();
        assert_eq!(out.column_names(), vec!["year", "city"]);
        assert_eq!(out.row_count(), 1);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let err = project(&sample(), &["nope".into()]).unwrap_err();
        assert!(matches!(err, DataError::UnknownColumn(name) if name == "nope"));
    }

    #[test]
    fn test_repeated_name_kept_once() {
        let out = project(&sample(), &["city".into(), "visitors".into(), "city".into()]).unwrap();
        assert_eq!(out.column_names(), vec!["city", "visitors"]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert!(matches!(
            project(&sample(), &[]),
            Err(DataError::EmptySelection)
        ));
    }
}
