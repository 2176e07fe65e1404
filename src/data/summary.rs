use serde::Serialize;

use super::model::{CellValue, Table};

/// Mean of one numeric column; `None` when it has no values to average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: Option<f64>,
}

/// Row count plus per-numeric-column means of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub row_count: usize,
    /// One entry per numeric column, in view order. Empty when the view has
    /// no numeric columns, which callers show as a notice rather than an error.
    pub means: Vec<ColumnMean>,
}

impl Summary {
    pub fn has_numeric_data(&self) -> bool {
        !self.means.is_empty()
    }

    pub fn mean_of(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.column == column)
            .and_then(|m| m.mean)
    }
}

/// Compute the summary of `view`. Missing cells are skipped.
pub fn summarize(view: &Table) -> Summary {
    let means = view
        .numeric_columns()
        .map(|col| {
            let (sum, n) = col
                .values
                .iter()
                .filter_map(CellValue::as_f64)
                .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
            ColumnMean {
                column: col.name.clone(),
                mean: (n > 0).then(|| sum / n as f64),
            }
        })
        .collect();

    Summary {
        row_count: view.row_count(),
        means,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnKind};
    use proptest::prelude::*;

    #[test]
    fn test_means_over_numeric_columns_only() {
        let t = Table::new(vec![
            Column::new(
                "city",
                ColumnKind::Text,
                vec![CellValue::Text("Rio".into()), CellValue::Text("SP".into())],
            ),
            Column::new(
                "visitors",
                ColumnKind::Integer,
                vec![CellValue::Integer(100), CellValue::Integer(200)],
            ),
            Column::new(
                "rating",
                ColumnKind::Float,
                vec![CellValue::Float(4.0), CellValue::Missing],
            ),
        ])
        .unwrap();
        let s = summarize(&t);
        assert_eq!(s.row_count, 2);
        assert_eq!(s.means.len(), 2);
        assert_eq!(s.mean_of("visitors"), Some(150.0));
        assert_eq!(s.mean_of("rating"), Some(4.0));
        assert_eq!(s.mean_of("city"), None);
    }

    #[test]
    fn test_empty_view_reports_undefined_means() {
        let t = Table::new(vec![Column::new("n", ColumnKind::Float, vec![])]).unwrap();
        let s = summarize(&t);
        assert_eq!(s.row_count, 0);
        assert_eq!(
            s.means,
            vec![ColumnMean {
                column: "n".into(),
                mean: None
            }]
        );
    }

    proptest! {
        #[test]
        fn test_no_numeric_columns_gives_empty_means(labels in prop::collection::vec("[a-z]{0,4}", 0..25)) {
            let n = labels.len();
            let t = Table::new(vec![Column::new(
                "label",
                ColumnKind::Text,
                labels.into_iter().map(CellValue::Text).collect(),
            )])
            .unwrap();
            let s = summarize(&t);
            prop_assert_eq!(s.row_count, n);
            prop_assert!(s.means.is_empty());
            prop_assert!(!s.has_numeric_data());
        }
    }
}
