use std::fmt;

use serde::Serialize;

use super::model::{CellValue, Column, Table};
use crate::error::{DataError, DataResult};

/// Bins used for histograms.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Histogram,
    Scatter,
}

impl ChartKind {
    /// Kinds offered in the "simple" chart picker.
    pub const SIMPLE: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];
    /// Kinds offered in the "advanced" chart picker.
    pub const ADVANCED: [ChartKind; 2] = [ChartKind::Histogram, ChartKind::Scatter];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Histogram => "Histogram",
            ChartKind::Scatter => "Scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ChartSeries – what a renderer needs to draw one chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSeries {
    /// Bar, line and scatter: `x` from the first column, `y` from the second.
    Xy {
        kind: ChartKind,
        x_label: String,
        y_label: String,
        x: Vec<CellValue>,
        y: Vec<CellValue>,
    },
    /// Pie: slice names from the first column, sizes from the second.
    Pie {
        names_label: String,
        values_label: String,
        names: Vec<CellValue>,
        values: Vec<CellValue>,
    },
    /// Histogram over the first numeric column (missing cells dropped).
    Histogram { label: String, values: Vec<f64> },
}

impl ChartSeries {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSeries::Xy { kind, .. } => *kind,
            ChartSeries::Pie { .. } => ChartKind::Pie,
            ChartSeries::Histogram { .. } => ChartKind::Histogram,
        }
    }
}

/// Bind the columns of `view` that `kind` needs.
pub fn project(view: &Table, kind: ChartKind) -> DataResult<ChartSeries> {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => {
            let (first, second) = first_two(view)?;
            Ok(ChartSeries::Xy {
                kind,
                x_label: first.name.clone(),
                y_label: second.name.clone(),
                x: first.values.clone(),
                y: second.values.clone(),
            })
        }
        ChartKind::Pie => {
            let (first, second) = first_two(view)?;
            Ok(ChartSeries::Pie {
                names_label: first.name.clone(),
                values_label: second.name.clone(),
                names: first.values.clone(),
                values: second.values.clone(),
            })
        }
        ChartKind::Histogram => {
            let col = view
                .numeric_columns()
                .next()
                .ok_or(DataError::NoNumericColumn)?;
            Ok(ChartSeries::Histogram {
                label: col.name.clone(),
                values: col.values.iter().filter_map(CellValue::as_f64).collect(),
            })
        }
    }
}

fn first_two(view: &Table) -> DataResult<(&Column, &Column)> {
    match view.columns() {
        [first, second, ..] => Ok((first, second)),
        cols => Err(DataError::InsufficientColumns(cols.len())),
    }
}

// ---------------------------------------------------------------------------
// Renderer helpers
// ---------------------------------------------------------------------------

/// One histogram bar covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins over `[min, max]`.
///
/// A single distinct value `v` is binned over `[v - 0.5, v + 0.5]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Aggregate pie `values` per name, in first-seen order.
///
/// Non-numeric, missing and non-positive values do not produce slices.
pub fn pie_slices(names: &[CellValue], values: &[CellValue]) -> Vec<(String, f64)> {
    let mut slices: Vec<(String, f64)> = Vec::new();
    for (name, value) in names.iter().zip(values) {
        let Some(v) = value.as_f64().filter(|v| *v > 0.0) else {
            continue;
        };
        let label = name.to_string();
        match slices.iter_mut().find(|(l, _)| *l == label) {
            Some((_, total)) => *total += v,
            None => slices.push((label, v)),
        }
    }
    slices
}
