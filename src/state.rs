use std::sync::Arc;

use log::{debug, error};

use crate::color::ColorPreferences;
use crate::data::chart::{self, ChartKind, ChartSeries};
use crate::data::export;
use crate::data::filter::{self, FilterSpec};
use crate::data::loader::{Separator, TableLoader, Upload};
use crate::data::model::{CellValue, Table};
use crate::data::summary::{self, Summary};
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// ViewState – the single source every summary / chart / export reads
// ---------------------------------------------------------------------------

/// Current view of the session.
///
/// `Filtered` is always derived from the authoritative loaded table, never
/// from a previous `Filtered` view.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// No upload yet, or the last parse failed.
    #[default]
    Empty,
    /// Table parsed, no projection or filter chosen.
    Loaded { table: Arc<Table> },
    /// A projection or row filter is current.
    Filtered {
        source: Arc<Table>,
        spec: FilterSpec,
        view: Table,
    },
}

impl ViewState {
    /// Enter `Loaded` with a freshly parsed table.
    pub fn load(&mut self, table: Arc<Table>) {
        *self = ViewState::Loaded { table };
    }

    pub fn reset(&mut self) {
        *self = ViewState::Empty;
    }

    /// Recompute the view for `spec` from the loaded table.
    ///
    /// On error the previous view stays current.
    pub fn apply(&mut self, spec: FilterSpec) -> DataResult<()> {
        let source = self.source().cloned().ok_or(DataError::NoDataLoaded)?;
        if spec.is_identity() {
            debug!("view reset to loaded table");
            *self = ViewState::Loaded { table: source };
            return Ok(());
        }
        let view = filter::apply(&source, &spec)?;
        debug!(
            "view recomputed for {spec:?}: {} of {} rows",
            view.row_count(),
            source.row_count()
        );
        *self = ViewState::Filtered { source, spec, view };
        Ok(())
    }

    /// The loaded table the view is derived from.
    pub fn source(&self) -> Option<&Arc<Table>> {
        match self {
            ViewState::Empty => None,
            ViewState::Loaded { table } => Some(table),
            ViewState::Filtered { source, .. } => Some(source),
        }
    }

    /// The table every downstream consumer reads.
    pub fn current(&self) -> Option<&Table> {
        match self {
            ViewState::Empty => None,
            ViewState::Loaded { table } => Some(table.as_ref()),
            ViewState::Filtered { view, .. } => Some(view),
        }
    }

    pub fn active_filter(&self) -> Option<&FilterSpec> {
        match self {
            ViewState::Filtered { spec, .. } => Some(spec),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewState::Empty)
    }
}

// ---------------------------------------------------------------------------
// Filter form – what the side panel widgets edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    AllData,
    FilterByColumn,
}

/// Widget-level filter choices, turned into a [`FilterSpec`] on every change.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub mode: DisplayMode,
    /// Columns shown in `AllData` mode, in the user's order.
    pub selected_columns: Vec<String>,
    pub column: Option<String>,
    pub value: Option<CellValue>,
    pub range: Option<(f64, f64)>,
}

impl FilterForm {
    /// Fresh form for a newly loaded table: every column selected, filter on
    /// the first column.
    pub fn for_table(table: &Table) -> Self {
        let mut form = FilterForm {
            selected_columns: table.column_names().into_iter().map(String::from).collect(),
            ..Default::default()
        };
        if let Some(first) = form.selected_columns.first().cloned() {
            form.select_column(table, first);
        }
        form
    }

    /// Point the filter at `column` and seed its value or range defaults.
    pub fn select_column(&mut self, table: &Table, column: String) {
        self.value = None;
        self.range = None;
        if let Ok(col) = table.column(&column) {
            if col.kind.is_numeric() {
                self.range = filter::numeric_bounds(table, &column).ok().flatten();
            } else {
                self.value = filter::distinct_values(table, &column)
                    .ok()
                    .and_then(|vals| vals.into_iter().next());
            }
        }
        self.column = Some(column);
    }

    /// Build the spec the form describes.
    ///
    /// In `AllData` mode a full, table-ordered selection is the identity.
    pub fn to_spec(&self, table: &Table) -> FilterSpec {
        match self.mode {
            DisplayMode::AllData => {
                let all: Vec<&str> = table.column_names();
                if self.selected_columns.iter().map(String::as_str).eq(all) {
                    FilterSpec::default()
                } else {
                    FilterSpec::all_rows_with(self.selected_columns.clone())
                }
            }
            DisplayMode::FilterByColumn => {
                let Some(column) = self.column.clone() else {
                    return FilterSpec::default();
                };
                match (&self.value, self.range) {
                    (Some(value), _) => FilterSpec::Equality {
                        column,
                        value: value.clone(),
                    },
                    (None, Some((min, max))) => FilterSpec::Range { column, min, max },
                    // The column has no values to pick from, so nothing can match.
                    (None, None) => {
                        let numeric = table
                            .column(&column)
                            .map(|c| c.kind.is_numeric())
                            .unwrap_or(false);
                        if numeric {
                            FilterSpec::Range {
                                column,
                                min: f64::NEG_INFINITY,
                                max: f64::INFINITY,
                            }
                        } else {
                            FilterSpec::Equality {
                                column,
                                value: CellValue::Missing,
                            }
                        }
                    }
                }
            }
        }
    }

    /// Check or uncheck `column` in the projection.
    ///
    /// The last selected column cannot be removed; returns whether the
    /// selection changed.
    pub fn toggle_column(&mut self, column: &str, checked: bool) -> bool {
        let present = self.selected_columns.iter().any(|c| c == column);
        match (checked, present) {
            (true, false) => {
                self.selected_columns.push(column.to_string());
                true
            }
            (false, true) if self.selected_columns.len() > 1 => {
                self.selected_columns.retain(|c| c != column);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    /// Parse cache for the session.
    pub loader: TableLoader,

    /// Current view; read by the preview, metrics, charts and export.
    pub view: ViewState,

    /// Last file handed in by the upload provider.
    pub upload: Option<Upload>,

    pub separator: Separator,

    pub form: FilterForm,

    pub simple_chart: ChartKind,

    pub advanced_chart: ChartKind,

    pub histogram_bins: usize,

    pub colors: ColorPreferences,

    /// Soft warning from the last parse (e.g. suspicious separator).
    pub load_warning: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loader: TableLoader::new(),
            view: ViewState::Empty,
            upload: None,
            separator: Separator::default(),
            form: FilterForm::default(),
            simple_chart: ChartKind::Bar,
            advanced_chart: ChartKind::Histogram,
            histogram_bins: chart::DEFAULT_HISTOGRAM_BINS,
            colors: ColorPreferences::default(),
            load_warning: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Take a new upload and parse it with the current separator.
    pub fn set_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
        self.reload();
    }

    pub fn set_separator(&mut self, separator: Separator) {
        if self.separator != separator {
            self.separator = separator;
            self.reload();
        }
    }

    /// Rebuild the view from the current upload and separator.
    ///
    /// A parse error leaves the view `Empty`; nothing partial is kept.
    pub fn reload(&mut self) {
        let Some(upload) = &self.upload else {
            self.view.reset();
            return;
        };
        match self.loader.load(upload, self.separator) {
            Ok(loaded) => {
                self.form = FilterForm::for_table(&loaded.table);
                self.view.load(loaded.table);
                self.load_warning = loaded.warning;
                self.status_message = None;
            }
            Err(e) => {
                error!("Failed to load '{}': {e}", upload.name);
                self.view.reset();
                self.load_warning = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Apply `spec` to the loaded table, reporting (not raising) failures.
    pub fn set_filter(&mut self, spec: FilterSpec) -> DataResult<()> {
        match self.view.apply(spec) {
            Ok(()) => {
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Re-derive the view from whatever the filter form currently says.
    pub fn apply_form(&mut self) -> DataResult<()> {
        let spec = match self.view.source() {
            Some(source) => self.form.to_spec(source),
            None => return Err(DataError::NoDataLoaded),
        };
        self.set_filter(spec)
    }

    /// Point the filter form at `column` and recompute.
    pub fn set_filter_column(&mut self, column: String) -> DataResult<()> {
        let source = self.view.source().cloned().ok_or(DataError::NoDataLoaded)?;
        self.form.select_column(&source, column);
        self.apply_form()
    }

    pub fn current_view(&self) -> Option<&Table> {
        self.view.current()
    }

    pub fn summary(&self) -> DataResult<Summary> {
        self.current_view()
            .map(summary::summarize)
            .ok_or(DataError::NoDataLoaded)
    }

    pub fn chart(&self, kind: ChartKind) -> DataResult<ChartSeries> {
        let view = self.current_view().ok_or(DataError::NoDataLoaded)?;
        chart::project(view, kind)
    }

    pub fn export(&self) -> DataResult<Vec<u8>> {
        let view = self.current_view().ok_or(DataError::NoDataLoaded)?;
        export::to_csv(view)
    }

    /// Session end: drop the view, the cache and every preference.
    pub fn reset(&mut self) {
        *self = AppState::default();
    }
}
