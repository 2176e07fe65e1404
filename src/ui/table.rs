use anyhow::{Context, Result};
use eframe::egui::{Color32, Grid, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::export::{EXPORT_FILE_NAME, EXPORT_MIME};
use crate::data::summary::ColumnMean;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// Render the current view as a scrollable table.
pub fn preview(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.current_view() else {
        return;
    };

    ui.heading("Loaded data");
    ui.label(format!(
        "{} rows x {} columns",
        view.row_count(),
        view.column_count()
    ));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(TableColumn::auto().at_least(60.0), view.column_count())
        .header(20.0, |mut header| {
            for col in view.columns() {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, view.row_count(), |mut row| {
                let index = row.index();
                for col in view.columns() {
                    row.col(|ui| {
                        ui.label(col.values[index].to_string());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

pub fn download(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Download filtered data");
    if ui
        .button("Download CSV")
        .on_hover_text(format!("{EXPORT_FILE_NAME} ({EXPORT_MIME})"))
        .clicked()
    {
        if let Err(e) = save_export(state) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_export(state: &AppState) -> Result<()> {
    let bytes = state.export()?;
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(());
    };
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved view to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub fn metrics(ui: &mut Ui, state: &AppState) {
    ui.heading("Basic metrics");
    let summary = match state.summary() {
        Ok(summary) => summary,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };

    ui.label(format!("Record count: {}", summary.row_count));
    if !summary.has_numeric_data() {
        ui.label(
            RichText::new("No numeric column available to compute metrics.")
                .color(Color32::from_rgb(200, 130, 0)),
        );
        return;
    }

    ui.label("Means of numeric columns:");
    means_grid(ui, &summary.means);
}

fn means_grid(ui: &mut Ui, means: &[ColumnMean]) {
    Grid::new("means_grid").striped(true).show(ui, |ui| {
        for m in means {
            ui.label(&m.column);
            match m.mean {
                Some(mean) => ui.label(format!("{mean:.4}")),
                None => ui.label("undefined"),
            };
            ui.end_row();
        }
    });
}
