use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter;
use crate::data::loader::{Separator, Upload};
use crate::data::model::{ColumnKind, Table};
use crate::state::{AppState, DisplayMode};

// ---------------------------------------------------------------------------
// Left side panel – layout, upload and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            layout_section(ui, state);
            ui.separator();
            upload_section(ui, state);
            ui.separator();
            filter_section(ui, state);
        });
}

fn layout_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Layout");
    ui.horizontal(|ui: &mut Ui| {
        let mut background = state.colors.background_color();
        if ui.color_edit_button_srgba(&mut background).changed() {
            state.colors.set_background(background);
        }
        ui.label("Background");
    });
    ui.horizontal(|ui: &mut Ui| {
        let mut text = state.colors.text_color();
        if ui.color_edit_button_srgba(&mut text).changed() {
            state.colors.set_text(text);
        }
        ui.label("Text");
    });
}

fn upload_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("File");
    ui.strong("Separator");
    ui.horizontal(|ui: &mut Ui| {
        let mut separator = state.separator;
        for sep in Separator::ALL {
            ui.radio_value(&mut separator, sep, sep.label());
        }
        state.set_separator(separator);
    });

    if ui.button("Open CSV…").clicked() {
        open_file_dialog(state);
    }
    if let Some(upload) = &state.upload {
        ui.label(format!("Loaded: {}", upload.name));
    }
    if let Some(warning) = &state.load_warning {
        ui.label(RichText::new(warning).color(Color32::from_rgb(200, 130, 0)));
    }
}

fn filter_section(ui: &mut Ui, state: &mut AppState) {
    let Some(source) = state.view.source().cloned() else {
        ui.label("No dataset loaded.");
        return;
    };
    let mut changed = false;

    // ---- Column selection ----
    ui.heading("Columns");
    for name in source.column_names() {
        let mut checked = state.form.selected_columns.iter().any(|c| c == name);
        let last = checked && state.form.selected_columns.len() == 1;
        if ui
            .add_enabled(!last, egui::Checkbox::new(&mut checked, name))
            .changed()
        {
            changed |= state.form.toggle_column(name, checked);
        }
    }
    ui.separator();

    // ---- Display mode ----
    ui.heading("Filters");
    changed |= ui
        .radio_value(&mut state.form.mode, DisplayMode::AllData, "All data")
        .changed();
    changed |= ui
        .radio_value(
            &mut state.form.mode,
            DisplayMode::FilterByColumn,
            "Filter by a column",
        )
        .changed();

    if state.form.mode == DisplayMode::FilterByColumn {
        // ---- Filter column ----
        let current = state.form.column.clone().unwrap_or_default();
        let mut picked = None;
        egui::ComboBox::from_id_salt("filter_column")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for name in source.column_names() {
                    if ui.selectable_label(current == name, name).clicked() {
                        picked = Some(name.to_string());
                    }
                }
            });
        if let Some(column) = picked {
            state.form.select_column(&source, column);
            changed = true;
        }

        if let Some(column) = state.form.column.clone() {
            changed |= value_widget(ui, state, &source, &column);
        }
    }

    if changed {
        if let Err(e) = state.apply_form() {
            log::warn!("Filter not applied: {e}");
        }
    }
}

/// Value picker for categorical columns, min/max sliders for numeric ones.
fn value_widget(ui: &mut Ui, state: &mut AppState, source: &Table, column: &str) -> bool {
    let Ok(kind) = source.column(column).map(|c| c.kind) else {
        return false;
    };
    let mut changed = false;

    if kind.is_categorical() {
        let values = filter::distinct_values(source, column).unwrap_or_default();
        let current = state
            .form
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        ui.label(format!("Value of '{column}'"));
        egui::ComboBox::from_id_salt("filter_value")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for v in values {
                    let label = v.to_string();
                    changed |= ui
                        .selectable_value(&mut state.form.value, Some(v), label)
                        .changed();
                }
            });
        return changed;
    }

    let Ok(Some((lo, hi))) = filter::numeric_bounds(source, column) else {
        ui.label("This column has no values to filter on.");
        return false;
    };
    let (mut min, mut max) = state.form.range.unwrap_or((lo, hi));

    ui.label(format!("Range of '{column}'"));
    let mut min_slider = egui::Slider::new(&mut min, lo..=hi).text("min");
    let mut max_slider = egui::Slider::new(&mut max, lo..=hi).text("max");
    if kind == ColumnKind::Integer {
        min_slider = min_slider.integer();
        max_slider = max_slider.integer();
    }
    changed |= ui.add(min_slider).changed();
    changed |= ui.add(max_slider).changed();

    if changed {
        max = max.max(min);
        state.form.range = Some((min, max));
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reset session").clicked() {
                state.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(source), Some(view)) = (state.view.source(), state.view.current()) {
            ui.label(format!(
                "{} rows loaded, {} in view",
                source.row_count(),
                view.row_count()
            ));
        }

        if let Some(spec) = state.view.active_filter() {
            ui.separator();
            ui.label(format!("Filter: {spec}"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tourism data")
        .add_filter("CSV", &["csv", "txt", "tsv"])
        .pick_file();

    if let Some(path) = file {
        match read_upload(&path) {
            Ok(upload) => state.set_upload(upload),
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Read `path` into an upload whose identity changes whenever the file does.
fn read_upload(path: &std::path::Path) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let id = format!("{}:{}:{modified}", path.display(), bytes.len());
    Ok(Upload::new(id, name, bytes))
}
