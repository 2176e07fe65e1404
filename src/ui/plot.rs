use std::f64::consts::TAU;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::color::generate_palette;
use crate::data::chart::{histogram_bins, pie_slices, ChartKind, ChartSeries};
use crate::data::model::CellValue;
use crate::error::DataError;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 320.0;
const SERIES_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Chart sections (central panel)
// ---------------------------------------------------------------------------

/// Bar / line / pie over the first two columns of the view.
pub fn simple_charts(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Simple charts");
    kind_picker(ui, "simple_chart", &mut state.simple_chart, &ChartKind::SIMPLE);
    let result = state.chart(state.simple_chart);
    show_chart(ui, "simple_plot", result, state.histogram_bins);
}

/// Histogram of the first numeric column, or a scatter of the first two columns.
pub fn advanced_charts(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Advanced charts");
    kind_picker(ui, "advanced_chart", &mut state.advanced_chart, &ChartKind::ADVANCED);
    let result = state.chart(state.advanced_chart);
    show_chart(ui, "advanced_plot", result, state.histogram_bins);
}

fn kind_picker(ui: &mut Ui, id: &str, current: &mut ChartKind, kinds: &[ChartKind]) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in kinds {
                ui.selectable_value(current, *kind, kind.label());
            }
        });
}

fn show_chart(ui: &mut Ui, id: &str, result: Result<ChartSeries, DataError>, bins: usize) {
    let series = match result {
        Ok(series) => series,
        Err(e) => {
            let color = if e.is_notice() {
                Color32::from_rgb(200, 130, 0)
            } else {
                Color32::RED
            };
            ui.label(RichText::new(e.to_string()).color(color));
            return;
        }
    };

    match series {
        ChartSeries::Xy {
            kind,
            x_label,
            y_label,
            x,
            y,
        } => xy_plot(ui, id, kind, &x_label, &y_label, &x, &y),
        ChartSeries::Pie {
            names_label,
            names,
            values,
            ..
        } => pie_plot(ui, id, &names_label, &names, &values),
        ChartSeries::Histogram { label, values } => histogram_plot(ui, id, &label, &values, bins),
    }
}

// ---------------------------------------------------------------------------
// Individual renderers
// ---------------------------------------------------------------------------

/// Numeric x values are plotted as-is; anything else is placed by row index
/// and carried as the point name.
fn x_positions(x: &[CellValue]) -> Vec<f64> {
    let all_numeric = x.iter().all(|v| v.as_f64().is_some());
    x.iter()
        .enumerate()
        .map(|(i, v)| {
            if all_numeric {
                v.as_f64().unwrap_or(i as f64)
            } else {
                i as f64
            }
        })
        .collect()
}

fn xy_plot(
    ui: &mut Ui,
    id: &str,
    kind: ChartKind,
    x_label: &str,
    y_label: &str,
    x: &[CellValue],
    y: &[CellValue],
) {
    let xs = x_positions(x);
    let pairs: Vec<(f64, f64, &CellValue)> = xs
        .iter()
        .zip(y)
        .zip(x)
        .filter_map(|((&xi, yi), label)| yi.as_f64().map(|yv| (xi, yv, label)))
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| match kind {
            ChartKind::Bar => {
                let bars = pairs
                    .iter()
                    .map(|(xi, yv, label)| Bar::new(*xi, *yv).width(0.8).name(label.to_string()))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(SERIES_COLOR).name(y_label));
            }
            ChartKind::Line => {
                let points: PlotPoints = pairs.iter().map(|(xi, yv, _)| [*xi, *yv]).collect();
                plot_ui.line(Line::new(points).color(SERIES_COLOR).width(1.5).name(y_label));
            }
            _ => {
                let points: PlotPoints = pairs.iter().map(|(xi, yv, _)| [*xi, *yv]).collect();
                plot_ui.points(
                    Points::new(points)
                        .color(SERIES_COLOR)
                        .radius(3.0)
                        .name(y_label),
                );
            }
        });
}

fn pie_plot(ui: &mut Ui, id: &str, names_label: &str, names: &[CellValue], values: &[CellValue]) {
    let slices = pie_slices(names, values);
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if slices.is_empty() || total <= 0.0 {
        ui.label(format!("No positive values to draw a pie of '{names_label}'."));
        return;
    }
    let palette = generate_palette(slices.len());

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for ((label, value), color) in slices.iter().zip(palette) {
                let sweep = value / total * TAU;
                let steps = ((sweep / TAU) * 128.0).ceil().max(2.0) as usize;
                let mut points = vec![[0.0, 0.0]];
                points.extend((0..=steps).map(|s| {
                    let a = start + sweep * s as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));
                let share = value / total * 100.0;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .fill_color(color)
                        .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                        .name(format!("{label} ({share:.1}%)")),
                );
                start += sweep;
            }
        });
}

fn histogram_plot(ui: &mut Ui, id: &str, label: &str, values: &[f64], bins: usize) {
    let bars: Vec<Bar> = histogram_bins(values, bins)
        .into_iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.2} – {:.2}", b.start, b.end))
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(label)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(SERIES_COLOR).name(label));
        });
}
