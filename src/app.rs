use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TourismDashApp {
    pub state: AppState,
}

impl TourismDashApp {
    /// Restyle the visuals from the session colour preferences.
    fn apply_colors(&self, ctx: &egui::Context) {
        let background = self.state.colors.background_color();
        let text = self.state.colors.text_color();
        ctx.style_mut(|style| {
            style.visuals.panel_fill = background;
            style.visuals.window_fill = background;
            style.visuals.extreme_bg_color = background;
            style.visuals.override_text_color = Some(text);
        });
    }
}

impl eframe::App for TourismDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_colors(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: layout, upload and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, metrics, download, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.state.current_view().is_none() {
                        ui.heading("Please upload a CSV file  (File → Open…)");
                        return;
                    }
                    table::preview(ui, &self.state);
                    ui.separator();
                    table::download(ui, &mut self.state);
                    ui.separator();
                    table::metrics(ui, &self.state);
                    ui.separator();
                    plot::simple_charts(ui, &mut self.state);
                    ui.separator();
                    plot::advanced_charts(ui, &mut self.state);
                });
        });
    }
}
