use eframe::egui;
use rio_tourism_dash::app::TourismDashApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard de Turismo – Rio de Janeiro",
        options,
        Box::new(|_cc| Ok(Box::new(TourismDashApp::default()))),
    )
}
