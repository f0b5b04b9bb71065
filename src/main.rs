mod app;
mod ui;

use app::SalesPredictorApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Prediction Using Decision Tree",
        options,
        Box::new(|_cc| Ok(Box::new(SalesPredictorApp::default()))),
    )
}
