use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{
    GridInput, GridMark, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use sales_predictor::color::{SCATTER_COLOR, UNDEFINED_CELL, annotation_color, coolwarm};
use sales_predictor::pipeline::{CorrelationMatrix, Evaluation};

// ---------------------------------------------------------------------------
// Actual vs predicted scatter
// ---------------------------------------------------------------------------

/// Scatter of holdout targets against their predictions.
pub fn actual_vs_predicted(ui: &mut Ui, evaluation: &Evaluation) {
    ui.label(RichText::new("Actual vs Predicted").strong());

    let points: PlotPoints = evaluation.actual_vs_predicted.iter().copied().collect();

    Plot::new("actual_vs_predicted")
        .width(420.0)
        .height(300.0)
        .x_axis_label("Actual")
        .y_axis_label("Predicted")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .name("holdout rows")
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(3.5)
                    .color(SCATTER_COLOR),
            );
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap. Cell `(i, j)` spans `x ∈ [j, j+1]`, `y ∈ [n-1-i, n-i]`
/// so the first column sits in the top-left corner.
pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    if corr.is_empty() {
        ui.label("No numeric columns to correlate.");
        return;
    }

    let n = corr.len();
    let x_names = corr.columns.clone();
    let y_names = corr.columns.clone();

    Plot::new("correlation_heatmap")
        .width(550.0)
        .height(350.0)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(0.0)
        .include_x(n as f64)
        .include_y(0.0)
        .include_y(n as f64)
        .x_grid_spacer(move |_input: GridInput| cell_centers(n))
        .y_grid_spacer(move |_input: GridInput| cell_centers(n))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            label_at(&x_names, mark.value.floor())
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            label_at(&y_names, (n as f64 - 1.0) - mark.value.floor())
        })
        .show(ui, |plot_ui| {
            for i in 0..n {
                for j in 0..n {
                    let x0 = j as f64;
                    let y0 = (n - 1 - i) as f64;
                    let value = corr.get(i, j);
                    let fill = value.map_or(UNDEFINED_CELL, coolwarm);

                    let cell = PlotPoints::new(vec![
                        [x0, y0],
                        [x0 + 1.0, y0],
                        [x0 + 1.0, y0 + 1.0],
                        [x0, y0 + 1.0],
                    ]);
                    plot_ui.polygon(
                        Polygon::new(cell)
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );

                    if let Some(v) = value {
                        plot_ui.text(Text::new(
                            PlotPoint::new(x0 + 0.5, y0 + 0.5),
                            RichText::new(format!("{v:.2}")).color(annotation_color(fill)),
                        ));
                    }
                }
            }
        });

    colorbar(ui);
}

fn cell_centers(n: usize) -> Vec<GridMark> {
    (0..n)
        .map(|k| GridMark {
            value: k as f64 + 0.5,
            step_size: 1.0,
        })
        .collect()
}

fn label_at(names: &[String], index: f64) -> String {
    if index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

/// Horizontal gradient from -1 to 1 under the heatmap.
fn colorbar(ui: &mut Ui) {
    const WIDTH: f32 = 220.0;
    const STEPS: usize = 44;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("-1");
        let (rect, _) = ui.allocate_exact_size(egui::vec2(WIDTH, 12.0), Sense::hover());
        let step = WIDTH / STEPS as f32;
        for s in 0..STEPS {
            let t = -1.0 + 2.0 * (s as f64 + 0.5) / STEPS as f64;
            let slice = egui::Rect::from_min_size(
                rect.min + egui::vec2(s as f32 * step, 0.0),
                egui::vec2(step + 0.5, rect.height()),
            );
            ui.painter().rect_filled(slice, 0.0, coolwarm(t));
        }
        ui.label("1");
    });
}
