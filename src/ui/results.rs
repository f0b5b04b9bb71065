use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use sales_predictor::data::model::Dataset;
use sales_predictor::pipeline::{Evaluation, PipelineOutcome};
use sales_predictor::state::AppState;

use super::plot;

const WARNING: Color32 = Color32::from_rgb(220, 140, 0);
const SUCCESS: Color32 = Color32::from_rgb(40, 150, 60);

// ---------------------------------------------------------------------------
// Central panel – notices, preview, metrics, charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📊 Sales Prediction Using Decision Tree");
            ui.label(
                "This app predicts sales using a Decision Tree Regressor. Upload your \
                 dataset, select features, and get instant insights with clear visualizations.",
            );
            ui.separator();

            let Some(table) = &state.table else {
                ui.label("📎 Upload a CSV file to begin  (File → Open…)");
                return;
            };

            ui.label(RichText::new("✅ Dataset successfully uploaded!").color(SUCCESS));
            if !table.cleaning.is_noop() {
                ui.label(
                    RichText::new(format!(
                        "⚠️ Missing values detected. Dropped {} of {} rows with nulls (rows {}).",
                        table.cleaning.dropped(),
                        table.cleaning.original_rows,
                        table.cleaning.describe_rows(20)
                    ))
                    .color(WARNING),
                );
            }

            ui.add_space(8.0);
            ui.heading("🔍 Data Preview");
            preview_table(ui, &table.dataset, state.config.preview_rows);
            ui.add_space(8.0);

            match &state.outcome {
                None => {}
                Some(Err(e)) => {
                    ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                }
                Some(Ok(PipelineOutcome::NoFeatures)) => {
                    ui.label(
                        RichText::new("⚠️ Please select at least one feature column.")
                            .color(WARNING),
                    );
                }
                Some(Ok(PipelineOutcome::Completed(evaluation))) => {
                    evaluation_section(ui, evaluation);
                }
            }
        });
}

/// First `rows` rows of the cleaned table, with the row index in front.
fn preview_table(ui: &mut Ui, dataset: &Dataset, rows: usize) {
    let rows = rows.min(dataset.len());
    let columns = dataset.columns();

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto().at_least(30.0))
                .columns(TableColumn::auto().at_least(70.0), columns.len())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("");
                    });
                    for col in columns {
                        header.col(|ui| {
                            ui.strong(&col.name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in 0..rows {
                        body.row(18.0, |mut table_row| {
                            table_row.col(|ui| {
                                ui.label(RichText::new(row.to_string()).weak());
                            });
                            for col in columns {
                                table_row.col(|ui| {
                                    ui.label(col.values[row].to_string());
                                });
                            }
                        });
                    }
                });
        });

    if dataset.is_empty() {
        ui.label("(no rows)");
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).size(26.0));
        });
    });
}

fn evaluation_section(ui: &mut Ui, evaluation: &Evaluation) {
    ui.heading("📈 Model Evaluation");
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Mean Squared Error", evaluation.metrics.mse_display());
        metric(ui, "R² Score", evaluation.metrics.r2_display());
    });
    if evaluation.metrics.r2.is_none() {
        ui.label(
            RichText::new("R² is undefined for a holdout set with a single row.")
                .color(WARNING),
        );
    }

    egui::CollapsingHeader::new("Model details")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!(
                "{} training rows, {} holdout rows",
                evaluation.train_rows, evaluation.holdout_rows
            ));
            ui.label(format!(
                "Tree depth {}, {} leaves",
                evaluation.model.depth, evaluation.model.n_leaves
            ));
            egui::Grid::new("importances").striped(true).show(ui, |ui: &mut Ui| {
                ui.strong("Feature");
                ui.strong("Importance");
                ui.end_row();
                for (name, importance) in &evaluation.model.feature_importances {
                    ui.label(name);
                    ui.label(format!("{importance:.3}"));
                    ui.end_row();
                }
            });
        });

    ui.add_space(8.0);
    ui.heading("📉 Actual vs Predicted");
    plot::actual_vs_predicted(ui, evaluation);

    ui.add_space(8.0);
    ui.heading("🧠 Correlation Heatmap");
    plot::correlation_heatmap(ui, &evaluation.correlation);
}
