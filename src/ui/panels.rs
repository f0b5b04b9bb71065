use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use sales_predictor::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – column selection
// ---------------------------------------------------------------------------

/// A selection change requested by a widget this frame.
enum SelectionChange {
    Target(String),
    Toggle(String),
    All,
    None,
}

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    let (Some(table), Some(selection)) = (&state.table, &state.selection) else {
        ui.label("No dataset loaded.");
        return;
    };

    let columns = table.dataset.columns();
    let mut change: Option<SelectionChange> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Target selector ----
            ui.strong("🎯 Target column");
            egui::ComboBox::from_id_salt("target_column")
                .selected_text(selection.target())
                .width(ui.available_width() - 8.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in columns {
                        let label = format!("{}  ({})", col.name, col.kind());
                        if ui
                            .selectable_label(selection.target() == col.name, label)
                            .clicked()
                        {
                            change = Some(SelectionChange::Target(col.name.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Feature checkboxes ----
            let n_total = columns.len().saturating_sub(1);
            ui.strong(format!(
                "📌 Feature columns  ({}/{n_total})",
                selection.features().len()
            ));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    change = Some(SelectionChange::All);
                }
                if ui.small_button("None").clicked() {
                    change = Some(SelectionChange::None);
                }
            });

            for col in columns.iter().filter(|c| c.name != selection.target()) {
                let mut checked = selection.contains_feature(&col.name);
                let mut text = RichText::new(&col.name);
                if !col.is_numeric() {
                    text = text.italics().color(Color32::GRAY);
                }
                let mut response = ui.checkbox(&mut checked, text);
                if !col.is_numeric() {
                    response = response.on_hover_text("Text column: cannot be used for training");
                }
                if response.changed() {
                    change = Some(SelectionChange::Toggle(col.name.clone()));
                }
            }
        });

    match change {
        Some(SelectionChange::Target(col)) => state.set_target(&col),
        Some(SelectionChange::Toggle(col)) => state.toggle_feature(&col),
        Some(SelectionChange::All) => state.select_all_features(),
        Some(SelectionChange::None) => state.select_no_features(),
        None => {}
    }
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
            let can_export = state.report().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export report…"))
                .clicked()
            {
                export_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{}: {} rows × {} columns",
                table.name,
                table.dataset.len(),
                table.dataset.width()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("📂 Upload your CSV dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_report_dialog(state: &mut AppState) {
    let Some(report) = state.report() else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export evaluation report")
        .set_file_name("report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = report.write(&path) {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
