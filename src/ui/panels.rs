use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot::to_egui;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – processed and failed files
// ---------------------------------------------------------------------------

/// Render the file list, one row per analysed file, plus any batch failures.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.entries.is_empty() && state.failures.is_empty() {
        ui.label("No files analysed.");
        return;
    }

    let mut clicked = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.push_id("processed", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::remainder().at_least(100.0))
                    .column(Column::auto())
                    .column(Column::auto())
                    .header(18.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("File");
                        });
                        header.col(|ui| {
                            ui.strong("Samples");
                        });
                        header.col(|ui| {
                            ui.strong("Peak f");
                        });
                    })
                    .body(|mut body| {
                        for (idx, entry) in state.entries.iter().enumerate() {
                            let color = state
                                .colors
                                .get(idx)
                                .copied()
                                .map(to_egui)
                                .unwrap_or(Color32::GRAY);
                            let peak = entry
                                .analysis
                                .result
                                .peak()
                                .map(|p| format!("{:.4}", p.frequency))
                                .unwrap_or_default();
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    let text = RichText::new(&entry.name).color(color);
                                    if ui
                                        .selectable_label(state.selected == Some(idx), text)
                                        .clicked()
                                    {
                                        clicked = Some(idx);
                                    }
                                });
                                row.col(|ui| {
                                    ui.label(entry.analysis.samples.len().to_string());
                                });
                                row.col(|ui| {
                                    ui.label(peak);
                                });
                            });
                        }
                    });
            });

            if !state.failures.is_empty() {
                ui.add_space(8.0);
                ui.strong(RichText::new("Failed").color(Color32::RED));
                ui.push_id("failed", |ui: &mut Ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .column(Column::auto())
                        .column(Column::remainder())
                        .body(|mut body| {
                            for (name, reason) in &state.failures {
                                body.row(18.0, |mut row| {
                                    row.col(|ui| {
                                        ui.label(name);
                                    });
                                    row.col(|ui| {
                                        ui.label(reason);
                                    });
                                });
                            }
                        });
                });
            }
        });

    if let Some(idx) = clicked {
        state.select(idx);
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
        });

        ui.separator();

        if let Some(entry) = state.selected_entry() {
            ui.label(format!(
                "{}: {} samples, grid {}",
                entry.name,
                entry.analysis.samples.len(),
                entry.analysis.grid
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open time series")
        .add_filter("Supported files", &["dat", "tsv", "txt", "csv", "json", "parquet", "pq"])
        .add_filter("Tab separated", &["dat", "tsv", "txt"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
