use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LombViewerApp {
    pub state: AppState,
}

impl LombViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LombViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: processed / failed files ----
        egui::SidePanel::left("file_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: samples + periodogram ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::periodogram_view(ui, &self.state);
        });
    }
}

/// Block on the viewer window until the user closes it.
pub fn run_viewer(state: AppState) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lomb Panda – Periodogram Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(LombViewerApp::new(state)))),
    )
}
