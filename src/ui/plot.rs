use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::data::model::PeriodogramResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Stacked sample / periodogram plots (central panel)
// ---------------------------------------------------------------------------

/// Render the selected file: raw samples on top, periodogram below.
pub fn periodogram_view(ui: &mut Ui, state: &AppState) {
    let entry = match state.selected_entry() {
        Some(entry) => entry,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to compute its periodogram  (File → Open…)");
            });
            return;
        }
    };

    let analysis = &entry.analysis;
    let half_height = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;

    let sample_color = to_egui(color::sample_color());
    let samples: PlotPoints = analysis
        .samples
        .samples()
        .iter()
        .map(|s| [s.time, s.amplitude])
        .collect();

    Plot::new("samples_plot")
        .height(half_height)
        .legend(Legend::default())
        .x_axis_label("Time")
        .y_axis_label("Amplitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(samples)
                    .name(&entry.name)
                    .color(sample_color)
                    .radius(2.5),
            );
        });

    let line_color = state
        .selected_color()
        .map(to_egui)
        .unwrap_or_else(|| to_egui(color::power_color()));
    let powers = display_powers(&analysis.result, state.minmax_scaling);
    let points: PlotPoints = analysis
        .result
        .points()
        .iter()
        .zip(powers)
        .map(|(p, power)| [p.frequency, power])
        .collect();

    Plot::new("periodogram_plot")
        .height(half_height)
        .legend(Legend::default())
        .x_axis_label("Frequency")
        .y_axis_label(if state.minmax_scaling { "Power (scaled)" } else { "Power" })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(format!("{} – {}", entry.name, analysis.grid))
                    .color(line_color)
                    .width(1.5),
            );
        });
}

/// Powers as plotted, optionally min-max scaled to [0, 1].
pub fn display_powers(result: &PeriodogramResult, minmax_scaling: bool) -> Vec<f64> {
    let powers = result.points().iter().map(|p| p.power);
    if !minmax_scaling {
        return powers.collect();
    }
    let min = powers.clone().fold(f64::INFINITY, f64::min);
    let max = powers.clone().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        vec![0.0; result.len()]
    } else {
        powers.map(|p| (p - min) / range).collect()
    }
}

pub fn to_egui(c: color::Rgb) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}
