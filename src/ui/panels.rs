use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use trade_atlas::data::loader::load_file;
use trade_atlas::data::sample::sample_dataset;

use crate::state::{AppState, ColorMode};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Threshold sliders ----
            ui.strong("Minimum Trade Volume (B USD)");
            let mut min_volume = state.min_volume;
            let max = state.min_volume_slider_max();
            if ui
                .add(egui::Slider::new(&mut min_volume, 0..=max))
                .changed()
            {
                state.set_min_volume(min_volume);
            }
            ui.add_space(4.0);

            ui.strong("Maximum Tariff Impact (%)");
            let mut max_tariff = state.max_tariff_percent;
            if ui
                .add(egui::Slider::new(&mut max_tariff, 0..=100).suffix("%"))
                .changed()
            {
                state.set_max_tariff_percent(max_tariff);
            }
            ui.add_space(4.0);

            if ui.small_button("Reset").clicked() {
                state.reset_filters();
            }
            ui.separator();

            // ---- Colour-by selector ----
            ui.strong("Color by");
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(state.color_mode.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in [ColorMode::TariffImpact, ColorMode::Origin] {
                        ui.selectable_value(&mut state.color_mode, mode, mode.label());
                    }
                });

            // ---- Legend ----
            match state.color_mode {
                ColorMode::TariffImpact => {
                    ui.label("Line width: trade volume");
                    ui.label("Darker red: higher tariff impact");
                }
                ColorMode::Origin => {
                    for (country, color) in state.country_colors.legend_entries() {
                        ui.label(RichText::new(country).color(color));
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Bottom panel – metrics and route table
// ---------------------------------------------------------------------------

/// The three summary figures, side by side.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let metrics = &state.result.metrics;
    let figures = [
        ("Total Routes Displayed", metrics.route_count.to_string()),
        ("Average Trade Volume", metrics.average_volume_label()),
        ("Average Tariff Impact", metrics.average_tariff_label()),
    ];
    ui.columns(figures.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(figures) {
            col.label(label);
            col.heading(value);
        }
    });
}

/// All routes in the table; those filtered out are greyed.
pub fn route_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(140.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Route");
            });
            header.col(|ui| {
                ui.strong("Volume (B USD)");
            });
            header.col(|ui| {
                ui.strong("Tariff Impact");
            });
        })
        .body(|mut body| {
            for (idx, route) in state.dataset.routes.iter().enumerate() {
                let visible = state.visible_indices.binary_search(&idx).is_ok();
                let style = |text: String| {
                    let text = RichText::new(text);
                    if visible { text } else { text.weak().strikethrough() }
                };
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(style(route.to_string()));
                    });
                    row.col(|ui| {
                        ui.label(style(format!("{}", route.volume)));
                    });
                    row.col(|ui| {
                        ui.label(style(format!("{:.1}%", route.tariff_impact * 100.0)));
                    });
                });
            }
        });
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
            if ui.button("Built-in sample").clicked() {
                state.set_dataset(sample_dataset(), "built-in sample");
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} routes loaded, {} visible",
            state.source,
            state.dataset.len(),
            state.result.metrics.route_count
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open trade routes")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load `path` into `state`. On failure the current dataset stays active
/// and the error is shown in the top bar.
pub fn load_into(state: &mut AppState, path: &Path) {
    match load_file(path) {
        Ok(outcome) => {
            log::info!(
                "Loaded {} routes from {} ({} skipped)",
                outcome.dataset.len(),
                path.display(),
                outcome.skipped.len()
            );
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            state.set_dataset(outcome.dataset, name);
            if !outcome.skipped.is_empty() {
                state.status_message = Some(format!(
                    "Skipped {} malformed record(s); see log for details",
                    outcome.skipped.len()
                ));
            }
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("trade_atlas_ui_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_failed_load_keeps_current_dataset() {
        let mut state = AppState::default();
        let path = temp_file("broken.json", "{ not json");
        load_into(&mut state, &path);
        std::fs::remove_file(&path).ok();

        assert_eq!(state.dataset.len(), 8);
        assert_eq!(state.source, "built-in sample");
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn test_load_reports_skipped_records() {
        let mut state = AppState::default();
        state.set_min_volume(50);
        let path = temp_file(
            "partial.csv",
            "origin,dest,volume,tariff_impact\nCanada,USA,120,0.05\n,USA,10,0.1\n",
        );
        load_into(&mut state, &path);
        std::fs::remove_file(&path).ok();

        assert_eq!(state.dataset.len(), 1);
        assert_eq!(state.min_volume, 0);
        assert_eq!(state.source, format!("trade_atlas_ui_{}_partial.csv", std::process::id()));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Skipped 1 malformed record(s); see log for details")
        );
    }
}
