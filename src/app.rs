use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TradeAtlasApp {
    pub state: AppState,
}

impl TradeAtlasApp {
    /// Start on the built-in sample, or on `initial` if given.
    pub fn new(initial: Option<&Path>) -> Self {
        let mut app = Self::default();
        if let Some(path) = initial {
            panels::load_into(&mut app.state, path);
        }
        app
    }
}

impl eframe::App for TradeAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: metrics and route table ----
        egui::TopBottomPanel::bottom("summary_panel")
            .default_height(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::metrics_row(ui, &self.state);
                ui.separator();
                panels::route_table(ui, &self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::route_map(ui, &self.state);
        });
    }
}
