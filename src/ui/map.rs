use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use trade_atlas::color::{stroke_width, tariff_color};
use trade_atlas::geo::great_circle_path;

use crate::state::{AppState, ColorMode};

/// Points sampled along each great-circle arc.
const ARC_SEGMENTS: usize = 32;

const COUNTRY_MARKER: Color32 = Color32::from_rgb(90, 90, 90);

// ---------------------------------------------------------------------------
// World map (central panel)
// ---------------------------------------------------------------------------

/// Render the visible routes on an equirectangular longitude/latitude plot.
pub fn route_map(ui: &mut Ui, state: &AppState) {
    let unplotted = state.unplotted_count();
    if unplotted > 0 {
        ui.weak(format!(
            "{unplotted} visible route(s) not drawn: no coordinates for origin or destination"
        ));
    }

    // Hover text per legend name; duplicate routes share a name.
    let mut tooltips: BTreeMap<String, String> = BTreeMap::new();
    for route in &state.result.routes {
        tooltips
            .entry(route.to_string())
            .and_modify(|t| {
                t.push_str("\n\n");
                t.push_str(&route.tooltip());
            })
            .or_insert_with(|| route.tooltip());
    }

    Plot::new("route_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| match tooltips.get(name) {
            Some(text) => text.clone(),
            None => format!("{:.1}°, {:.1}°", value.y, value.x),
        })
        .show(ui, |plot_ui| {
            // ---- Country markers for every country in the table ----
            let markers: Vec<(&str, [f64; 2])> = state
                .dataset
                .countries
                .iter()
                .filter_map(|c| {
                    let p = state.locator.resolve(c)?;
                    Some((c.as_str(), [p.lon, p.lat]))
                })
                .collect();

            let points: PlotPoints = markers.iter().map(|(_, xy)| *xy).collect();
            plot_ui.points(Points::new(points).radius(3.0).color(COUNTRY_MARKER));
            for (name, [lon, lat]) in &markers {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(*lon, *lat + 4.0),
                        RichText::new(*name).small(),
                    )
                    .color(COUNTRY_MARKER),
                );
            }

            // ---- Route arcs ----
            for route in &state.result.routes {
                let Some((a, b)) = state
                    .locator
                    .resolve_pair(&route.origin, &route.destination)
                else {
                    continue;
                };

                let color = match state.color_mode {
                    ColorMode::TariffImpact => tariff_color(route.tariff_impact),
                    ColorMode::Origin => state.country_colors.color_for(&route.origin),
                };

                let points: PlotPoints = great_circle_path(a, b, ARC_SEGMENTS)
                    .into_iter()
                    .map(|p| [p.lon, p.lat])
                    .collect();

                let line = Line::new(points)
                    .name(route.to_string())
                    .color(color)
                    .width(stroke_width(route.volume));

                plot_ui.line(line);
            }
        });
}
