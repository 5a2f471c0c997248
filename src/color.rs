use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Route styling
// ---------------------------------------------------------------------------

/// Colour for a tariff burden in `[0, 1]`: pale red at zero, deep red at one.
/// Values outside the range are clamped.
pub fn tariff_color(tariff_impact: f64) -> Color32 {
    let t = if tariff_impact.is_nan() {
        0.0
    } else {
        tariff_impact.clamp(0.0, 1.0) as f32
    };
    let low: LinSrgb = Srgb::new(1.0_f32, 0.85, 0.85).into_linear();
    let high: LinSrgb = Srgb::new(0.55_f32, 0.0, 0.0).into_linear();
    let rgb: Srgb<u8> = Srgb::from_linear(low.mix(high, t));
    // Opacity follows the tariff too, so light routes recede.
    let alpha = (80.0 + 175.0 * t) as u8;
    Color32::from_rgba_unmultiplied(rgb.red, rgb.green, rgb.blue, alpha)
}

/// Stroke width in points for a trade volume (billions).
pub fn stroke_width(volume: f64) -> f32 {
    const VOLUME_PER_POINT: f64 = 20.0;
    const MIN_WIDTH: f32 = 0.5;
    let w = (volume / VOLUME_PER_POINT) as f32;
    if w.is_finite() { w.max(MIN_WIDTH) } else { MIN_WIDTH }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical mapping: country → Color32
// ---------------------------------------------------------------------------

/// Maps country identifiers to distinct colours, used when routes are
/// coloured by origin instead of by tariff.
#[derive(Debug, Clone, Default)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CountryColors {
    pub fn new(countries: &BTreeSet<String>) -> Self {
        let palette = generate_palette(countries.len());
        CountryColors {
            mapping: countries.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping.get(country).copied().unwrap_or(Color32::GRAY)
    }

    /// Return the legend entries (country → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(k, c)| (k.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_tariff_is_darker_and_more_opaque() {
        let low = tariff_color(0.1);
        let high = tariff_color(0.3);
        assert!(high.a() > low.a());
        let lum = |c: Color32| {
            let [r, g, b, _] = c.to_srgba_unmultiplied();
            u32::from(r) + u32::from(g) + u32::from(b)
        };
        assert!(lum(high) < lum(low));
    }

    #[test]
    fn test_tariff_color_clamps() {
        assert_eq!(tariff_color(-1.0), tariff_color(0.0));
        assert_eq!(tariff_color(4.0), tariff_color(1.0));
        assert_eq!(tariff_color(f64::NAN), tariff_color(0.0));
    }

    #[test]
    fn test_stroke_width() {
        assert!((stroke_width(100.0) - 5.0).abs() < f32::EPSILON);
        assert!((stroke_width(0.0) - 0.5).abs() < f32::EPSILON);
        assert!((stroke_width(f64::INFINITY) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(8);
        assert_eq!(p.len(), 8);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 8);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_country_colors_fallback() {
        let countries: BTreeSet<String> = ["China", "USA"].iter().map(|s| s.to_string()).collect();
        let colors = CountryColors::new(&countries);
        assert_ne!(colors.color_for("China"), colors.color_for("USA"));
        assert_eq!(colors.color_for("Peru"), Color32::GRAY);
        assert_eq!(colors.legend_entries().len(), 2);
    }
}
