use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Value;

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
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

/// Fill colour for a confidence band drawn under a line of `line` colour.
pub fn band_color(line: Color32, opacity: f32) -> Color32 {
    line.gamma_multiply(opacity.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Series palette: series value (treatment, trial, …) → Color32
// ---------------------------------------------------------------------------

/// Assigns each plotted series one palette colour, stable for a given set of
/// series values.
#[derive(Debug, Clone)]
pub struct SeriesPalette {
    pub column: String,
    mapping: BTreeMap<Value, Color32>,
}

impl SeriesPalette {
    pub fn new(column: &str, series: &BTreeSet<Value>) -> Self {
        let mapping = series
            .iter()
            .cloned()
            .zip(generate_palette(series.len()))
            .collect();
        SeriesPalette {
            column: column.to_string(),
            mapping,
        }
    }

    /// Colour for a series value; grey for values the palette was not built with.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn band_is_translucent_line_color() {
        let band = band_color(Color32::from_rgb(200, 40, 40), 0.25);
        assert!(band.a() < 255);
        assert_eq!(band_color(Color32::RED, 1.0), Color32::RED);
    }

    #[test]
    fn unknown_series_is_grey() {
        let series: BTreeSet<Value> = [Value::from("ctrl"), Value::from("heat")].into_iter().collect();
        let palette = SeriesPalette::new("treatment", &series);
        assert_ne!(palette.color_for(&Value::from("ctrl")), palette.color_for(&Value::from("heat")));
        assert_eq!(palette.color_for(&Value::from("cold")), Color32::GRAY);
    }
}
