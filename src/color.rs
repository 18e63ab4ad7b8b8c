use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::RecordTable;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → colour
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a categorical column (Brand, OS) to colours.
/// Missing cells are labelled `UNKNOWN_KEY` like the grouped aggregates.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Srgb<u8>>,
    default_color: Srgb<u8>,
}

impl ColorMap {
    /// Build a colour map for the given labels.
    pub fn new(column: &str, labels: &BTreeSet<String>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Srgb::new(160, 160, 160),
        }
    }

    /// Colour map over every label found in `column`; empty when the table
    /// has no such column.
    pub fn for_column(table: &RecordTable, column: &str) -> Self {
        let labels: BTreeSet<String> = table
            .column_index(column)
            .map(|idx| table.column_values(idx).map(|v| v.key_label()).collect())
            .unwrap_or_default();
        Self::new(column, &labels)
    }

    pub fn rgb_for(&self, label: &str) -> Srgb<u8> {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Colour for the static PNG renderer.
    pub fn plotters_color(&self, label: &str) -> RGBColor {
        let c = self.rgb_for(label);
        RGBColor(c.red, c.green, c.blue)
    }

    /// Colour for the interactive viewer.
    pub fn egui_color(&self, label: &str) -> Color32 {
        let c = self.rgb_for(label);
        Color32::from_rgb(c.red, c.green, c.blue)
    }

    /// Labels in ascending order, as drawn in legends.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.mapping.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnType, Value, OS};

    #[test]
    fn palette_has_distinct_colours() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<(u8, u8, u8)> =
            p.iter().map(|c| (c.red, c.green, c.blue)).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_labels_fall_back_to_grey() {
        let table = RecordTable::new(
            vec![Column::new(OS, ColumnType::Text)],
            vec![
                vec![Value::Text("Android".into())],
                vec![Value::Missing],
                vec![Value::Text("iOS".into())],
            ],
        );
        let map = ColorMap::for_column(&table, OS);
        let labels: Vec<&str> = map.labels().collect();
        assert_eq!(labels, vec!["<NA>", "Android", "iOS"]);
        assert_ne!(map.rgb_for("Android"), map.rgb_for("iOS"));
        assert_eq!(map.rgb_for("Symbian"), Srgb::new(160, 160, 160));
    }
}
