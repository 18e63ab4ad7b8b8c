use crate::analysis::Analysis;
use crate::chart::density::{kde_curve, Histogram};
use crate::chart::{grouped_points, GroupedPoint, KDE_POINTS};
use crate::color::ColorMap;
use crate::data::model::{RecordTable, BRAND, OS, PRICE, RAM_GB, STORAGE_GB};
use crate::error::TableError;

// ---------------------------------------------------------------------------
// Which chart is on screen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PriceDistribution,
    AvgPriceByBrand,
    StorageVsPrice,
    RamVsPriceByOs,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::PriceDistribution,
        ChartKind::AvgPriceByBrand,
        ChartKind::StorageVsPrice,
        ChartKind::RamVsPriceByOs,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::PriceDistribution => "Price Distribution of Mobiles",
            ChartKind::AvgPriceByBrand => "Average Price by Brand",
            ChartKind::StorageVsPrice => "Storage vs Price",
            ChartKind::RamVsPriceByOs => "RAM vs Price by OS",
        }
    }

    /// Axis labels (x, y).
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            ChartKind::PriceDistribution => ("Price (INR)", "Count"),
            ChartKind::AvgPriceByBrand => ("Brand", "Average Price (INR)"),
            ChartKind::StorageVsPrice => ("Storage (GB)", "Price (INR)"),
            ChartKind::RamVsPriceByOs => ("RAM (GB)", "Price (INR)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the viewer draws, precomputed once from the pipeline output.
pub struct ViewerState {
    pub analysis: Analysis,
    pub rows: usize,

    /// Chart currently shown.
    pub selected: ChartKind,

    pub histogram: Option<Histogram>,
    /// KDE overlay scaled to histogram counts.
    pub kde: Vec<[f64; 2]>,

    pub storage_points: Vec<GroupedPoint>,
    pub ram_points: Vec<GroupedPoint>,
    pub brand_colors: ColorMap,
    pub os_colors: ColorMap,
}

impl ViewerState {
    pub fn new(table: &RecordTable, analysis: Analysis, bins: usize) -> Result<Self, TableError> {
        let prices = table.numeric_column(table.require_column(PRICE)?);
        let histogram = Histogram::new(&prices, bins);
        let kde = histogram
            .as_ref()
            .map(|h| {
                let scale = prices.len() as f64 * h.width;
                kde_curve(&prices, h.start, h.end(), KDE_POINTS, scale)
                    .into_iter()
                    .map(|(x, y)| [x, y])
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            analysis,
            rows: table.len(),
            selected: ChartKind::PriceDistribution,
            histogram,
            kde,
            storage_points: grouped_points(table, STORAGE_GB, PRICE, BRAND)?,
            ram_points: grouped_points(table, RAM_GB, PRICE, OS)?,
            brand_colors: ColorMap::for_column(table, BRAND),
            os_colors: ColorMap::for_column(table, OS),
        })
    }

    /// Colour legend of the selected chart, if it has one.
    pub fn legend(&self) -> Option<&ColorMap> {
        match self.selected {
            ChartKind::StorageVsPrice => Some(&self.brand_colors),
            ChartKind::RamVsPriceByOs => Some(&self.os_colors),
            _ => None,
        }
    }

    /// Scatter points and their colour map for the selected chart.
    pub fn scatter(&self) -> Option<(&[GroupedPoint], &ColorMap)> {
        match self.selected {
            ChartKind::StorageVsPrice => Some((self.storage_points.as_slice(), &self.brand_colors)),
            ChartKind::RamVsPriceByOs => Some((self.ram_points.as_slice(), &self.os_colors)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::data::model::{Column, ColumnType, Value};

    fn table() -> RecordTable {
        let t = |s: &str| Value::Text(s.into());
        RecordTable::new(
            vec![
                Column::new(BRAND, ColumnType::Text),
                Column::new(PRICE, ColumnType::Real),
                Column::new(STORAGE_GB, ColumnType::Integer),
                Column::new(RAM_GB, ColumnType::Integer),
                Column::new(OS, ColumnType::Text),
            ],
            vec![
                vec![t("Apple"), Value::Real(900.0), Value::Integer(128), Value::Integer(6), t("iOS")],
                vec![t("Oppo"), Value::Real(300.0), Value::Integer(64), Value::Integer(4), t("Android")],
                vec![t("Oppo"), Value::Real(350.0), Value::Integer(64), Value::Integer(6), t("Android")],
            ],
        )
    }

    #[test]
    fn legend_follows_selected_chart() {
        let t = table();
        let mut state = ViewerState::new(&t, analyze(&t).unwrap(), 5).unwrap();
        assert!(state.legend().is_none());

        state.selected = ChartKind::StorageVsPrice;
        assert_eq!(state.legend().map(|c| c.column.as_str()), Some(BRAND));

        state.selected = ChartKind::RamVsPriceByOs;
        let (points, colors) = state.scatter().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(colors.labels().collect::<Vec<_>>(), vec!["Android", "iOS"]);
    }

    #[test]
    fn histogram_and_kde_are_precomputed() {
        let t = table();
        let state = ViewerState::new(&t, analyze(&t).unwrap(), 5).unwrap();
        let h = state.histogram.as_ref().unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        assert_eq!(state.kde.len(), KDE_POINTS);
    }
}
