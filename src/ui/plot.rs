use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points};

use crate::state::{ChartKind, ViewerState};

const HIST_BLUE: Color32 = Color32::from_rgb(31, 119, 180);
const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &ViewerState) {
    let kind = state.selected;
    let (x_label, y_label) = kind.axis_labels();
    ui.heading(kind.title());

    let mut plot = Plot::new(("chart_plot", kind.title()))
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if kind == ChartKind::AvgPriceByBrand {
        let brands: Vec<String> = state.analysis.avg_price_by_brand.keys().cloned().collect();
        plot = plot.x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            brands.get(i as usize).cloned().unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| match kind {
        ChartKind::PriceDistribution => price_histogram(plot_ui, state),
        ChartKind::AvgPriceByBrand => brand_bars(plot_ui, state),
        ChartKind::StorageVsPrice | ChartKind::RamVsPriceByOs => grouped_scatter(plot_ui, state),
    });
}

fn price_histogram(plot_ui: &mut PlotUi, state: &ViewerState) {
    let Some(hist) = &state.histogram else {
        return;
    };
    let bars: Vec<Bar> = hist
        .bars()
        .map(|(l, r, n)| Bar::new((l + r) / 2.0, n as f64).width(r - l))
        .collect();
    plot_ui.bar_chart(
        BarChart::new(bars)
            .name("Price")
            .color(HIST_BLUE),
    );

    if !state.kde.is_empty() {
        let points: PlotPoints = state.kde.iter().copied().collect();
        plot_ui.line(Line::new(points).name("KDE").color(HIST_BLUE).width(2.0));
    }
}

fn brand_bars(plot_ui: &mut PlotUi, state: &ViewerState) {
    let bars: Vec<Bar> = state
        .analysis
        .avg_price_by_brand
        .iter()
        .enumerate()
        .map(|(i, (brand, &avg))| Bar::new(i as f64, avg).width(0.6).name(brand))
        .collect();
    plot_ui.bar_chart(
        BarChart::new(bars)
            .name("Average Price")
            .color(SKY_BLUE),
    );
}

fn grouped_scatter(plot_ui: &mut PlotUi, state: &ViewerState) {
    let Some((points, colors)) = state.scatter() else {
        return;
    };
    for label in colors.labels() {
        let series: PlotPoints = points
            .iter()
            .filter(|p| p.2 == label)
            .map(|p| [p.0, p.1])
            .collect();
        plot_ui.points(
            Points::new(series)
                .name(label)
                .color(colors.egui_color(label))
                .radius(4.0),
        );
    }
}
