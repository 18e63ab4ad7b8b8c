//! Static chart rendering: four PNG files under the figure directory.
//!
//! ```text
//!   RecordTable ──┬── price_distribution.png   histogram + KDE of Price
//!                 ├── storage_vs_price.png     scatter, coloured by Brand
//!                 └── ram_vs_price_by_os.png   scatter, coloured by OS
//!   Analysis ─────── avg_price_by_brand.png    bar per Brand
//! ```

pub mod density;

use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analysis::Analysis;
use crate::color::ColorMap;
use crate::data::model::{RecordTable, BRAND, OS, PRICE, RAM_GB, STORAGE_GB};
use crate::error::{FileError, TableError};
use density::{kde_curve, Histogram};

pub const PRICE_DISTRIBUTION: &str = "price_distribution.png";
pub const AVG_PRICE_BY_BRAND: &str = "avg_price_by_brand.png";
pub const STORAGE_VS_PRICE: &str = "storage_vs_price.png";
pub const RAM_VS_PRICE_BY_OS: &str = "ram_vs_price_by_os.png";

pub const FIGURE_SIZE: (u32, u32) = (800, 600);
pub const KDE_POINTS: usize = 200;

const HIST_BLUE: RGBColor = RGBColor(31, 119, 180);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

type DrawResult = Result<(), Box<dyn Error>>;

/// One `(x, y, group label)` point of a coloured scatter plot.
pub type GroupedPoint = (f64, f64, String);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render all four charts into `figure_dir` (created if absent) and return
/// the written paths.
pub fn render_all(
    table: &RecordTable,
    analysis: &Analysis,
    figure_dir: &Path,
    bins: usize,
) -> Result<Vec<PathBuf>, TableError> {
    std::fs::create_dir_all(figure_dir).map_err(|source| FileError::Write {
        path: figure_dir.to_path_buf(),
        source,
    })?;

    let prices = table.numeric_column(table.require_column(PRICE)?);
    let by_brand = grouped_points(table, STORAGE_GB, PRICE, BRAND)?;
    let by_os = grouped_points(table, RAM_GB, PRICE, OS)?;
    let brand_colors = ColorMap::for_column(table, BRAND);
    let os_colors = ColorMap::for_column(table, OS);

    let path = figure_dir.join(PRICE_DISTRIBUTION);
    draw_price_histogram(&path, &prices, bins).map_err(render_err(&path))?;
    let mut written = vec![path];

    let path = figure_dir.join(AVG_PRICE_BY_BRAND);
    draw_brand_bars(&path, &analysis.avg_price_by_brand).map_err(render_err(&path))?;
    written.push(path);

    let path = figure_dir.join(STORAGE_VS_PRICE);
    let axes = ScatterAxes {
        title: "Storage vs Price",
        x_desc: "Storage (GB)",
        y_desc: "Price (INR)",
    };
    draw_grouped_scatter(&path, &axes, &by_brand, &brand_colors).map_err(render_err(&path))?;
    written.push(path);

    let path = figure_dir.join(RAM_VS_PRICE_BY_OS);
    let axes = ScatterAxes {
        title: "RAM vs Price by OS",
        x_desc: "RAM (GB)",
        y_desc: "Price (INR)",
    };
    draw_grouped_scatter(&path, &axes, &by_os, &os_colors).map_err(render_err(&path))?;
    written.push(path);

    for p in &written {
        info!("chart saved to {}", p.display());
    }
    Ok(written)
}

fn render_err(path: &Path) -> impl Fn(Box<dyn Error>) -> FileError + '_ {
    move |e| FileError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Rows with both coordinates present, labelled by `group` (`UNKNOWN_KEY` when
/// the group cell is missing).
pub fn grouped_points(
    table: &RecordTable,
    x: &str,
    y: &str,
    group: &str,
) -> Result<Vec<GroupedPoint>, TableError> {
    let xi = table.require_column(x)?;
    let yi = table.require_column(y)?;
    let gi = table.require_column(group)?;
    Ok(table
        .rows
        .iter()
        .filter_map(|r| Some((r[xi].as_f64()?, r[yi].as_f64()?, r[gi].key_label())))
        .collect())
}

/// Data range padded by 5% on each side; unit padding for a single value.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn draw_no_data(root: &DrawingArea<BitMapBackend<'_>, Shift>, title: &str) -> DrawResult {
    let (w, h) = root.dim_in_pixel();
    root.draw(&Text::new(
        title.to_string(),
        (20, 20),
        ("sans-serif", 28).into_font(),
    ))?;
    root.draw(&Text::new(
        "no data".to_string(),
        (w as i32 / 2 - 40, h as i32 / 2),
        ("sans-serif", 20).into_font(),
    ))?;
    Ok(())
}

fn draw_price_histogram(path: &Path, prices: &[f64], bins: usize) -> DrawResult {
    const TITLE: &str = "Price Distribution of Mobiles";
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let Some(hist) = Histogram::new(prices, bins) else {
        draw_no_data(&root, TITLE)?;
        root.present()?;
        return Ok(());
    };
    let scale = prices.len() as f64 * hist.width;
    let curve = kde_curve(prices, hist.start, hist.end(), KDE_POINTS, scale);
    let y_max = curve
        .iter()
        .map(|&(_, y)| y)
        .fold(hist.max_count() as f64, f64::max)
        * 1.1;
    debug!(
        "price histogram: {} bins of width {:.2}, kde over {} points",
        hist.counts.len(),
        hist.width,
        curve.len()
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(hist.start..hist.end(), 0f64..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Price (INR)")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(hist.bars().map(|(l, r, n)| {
        Rectangle::new([(l, 0.0), (r, n as f64)], HIST_BLUE.mix(0.5).filled())
    }))?;
    chart.draw_series(
        hist.bars()
            .map(|(l, r, n)| Rectangle::new([(l, 0.0), (r, n as f64)], HIST_BLUE.stroke_width(1))),
    )?;
    chart.draw_series(LineSeries::new(curve, HIST_BLUE.stroke_width(2)))?;

    root.present()?;
    Ok(())
}

/// One bar per brand, in the aggregate's (ascending) key order.
fn draw_brand_bars(path: &Path, avg_price: &std::collections::BTreeMap<String, f64>) -> DrawResult {
    const TITLE: &str = "Average Price by Brand";
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    if avg_price.is_empty() {
        draw_no_data(&root, TITLE)?;
        root.present()?;
        return Ok(());
    }

    let brands: Vec<&str> = avg_price.keys().map(String::as_str).collect();
    let y_max = avg_price.values().copied().fold(0.0, f64::max).max(1.0) * 1.1;
    let x_axis = (0..brands.len()).into_segmented();

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_axis, 0f64..y_max)?;

    let label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => brands.get(*i).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(brands.len())
        .x_label_formatter(&label)
        .x_desc("Brand")
        .y_desc("Average Price (INR)")
        .draw()?;

    let bar = |i: usize, v: f64, style: ShapeStyle| {
        let mut r = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            style,
        );
        r.set_margin(0, 0, 8, 8);
        r
    };
    chart.draw_series(
        avg_price
            .values()
            .enumerate()
            .map(|(i, &v)| bar(i, v, SKY_BLUE.filled())),
    )?;
    chart.draw_series(
        avg_price
            .values()
            .enumerate()
            .map(|(i, &v)| bar(i, v, BLACK.stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}

struct ScatterAxes {
    title: &'static str,
    x_desc: &'static str,
    y_desc: &'static str,
}

fn draw_grouped_scatter(
    path: &Path,
    axes: &ScatterAxes,
    points: &[GroupedPoint],
    colors: &ColorMap,
) -> DrawResult {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    if points.is_empty() {
        draw_no_data(&root, axes.title)?;
        root.present()?;
        return Ok(());
    }

    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption(axes.title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .draw()?;

    for label in colors.labels() {
        let color = colors.plotters_color(label);
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| p.2 == label)
                    .map(|p| Circle::new((p.0, p.1), 4, color.filled())),
            )?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 8, y), 4, color.filled()));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
