use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot};

use crate::color::SeriesColors;
use crate::data::aggregate::{CountrySeries, GroupTotal, HistogramBin};
use crate::format;

const CHART_HEIGHT: f32 = 260.0;
const BAR_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

fn empty_chart(ui: &mut Ui) {
    ui.label("No data for the current selection.");
}

/// Only whole-number ticks get a label; used for year and category axes.
fn integer_tick(mark: &GridMark) -> Option<i64> {
    let v = mark.value;
    (v.fract().abs() < 1e-9).then_some(v.round() as i64)
}

fn y_kilotons(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    format::compact(mark.value)
}

fn x_years(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    integer_tick(&mark).map(|y| y.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar charts: top emitters, regional totals
// ---------------------------------------------------------------------------

/// One bar per group, in the order given, labelled on the x axis.
pub fn totals_bar_chart(ui: &mut Ui, id: &str, totals: &[GroupTotal]) {
    if totals.is_empty() {
        empty_chart(ui);
        return;
    }

    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, g)| Bar::new(i as f64, g.kilotons).name(&g.key).width(0.7))
        .collect();

    let labels: Vec<String> = totals.iter().map(|g| g.key.clone()).collect();
    let x_labels = move |mark: GridMark, _range: &RangeInclusive<f64>| {
        integer_tick(&mark)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| labels.get(i).cloned())
            .unwrap_or_default()
    };

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(x_labels)
        .y_axis_formatter(y_kilotons)
        .y_axis_label("Kilotons of CO2")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Histogram: per-capita distribution
// ---------------------------------------------------------------------------

pub fn per_capita_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    if bins.is_empty() {
        empty_chart(ui);
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.midpoint(), b.count as f64)
                .width(b.width())
                .name(format!("{:.2} to {:.2}", b.lower, b.upper))
        })
        .collect();

    Plot::new("per_capita_histogram")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_label("Metric Tons Per Capita")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Line charts: global trend, country comparison
// ---------------------------------------------------------------------------

fn year_points(points: &[(i32, f64)]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|&(year, kt)| [f64::from(year), kt])
        .collect()
}

pub fn global_trend(ui: &mut Ui, trend: &[(i32, f64)]) {
    if trend.is_empty() {
        empty_chart(ui);
        return;
    }

    Plot::new("global_trend")
        .height(CHART_HEIGHT)
        .x_axis_formatter(x_years)
        .y_axis_formatter(y_kilotons)
        .x_axis_label("Year")
        .y_axis_label("Kilotons of CO2")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(year_points(trend))
                    .name("Kilotons of CO2")
                    .color(BAR_COLOR)
                    .width(2.0),
            );
        });
}

/// One coloured line per compared country. Countries without records are
/// listed underneath instead of being drawn.
pub fn country_comparison(ui: &mut Ui, series: &[CountrySeries], colors: &SeriesColors) {
    if series.is_empty() {
        ui.label("Select one or more countries to compare.");
        return;
    }

    ui.strong("CO2 Emissions Over Time");
    Plot::new("country_comparison")
        .height(CHART_HEIGHT + 60.0)
        .legend(Legend::default())
        .show_grid(true)
        .x_axis_formatter(x_years)
        .y_axis_formatter(y_kilotons)
        .x_axis_label("Year")
        .y_axis_label("Kilotons of CO2")
        .show(ui, |plot_ui| {
            for s in series.iter().filter(|s| !s.points.is_empty()) {
                plot_ui.line(
                    Line::new(year_points(&s.points))
                        .name(&s.country)
                        .color(colors.color_for(&s.country))
                        .width(1.5),
                );
            }
        });

    for s in series.iter().filter(|s| s.points.is_empty()) {
        ui.label(format!("No records for {}.", s.country));
    }
}
