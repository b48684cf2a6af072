//! Tabbed chart grid and the inline-SVG renderers behind it.
//!
//! The renderers draw straight from [`ChartSeries`]: a `None` data point is
//! a gap in the line (the path breaks), never a zero.

use dioxus::prelude::*;

use crate::core::charts::{ChartBundle, ChartSeries, Dataset};
use crate::core::format;

const VIEW_W: f64 = 640.0;
const VIEW_H: f64 = 300.0;
const PAD_X: f64 = 46.0;
const PAD_Y: f64 = 26.0;
const AXIS_RIGHT: f64 = VIEW_W - PAD_X;
const TICK_TOP: f64 = PAD_Y + 4.0;
const TICK_BOTTOM: f64 = VIEW_H - 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartTab {
    Overview,
    Sales,
    Predictions,
    Inventory,
}

impl ChartTab {
    const ALL: [ChartTab; 4] = [
        ChartTab::Overview,
        ChartTab::Sales,
        ChartTab::Predictions,
        ChartTab::Inventory,
    ];

    fn label(self) -> &'static str {
        match self {
            ChartTab::Overview => "Overview",
            ChartTab::Sales => "Sales analysis",
            ChartTab::Predictions => "Predictions",
            ChartTab::Inventory => "Inventory",
        }
    }
}

#[component]
pub fn ChartsPanel(charts: ChartBundle) -> Element {
    let mut tab = use_signal(|| ChartTab::Overview);
    let active = tab();
    let tabs = ChartTab::ALL.map(|entry| (entry, entry.label()));

    rsx! {
        section { class: "analysis-card charts-panel",
            div { class: "analysis-card__header",
                h2 { "Interactive data visualizations" }
            }

            div { class: "chart-tabs",
                for (entry, label) in tabs {
                    button {
                        r#type: "button",
                        class: if entry == active { "chart-tabs__button chart-tabs__button--active" } else { "chart-tabs__button" },
                        onclick: move |_| tab.set(entry),
                        "{label}"
                    }
                }
            }

            div { class: "chart-grid",
                {match active {
                    ChartTab::Overview => rsx! {
                        ChartCard { title: "Sales overview: historical & predicted", series: charts.sales_overview.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Daily sales trend (last 90 days)", series: charts.sales_trend.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Monthly sales overview", series: charts.monthly_sales.clone(), kind: ChartKind::Bar }
                        ChartCard { title: "Customer loyalty by product", series: charts.repeat_purchase.clone(), kind: ChartKind::Donut }
                    },
                    ChartTab::Sales => rsx! {
                        ChartCard { title: "Sales overview: historical & predicted", series: charts.sales_overview.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Detailed sales analysis", series: charts.sales_trend.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Actual vs predicted sales", series: charts.sales_forecast.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Product performance metrics", series: charts.repeat_purchase.clone(), kind: ChartKind::Bar }
                    },
                    ChartTab::Predictions => rsx! {
                        ChartCard { title: "AI-generated 12-month forecasts", series: charts.future_predictions.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Historical prediction accuracy", series: charts.sales_forecast.clone(), kind: ChartKind::Line }
                        ChartCard { title: "Monthly trends for forecasting", series: charts.monthly_sales.clone(), kind: ChartKind::Bar }
                    },
                    ChartTab::Inventory => rsx! {
                        ChartCard { title: "Current stock status", series: charts.stock_levels.clone(), kind: ChartKind::Bar }
                        ChartCard { title: "Product demand analysis", series: charts.repeat_purchase.clone(), kind: ChartKind::Donut }
                    },
                }}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ChartKind {
    Line,
    Bar,
    Donut,
}

/// One chart card; renders nothing when its series is absent so tabs only
/// show what the workbook actually supports.
#[component]
fn ChartCard(title: &'static str, series: Option<ChartSeries>, kind: ChartKind) -> Element {
    let Some(series) = series else {
        return rsx! {};
    };
    if series.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "chart-card",
            h3 { "{title}" }
            {match kind {
                ChartKind::Line => rsx! { LineChart { series: series.clone() } },
                ChartKind::Bar => rsx! { BarChart { series: series.clone() } },
                ChartKind::Donut => rsx! { DonutChart { series: series.clone() } },
            }}
        }
    }
}

fn x_position(index: usize, count: usize) -> f64 {
    let span = VIEW_W - 2.0 * PAD_X;
    if count <= 1 {
        PAD_X + span / 2.0
    } else {
        PAD_X + span * index as f64 / (count - 1) as f64
    }
}

fn y_position(value: f64, max: f64) -> f64 {
    let span = VIEW_H - 2.0 * PAD_Y;
    let max = if max > 0.0 { max } else { 1.0 };
    VIEW_H - PAD_Y - span * (value / max).clamp(0.0, 1.0)
}

/// Contiguous runs of present points; each run becomes one path segment.
fn segments(dataset: &Dataset, count: usize, max: f64) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, value) in dataset.data.iter().enumerate() {
        match value {
            Some(v) => current.push((x_position(i, count), y_position(*v, max))),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn path_d(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{x:.1} {y:.1} "));
    }
    d.trim_end().to_string()
}

fn area_d(points: &[(f64, f64)]) -> String {
    let baseline = VIEW_H - PAD_Y;
    let mut d = path_d(points);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        d.push_str(&format!(
            " L{:.1} {baseline:.1} L{:.1} {baseline:.1} Z",
            last.0, first.0
        ));
    }
    d
}

/// Up to six x-axis labels, sampled evenly, endpoints always included.
fn axis_ticks(labels: &[String]) -> Vec<(usize, &str)> {
    let count = labels.len();
    if count == 0 {
        return Vec::new();
    }
    let step = count.div_ceil(6).max(1);
    let mut ticks: Vec<(usize, &str)> = labels
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, l)| (i, l.as_str()))
        .collect();
    if ticks.last().map(|(i, _)| *i) != Some(count - 1) {
        ticks.push((count - 1, labels[count - 1].as_str()));
    }
    ticks
}

/// One drawable SVG primitive, precomputed so the rsx stays declarative.
enum Mark {
    Area { d: String, color: String },
    Stroke { d: String, color: String, dashed: bool },
    Point { x: f64, y: f64, color: String },
}

fn line_marks(series: &ChartSeries, max: f64) -> Vec<Mark> {
    let count = series.len();
    let mut marks = Vec::new();
    for dataset in &series.datasets {
        let runs = segments(dataset, count, max);
        if dataset.filled {
            for run in &runs {
                marks.push(Mark::Area {
                    d: area_d(run),
                    color: dataset.color.clone(),
                });
            }
        }
        for run in &runs {
            if let [(x, y)] = run.as_slice() {
                marks.push(Mark::Point {
                    x: *x,
                    y: *y,
                    color: dataset.color.clone(),
                });
            } else {
                marks.push(Mark::Stroke {
                    d: path_d(run),
                    color: dataset.color.clone(),
                    dashed: dataset.dashed,
                });
            }
        }
    }
    marks
}

#[component]
fn LineChart(series: ChartSeries) -> Element {
    let max = series.max_value();
    let count = series.len();
    let baseline = VIEW_H - PAD_Y;
    let marks = line_marks(&series, max);
    let ticks: Vec<(f64, String)> = axis_ticks(&series.labels)
        .into_iter()
        .map(|(index, label)| (x_position(index, count), label.to_string()))
        .collect();

    rsx! {
        svg {
            class: "chart chart--line",
            view_box: "0 0 {VIEW_W} {VIEW_H}",
            role: "img",

            line { x1: "{PAD_X}", y1: "{baseline}", x2: "{AXIS_RIGHT}", y2: "{baseline}", class: "chart__axis" }
            text { x: "4", y: "{TICK_TOP}", class: "chart__tick", {format::format_thb(max)} }
            text { x: "4", y: "{baseline}", class: "chart__tick", "฿0" }

            for mark in marks {
                {match mark {
                    Mark::Area { d, color } => rsx! {
                        path { d: "{d}", fill: "{color}", fill_opacity: "0.15", stroke: "none" }
                    },
                    Mark::Stroke { d, color, dashed } => rsx! {
                        path {
                            d: "{d}",
                            fill: "none",
                            stroke: "{color}",
                            stroke_width: "2.5",
                            stroke_dasharray: if dashed { "8 4" } else { "none" },
                        }
                    },
                    Mark::Point { x, y, color } => rsx! {
                        circle { cx: "{x}", cy: "{y}", r: "4", fill: "{color}" }
                    },
                }}
            }

            for (x, label) in ticks {
                text {
                    x: "{x}",
                    y: "{TICK_BOTTOM}",
                    text_anchor: "middle",
                    class: "chart__tick",
                    "{label}"
                }
            }
        }
        ChartLegend { series }
    }
}

struct Bar {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: String,
}

fn bar_geometry(series: &ChartSeries, max: f64) -> Vec<Bar> {
    let count = series.len();
    let baseline = VIEW_H - PAD_Y;
    let slot = (VIEW_W - 2.0 * PAD_X) / count.max(1) as f64;
    let width = (slot * 0.6).min(64.0);

    let Some(dataset) = series.datasets.first() else {
        return Vec::new();
    };
    dataset
        .data
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let value = (*value)?;
            let y = y_position(value, max);
            Some(Bar {
                x: PAD_X + slot * index as f64 + (slot - width) / 2.0,
                y,
                width,
                height: baseline - y,
                color: bar_color(dataset, index),
            })
        })
        .collect()
}

#[component]
fn BarChart(series: ChartSeries) -> Element {
    let max = series.max_value();
    let count = series.len();
    let baseline = VIEW_H - PAD_Y;
    let slot = (VIEW_W - 2.0 * PAD_X) / count.max(1) as f64;
    let bars = bar_geometry(&series, max);
    let ticks: Vec<(f64, String)> = axis_ticks(&series.labels)
        .into_iter()
        .map(|(index, label)| (PAD_X + slot * index as f64 + slot / 2.0, label.to_string()))
        .collect();

    rsx! {
        svg {
            class: "chart chart--bar",
            view_box: "0 0 {VIEW_W} {VIEW_H}",
            role: "img",

            line { x1: "{PAD_X}", y1: "{baseline}", x2: "{AXIS_RIGHT}", y2: "{baseline}", class: "chart__axis" }
            text { x: "4", y: "{TICK_TOP}", class: "chart__tick", {format::format_thb(max)} }

            for bar in bars {
                rect {
                    x: "{bar.x}",
                    y: "{bar.y}",
                    width: "{bar.width}",
                    height: "{bar.height}",
                    fill: "{bar.color}",
                    rx: "3",
                }
            }

            for (x, label) in ticks {
                text {
                    x: "{x}",
                    y: "{TICK_BOTTOM}",
                    text_anchor: "middle",
                    class: "chart__tick",
                    "{label}"
                }
            }
        }
        ChartLegend { series }
    }
}

/// Donut built from stroke-dasharray circle slices.
#[component]
fn DonutChart(series: ChartSeries) -> Element {
    let Some(dataset) = series.datasets.first() else {
        return rsx! {};
    };
    let values: Vec<f64> = dataset.data.iter().map(|v| v.unwrap_or(0.0)).collect();
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return rsx! {};
    }

    let radius = 80.0_f64;
    let circumference = std::f64::consts::TAU * radius;
    let mut offset = circumference / 4.0; // start at 12 o'clock

    // (color, dasharray, dashoffset) per slice, preformatted.
    let mut slices = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let length = circumference * value / total;
        slices.push((
            bar_color(dataset, index),
            format!("{length:.2} {:.2}", circumference - length),
            format!("{offset:.2}"),
        ));
        offset -= length;
    }

    let legend: Vec<(String, String)> = series
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| (label.clone(), bar_color(dataset, index)))
        .collect();

    rsx! {
        svg {
            class: "chart chart--donut",
            view_box: "0 0 300 220",
            role: "img",

            for (color, dash_array, dash_offset) in slices {
                circle {
                    cx: "150",
                    cy: "110",
                    r: "{radius}",
                    fill: "none",
                    stroke: "{color}",
                    stroke_width: "38",
                    stroke_dasharray: "{dash_array}",
                    stroke_dashoffset: "{dash_offset}",
                }
            }
        }
        ul { class: "chart-legend",
            for (label, color) in legend {
                li { class: "chart-legend__item",
                    span { class: "chart-legend__swatch", style: "background: {color}" }
                    "{label}"
                }
            }
        }
    }
}

fn bar_color(dataset: &Dataset, index: usize) -> String {
    dataset
        .point_colors
        .get(index)
        .cloned()
        .unwrap_or_else(|| dataset.color.clone())
}

#[component]
fn ChartLegend(series: ChartSeries) -> Element {
    // Per-point colored series carry their meaning in the bars themselves.
    let entries: Vec<(String, String)> = series
        .datasets
        .iter()
        .filter(|d| d.point_colors.is_empty())
        .map(|d| (d.label.clone(), d.color.clone()))
        .collect();
    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        ul { class: "chart-legend",
            for (label, color) in entries {
                li { class: "chart-legend__item",
                    span { class: "chart-legend__swatch", style: "background: {color}" }
                    "{label}"
                }
            }
        }
    }
}
