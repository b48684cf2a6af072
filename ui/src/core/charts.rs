//! Derivation of chart-ready series from spreadsheet rows and the
//! normalized AI analysis.
//!
//! Everything here is a pure function of its input: sheets drive which
//! series exist (unrecognized sheet names are ignored, empty sheets are
//! skipped), and the combined overview stitches the historical monthly
//! aggregate to the forecast with a single shared bridge point so the line
//! chart reads as one continuous timeline. A `None` data point means "no
//! value at this timeline position" and renders as a gap, never as zero.

use serde_json::Value;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

use super::payload::{coerce_f64, value_text, AnalysisPayload, MonthlyForecast, NormalizedAnalysis};

pub const BLUE: &str = "#4299e1";
pub const GREEN: &str = "#48bb78";
pub const ORANGE: &str = "#ed8936";
pub const PURPLE: &str = "#9f7aea";
pub const RED: &str = "#f56565";
pub const TEAL: &str = "#38b2ac";
pub const YELLOW: &str = "#ecc94b";

/// Categorical palette, cycled when a series has more entries than colors.
pub const PALETTE: [&str; 7] = [BLUE, GREEN, ORANGE, PURPLE, RED, TEAL, YELLOW];

const DAILY_WINDOW: usize = 90;
const FORECAST_WINDOW: usize = 60;
const TREND_MONTHS: usize = 12;
const DEFAULT_GROWTH_RATE: f64 = 1.05;

/// One drawable dataset. `point_colors` (when non-empty) colors bars and
/// slices individually; lines use `color` throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub color: String,
    pub filled: bool,
    pub dashed: bool,
    pub point_colors: Vec<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>, color: &str) -> Self {
        Self {
            label: label.into(),
            data,
            color: color.to_string(),
            filled: false,
            dashed: false,
            point_colors: Vec::new(),
        }
    }

    pub fn filled(mut self) -> Self {
        self.filled = true;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn with_point_colors(mut self, colors: Vec<String>) -> Self {
        self.point_colors = colors;
        self
    }
}

/// Labels plus one or more datasets of the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            datasets: Vec::new(),
        }
    }

    pub fn push(mut self, dataset: Dataset) -> Self {
        debug_assert_eq!(dataset.data.len(), self.labels.len());
        self.datasets.push(dataset);
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest finite value across all datasets; used for axis scaling.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().flatten())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

/// The fixed set of named series the analysis page knows how to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartBundle {
    pub sales_trend: Option<ChartSeries>,
    pub monthly_sales: Option<ChartSeries>,
    pub sales_forecast: Option<ChartSeries>,
    pub repeat_purchase: Option<ChartSeries>,
    pub stock_levels: Option<ChartSeries>,
    pub future_predictions: Option<ChartSeries>,
    pub sales_overview: Option<ChartSeries>,
}

impl ChartBundle {
    pub fn is_empty(&self) -> bool {
        self.sales_trend.is_none()
            && self.monthly_sales.is_none()
            && self.sales_forecast.is_none()
            && self.repeat_purchase.is_none()
            && self.stock_levels.is_none()
            && self.future_predictions.is_none()
            && self.sales_overview.is_none()
    }
}

/// Build every chart the payload supports. Pure; returns an empty bundle
/// when no recognized sheet or forecast section is present.
pub fn build_series(
    payload: &AnalysisPayload,
    analysis: Option<&NormalizedAnalysis>,
) -> ChartBundle {
    build_series_at(payload, analysis, OffsetDateTime::now_utc().date())
}

/// Same as [`build_series`] with an injected "today" so the trend
/// extrapolation is deterministic under test.
pub fn build_series_at(
    payload: &AnalysisPayload,
    analysis: Option<&NormalizedAnalysis>,
    today: Date,
) -> ChartBundle {
    let mut bundle = ChartBundle::default();

    for (name, rows) in payload.sheets() {
        if rows.is_empty() {
            continue;
        }
        match name {
            "TotalSales" => {
                bundle.sales_trend = Some(daily_sales_trend(rows));
                bundle.monthly_sales = monthly_sales(rows);
            }
            "SalesForecast" => bundle.sales_forecast = Some(forecast_comparison(rows)),
            "RepeatPurchase" => bundle.repeat_purchase = Some(repeat_purchase(rows)),
            "StockLevels" => bundle.stock_levels = Some(stock_levels(rows)),
            _ => {}
        }
    }

    let forecasts = analysis
        .and_then(|a| a.sales_forecasting.as_ref())
        .and_then(|f| f.monthly_forecasts.as_deref())
        .filter(|f| !f.is_empty());

    if let Some(forecasts) = forecasts {
        bundle.future_predictions = Some(future_predictions(forecasts));
    }

    bundle.sales_overview = sales_overview(bundle.monthly_sales.as_ref(), forecasts, today);
    bundle
}

/// Trailing 90-day window of the daily sales sheet, in original row order.
fn daily_sales_trend(rows: &[Value]) -> ChartSeries {
    let window = trailing(rows, DAILY_WINDOW);
    let labels = window.iter().map(|row| date_label(row)).collect();
    let data = window
        .iter()
        .map(|row| Some(field_f64(row, "Daily Sales (THB)")))
        .collect();

    ChartSeries::new(labels).push(Dataset::new("Daily Sales (THB)", data, BLUE).filled())
}

/// Year-month aggregation of the same trailing window, chronological,
/// summing the value field per group. Rows without a parseable date are
/// left out of the aggregate.
fn monthly_sales(rows: &[Value]) -> Option<ChartSeries> {
    let window = trailing(rows, DAILY_WINDOW);

    let mut groups: std::collections::BTreeMap<(i32, u8), f64> = Default::default();
    for row in window {
        if let Some(date) = field_date(row) {
            *groups.entry((date.year(), date.month() as u8)).or_default() +=
                field_f64(row, "Daily Sales (THB)");
        }
    }
    if groups.is_empty() {
        return None;
    }

    let mut labels = Vec::with_capacity(groups.len());
    let mut data = Vec::with_capacity(groups.len());
    for ((year, month), total) in groups {
        labels.push(year_month_label(year, month));
        data.push(Some(total));
    }

    Some(ChartSeries::new(labels).push(Dataset::new("Monthly Sales (THB)", data, GREEN).filled()))
}

/// Trailing 60-row actual-vs-predicted comparison, aligned by date.
fn forecast_comparison(rows: &[Value]) -> ChartSeries {
    let window = trailing(rows, FORECAST_WINDOW);
    let labels = window.iter().map(|row| date_label(row)).collect();
    let actual = window
        .iter()
        .map(|row| Some(field_f64(row, "Actual Sales (THB)")))
        .collect();
    let predicted = window
        .iter()
        .map(|row| Some(field_f64(row, "Predicted Sales (THB)")))
        .collect();

    ChartSeries::new(labels)
        .push(Dataset::new("Actual Sales (THB)", actual, BLUE))
        .push(Dataset::new("Predicted Sales (THB)", predicted, ORANGE).dashed())
}

/// One categorical value per product, palette cycled.
fn repeat_purchase(rows: &[Value]) -> ChartSeries {
    let labels: Vec<String> = rows.iter().map(|row| product_label(row)).collect();
    let data = rows
        .iter()
        .map(|row| Some(field_f64(row, "Repeat Purchase Rate (%)")))
        .collect();
    let colors = (0..rows.len())
        .map(|i| PALETTE[i % PALETTE.len()].to_string())
        .collect();

    ChartSeries::new(labels)
        .push(Dataset::new("Repeat Purchase Rate (%)", data, BLUE).with_point_colors(colors))
}

/// Stock per product, each bar colored by its anomaly classification.
fn stock_levels(rows: &[Value]) -> ChartSeries {
    let labels: Vec<String> = rows.iter().map(|row| product_label(row)).collect();
    let data = rows
        .iter()
        .map(|row| Some(field_f64(row, "Stock Level")))
        .collect();
    let colors = rows
        .iter()
        .map(|row| anomaly_color(field_str(row, "Anomaly Type")).to_string())
        .collect();

    ChartSeries::new(labels)
        .push(Dataset::new("Stock Level", data, GREEN).with_point_colors(colors))
}

/// Bar color for a stock row's anomaly classification; absent means normal.
pub fn anomaly_color(anomaly: Option<&str>) -> &'static str {
    match anomaly {
        Some("High") => RED,
        Some("Low") => ORANGE,
        _ => GREEN,
    }
}

/// Three-line scenario series straight from the AI monthly forecasts.
fn future_predictions(forecasts: &[MonthlyForecast]) -> ChartSeries {
    let labels = forecasts.iter().map(|f| f.month.clone()).collect();
    let most_likely = forecasts.iter().map(|f| Some(f.most_likely)).collect();
    let best = forecasts.iter().map(|f| Some(f.best_case)).collect();
    let worst = forecasts.iter().map(|f| Some(f.worst_case)).collect();

    ChartSeries::new(labels)
        .push(Dataset::new("Most Likely (THB)", most_likely, BLUE))
        .push(Dataset::new("Best Case (THB)", best, GREEN).dashed())
        .push(Dataset::new("Worst Case (THB)", worst, RED).dashed())
}

/// Combined historical + predicted overview.
///
/// With both inputs: the label timeline is the historical labels followed by
/// any forecast labels not already present, each sequence `None`-padded to
/// that length, and the last historical value is copied into the predicted
/// sequence at the boundary so the two segments share one point. The bridge
/// is inserted whenever both boundary values are present; zero is a value.
///
/// With only historical data: twelve future month labels are synthesized
/// from `today` and extrapolated with a compound growth rate derived from
/// the first and last historical values, flat 5% per period when the series
/// is a single point or its first value is zero.
pub fn sales_overview(
    historical: Option<&ChartSeries>,
    forecasts: Option<&[MonthlyForecast]>,
    today: Date,
) -> Option<ChartSeries> {
    let historical = historical?;
    let hist_labels = historical.labels.clone();
    let hist_values: Vec<f64> = historical
        .datasets
        .first()?
        .data
        .iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    if hist_values.is_empty() {
        return None;
    }

    match forecasts.filter(|f| !f.is_empty()) {
        Some(forecasts) => Some(overlay_forecast(hist_labels, hist_values, forecasts)),
        None => Some(extrapolate_trend(hist_labels, hist_values, today)),
    }
}

fn overlay_forecast(
    hist_labels: Vec<String>,
    hist_values: Vec<f64>,
    forecasts: &[MonthlyForecast],
) -> ChartSeries {
    let pred_labels: Vec<String> = forecasts.iter().map(|f| f.month.clone()).collect();
    let pred_values: Vec<f64> = forecasts.iter().map(|f| f.most_likely).collect();

    let mut labels = hist_labels.clone();
    for label in &pred_labels {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }

    let mut hist_seq: Vec<Option<f64>> = vec![None; labels.len()];
    let mut pred_seq: Vec<Option<f64>> = vec![None; labels.len()];

    for (label, value) in hist_labels.iter().zip(&hist_values) {
        if let Some(pos) = labels.iter().position(|l| l == label) {
            hist_seq[pos] = Some(*value);
        }
    }
    for (label, value) in pred_labels.iter().zip(&pred_values) {
        if let Some(pos) = labels.iter().position(|l| l == label) {
            pred_seq[pos] = Some(*value);
        }
    }

    // Bridge point: the predicted line starts where the historical one ends.
    let boundary = hist_labels.len() - 1;
    let first_prediction = pred_seq.get(hist_labels.len()).copied().flatten();
    if hist_seq[boundary].is_some() && first_prediction.is_some() {
        pred_seq[boundary] = hist_seq[boundary];
    }

    ChartSeries::new(labels)
        .push(Dataset::new("Historical Sales (THB)", hist_seq, BLUE).filled())
        .push(Dataset::new("Predicted Sales (THB)", pred_seq, ORANGE).dashed())
}

fn extrapolate_trend(hist_labels: Vec<String>, hist_values: Vec<f64>, today: Date) -> ChartSeries {
    let mut labels = hist_labels;
    for offset in 1..=TREND_MONTHS as i32 {
        let future = add_months(today, offset);
        labels.push(year_month_label(future.year(), future.month() as u8));
    }

    let hist_len = hist_values.len();
    let mut hist_seq: Vec<Option<f64>> = hist_values.iter().copied().map(Some).collect();
    hist_seq.extend(std::iter::repeat(None).take(TREND_MONTHS));

    let rate = growth_rate(&hist_values);
    let mut pred_seq: Vec<Option<f64>> = vec![None; hist_len];
    let mut last = hist_values[hist_len - 1];
    pred_seq[hist_len - 1] = Some(last); // bridge point
    for _ in 0..TREND_MONTHS {
        last *= rate;
        pred_seq.push(Some(last));
    }

    ChartSeries::new(labels)
        .push(Dataset::new("Historical Sales (THB)", hist_seq, BLUE).filled())
        .push(Dataset::new("Trend-Based Prediction (THB)", pred_seq, ORANGE).dashed())
}

/// Compound growth per period from the first and last values. Falls back to
/// a flat 5% when there is a single point or the base would be degenerate.
fn growth_rate(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return DEFAULT_GROWTH_RATE;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    if first == 0.0 {
        return DEFAULT_GROWTH_RATE;
    }
    let rate = (last / first).powf(1.0 / (values.len() as f64 - 1.0));
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        DEFAULT_GROWTH_RATE
    }
}

fn trailing(rows: &[Value], window: usize) -> &[Value] {
    &rows[rows.len().saturating_sub(window)..]
}

/// Numeric cell with the aggregation default of 0.
fn field_f64(row: &Value, key: &str) -> f64 {
    row.get(key).map(coerce_f64).unwrap_or(0.0)
}

fn field_str<'a>(row: &'a Value, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str)
}

/// Missing categorical labels render as a literal "Unknown".
fn product_label(row: &Value) -> String {
    field_str(row, "Product")
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// Parse a row's `Date` cell: ISO-8601 strings (date prefix) or epoch
/// seconds/milliseconds, which is how spreadsheet timestamps arrive.
fn field_date(row: &Value) -> Option<Date> {
    match row.get("Date")? {
        Value::String(s) => {
            let head = s.get(..10)?;
            Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
        }
        Value::Number(n) => {
            let raw = n.as_i64()?;
            let seconds = if raw.abs() > 100_000_000_000 {
                raw / 1000
            } else {
                raw
            };
            OffsetDateTime::from_unix_timestamp(seconds)
                .ok()
                .map(|ts| ts.date())
        }
        _ => None,
    }
}

/// Short calendar-day label like `Sep 5`; falls back to the raw cell text.
fn date_label(row: &Value) -> String {
    if let Some(date) = field_date(row) {
        if let Ok(label) = date.format(format_description!("[month repr:short] [day padding:none]"))
        {
            return label;
        }
    }
    row.get("Date")
        .map(value_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Month label like `Sep 2025`.
fn year_month_label(year: i32, month: u8) -> String {
    let month = Month::try_from(month).unwrap_or(Month::January);
    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(|d| {
            d.format(format_description!("[month repr:short] [year]"))
                .ok()
        })
        .unwrap_or_else(|| format!("{year}-{month:?}"))
}

fn add_months(date: Date, months: i32) -> Date {
    let zero_based = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = zero_based.div_euclid(12);
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8).unwrap_or(Month::January);
    Date::from_calendar_date(year, month, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn daily_rows(count: usize) -> Vec<Value> {
        // Deterministic daily rows starting 2025-01-01.
        let mut rows = Vec::with_capacity(count);
        let mut date = date!(2025 - 01 - 01);
        for i in 0..count {
            rows.push(json!({
                "Date": date.format(format_description!("[year]-[month]-[day]")).unwrap(),
                "Daily Sales (THB)": 1000 + i as i64,
            }));
            date = date.next_day().unwrap();
        }
        rows
    }

    fn payload_with(sheet: &str, rows: Vec<Value>) -> AnalysisPayload {
        serde_json::from_value(json!({ "excel_data": { sheet: rows } })).unwrap()
    }

    fn forecast(month: &str, most_likely: f64) -> MonthlyForecast {
        MonthlyForecast {
            month: month.to_string(),
            most_likely,
            best_case: most_likely * 1.2,
            worst_case: most_likely * 0.8,
            confidence: 80.0,
        }
    }

    #[test]
    fn daily_trend_keeps_the_last_90_rows_in_order() {
        let payload = payload_with("TotalSales", daily_rows(100));
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        let trend = bundle.sales_trend.unwrap();
        assert_eq!(trend.len(), 90);
        // Row 10 (value 1010) is the first surviving row.
        assert_eq!(trend.datasets[0].data[0], Some(1010.0));
        assert_eq!(trend.datasets[0].data[89], Some(1099.0));
    }

    #[test]
    fn short_sheets_are_not_padded() {
        let payload = payload_with("TotalSales", daily_rows(5));
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        assert_eq!(bundle.sales_trend.unwrap().len(), 5);
    }

    #[test]
    fn monthly_aggregation_sums_within_a_month_and_orders_groups() {
        let rows = vec![
            json!({ "Date": "2025-01-05", "Daily Sales (THB)": 100 }),
            json!({ "Date": "2025-01-20", "Daily Sales (THB)": 250 }),
            json!({ "Date": "2025-02-02", "Daily Sales (THB)": 40 }),
        ];
        let payload = payload_with("TotalSales", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        let monthly = bundle.monthly_sales.unwrap();
        assert_eq!(monthly.labels, vec!["Jan 2025", "Feb 2025"]);
        assert_eq!(monthly.datasets[0].data, vec![Some(350.0), Some(40.0)]);
    }

    #[test]
    fn missing_numeric_fields_aggregate_as_zero() {
        let rows = vec![
            json!({ "Date": "2025-03-01" }),
            json!({ "Date": "2025-03-02", "Daily Sales (THB)": 75 }),
        ];
        let payload = payload_with("TotalSales", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        assert_eq!(
            bundle.monthly_sales.unwrap().datasets[0].data,
            vec![Some(75.0)]
        );
    }

    #[test]
    fn forecast_sheet_keeps_last_60_rows_with_two_aligned_series() {
        let rows: Vec<Value> = (0..80)
            .map(|i| {
                json!({
                    "Date": format!("2025-01-{:02}", (i % 28) + 1),
                    "Actual Sales (THB)": i,
                    "Predicted Sales (THB)": i + 5,
                })
            })
            .collect();
        let payload = payload_with("SalesForecast", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        let forecast = bundle.sales_forecast.unwrap();
        assert_eq!(forecast.len(), 60);
        assert_eq!(forecast.datasets.len(), 2);
        assert_eq!(forecast.datasets[0].data[0], Some(20.0));
        assert_eq!(forecast.datasets[1].data[0], Some(25.0));
    }

    #[test]
    fn stock_levels_classify_bars_and_default_to_normal() {
        let rows = vec![
            json!({ "Product": "Mango", "Stock Level": 500 }),
            json!({ "Product": "Apple", "Stock Level": 1200, "Anomaly Type": "High" }),
            json!({ "Product": "Banana", "Stock Level": 60, "Anomaly Type": "Low" }),
        ];
        let payload = payload_with("StockLevels", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        let stock = bundle.stock_levels.unwrap();
        assert_eq!(
            stock.datasets[0].point_colors,
            vec![GREEN.to_string(), RED.to_string(), ORANGE.to_string()]
        );
    }

    #[test]
    fn repeat_purchase_defaults_missing_products_to_unknown() {
        let rows = vec![
            json!({ "Product": "Mango", "Repeat Purchase Rate (%)": 72 }),
            json!({ "Repeat Purchase Rate (%)": 31 }),
        ];
        let payload = payload_with("RepeatPurchase", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        let repeat = bundle.repeat_purchase.unwrap();
        assert_eq!(repeat.labels, vec!["Mango", "Unknown"]);
    }

    #[test]
    fn empty_sheets_and_unknown_sheets_yield_nothing() {
        let payload: AnalysisPayload = serde_json::from_value(json!({
            "excel_data": {
                "TotalSales": [],
                "Mystery": [ { "A": 1 } ],
            }
        }))
        .unwrap();
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        assert!(bundle.is_empty());
    }

    #[test]
    fn overview_bridge_point_is_shared_and_nulls_are_exclusive() {
        let monthly = ChartSeries::new(vec!["Jan 2025".into(), "Feb 2025".into()])
            .push(Dataset::new("m", vec![Some(100.0), Some(200.0)], BLUE));
        let forecasts = [forecast("Mar 2025", 300.0), forecast("Apr 2025", 400.0)];
        let overview =
            sales_overview(Some(&monthly), Some(&forecasts), date!(2025 - 06 - 01)).unwrap();

        assert_eq!(overview.labels.len(), 4);
        let hist = &overview.datasets[0].data;
        let pred = &overview.datasets[1].data;
        // Bridge: both sequences hold the same value at the boundary index.
        assert_eq!(hist[1], Some(200.0));
        assert_eq!(pred[1], Some(200.0));
        // Every non-boundary position is None in exactly one sequence.
        for i in [0usize, 2, 3] {
            assert!(hist[i].is_some() != pred[i].is_some(), "position {i}");
        }
    }

    #[test]
    fn overview_bridges_even_when_the_last_historical_month_is_zero() {
        let monthly = ChartSeries::new(vec!["Jan 2025".into(), "Feb 2025".into()])
            .push(Dataset::new("m", vec![Some(100.0), Some(0.0)], BLUE));
        let forecasts = [forecast("Mar 2025", 300.0)];
        let overview =
            sales_overview(Some(&monthly), Some(&forecasts), date!(2025 - 06 - 01)).unwrap();
        assert_eq!(overview.datasets[1].data[1], Some(0.0));
    }

    #[test]
    fn single_point_history_extrapolates_12_rising_months() {
        let monthly = ChartSeries::new(vec!["May 2025".into()])
            .push(Dataset::new("m", vec![Some(1000.0)], BLUE));
        let overview = sales_overview(Some(&monthly), None, date!(2025 - 05 - 15)).unwrap();

        assert_eq!(overview.labels.len(), 13);
        assert_eq!(overview.labels[1], "Jun 2025");
        assert_eq!(overview.labels[12], "May 2026");

        let pred = &overview.datasets[1].data;
        assert_eq!(pred[0], Some(1000.0)); // bridge
        let mut previous = 1000.0;
        for value in pred[1..].iter().map(|v| v.unwrap()) {
            assert!(value > previous, "default 5% growth must rise");
            previous = value;
        }
    }

    #[test]
    fn zero_first_value_falls_back_to_the_default_rate() {
        assert_eq!(growth_rate(&[0.0, 500.0]), DEFAULT_GROWTH_RATE);
        assert_eq!(growth_rate(&[750.0]), DEFAULT_GROWTH_RATE);
        let computed = growth_rate(&[100.0, 400.0, 1600.0]);
        assert!((computed - 4.0f64.powf(0.5)).abs() < 1e-9);
    }

    #[test]
    fn overview_requires_historical_data() {
        let forecasts = [forecast("Mar 2025", 300.0)];
        assert!(sales_overview(None, Some(&forecasts), date!(2025 - 06 - 01)).is_none());
    }

    #[test]
    fn trend_months_wrap_the_year_boundary() {
        let monthly = ChartSeries::new(vec!["Nov 2025".into()])
            .push(Dataset::new("m", vec![Some(10.0)], BLUE));
        let overview = sales_overview(Some(&monthly), None, date!(2025 - 11 - 30)).unwrap();
        assert_eq!(overview.labels[2], "Jan 2026");
    }

    #[test]
    fn epoch_millisecond_dates_are_understood() {
        // 2025-01-15T00:00:00Z in milliseconds.
        let rows = vec![json!({ "Date": 1736899200000i64, "Daily Sales (THB)": 9 })];
        let payload = payload_with("TotalSales", rows);
        let bundle = build_series_at(&payload, None, date!(2025 - 06 - 01));
        assert_eq!(bundle.monthly_sales.unwrap().labels, vec!["Jan 2025"]);
    }
}
