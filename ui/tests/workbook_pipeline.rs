//! End-to-end exercise of the analysis pipeline: a realistic service
//! response goes through payload parsing, AI-text normalization, and chart
//! series derivation, the same path the upload flow takes.

use serde_json::{json, Value};
use time::macros::date;

use ui::core::charts::{self, build_series_at};
use ui::core::normalize::{normalize, AnalysisContent};
use ui::core::payload::{analysis_content, AnalysisResult, DataProcessed};

fn daily_sales_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let month = 1 + (i / 28) as u8;
            let day = 1 + (i % 28) as u8;
            json!({
                "Date": format!("2025-{month:02}-{day:02}"),
                "Daily Sales (THB)": 50_000 + (i as i64 % 7) * 1_000,
            })
        })
        .collect()
}

fn service_response() -> Value {
    // AI text as the service actually ships it: a Python-literal dict inside
    // a fenced code block, wrapped in a JSON string.
    let ai_text = "```json\n{'sales_forecasting': {'title': 'Sales Forecast', 'summary': 'Steady growth expected.', 'monthly_forecasts': [{'month': 'Sep 2025', 'most_likely': 1600000, 'best_case': 1800000, 'worst_case': 1400000, 'confidence': '85%'}, {'month': 'Oct 2025', 'most_likely': 1650000, 'best_case': 1900000, 'worst_case': 1450000, 'confidence': 80}], 'key_insights': ['Weekend sales dominate.']}, 'data_sources': ['https://example.com/markets']}\n```";

    json!({
        "analysis": {
            "excel_data": {
                "TotalSales": daily_sales_rows(100),
                "StockLevels": [
                    { "Product": "Mango Sticky Rice", "Stock Level": 420 },
                    { "Product": "Thai Milk Tea", "Stock Level": 80, "Anomaly Type": "Low" },
                    { "Product": "Green Curry Paste", "Stock Level": 2100, "Anomaly Type": "High" },
                ],
            },
            "ai_analysis": {
                "analysis_response": ai_text,
                "data_processed": {
                    "filename": "q3-sales.xlsx",
                    "sheets_analyzed": ["TotalSales", "StockLevels"],
                    "total_sheets": 2,
                },
            },
        }
    })
}

#[test]
fn full_pipeline_from_service_response_to_charts() {
    let result: AnalysisResult = serde_json::from_value(service_response()).unwrap();
    let payload = result.analysis.as_ref().unwrap();
    let ai = payload.ai_analysis.as_ref().unwrap();

    // Fenced Python-literal text normalizes to structure.
    let content = normalize(analysis_content(ai));
    let AnalysisContent::Structured(analysis) = &content else {
        panic!("expected structured analysis, got {content:?}");
    };
    let forecasting = analysis.sales_forecasting.as_ref().unwrap();
    assert_eq!(forecasting.summary, "Steady growth expected.");
    let forecasts = forecasting.monthly_forecasts.as_deref().unwrap();
    assert_eq!(forecasts.len(), 2);
    assert_eq!(forecasts[0].confidence, 85.0);

    let info = DataProcessed::from_ai_analysis(ai).unwrap();
    assert_eq!(info.filename.as_deref(), Some("q3-sales.xlsx"));

    let bundle = build_series_at(payload, content.structured(), date!(2025 - 08 - 25));

    // Daily trend keeps the trailing 90 of 100 rows.
    let trend = bundle.sales_trend.as_ref().unwrap();
    assert_eq!(trend.len(), 90);

    // Monthly aggregate groups by calendar month, chronologically.
    let monthly = bundle.monthly_sales.as_ref().unwrap();
    assert!(monthly.len() >= 2);
    assert!(monthly.labels.windows(2).all(|w| w[0] != w[1]));

    // Stock bars are colored by anomaly classification.
    let stock = bundle.stock_levels.as_ref().unwrap();
    assert_eq!(
        stock.datasets[0].point_colors,
        vec![
            charts::GREEN.to_string(),
            charts::ORANGE.to_string(),
            charts::RED.to_string(),
        ]
    );

    // The overview overlays the AI forecast onto the monthly history with a
    // shared bridge point.
    let overview = bundle.sales_overview.as_ref().unwrap();
    assert_eq!(overview.datasets.len(), 2);
    let boundary = monthly.len() - 1;
    assert_eq!(
        overview.datasets[0].data[boundary],
        overview.datasets[1].data[boundary]
    );
    assert!(overview.labels.contains(&"Sep 2025".to_string()));

    // Scenario chart comes straight from the forecasts.
    let predictions = bundle.future_predictions.as_ref().unwrap();
    assert_eq!(predictions.labels, vec!["Sep 2025", "Oct 2025"]);
    assert_eq!(predictions.datasets.len(), 3);
}

#[test]
fn cache_round_trip_preserves_the_full_payload() {
    let raw = service_response();
    let parsed: AnalysisResult = serde_json::from_value(raw.clone()).unwrap();
    let back = serde_json::to_value(&parsed).unwrap();
    assert_eq!(back, raw);
}

#[test]
fn plain_text_analysis_falls_back_to_display_text() {
    let result: AnalysisResult = serde_json::from_value(json!({
        "analysis": {
            "excel_data": { "TotalSales": daily_sales_rows(10) },
            "ai_analysis": { "analysis_response": "Sales look healthy overall." },
        }
    }))
    .unwrap();

    let payload = result.analysis.as_ref().unwrap();
    let content = normalize(analysis_content(payload.ai_analysis.as_ref().unwrap()));
    assert_eq!(
        content,
        AnalysisContent::Text("Sales look healthy overall.".to_string())
    );

    // Charts still derive from the sheets alone; the trend extrapolation
    // covers the missing forecast.
    let bundle = build_series_at(payload, content.structured(), date!(2025 - 08 - 25));
    assert!(bundle.future_predictions.is_none());
    let overview = bundle.sales_overview.unwrap();
    assert_eq!(overview.labels.last().unwrap(), "Aug 2026");
}
