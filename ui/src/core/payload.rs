//! Data model for the upstream analysis service.
//!
//! The service returns one JSON document per upload:
//!
//! ```text
//! {
//!   "analysis": {
//!     "excel_data": { "<sheet name>": [ { "<column>": <scalar>, ... }, ... ] },
//!     "ai_analysis": { "analysis_response": <string or object>, "data_processed": {...} }
//!   }
//! }
//! ```
//!
//! `excel_data` stays loosely typed (`serde_json::Value` rows) because column
//! sets vary per workbook; the chart builder reads fields defensively.
//! `ai_analysis` is kept as a raw `Value` and resolved once through
//! [`crate::core::normalize`] rather than re-checked at each render site.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level response body of the analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisPayload>,
    /// Fields we don't interpret but must survive a cache round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `analysis` envelope: spreadsheet rows plus the opaque AI payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    /// Sheet name → array of row objects, in workbook order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_data: Option<Map<String, Value>>,
    /// Raw AI analysis; may be double-encoded, fenced, or Python-flavored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisPayload {
    /// Iterate sheets as `(name, rows)`, skipping entries that aren't arrays.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.excel_data
            .iter()
            .flat_map(|data| data.iter())
            .filter_map(|(name, rows)| rows.as_array().map(|r| (name.as_str(), r.as_slice())))
    }

    pub fn sheet(&self, name: &str) -> Option<&[Value]> {
        self.excel_data
            .as_ref()
            .and_then(|data| data.get(name))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Pick the analysis text/object out of the `ai_analysis` envelope. The
/// service has shipped it under two different keys; fall back to the whole
/// envelope when neither is present.
pub fn analysis_content(ai_analysis: &Value) -> &Value {
    ai_analysis
        .get("analysis_response")
        .or_else(|| ai_analysis.pointer("/ai_insights/analysis"))
        .unwrap_or(ai_analysis)
}

/// Upload bookkeeping the service echoes back alongside the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataProcessed {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub sheets_analyzed: Option<Vec<String>>,
    #[serde(default)]
    pub total_sheets: Option<u64>,
}

impl DataProcessed {
    pub fn from_ai_analysis(ai_analysis: &Value) -> Option<Self> {
        let raw = ai_analysis.get("data_processed")?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// Canonical shape of a successfully parsed AI analysis. Every section is
/// independently optional; a missing or malformed section is simply not
/// rendered, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_forecasting: Option<SalesForecasting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_factors: Option<ExternalFactors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_strategy: Option<PromotionStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_management: Option<InventoryManagement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable_insights: Option<ActionableInsights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<String>>,
}

impl NormalizedAnalysis {
    /// Lenient per-section extraction: a section that fails to deserialize is
    /// dropped on its own, the rest of the object still goes through.
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            sales_forecasting: section(map, "sales_forecasting"),
            external_factors: section(map, "external_factors"),
            risk_assessment: section(map, "risk_assessment"),
            promotion_strategy: section(map, "promotion_strategy"),
            inventory_management: section(map, "inventory_management"),
            actionable_insights: section(map, "actionable_insights"),
            data_sources: section(map, "data_sources"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales_forecasting.is_none()
            && self.external_factors.is_none()
            && self.risk_assessment.is_none()
            && self.promotion_strategy.is_none()
            && self.inventory_management.is_none()
            && self.actionable_insights.is_none()
            && self.data_sources.is_none()
    }
}

fn section<T: serde::de::DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = map.get(key)?;
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(section = key, %err, "dropping malformed analysis section");
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesForecasting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub monthly_forecasts: Option<Vec<MonthlyForecast>>,
    #[serde(default)]
    pub key_insights: Option<Vec<String>>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
}

/// One forecast month; numeric fields are currency-scale (THB).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    #[serde(default)]
    pub month: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub most_likely: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub best_case: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub worst_case: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalFactors {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub economic_conditions: Option<EconomicConditions>,
    #[serde(default)]
    pub seasonal_patterns: Option<SeasonalPatterns>,
    #[serde(default)]
    pub market_trends: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicConditions {
    #[serde(default)]
    pub current_status: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub impact_percentage: f64,
    #[serde(default)]
    pub trend: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPatterns {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_season_impact: f64,
    #[serde(default)]
    pub peak_months: Option<Vec<String>>,
    #[serde(default)]
    pub low_months: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub risk_factors: Option<Vec<RiskFactor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(default)]
    pub factor: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub probability: f64,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub mitigation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionStrategy {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommended_promotions: Option<Vec<Promotion>>,
    /// Quarter label → planned activities.
    #[serde(default)]
    pub seasonal_calendar: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default)]
    pub product: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount_percentage: f64,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub expected_impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryManagement {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub stock_recommendations: Option<Vec<StockRecommendation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecommendation {
    #[serde(default)]
    pub product: String,
    /// Levels arrive as numbers or strings ("500 units"); render verbatim.
    #[serde(default)]
    pub current_level: Value,
    #[serde(default)]
    pub recommended_level: Value,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionableInsights {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub immediate_actions: Option<Vec<ImmediateAction>>,
    #[serde(default)]
    pub kpis: Option<Vec<Kpi>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImmediateAction {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub expected_impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(default)]
    pub metric: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub target: f64,
    #[serde(default)]
    pub timeline: String,
}

/// Accept numbers, numeric strings ("85", "85%"), bools and null where the
/// model was asked for a number. Anything else becomes 0.0 rather than
/// failing the surrounding section.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&raw))
}

/// Shared number coercion for loosely typed cells and section fields.
pub fn coerce_f64(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .replace(',', "")
            .parse()
            .unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Display form of a loosely typed cell value.
pub fn value_text(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_top_level_fields_survive_a_round_trip() {
        let raw = json!({
            "analysis": { "excel_data": { "TotalSales": [] }, "request_id": "abc" },
            "status": "ok"
        });
        let parsed: AnalysisResult = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["status"], "ok");
        assert_eq!(back["analysis"]["request_id"], "abc");
    }

    #[test]
    fn malformed_section_is_dropped_alone() {
        let map = json!({
            "sales_forecasting": "not an object",
            "data_sources": ["https://example.com"]
        });
        let normalized = NormalizedAnalysis::from_object(map.as_object().unwrap());
        assert!(normalized.sales_forecasting.is_none());
        assert_eq!(
            normalized.data_sources.as_deref(),
            Some(&["https://example.com".to_string()][..])
        );
    }

    #[test]
    fn lenient_numbers_accept_strings_and_percent_signs() {
        let forecast: MonthlyForecast = serde_json::from_value(json!({
            "month": "Jan 2026",
            "most_likely": "1,250000",
            "confidence": "85%"
        }))
        .unwrap();
        assert_eq!(forecast.most_likely, 1_250_000.0);
        assert_eq!(forecast.confidence, 85.0);
        assert_eq!(forecast.best_case, 0.0);
    }

    #[test]
    fn analysis_content_prefers_analysis_response() {
        let ai = json!({ "analysis_response": "text", "ai_insights": { "analysis": "other" } });
        assert_eq!(analysis_content(&ai), &json!("text"));

        let nested = json!({ "ai_insights": { "analysis": { "a": 1 } } });
        assert_eq!(analysis_content(&nested), &json!({ "a": 1 }));

        let bare = json!({ "something": 1 });
        assert_eq!(analysis_content(&bare), &bare);
    }
}
