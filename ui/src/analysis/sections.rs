//! Rendering of the normalized AI analysis: one card per section, in a
//! fixed order, with a plain-text fallback when normalization couldn't
//! recover structure.

use dioxus::prelude::*;

use crate::core::format;
use crate::core::normalize::AnalysisContent;
use crate::core::payload::{
    value_text, ActionableInsights, DataProcessed, ExternalFactors, InventoryManagement,
    NormalizedAnalysis, PromotionStrategy, RiskAssessment, SalesForecasting,
};

const FORECAST_CARD_LIMIT: usize = 6;

/// Section render order. Each entry is skipped when its section is absent.
const SECTION_RENDERERS: &[fn(&NormalizedAnalysis) -> Option<Element>] = &[
    |a| a.sales_forecasting.as_ref().map(sales_forecasting),
    |a| a.external_factors.as_ref().map(external_factors),
    |a| a.risk_assessment.as_ref().map(risk_assessment),
    |a| a.promotion_strategy.as_ref().map(promotion_strategy),
    |a| a.inventory_management.as_ref().map(inventory_management),
    |a| a.actionable_insights.as_ref().map(actionable_insights),
    |a| a.data_sources.as_deref().map(data_sources),
];

#[component]
pub fn AnalysisSections(
    content: AnalysisContent,
    data_processed: Option<DataProcessed>,
) -> Element {
    rsx! {
        section { class: "analysis-card ai-analysis",
            div { class: "analysis-card__header",
                h2 { "AI business analysis" }
            }

            if let Some(info) = data_processed.as_ref() {
                ProcessingInfo { info: info.clone() }
            }

            {match &content {
                AnalysisContent::Structured(analysis) => {
                    let cards: Vec<Element> = SECTION_RENDERERS
                        .iter()
                        .filter_map(|renderer| renderer(analysis))
                        .collect();
                    rsx! {
                        for card in cards {
                            {card}
                        }
                    }
                }
                AnalysisContent::Text(text) => rsx! {
                    pre { class: "ai-analysis__text", "{text}" }
                },
            }}
        }
    }
}

#[component]
fn ProcessingInfo(info: DataProcessed) -> Element {
    let sheets = info
        .sheets_analyzed
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.join(", "));

    rsx! {
        div { class: "ai-analysis__processing",
            if let Some(filename) = info.filename.as_ref() {
                span { strong { "File: " } "{filename}" }
            }
            if let Some(total) = info.total_sheets {
                span { strong { "Sheets: " } "{total}" }
            }
            if let Some(sheets) = sheets {
                span { strong { "Analyzed: " } "{sheets}" }
            }
        }
    }
}

fn section_header(title: &str, fallback: &str, summary: &str) -> Element {
    let title = if title.is_empty() { fallback } else { title };
    rsx! {
        h3 { "{title}" }
        if !summary.is_empty() {
            p { class: "ai-section__summary", "{summary}" }
        }
    }
}

fn string_list(heading: &str, items: Option<&[String]>) -> Element {
    let Some(items) = items.filter(|i| !i.is_empty()) else {
        return rsx! {};
    };
    rsx! {
        h4 { "{heading}" }
        ul { class: "ai-section__list",
            for item in items.iter() {
                li { "{item}" }
            }
        }
    }
}

fn sales_forecasting(section: &SalesForecasting) -> Element {
    let forecasts = section
        .monthly_forecasts
        .as_deref()
        .unwrap_or_default()
        .iter()
        .take(FORECAST_CARD_LIMIT)
        .cloned()
        .collect::<Vec<_>>();

    rsx! {
        div { class: "ai-section ai-section--forecasting",
            {section_header(&section.title, "Sales forecasting", &section.summary)}

            if !forecasts.is_empty() {
                div { class: "ai-section__cards",
                    for forecast in forecasts {
                        div { class: "forecast-card",
                            span { class: "forecast-card__month", "{forecast.month}" }
                            span { class: "forecast-card__value",
                                {format::format_thb(forecast.most_likely)}
                            }
                            span { class: "forecast-card__confidence",
                                {format::format_percent(forecast.confidence)}
                                " confidence"
                            }
                        }
                    }
                }
            }

            {string_list("Key insights", section.key_insights.as_deref())}
            {string_list("Recommendations", section.recommendations.as_deref())}
        }
    }
}

fn external_factors(section: &ExternalFactors) -> Element {
    let peaks = section
        .seasonal_patterns
        .as_ref()
        .and_then(|s| s.peak_months.as_deref())
        .filter(|m| !m.is_empty())
        .map(|m| m.join(", "));
    let lows = section
        .seasonal_patterns
        .as_ref()
        .and_then(|s| s.low_months.as_deref())
        .filter(|m| !m.is_empty())
        .map(|m| m.join(", "));

    rsx! {
        div { class: "ai-section ai-section--external",
            {section_header(&section.title, "External factors", &section.summary)}

            if let Some(economy) = section.economic_conditions.as_ref() {
                p {
                    strong { "Economy: " }
                    "{economy.current_status}"
                    if !economy.trend.is_empty() {
                        " ({economy.trend}, "
                        {format::format_percent(economy.impact_percentage)}
                        " impact)"
                    }
                }
            }

            if let Some(seasonal) = section.seasonal_patterns.as_ref() {
                p {
                    strong { "Season impact: " }
                    {format::format_percent(seasonal.current_season_impact)}
                    if let Some(peaks) = peaks.as_ref() {
                        " · peak months: {peaks}"
                    }
                    if let Some(lows) = lows.as_ref() {
                        " · low months: {lows}"
                    }
                }
            }

            {string_list("Market trends", section.market_trends.as_deref())}
        }
    }
}

fn risk_assessment(section: &RiskAssessment) -> Element {
    let factors = section.risk_factors.as_deref().unwrap_or_default().to_vec();

    rsx! {
        div { class: "ai-section ai-section--risk",
            {section_header(&section.title, "Risk assessment", &section.summary)}

            if !factors.is_empty() {
                div { class: "ai-section__cards",
                    for factor in factors {
                        div { class: "risk-card",
                            span { class: "risk-card__factor", "{factor.factor}" }
                            span { class: "risk-card__probability",
                                {format::format_percent(factor.probability)}
                                " probability"
                            }
                            if !factor.impact.is_empty() {
                                span { class: "risk-card__impact", "Impact: {factor.impact}" }
                            }
                            if !factor.mitigation.is_empty() {
                                span { class: "risk-card__mitigation", "{factor.mitigation}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn promotion_strategy(section: &PromotionStrategy) -> Element {
    let promotions = section
        .recommended_promotions
        .as_deref()
        .unwrap_or_default()
        .to_vec();
    let calendar: Vec<(String, String)> = section
        .seasonal_calendar
        .iter()
        .flat_map(|c| c.iter())
        .map(|(quarter, plan)| (quarter.clone(), value_text(plan)))
        .collect();

    rsx! {
        div { class: "ai-section ai-section--promotion",
            {section_header(&section.title, "Promotion strategy", &section.summary)}

            if !promotions.is_empty() {
                div { class: "ai-section__cards",
                    for promotion in promotions {
                        div { class: "promotion-card",
                            span { class: "promotion-card__discount",
                                {format::format_percent(promotion.discount_percentage)}
                                " OFF"
                            }
                            span { class: "promotion-card__product", "{promotion.product}" }
                            if !promotion.timing.is_empty() {
                                span { class: "promotion-card__timing", "{promotion.timing}" }
                            }
                            if !promotion.expected_impact.is_empty() {
                                span { class: "promotion-card__impact", "{promotion.expected_impact}" }
                            }
                        }
                    }
                }
            }

            if !calendar.is_empty() {
                h4 { "Seasonal calendar" }
                ul { class: "ai-section__list",
                    for (quarter, plan) in calendar {
                        li { strong { "{quarter}: " } "{plan}" }
                    }
                }
            }
        }
    }
}

fn inventory_management(section: &InventoryManagement) -> Element {
    let recommendations = section
        .stock_recommendations
        .as_deref()
        .unwrap_or_default()
        .to_vec();

    rsx! {
        div { class: "ai-section ai-section--inventory",
            {section_header(&section.title, "Inventory management", &section.summary)}

            if !recommendations.is_empty() {
                div { class: "ai-section__cards",
                    for rec in recommendations {
                        div { class: "stock-card",
                            span { class: "stock-card__product", "{rec.product}" }
                            span { class: "stock-card__levels",
                                {value_text(&rec.current_level)}
                                " → "
                                {value_text(&rec.recommended_level)}
                            }
                            if !rec.reason.is_empty() {
                                span { class: "stock-card__reason", "{rec.reason}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn actionable_insights(section: &ActionableInsights) -> Element {
    let actions = section
        .immediate_actions
        .as_deref()
        .unwrap_or_default()
        .to_vec();
    let kpis = section.kpis.as_deref().unwrap_or_default().to_vec();

    rsx! {
        div { class: "ai-section ai-section--insights",
            {section_header(&section.title, "Actionable insights", &section.summary)}

            if !actions.is_empty() {
                h4 { "Immediate actions" }
                div { class: "ai-section__cards",
                    for action in actions {
                        div { class: "action-card",
                            span { class: "action-card__action", "{action.action}" }
                            if !action.deadline.is_empty() {
                                span { class: "action-card__deadline", "By {action.deadline}" }
                            }
                            if !action.expected_impact.is_empty() {
                                span { class: "action-card__impact", "{action.expected_impact}" }
                            }
                        }
                    }
                }
            }

            if !kpis.is_empty() {
                h4 { "KPIs to track" }
                div { class: "ai-section__cards",
                    for kpi in kpis {
                        div { class: "kpi-card",
                            span { class: "kpi-card__metric", "{kpi.metric}" }
                            span { class: "kpi-card__values",
                                {format::format_amount(kpi.current)}
                                " → "
                                {format::format_amount(kpi.target)}
                            }
                            if !kpi.timeline.is_empty() {
                                span { class: "kpi-card__timeline", "{kpi.timeline}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn data_sources(sources: &[String]) -> Element {
    if sources.is_empty() {
        return rsx! {};
    }
    let sources = sources.to_vec();
    rsx! {
        div { class: "ai-section ai-section--sources",
            h3 { "Data sources" }
            ul { class: "ai-section__list",
                for source in sources {
                    li {
                        a { href: "{source}", target: "_blank", rel: "noreferrer", "{source}" }
                    }
                }
            }
        }
    }
}
