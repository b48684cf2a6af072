//! The analysis page: upload flow, derived chart state, and result views.

mod charts_view;
pub use charts_view::ChartsPanel;

mod tables;
pub use tables::SheetTables;

mod sections;
pub use sections::AnalysisSections;

mod upload_panel;
pub use upload_panel::UploadPanel;

use dioxus::prelude::*;

use crate::core::{
    charts::{build_series, ChartBundle},
    format,
    normalize::{normalize, AnalysisContent},
    payload::{analysis_content, AnalysisResult, DataProcessed},
    storage,
};

/// Shared state for the analysis view. The payload is the source of truth;
/// normalized content and chart series are pure derivations recomputed
/// whenever a payload is adopted, never persisted on their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    pub result: Option<AnalysisResult>,
    pub content: Option<AnalysisContent>,
    pub charts: ChartBundle,
    pub data_processed: Option<DataProcessed>,
    /// RFC 3339 stamp of the cache entry backing `result`, if any.
    pub saved_at: Option<String>,
    pub error: Option<String>,
}

impl AnalysisState {
    /// Restore the cached analysis, if one survives deserialization.
    pub fn load() -> Self {
        match storage::load_analysis() {
            Ok(Some(cached)) => {
                let mut state = Self {
                    saved_at: cached.saved_at,
                    ..Self::default()
                };
                state.adopt(cached.result);
                state
            }
            Ok(None) => Self::default(),
            Err(err) => Self {
                error: Some(format!("Couldn't load saved analysis: {err}")),
                ..Self::default()
            },
        }
    }

    /// Take ownership of a fresh payload and rederive everything from it.
    pub fn adopt(&mut self, result: AnalysisResult) {
        let payload = result.analysis.as_ref();

        self.content = payload
            .and_then(|p| p.ai_analysis.as_ref())
            .map(|ai| normalize(analysis_content(ai)));
        self.data_processed = payload
            .and_then(|p| p.ai_analysis.as_ref())
            .and_then(DataProcessed::from_ai_analysis);
        self.charts = payload
            .map(|p| build_series(p, self.content.as_ref().and_then(AnalysisContent::structured)))
            .unwrap_or_default();

        self.result = Some(result);
        self.error = None;
    }

    /// Drop everything, including the cache entries.
    pub fn reset(&mut self) {
        storage::clear_analysis();
        *self = Self::default();
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }
}

/// The single analysis page: upload panel until a payload exists, then the
/// chart tabs, sheet tables, and AI analysis cards.
#[component]
pub fn AnalysisScreen() -> Element {
    let mut state = use_signal(AnalysisState::load);
    let snapshot = state();

    let saved_note = snapshot
        .saved_at
        .as_deref()
        .map(format::format_saved_at);

    rsx! {
        section { class: "page page-analysis",
            header { class: "page-analysis__intro",
                h1 { "AI-powered Excel business intelligence" }
                p {
                    "Upload a workbook to get sales forecasts, promotion and inventory "
                    "recommendations, and interactive visualizations of your data."
                }
            }

            if let Some(message) = snapshot.error.as_ref() {
                div { class: "analysis-error", strong { "Error: " } "{message}" }
            }

            if !snapshot.has_result() {
                UploadPanel { state }
            } else {
                div { class: "analysis-results",
                    div { class: "analysis-results__header",
                        h2 { "Analysis results" }
                        if let Some(stamp) = saved_note {
                            span { class: "analysis-results__meta", "Saved {stamp}" }
                        }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: move |_| state.with_mut(|s| s.reset()),
                            "Upload new file"
                        }
                    }

                    if !snapshot.charts.is_empty() {
                        ChartsPanel { charts: snapshot.charts.clone() }
                    }

                    if let Some(payload) = snapshot.result.as_ref().and_then(|r| r.analysis.clone()) {
                        SheetTables { payload }
                    }

                    if let Some(content) = snapshot.content.clone() {
                        AnalysisSections {
                            content,
                            data_processed: snapshot.data_processed.clone(),
                        }
                    }

                    p { class: "analysis-results__footnote",
                        "Results are kept in browser storage so they survive a reload. "
                        "Uploading a new file replaces them."
                    }
                }
            }
        }
    }
}
