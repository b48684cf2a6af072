use dioxus::prelude::*;

use crate::analysis::AnalysisScreen;

/// The main (and only) page: upload a workbook, explore the analysis.
#[component]
pub fn Analyze() -> Element {
    rsx! {
        AnalysisScreen {}
    }
}
