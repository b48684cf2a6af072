//! Tabular preview of the parsed workbook sheets.

use dioxus::prelude::*;
use serde_json::Value;

use crate::core::payload::{value_text, AnalysisPayload};

const PREVIEW_ROWS: usize = 5;

/// Summary plus a five-row preview table per sheet. Column order follows the
/// first row of each sheet, which serde_json keeps in workbook order.
#[component]
pub fn SheetTables(payload: AnalysisPayload) -> Element {
    let sheets: Vec<(String, Vec<Value>)> = payload
        .sheets()
        .map(|(name, rows)| (name.to_string(), rows.to_vec()))
        .collect();
    if sheets.is_empty() {
        return rsx! {};
    }

    let names: Vec<String> = sheets.iter().map(|(name, _)| name.clone()).collect();
    let summary = format!("{} sheets: {}", names.len(), names.join(", "));

    rsx! {
        section { class: "analysis-card sheet-tables",
            div { class: "analysis-card__header",
                h2 { "Extracted spreadsheet data" }
                p { class: "sheet-tables__summary", "{summary}" }
            }

            for (name, rows) in sheets {
                SheetPreview { name, rows }
            }
        }
    }
}

#[component]
fn SheetPreview(name: String, rows: Vec<Value>) -> Element {
    let columns: Vec<String> = rows
        .first()
        .and_then(Value::as_object)
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();
    if columns.is_empty() {
        return rsx! {};
    }

    let hidden = rows.len().saturating_sub(PREVIEW_ROWS);
    let row_count = rows.len();

    rsx! {
        div { class: "sheet-tables__sheet",
            h3 { "{name} ({row_count} rows)" }
            table { class: "data-table",
                thead {
                    tr {
                        for column in columns.iter() {
                            th { "{column}" }
                        }
                    }
                }
                tbody {
                    for row in rows.iter().take(PREVIEW_ROWS) {
                        tr {
                            for column in columns.iter() {
                                td {
                                    {row.get(column).map(value_text).unwrap_or_default()}
                                }
                            }
                        }
                    }
                }
            }
            if hidden > 0 {
                p { class: "sheet-tables__more", "… and {hidden} more rows" }
            }
        }
    }
}
