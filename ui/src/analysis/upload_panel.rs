//! Upload flow: pick or drop a workbook, validate it, send it for analysis.

use std::sync::Arc;

use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;

use super::AnalysisState;
use crate::core::{format, storage, upload};

/// A validated workbook waiting for the user to hit "Analyze".
#[derive(Clone, PartialEq)]
struct PickedFile {
    name: String,
    bytes: Vec<u8>,
}

#[component]
pub fn UploadPanel(state: Signal<AnalysisState>) -> Element {
    let mut state = state;
    let mut picked = use_signal(|| Option::<PickedFile>::None);
    let mut busy = use_signal(|| false);
    let mut drag_active = use_signal(|| false);

    // Shared by the drop zone and the file input; signals are Copy, so the
    // rebinding keeps this closure callable from both handlers.
    let accept_files = move |engine: Option<Arc<dyn FileEngine>>| {
        let mut state = state;
        let mut picked = picked;
        let Some(engine) = engine else { return };
        let Some(name) = engine.files().first().cloned() else {
            return;
        };
        if !upload::is_spreadsheet(&name, None) {
            state.with_mut(|s| s.error = Some(upload::INVALID_FILE_MESSAGE.to_string()));
            return;
        }
        state.with_mut(|s| s.error = None);
        spawn(async move {
            if let Some(bytes) = engine.read_file(&name).await {
                picked.set(Some(PickedFile { name, bytes }));
            } else {
                state.with_mut(|s| s.error = Some("Couldn't read the selected file".to_string()));
            }
        });
    };

    let analyze = move |_| {
        let Some(file) = picked() else { return };
        if busy() {
            return;
        }
        busy.set(true);
        state.with_mut(|s| s.error = None);

        spawn(async move {
            match upload::analyze_workbook(&file.name, file.bytes).await {
                Ok(result) => {
                    // Cache failures downgrade to a session-only result.
                    let saved_at = match storage::save_analysis(&result) {
                        Ok(stamp) => Some(stamp),
                        Err(err) => {
                            tracing::warn!(%err, "couldn't cache analysis result");
                            None
                        }
                    };
                    state.with_mut(|s| {
                        s.adopt(result);
                        s.saved_at = saved_at;
                    });
                    picked.set(None);
                }
                Err(err) => state.with_mut(|s| s.error = Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    let zone_class = if drag_active() {
        "upload-zone upload-zone--active"
    } else {
        "upload-zone"
    };

    rsx! {
        if let Some(file) = picked() {
            div { class: "analysis-card upload-file",
                div { class: "upload-file__details",
                    span { class: "upload-file__name", "{file.name}" }
                    span { class: "upload-file__size",
                        {format::format_file_size(file.bytes.len() as u64)}
                    }
                }

                div { class: "upload-file__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: analyze,
                        if busy() { "Analyzing with AI…" } else { "Analyze with AI" }
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: busy(),
                        onclick: move |_| picked.set(None),
                        "Cancel"
                    }
                }

                if busy() {
                    p { class: "upload-file__progress",
                        "The AI is reading your workbook and gathering market context. "
                        "This can take a moment."
                    }
                }
            }
        } else {
            div {
                class: "{zone_class}",
                ondragover: move |evt| {
                    evt.prevent_default();
                    drag_active.set(true);
                },
                ondragleave: move |evt| {
                    evt.prevent_default();
                    drag_active.set(false);
                },
                ondrop: move |evt| {
                    evt.prevent_default();
                    drag_active.set(false);
                    accept_files(evt.files());
                },

                div { class: "upload-zone__content",
                    p { class: "upload-zone__hint", "Drag and drop your Excel file here, or" }
                    label { class: "upload-zone__picker",
                        input {
                            r#type: "file",
                            accept: ".xlsx,.xls",
                            onchange: move |evt| accept_files(evt.files()),
                        }
                        "Click to browse"
                    }
                    p { class: "upload-zone__formats", "Supports .xlsx and .xls files" }
                }
            }
        }
    }
}
