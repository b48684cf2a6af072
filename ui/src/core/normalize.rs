//! Best-effort normalization of the AI analysis payload.
//!
//! The upstream service is inconsistent about how it returns the analysis:
//! sometimes a proper JSON object, sometimes that object serialized into a
//! string, sometimes wrapped in a markdown code fence, and sometimes a
//! Python literal (`{'value': "..."}` with `True`/`False`/`None`) whose
//! `value` field holds yet another escaped JSON document.
//!
//! [`normalize`] is therefore a total function: an ordered chain of pure
//! parse strategies where the first success wins and the guaranteed fallback
//! is a cleaned display string. Nothing in here may panic or return an
//! error; "correctness" means the UI always gets something renderable.

use serde_json::{Map, Value};

use super::payload::NormalizedAnalysis;

/// Outcome of normalization: either a canonical structured analysis or a
/// cleaned string for direct display.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisContent {
    Structured(NormalizedAnalysis),
    Text(String),
}

impl AnalysisContent {
    pub fn structured(&self) -> Option<&NormalizedAnalysis> {
        match self {
            AnalysisContent::Structured(analysis) => Some(analysis),
            AnalysisContent::Text(_) => None,
        }
    }
}

/// Resolve the raw analysis value once, at the boundary.
pub fn normalize(raw: &Value) -> AnalysisContent {
    match raw {
        Value::Object(map) => AnalysisContent::Structured(NormalizedAnalysis::from_object(map)),
        Value::String(text) => normalize_text(text),
        other => AnalysisContent::Text(other.to_string()),
    }
}

/// Parse strategies tried in order against the (unfenced) text. Each is pure
/// and returns `None` to mean "try the next one".
const STRATEGIES: &[fn(&str) -> Option<AnalysisContent>] =
    &[parse_python_wrapper, parse_json, parse_relaxed];

fn normalize_text(text: &str) -> AnalysisContent {
    let unfenced = strip_fence(text.trim());

    for strategy in STRATEGIES {
        if let Some(content) = strategy(unfenced) {
            return content;
        }
    }

    tracing::debug!("analysis text resisted structured parsing; degrading to display text");
    AnalysisContent::Text(clean_display_text(text))
}

/// Drop a leading ```` ```json ```` (or bare ```` ``` ````) fence and its
/// closing marker, leaving the payload untouched otherwise.
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

/// Strategy 1: Python literal dictionary, recognizable by its single-quoted
/// opening. Rewrite to JSON syntax, then chase the embedded `value` string.
fn parse_python_wrapper(text: &str) -> Option<AnalysisContent> {
    if !text.starts_with("{'") {
        return None;
    }

    let parsed: Value = serde_json::from_str(&pythonish_to_json(text)).ok()?;
    let map = parsed.as_object()?;

    match map.get("value") {
        Some(Value::String(inner)) => {
            let inner = unescape_common(inner);
            if let Some(nested) = embedded_object(&inner) {
                if let Ok(Value::Object(nested_map)) = serde_json::from_str::<Value>(nested) {
                    return Some(AnalysisContent::Structured(NormalizedAnalysis::from_object(
                        &nested_map,
                    )));
                }
            }
            Some(AnalysisContent::Text(inner))
        }
        Some(Value::Object(inner)) => Some(AnalysisContent::Structured(
            NormalizedAnalysis::from_object(inner),
        )),
        _ => Some(AnalysisContent::Structured(NormalizedAnalysis::from_object(
            map,
        ))),
    }
}

/// Strategy 2: the text is plain JSON, possibly one `{ "value": ... }`
/// wrapper deep, possibly double-encoded (a JSON string holding JSON).
fn parse_json(text: &str) -> Option<AnalysisContent> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    Some(content_from_value(parsed))
}

/// Strategy 3: almost-JSON with Python token spellings mixed in. The global
/// quote rewrite is destructive on apostrophes, so this runs last among the
/// structured attempts.
fn parse_relaxed(text: &str) -> Option<AnalysisContent> {
    let rewritten = pythonish_to_json(&strip_control_chars(text));
    let parsed: Value = serde_json::from_str(&rewritten).ok()?;
    Some(content_from_value(parsed))
}

fn content_from_value(value: Value) -> AnalysisContent {
    match value {
        Value::Object(map) => match map.get("value") {
            Some(Value::String(inner)) => {
                // One unwrap level: the wrapper's inner string may itself be
                // structured data.
                let inner = unescape_common(inner);
                match serde_json::from_str::<Value>(&inner) {
                    Ok(Value::Object(nested)) => {
                        AnalysisContent::Structured(NormalizedAnalysis::from_object(&nested))
                    }
                    _ => AnalysisContent::Text(clean_display_text(&inner)),
                }
            }
            Some(Value::Object(inner)) => {
                AnalysisContent::Structured(NormalizedAnalysis::from_object(inner))
            }
            _ => AnalysisContent::Structured(NormalizedAnalysis::from_object(&map)),
        },
        Value::String(inner) => match serde_json::from_str::<Value>(&inner) {
            Ok(Value::Object(nested)) => {
                AnalysisContent::Structured(NormalizedAnalysis::from_object(&nested))
            }
            _ => AnalysisContent::Text(clean_display_text(&inner)),
        },
        other => AnalysisContent::Text(other.to_string()),
    }
}

/// Rewrite Python literal syntax into JSON: single quotes become double
/// quotes and the boolean/null spellings are substituted. Deliberately as
/// blunt as the service's own output is sloppy.
fn pythonish_to_json(text: &str) -> String {
    text.replace('\'', "\"")
        .replace("True", "true")
        .replace("False", "false")
        .replace("None", "null")
}

/// Undo the escape sequences the double-encoding step introduced. Single
/// left-to-right pass so `\\n` stays a literal backslash-n.
fn unescape_common(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Find the first balanced `{...}` substring, honoring string literals and
/// escapes, so prose around an embedded JSON document doesn't defeat the
/// nested parse.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// The guaranteed fallback: unescape what we can, drop control characters
/// (keeping newlines and tabs for readability), return verbatim otherwise.
pub fn clean_display_text(text: &str) -> String {
    strip_control_chars(&unescape_common(text))
}
