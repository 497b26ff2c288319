//! Extracts the analysis payload from free-form model output.
//!
//! Candidates are tried in order: fenced ```json blocks first, then every
//! top-level balanced `{...}` span. The first candidate that is valid JSON
//! wins and is coerced into `ParsedAnalysis`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{AnalysisError, MalformedResponseError, ParseError};
use crate::models::{Category, Interaction, InteractionEffect, LifestyleItem};
use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "longevity_log::parser";

static FENCED_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("fenced JSON pattern is valid")
});

/// Items and model-reported net impact, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub items: Vec<LifestyleItem>,
    pub net_impact: f64,
}

pub fn parse_response(text: &str) -> Result<ParsedAnalysis, AnalysisError> {
    let candidates = json_candidates(text);
    if candidates.is_empty() {
        return Err(ParseError {
            reason: "no balanced JSON object found".into(),
        }
        .into());
    }

    let mut first_error: Option<String> = None;
    for candidate in &candidates {
        match parse_candidate(candidate) {
            Ok(value) => {
                log_debug!("Parsed JSON candidate of {} bytes", candidate.len());
                return coerce_analysis(value).map_err(Into::into);
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    Err(MalformedResponseError {
        reason: first_error.unwrap_or_else(|| "no candidate parsed".into()),
    }
    .into())
}

fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates: Vec<&str> = FENCED_JSON_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    candidates.extend(balanced_spans(text));
    candidates
}

/// Top-level `{...}` spans, honouring string literals and escapes.
/// A `{` that never closes is skipped and scanning resumes after it.
fn balanced_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('{') {
        let start = pos + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end = None;

        for (i, &byte) in bytes.iter().enumerate().skip(start) {
            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }

        match end {
            Some(end) => {
                spans.push(&text[start..=end]);
                pos = end + 1;
            }
            None => pos = start + 1,
        }
    }

    spans
}

fn parse_candidate(candidate: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(err) => {
            let stripped = strip_line_comments(candidate);
            serde_json::from_str::<Value>(&stripped).map_err(|_| err.to_string())
        }
    }
}

/// Remove `//` comments outside string literals. Models sometimes echo the
/// annotated example shape back.
fn strip_line_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '/' && chars.peek() == Some(&'/') {
            for skipped in chars.by_ref() {
                if skipped == '\n' {
                    out.push('\n');
                    break;
                }
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        }
        out.push(c);
    }

    out
}

fn malformed(reason: impl Into<String>) -> MalformedResponseError {
    MalformedResponseError {
        reason: reason.into(),
    }
}

fn coerce_analysis(value: Value) -> Result<ParsedAnalysis, MalformedResponseError> {
    let Value::Object(mut root) = value else {
        return Err(malformed("top-level JSON value is not an object"));
    };

    let raw_items = match root.remove("items") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(malformed("`items` is not an array")),
    };

    let net_impact = match root.get("netImpact") {
        None | Some(Value::Null) => 0.0,
        Some(value) => number(value).unwrap_or_else(|| {
            log_warn!("Ignoring non-numeric netImpact {value}");
            0.0
        }),
    };

    let items = raw_items
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match raw {
            Value::Object(fields) => Some(coerce_item(index, &fields)),
            other => {
                log_warn!("Skipping item {index}: expected object, got {other}");
                None
            }
        })
        .collect();

    Ok(ParsedAnalysis { items, net_impact })
}

fn coerce_item(index: usize, fields: &Map<String, Value>) -> LifestyleItem {
    let id = fields
        .get("id")
        .and_then(text)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("item-{}", index + 1));

    let interactions = match fields.get("interactions") {
        Some(Value::Array(values)) => values.iter().filter_map(coerce_interaction).collect(),
        _ => Vec::new(),
    };

    LifestyleItem {
        id,
        description: fields.get("description").and_then(text).unwrap_or_default(),
        category: fields
            .get("category")
            .and_then(text)
            .map(|label| Category::from_label(&label))
            .unwrap_or_default(),
        impact: fields.get("impact").and_then(number).unwrap_or(0.0),
        confidence: fields.get("confidence").and_then(number).unwrap_or(0.0),
        interactions,
        recommendations: string_list(fields.get("recommendations")),
        sources: string_list(fields.get("sources")),
    }
}

fn coerce_interaction(value: &Value) -> Option<Interaction> {
    let fields = value.as_object()?;
    let item_id = fields.get("itemId").and_then(text)?;

    Some(Interaction {
        item_id,
        effect: fields
            .get("effect")
            .and_then(text)
            .map(|label| InteractionEffect::from_label(&label))
            .unwrap_or(InteractionEffect::Unknown),
        description: fields.get("description").and_then(text).unwrap_or_default(),
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(values)) => values.iter().filter_map(text).collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_surrounded_by_prose() {
        let parsed =
            parse_response("Here is the analysis: {\"items\":[],\"netImpact\":0} Thanks!").unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.net_impact, 0.0);
    }

    #[test]
    fn stray_open_brace_in_prose_is_skipped() {
        let parsed = parse_response(
            "Factors: {sleep, diet. Result: {\"items\":[],\"netImpact\":0.25}",
        )
        .unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.net_impact, 0.25);
    }

    #[test]
    fn missing_braces_is_parse_error() {
        let err = parse_response("I could not analyze this entry, sorry.").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)), "{err:?}");

        let err = parse_response("truncated { \"items\": [").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)), "{err:?}");
    }

    #[test]
    fn invalid_json_span_is_malformed() {
        let err = parse_response("result: {items: [oops]}").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)), "{err:?}");
    }

    #[test]
    fn wrong_items_type_is_malformed() {
        let err = parse_response(r#"{"items": "none", "netImpact": 0}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)), "{err:?}");
    }

    #[test]
    fn defaults_missing_fields() {
        let parsed = parse_response(r#"{"unexpected": true}"#).unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.net_impact, 0.0);

        let parsed = parse_response(
            r#"{"items":[{"description":"Walked 30 minutes","category":"exercise","impact":0.000038}]}"#,
        )
        .unwrap();
        let item = &parsed.items[0];
        assert_eq!(item.id, "item-1");
        assert_eq!(item.category, Category::Exercise);
        assert_eq!(item.confidence, 0.0);
        assert!(item.interactions.is_empty());
        assert!(item.sources.is_empty());
        assert!(item.recommendations.is_empty());
    }

    #[test]
    fn unknown_category_and_effect_fall_back() {
        let parsed = parse_response(
            r#"{"items":[{"id":"h-1","category":"hydration","impact":"-0.0000057",
                "interactions":[{"itemId":"d-1","effect":"amplifies","description":"x"},{"effect":"enhances"}]}]}"#,
        )
        .unwrap();
        let item = &parsed.items[0];
        assert_eq!(item.category, Category::Other);
        assert_eq!(item.impact, -0.0000057);
        assert_eq!(item.interactions.len(), 1);
        assert_eq!(item.interactions[0].effect, InteractionEffect::Unknown);
    }

    #[test]
    fn prefers_fenced_block_over_earlier_braces() {
        let response = "Factors {sleep, diet} follow.\n```json\n{\"items\":[{\"id\":\"s\",\"category\":\"sleep\",\"impact\":-0.00001}],\"netImpact\":-0.00001}\n```\nDone.";
        let parsed = parse_response(response).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].id, "s");
    }

    #[test]
    fn skips_invalid_span_and_uses_next_object() {
        let response = r#"Note {not json}. Result: {"items":[],"netImpact":0.5}"#;
        let parsed = parse_response(response).unwrap();
        assert_eq!(parsed.net_impact, 0.5);
    }

    #[test]
    fn braces_inside_strings_do_not_end_span() {
        let response = r#"{"items":[{"id":"a","description":"ate {pizza} \"late\"","impact":1}],"netImpact":1}"#;
        let parsed = parse_response(response).unwrap();
        assert_eq!(parsed.items[0].description, "ate {pizza} \"late\"");
    }

    #[test]
    fn tolerates_line_comments() {
        let response = "{\n  \"items\": [], // nothing today\n  \"netImpact\": -0.0000057 // -30 seconds\n}";
        let parsed = parse_response(response).unwrap();
        assert_eq!(parsed.net_impact, -0.0000057);
    }

    #[test]
    fn non_object_items_are_skipped() {
        let parsed = parse_response(r#"{"items":[42, {"id":"x","impact":0.1}]}"#).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].id, "x");
    }
}
