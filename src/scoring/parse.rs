//! Pulls a structured assessment out of free-form model text.
//!
//! Models often wrap JSON in prose or code fences, so the first `{...}` span
//! that parses as a JSON object wins.

use serde_json::Value;

use crate::constants::{MAX_SCORE, MIN_SCORE};

use super::error::ScoringError;
use super::types::{Priority, Recommendation};

/// Parsed model verdict for one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAssessment {
    pub score: u32,
    pub findings: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Returns the first balanced `{...}` span in `text` that parses as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(&text[start..]) else {
            continue;
        };
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&text[start..start + end])
        {
            return Some(value);
        }
    }
    None
}

/// Byte length of the brace-balanced prefix of `s` (which starts with `{`).
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_score(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u32)
}

fn parse_findings(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}

fn parse_recommendations(value: Option<&Value>) -> Vec<Recommendation> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(action) => Some(Recommendation::new(Priority::Medium, action.as_str(), "")),
            Value::Object(obj) => {
                let field = |name: &str| {
                    obj.get(name)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let priority = obj
                    .get("priority")
                    .and_then(Value::as_str)
                    .map(Priority::from)
                    .unwrap_or_default();
                Some(Recommendation::new(priority, field("action"), field("impact")))
            }
            _ => None,
        })
        .collect()
}

/// Parses a model response into a [`ModelAssessment`].
///
/// Scores are rounded and clamped to `0..=100`. A missing or non-numeric
/// score is an error; missing findings or recommendations are empty.
pub fn parse_assessment(text: &str) -> Result<ModelAssessment, ScoringError> {
    let value = extract_json_object(text).ok_or(ScoringError::NoJsonObject)?;
    let Value::Object(obj) = &value else {
        return Err(ScoringError::InvalidResponse {
            reason: "expected a JSON object".to_string(),
        });
    };

    let score = obj
        .get("score")
        .and_then(parse_score)
        .ok_or(ScoringError::MissingScore)?;

    Ok(ModelAssessment {
        score,
        findings: parse_findings(obj.get("findings")),
        recommendations: parse_recommendations(obj.get("recommendations")),
    })
}
