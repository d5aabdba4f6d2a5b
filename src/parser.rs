use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SummaryError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub reference: Option<String>,
    pub overview: Option<String>,
    pub historical_context: Option<String>,
    pub summary: Option<String>,
    pub key_verses: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub life_application: Option<Vec<String>>,
    pub reflection_questions: Option<Vec<String>>,
    pub cross_references: Option<Vec<String>>,
}

const REPLACEMENTS: [(char, char); 6] = [
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2013}', '-'),
    ('\u{2014}', '-'),
];

pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            REPLACEMENTS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

pub fn parse(raw: &str) -> Result<SummaryResult, SummaryError> {
    let text = normalize_punctuation(raw);
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| SummaryError::Parse(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(SummaryError::Parse(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )));
    };

    Ok(SummaryResult {
        reference: text_field(&obj, "reference"),
        overview: text_field(&obj, "overview"),
        historical_context: text_field(&obj, "historical_context"),
        summary: text_field(&obj, "summary"),
        key_verses: list_field(&obj, "key_verses"),
        themes: list_field(&obj, "themes"),
        life_application: list_field(&obj, "life_application"),
        reflection_questions: list_field(&obj, "reflection_questions"),
        cross_references: list_field(&obj, "cross_references"),
    })
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_text)
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match obj.get(key)? {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        other => scalar_text(other).map(|s| vec![s]),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
