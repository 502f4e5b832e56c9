//! Recovers a JSON object from model output that was asked to be raw JSON
//! but may arrive wrapped in prose or markdown fences.
//!
//! Stages run strictest first and stop at the first one that yields an object:
//! the whole text, then the first fenced block, then the span from the
//! first `{` to the last `}`. A stage that parses to anything other than
//! an object declines and the next one runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::{ExtractionOutcome, ExtractionStage};

static FENCED_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fenced block regex should be valid")
});

type Stage = fn(&str) -> Option<Value>;

const STAGES: [(ExtractionStage, Stage); 3] = [
    (ExtractionStage::Direct, parse_direct),
    (ExtractionStage::FencedBlock, parse_fenced_block),
    (ExtractionStage::BraceSpan, parse_brace_span),
];

pub fn extract_analysis(text: &str) -> ExtractionOutcome {
    let found = STAGES
        .iter()
        .find_map(|(stage, attempt)| match attempt(text)? {
            Value::Object(analysis) => Some((*stage, analysis)),
            other => {
                log::warn!(
                    "⚠️ {} produced a JSON {} instead of an object",
                    stage,
                    json_kind(&other)
                );
                None
            }
        });

    match found {
        Some((stage, analysis)) => {
            log::info!("✅ JSON recovered from Gemini response via {}", stage);
            ExtractionOutcome::Parsed { analysis, stage }
        }
        None => {
            log::warn!("⚠️ Could not extract a JSON object from the Gemini response");
            ExtractionOutcome::Failed { raw: text.to_string() }
        }
    }
}

fn parse_direct(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Direct parse failed: {}", e);
            None
        }
    }
}

fn parse_fenced_block(text: &str) -> Option<Value> {
    let inner = FENCED_BLOCK_REGEX.captures(text)?.get(1)?.as_str();
    match serde_json::from_str(inner) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ Fenced block found but its content is not valid JSON: {}", e);
            None
        }
    }
}

fn parse_brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    match serde_json::from_str(&text[start..=end]) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ Brace-delimited span is not valid JSON: {}", e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
