//! Turning one photo into one repair guide.

use crate::data_url::ImagePayload;
use crate::error::AppError;
use crate::extract::{parse_embedded_object, ExtractError};
use crate::vision::{VisionError, VisionModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Fixed instruction sent alongside every photo.
pub const INSTRUCTION: &str = r#"You are PapaJi — a wise, experienced Indian father who can fix anything around the house. You've been fixing things for 30+ years. Analyze this image and diagnose the problem.

Respond ONLY with valid JSON (no markdown, no backticks):
{
  "problem": "Clear description of what's broken/wrong",
  "difficulty": 1-5 (1=easy, 5=call professional),
  "tools": ["tool1", "tool2"],
  "steps": ["Step 1 instruction", "Step 2 instruction"],
  "parts": [{"name": "Part name", "estimatedCost": "₹XX-₹XX"}],
  "safetyWarnings": ["Warning if any, or empty array"],
  "dadAdvice": "A warm, encouraging closing line in PapaJi's voice mixing Hindi and English"
}

Be practical, accurate, and warm. If the image doesn't show anything broken, still give helpful maintenance advice about what you see."#;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub problem: String,
    pub difficulty: u8,
    pub tools: Vec<String>,
    pub steps: Vec<String>,
    pub parts: Vec<Part>,
    pub safety_warnings: Vec<String>,
    pub dad_advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub name: String,
    /// Free text such as `₹50-₹120`; never interpreted as a number.
    pub estimated_cost: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("field `{field}`: {reason}")]
pub struct SchemaError {
    pub field: &'static str,
    pub reason: String,
}

impl SchemaError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl DiagnosisResult {
    /// Checks a model-produced object field by field.
    ///
    /// `problem` and `difficulty` are required. List fields and `dadAdvice`
    /// default to empty when absent but must have the right type when
    /// present. Unknown keys are dropped.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(mut obj) = value else {
            return Err(SchemaError::new("$", "reply is not a JSON object"));
        };

        let problem = match obj.remove("problem") {
            Some(Value::String(s)) => s,
            Some(_) => return Err(SchemaError::new("problem", "expected a string")),
            None => return Err(SchemaError::new("problem", "missing")),
        };

        let difficulty = match obj.get("difficulty").and_then(Value::as_u64) {
            Some(n) if (MIN_DIFFICULTY as u64..=MAX_DIFFICULTY as u64).contains(&n) => n as u8,
            Some(n) => {
                return Err(SchemaError::new(
                    "difficulty",
                    format!("{n} is outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"),
                ))
            }
            None => {
                return Err(SchemaError::new(
                    "difficulty",
                    "missing or not a positive integer",
                ))
            }
        };

        let parts = match obj.remove("parts") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value::<Part>(item))
                .collect::<Result<_, _>>()
                .map_err(|e| SchemaError::new("parts", e.to_string()))?,
            Some(_) => return Err(SchemaError::new("parts", "expected an array")),
        };

        Ok(DiagnosisResult {
            problem,
            difficulty,
            tools: string_list(&mut obj, "tools")?,
            steps: string_list(&mut obj, "steps")?,
            parts,
            safety_warnings: string_list(&mut obj, "safetyWarnings")?,
            dad_advice: match obj.remove("dadAdvice") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s,
                Some(_) => return Err(SchemaError::new("dadAdvice", "expected a string")),
            },
        })
    }
}

fn string_list(obj: &mut Map<String, Value>, field: &'static str) -> Result<Vec<String>, SchemaError> {
    match obj.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s),
                _ => Err(SchemaError::new(field, format!("item {i} is not a string"))),
            })
            .collect(),
        Some(_) => Err(SchemaError::new(field, "expected an array of strings")),
    }
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Status { status, .. } => AppError::Upstream(format!("status {status}")),
            VisionError::MissingApiKey => AppError::Upstream(err.to_string()),
            VisionError::Transport(_) | VisionError::Decode(_) => {
                AppError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound => AppError::Parse,
            ExtractError::Malformed(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::Schema(err.to_string())
    }
}

/// One photo in, one repair guide out. Makes exactly one upstream call.
pub async fn diagnose(model: &dyn VisionModel, image_url: &str) -> Result<DiagnosisResult, AppError> {
    let image = ImagePayload::from_data_url(image_url);

    if let Some(sniffed) = image.sniff_media_type() {
        if sniffed != image.media_type {
            tracing::warn!(
                declared = %image.media_type,
                sniffed,
                "image bytes disagree with declared media type; sending declared type"
            );
        }
    }

    let reply = model.describe(&image, INSTRUCTION).await?;
    let value = parse_embedded_object(&reply)?;
    let result = DiagnosisResult::from_value(value)?;

    tracing::info!(
        difficulty = result.difficulty,
        steps = result.steps.len(),
        parts = result.parts.len(),
        "diagnosis ready"
    );
    Ok(result)
}
