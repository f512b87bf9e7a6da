use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AnswerSet, IntakeForm, RespondentMetadata};

pub const ANONYMOUS_NAME: &str = "Anonim";
pub const UNSPECIFIED: &str = "Tidak disebutkan";

/// Raw questionnaire as it arrives over the wire. Historical field names are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    #[serde(default, alias = "nama")]
    pub name: Option<Value>,
    #[serde(default, alias = "usia")]
    pub age: Option<Value>,
    #[serde(default, alias = "jenis_kelamin")]
    pub gender: Option<Value>,
    #[serde(default, alias = "lokasi")]
    pub location: Option<Value>,
    #[serde(default, alias = "gejala")]
    pub symptoms: Option<Value>,
    #[serde(default, alias = "faktor_risiko")]
    pub risk_factors: Option<Value>,
    #[serde(default, alias = "cerita")]
    pub narrative: Option<Value>,
}

/// Validation errors raised before a questionnaire reaches the engine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("{field} must be an object mapping question keys to true/false")]
    MalformedAnswers { field: &'static str },
}

/// Coerces loosely typed submissions into an [`IntakeForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn form_from_request(&self, request: ConsultationRequest) -> Result<IntakeForm, IntakeError> {
        let symptoms = answers_from_value("symptoms", request.symptoms)?;
        let risk_factors = answers_from_value("risk_factors", request.risk_factors)?;

        let respondent = RespondentMetadata {
            name: text_or(request.name, ANONYMOUS_NAME),
            age: coerce_age(request.age.as_ref()),
            gender: text_or(request.gender, UNSPECIFIED),
            location: text_or(request.location, UNSPECIFIED),
        };

        Ok(IntakeForm {
            respondent,
            symptoms,
            risk_factors,
            narrative: narrative_text(request.narrative).to_lowercase(),
        })
    }
}

/// Strings are kept as sent; anything else (absent, null, numbers, objects) becomes `fallback`.
fn text_or(value: Option<Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(text)) => text,
        _ => fallback.to_string(),
    }
}

/// Whole non-negative numbers or all-digit strings; anything else becomes 0.
pub fn coerce_age(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|age| u32::try_from(age).ok())
            .unwrap_or(0),
        Some(Value::String(raw)) if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) => {
            raw.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Only the JSON literal `true` affirms an answer; `"true"`, `1` and friends do not.
fn answers_from_value(field: &'static str, value: Option<Value>) -> Result<AnswerSet, IntakeError> {
    match value {
        None | Some(Value::Null) => Ok(AnswerSet::new()),
        Some(Value::Object(map)) => Ok(map
            .into_iter()
            .map(|(key, value)| {
                let affirmed = value == Value::Bool(true);
                (key, affirmed)
            })
            .collect()),
        Some(_) => Err(IntakeError::MalformedAnswers { field }),
    }
}

fn narrative_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}
