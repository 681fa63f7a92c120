use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::patient::MedicalHistory;
use super::vitals::VitalRecord;

/// Body of `POST /patients/{id}/analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Body of `POST /patients/{id}/ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub patient_id: String,
    pub question: String,
}

/// Structured output of the language model, as relayed by the backend.
///
/// The model is asked for JSON but does not always comply, so every field is
/// optional. `raw_text` carries unparsed output and `error` a parse failure note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmAnalysis {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Predicted values for the next 24 hours, keyed by vital name in model order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_vitals: Option<Value>,

    /// "Improving", "Stable" or "Deteriorating" when the model follows instructions
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub answer_to_question: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Model output is loosely typed: a string is kept as is, null is absent and
/// anything else keeps its JSON text
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Response of both `/analyze` and `/ask`. Only `/analyze` echoes history and vitals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub patient_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_vitals: Option<Vec<VitalRecord>>,

    #[serde(default)]
    pub llm_analysis: LlmAnalysis,
}
