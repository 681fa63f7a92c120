use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageAuthor {
    User,
    Assistant,
}

/// One entry in the analysis session's message log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author: MessageAuthor,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl ChatMessage {
    pub fn new(author: MessageAuthor, content: impl Into<String>, patient: &PatientSelection) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            content: content.into(),
            timestamp: Utc::now(),
            patient_id: patient.patient_id.clone(),
            patient_name: patient.patient_name.clone(),
        }
    }
}

/// The patient the session is currently talking about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSelection {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl PatientSelection {
    pub fn new(patient_id: impl Into<String>, patient_name: Option<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            patient_name,
        }
    }
}

/// One question/answer pair with the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisExchange {
    pub patient_id: String,
    pub question: String,
    pub answer: String,
    pub generated_at: DateTime<Utc>,
    /// False when `answer` is the fallback apology for a failed request
    pub succeeded: bool,
}
