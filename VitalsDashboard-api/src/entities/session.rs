use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use vitals_dashboard_domain::entities::{
    AnalysisExchange, ChatMessage as DomainChatMessage, MessageAuthor, PatientSelection,
};
use vitals_dashboard_domain::services::SessionSnapshot;

/// One entry in the session's message log
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,

    /// "user" or "assistant"
    pub author: String,

    pub content: String,
    pub timestamp: DateTime<Utc>,

    /// Patient the message was about
    pub patient_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

/// The patient the session is talking about
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectedPatient {
    pub patient_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

/// Current analysis session state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionState {
    pub messages: Vec<ChatMessage>,
    pub selected_patient: Option<SelectedPatient>,
    /// True while a question or analysis is outstanding
    pub awaiting_response: bool,
}

/// Request payload for selecting the session's patient
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SelectPatientRequest {
    /// Patient to select; omit or null to clear the selection
    #[serde(default)]
    #[schema(example = "P001")]
    pub patient_id: Option<String>,
}

/// Request payload for asking a question about the selected patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskQuestionRequest {
    #[schema(example = "Is the fever trending down?")]
    pub question: String,
}

/// Outcome of one question or analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExchangeResponse {
    pub patient_id: String,
    pub question: String,
    pub answer: String,
    pub generated_at: DateTime<Utc>,
    /// False when `answer` is an apology for a failed request
    pub succeeded: bool,
}

pub fn convert_to_public_message(message: DomainChatMessage) -> ChatMessage {
    let author = match message.author {
        MessageAuthor::User => "user",
        MessageAuthor::Assistant => "assistant",
    };

    ChatMessage {
        id: message.id,
        author: author.to_string(),
        content: message.content,
        timestamp: message.timestamp,
        patient_id: message.patient_id,
        patient_name: message.patient_name,
    }
}

fn convert_to_public_selection(selection: PatientSelection) -> SelectedPatient {
    SelectedPatient {
        patient_id: selection.patient_id,
        patient_name: selection.patient_name,
    }
}

pub fn convert_to_public_session(snapshot: SessionSnapshot) -> SessionState {
    SessionState {
        messages: snapshot.messages.into_iter().map(convert_to_public_message).collect(),
        selected_patient: snapshot.selected_patient.map(convert_to_public_selection),
        awaiting_response: snapshot.awaiting_response,
    }
}

pub fn convert_to_public_exchange(exchange: AnalysisExchange) -> ExchangeResponse {
    ExchangeResponse {
        patient_id: exchange.patient_id,
        question: exchange.question,
        answer: exchange.answer,
        generated_at: exchange.generated_at,
        succeeded: exchange.succeeded,
    }
}
