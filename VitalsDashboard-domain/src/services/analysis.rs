use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};
use vitals_dashboard_data::models::LlmAnalysis;
use vitals_dashboard_data::repository::PatientRepositoryTrait;

use crate::entities::analysis::{AnalysisExchange, ChatMessage, MessageAuthor, PatientSelection};

/// Question sent on behalf of the user when a full analysis is requested
pub const ANALYZE_QUESTION: &str = "Generate a comprehensive analysis of this patient";
/// First line of every folded full analysis
pub const ANALYSIS_PREFIX: &str = "Analysis completed:";
/// Reply used when the service answered without any usable text
pub const NO_RESPONSE_TEXT: &str = "I apologize, but I was unable to generate a response.";
/// Reply used when a question could not be answered
pub const ASK_FAILURE_TEXT: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";
/// Reply used when a full analysis could not be generated
pub const ANALYZE_FAILURE_TEXT: &str =
    "I apologize, but I encountered an error while generating the analysis. Please try again.";

/// Session errors. All of them are rejected before any request is issued.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("No patient selected")]
    NoPatientSelected,

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("A request is already awaiting a response")]
    Busy,
}

/// Everything a subscriber needs to render the session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<ChatMessage>,
    pub selected_patient: Option<PatientSelection>,
    pub awaiting_response: bool,
}

/// Scoped hold on the session's single outstanding-request slot.
///
/// The slot is the snapshot's `awaiting_response` flag, claimed and released
/// under the channel's own lock. Release happens on drop, so every exit path
/// (including a dropped future) clears the pending state.
struct PendingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
}

impl<'a> PendingGuard<'a> {
    fn acquire(state: &'a watch::Sender<SessionSnapshot>) -> Option<Self> {
        let mut acquired = false;
        state.send_if_modified(|s| {
            if s.awaiting_response {
                return false;
            }
            s.awaiting_response = true;
            acquired = true;
            true
        });
        acquired.then_some(Self { state })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.awaiting_response = false);
    }
}

#[derive(Debug, Clone, Copy)]
enum ExchangeKind {
    Question,
    FullAnalysis,
}

/// Single-patient conversation with the analysis service.
///
/// State lives in a `watch` channel; callers render from [`AnalysisSession::subscribe`].
pub struct AnalysisSession<R: PatientRepositoryTrait + ?Sized> {
    repository: Arc<R>,
    state: watch::Sender<SessionSnapshot>,
}

/// Session shared across request handlers
pub type SharedAnalysisSession = Arc<AnalysisSession<dyn PatientRepositoryTrait>>;

impl<R: PatientRepositoryTrait + ?Sized> AnalysisSession<R> {
    pub fn new(repository: Arc<R>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { repository, state }
    }

    /// Change notifications for the whole session state
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn selected_patient(&self) -> Option<PatientSelection> {
        self.state.borrow().selected_patient.clone()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state.borrow().awaiting_response
    }

    /// Select the patient subsequent questions refer to; `None` clears the selection
    pub fn select_patient(&self, selection: Option<PatientSelection>) {
        self.state.send_modify(|s| s.selected_patient = selection);
    }

    /// Empty the message log. A request already in flight still appends its reply.
    pub fn clear(&self) {
        self.state.send_modify(|s| s.messages.clear());
    }

    /// Ask a question about the selected patient.
    ///
    /// Service failures do not surface as errors: the log gets an apology reply instead.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Result<AnalysisExchange, SessionError> {
        let patient = self.selected_patient().ok_or(SessionError::NoPatientSelected)?;
        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        self.exchange(patient, question, ExchangeKind::Question).await
    }

    /// Request a full analysis of the selected patient
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> Result<AnalysisExchange, SessionError> {
        let patient = self.selected_patient().ok_or(SessionError::NoPatientSelected)?;
        self.exchange(patient, ANALYZE_QUESTION, ExchangeKind::FullAnalysis).await
    }

    async fn exchange(
        &self,
        patient: PatientSelection,
        question: &str,
        kind: ExchangeKind,
    ) -> Result<AnalysisExchange, SessionError> {
        let _guard = PendingGuard::acquire(&self.state).ok_or(SessionError::Busy)?;

        self.append(ChatMessage::new(MessageAuthor::User, question, &patient));

        let response = match kind {
            ExchangeKind::Question => self.repository.ask(&patient.patient_id, question).await,
            ExchangeKind::FullAnalysis => self.repository.analyze(&patient.patient_id, None).await,
        };

        let (answer, succeeded) = match response {
            Ok(response) => {
                let answer = match kind {
                    ExchangeKind::Question => fold_answer(&response.llm_analysis),
                    ExchangeKind::FullAnalysis => fold_full_analysis(&response.llm_analysis),
                };
                (answer, true)
            }
            Err(err) => {
                warn!("Analysis request for {} failed: {}", patient.patient_id, err);
                let apology = match kind {
                    ExchangeKind::Question => ASK_FAILURE_TEXT,
                    ExchangeKind::FullAnalysis => ANALYZE_FAILURE_TEXT,
                };
                (apology.to_string(), false)
            }
        };

        self.append(ChatMessage::new(MessageAuthor::Assistant, answer.clone(), &patient));
        info!("Analysis exchange for {} completed (succeeded: {})", patient.patient_id, succeeded);

        Ok(AnalysisExchange {
            patient_id: patient.patient_id,
            question: question.to_string(),
            answer,
            generated_at: Utc::now(),
            succeeded,
        })
    }

    fn append(&self, message: ChatMessage) {
        self.state.send_modify(|s| s.messages.push(message));
    }
}

/// Blank strings count as absent
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.trim().is_empty())
}

/// Fold a question response: direct answer, else summary, else raw text, else a fixed apology
pub fn fold_answer(analysis: &LlmAnalysis) -> String {
    present(&analysis.answer_to_question)
        .or_else(|| present(&analysis.summary))
        .or_else(|| present(&analysis.raw_text))
        .unwrap_or(NO_RESPONSE_TEXT)
        .to_string()
}

/// Fold a full analysis into sections, leaving out every section whose source is absent
pub fn fold_full_analysis(analysis: &LlmAnalysis) -> String {
    let mut text = format!("{}\n\n", ANALYSIS_PREFIX);

    if let Some(summary) = present(&analysis.summary) {
        text.push_str(&format!("**Summary:** {}\n\n", summary));
    }
    if let Some(trend) = present(&analysis.trend) {
        text.push_str(&format!("**Trend:** {}\n\n", trend));
    }
    if let Some(explanation) = present(&analysis.explanation) {
        text.push_str(&format!("**Explanation:** {}\n\n", explanation));
    }
    if let Some(Value::Object(predicted)) = &analysis.predicted_vitals {
        if !predicted.is_empty() {
            text.push_str("\n**Predicted Vitals (24h):**\n");
            for (name, value) in predicted {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                text.push_str(&format!("- {}: {}\n", name, rendered));
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Notify;
    use vitals_dashboard_data::models::AnalysisResponse;
    use vitals_dashboard_data::repository::mock::MockPatientRepository;
    use vitals_dashboard_data::repository::ClientError;

    fn selection() -> Option<PatientSelection> {
        Some(PatientSelection::new("P001", Some("John Smith".to_string())))
    }

    fn response(analysis: LlmAnalysis) -> AnalysisResponse {
        AnalysisResponse {
            patient_id: "P001".to_string(),
            llm_analysis: analysis,
            ..Default::default()
        }
    }

    #[test]
    fn test_answer_takes_priority_over_summary() {
        let analysis = LlmAnalysis {
            answer_to_question: Some("Blood pressure is trending down.".to_string()),
            summary: Some("Stable overall.".to_string()),
            ..Default::default()
        };
        assert_eq!(fold_answer(&analysis), "Blood pressure is trending down.");
    }

    #[test]
    fn test_answer_falls_back_through_summary_and_raw_text() {
        let summary_only = LlmAnalysis {
            answer_to_question: Some(String::new()),
            summary: Some("Stable overall.".to_string()),
            ..Default::default()
        };
        assert_eq!(fold_answer(&summary_only), "Stable overall.");

        let raw_only = LlmAnalysis {
            raw_text: Some("unparsed model output".to_string()),
            ..Default::default()
        };
        assert_eq!(fold_answer(&raw_only), "unparsed model output");

        assert_eq!(fold_answer(&LlmAnalysis::default()), NO_RESPONSE_TEXT);
    }

    #[test]
    fn test_full_analysis_renders_present_sections_only() {
        let analysis = LlmAnalysis {
            summary: Some("Fever subsiding.".to_string()),
            trend: Some("Improving".to_string()),
            predicted_vitals: Some(json!({ "heart_rate": 84, "blood_pressure": "125/82" })),
            ..Default::default()
        };

        let text = fold_full_analysis(&analysis);

        assert_eq!(
            text,
            "Analysis completed:\n\n\
             **Summary:** Fever subsiding.\n\n\
             **Trend:** Improving\n\n\
             \n**Predicted Vitals (24h):**\n\
             - heart_rate: 84\n\
             - blood_pressure: 125/82\n"
        );
        assert!(!text.contains("Explanation"));
    }

    #[test]
    fn test_full_analysis_without_fields_is_just_the_prefix() {
        let analysis = LlmAnalysis {
            predicted_vitals: Some(json!({})),
            ..Default::default()
        };
        assert_eq!(fold_full_analysis(&analysis), "Analysis completed:\n\n");
    }

    #[tokio::test]
    async fn test_empty_question_makes_no_request() {
        let repository = Arc::new(MockPatientRepository::new());
        let session = AnalysisSession::new(repository.clone());
        session.select_patient(selection());

        let result = session.ask("   ").await;

        assert_eq!(result, Err(SessionError::EmptyQuestion));
        assert_eq!(repository.analysis_calls(), 0);
        assert!(session.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn test_ask_without_patient_is_rejected() {
        let repository = Arc::new(MockPatientRepository::new());
        let session = AnalysisSession::new(repository.clone());

        assert_eq!(session.ask("How is he?").await, Err(SessionError::NoPatientSelected));
        assert_eq!(session.analyze().await, Err(SessionError::NoPatientSelected));
        assert_eq!(repository.analysis_calls(), 0);
    }

    #[tokio::test]
    async fn test_ask_appends_question_then_answer() {
        let repository = Arc::new(MockPatientRepository::new().with_analysis(response(LlmAnalysis {
            answer_to_question: Some("Heart rate is normal.".to_string()),
            summary: Some("Stable.".to_string()),
            ..Default::default()
        })));
        let session = AnalysisSession::new(repository.clone());
        session.select_patient(selection());

        let exchange = session.ask("Is the heart rate normal?").await.unwrap();

        assert_eq!(exchange.answer, "Heart rate is normal.");
        assert!(exchange.succeeded);
        assert_eq!(repository.last_question().as_deref(), Some("Is the heart rate normal?"));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].author, MessageAuthor::User);
        assert_eq!(snapshot.messages[1].author, MessageAuthor::Assistant);
        assert_eq!(snapshot.messages[1].patient_name.as_deref(), Some("John Smith"));
        assert!(!snapshot.awaiting_response);
    }

    #[tokio::test]
    async fn test_transport_failure_appends_one_apology_and_releases() {
        let repository = Arc::new(
            MockPatientRepository::new()
                .with_analysis_failure(ClientError::Unreachable("connection refused".to_string())),
        );
        let session = AnalysisSession::new(repository);
        session.select_patient(selection());

        let exchange = session.ask("Any concerns?").await.unwrap();

        assert!(!exchange.succeeded);
        let snapshot = session.snapshot();
        let replies: Vec<_> = snapshot
            .messages
            .iter()
            .filter(|m| m.author == MessageAuthor::Assistant)
            .collect();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, ASK_FAILURE_TEXT);
        assert!(!snapshot.awaiting_response);
        assert!(!session.is_awaiting_response());
    }

    #[tokio::test]
    async fn test_analyze_uses_synthetic_question_and_its_own_apology() {
        let repository = Arc::new(
            MockPatientRepository::new()
                .with_analysis_failure(ClientError::Unsupported("demo".to_string())),
        );
        let session = AnalysisSession::new(repository.clone());
        session.select_patient(selection());

        let exchange = session.analyze().await.unwrap();

        assert_eq!(exchange.question, ANALYZE_QUESTION);
        assert_eq!(exchange.answer, ANALYZE_FAILURE_TEXT);
        assert_eq!(repository.last_question(), None);
        assert_eq!(session.snapshot().messages[0].content, ANALYZE_QUESTION);
    }

    #[tokio::test]
    async fn test_second_request_while_pending_is_busy() {
        let gate = Arc::new(Notify::new());
        let repository = Arc::new(MockPatientRepository::new().with_gate(gate.clone()));
        let session = Arc::new(AnalysisSession::new(repository.clone()));
        session.select_patient(selection());

        let mut updates = session.subscribe();
        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.ask("First question").await })
        };

        // Wait until the first request holds the slot
        updates.wait_for(|s| s.awaiting_response).await.unwrap();

        assert_eq!(session.ask("Second question").await, Err(SessionError::Busy));
        assert_eq!(session.analyze().await, Err(SessionError::Busy));

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());

        assert!(!session.is_awaiting_response());
        assert_eq!(repository.analysis_calls(), 1);
        assert_eq!(session.snapshot().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_does_not_drop_in_flight_reply() {
        let gate = Arc::new(Notify::new());
        let repository = Arc::new(MockPatientRepository::new().with_gate(gate.clone()));
        let session = Arc::new(AnalysisSession::new(repository));
        session.select_patient(selection());

        let mut updates = session.subscribe();
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.ask("Still there?").await })
        };
        updates.wait_for(|s| s.awaiting_response).await.unwrap();

        session.clear();
        assert!(session.snapshot().messages.is_empty());
        assert!(session.is_awaiting_response());

        gate.notify_one();
        pending.await.unwrap().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].author, MessageAuthor::Assistant);
    }

    #[tokio::test]
    async fn test_dropped_request_releases_pending_state() {
        let gate = Arc::new(Notify::new());
        let repository = Arc::new(MockPatientRepository::new().with_gate(gate));
        let session = Arc::new(AnalysisSession::new(repository));
        session.select_patient(selection());

        let mut updates = session.subscribe();
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.ask("Will be abandoned").await })
        };
        updates.wait_for(|s| s.awaiting_response).await.unwrap();

        pending.abort();
        let _ = pending.await;

        assert!(!session.is_awaiting_response());
        assert!(!session.snapshot().awaiting_response);
    }
}
