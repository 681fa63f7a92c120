use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::ClientError;
use super::patients::PatientRepositoryTrait;
use crate::models::{
    AnalysisResponse, AnalyzeRequest, AskRequest, CreatePatientRequest, GraphData, Patient,
    UpdatePatientRequest, VitalRecord, VitalsSubmission,
};

/// Repository backed by the REST backend
#[derive(Debug, Clone)]
pub struct HttpPatientRepository {
    client: Client,
    base_url: String,
}

impl HttpPatientRepository {
    /// Create a client for the backend at `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-success statuses into errors
    async fn execute(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        debug!("Making API request: {} {}", method, path);

        let response = request.send().await.map_err(|e| {
            warn!("No response for {} {}: {}", method, path, e);
            ClientError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("API response success: {} {}", status.as_u16(), path);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!("API response error for {} {}: {}", method, path, message);

        if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(message))
        } else {
            Err(ClientError::Service {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn json<T: DeserializeOwned>(&self, method: &str, path: &str, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.execute(method, path, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("{} {}: {}", method, path, e)))
    }
}

/// Prefer the backend's `detail` field, else `HTTP <code>: <reason>`
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            )
        })
}

#[async_trait]
impl PatientRepositoryTrait for HttpPatientRepository {
    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        let path = "/patients/";
        self.json("GET", path, self.client.get(self.url(path))).await
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Patient, ClientError> {
        let path = format!("/patients/{}", patient_id);
        self.json("GET", &path, self.client.get(self.url(&path))).await
    }

    async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, ClientError> {
        let path = "/patients/";
        self.json("POST", path, self.client.post(self.url(path)).json(&request)).await
    }

    async fn update_patient(
        &self,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, ClientError> {
        let path = format!("/patients/{}", patient_id);
        self.json("PUT", &path, self.client.put(self.url(&path)).json(&request)).await
    }

    async fn delete_patient(&self, patient_id: &str) -> Result<(), ClientError> {
        let path = format!("/patients/{}", patient_id);
        self.execute("DELETE", &path, self.client.delete(self.url(&path))).await?;
        Ok(())
    }

    async fn get_vitals(&self, patient_id: &str, days: u32) -> Result<Vec<VitalRecord>, ClientError> {
        let path = format!("/patients/{}/vitals", patient_id);
        let request = self.client.get(self.url(&path)).query(&[("days", days)]);
        self.json("GET", &path, request).await
    }

    async fn add_vitals(&self, patient_id: &str, submission: VitalsSubmission) -> Result<(), ClientError> {
        let path = format!("/patients/{}/vitals/shift", patient_id);
        let request = self.client.post(self.url(&path)).json(&submission);
        self.execute("POST", &path, request).await?;
        Ok(())
    }

    async fn get_graph_data(&self, patient_id: &str, days: u32) -> Result<GraphData, ClientError> {
        let path = format!("/patients/{}/graph-data", patient_id);
        let request = self.client.get(self.url(&path)).query(&[("days", days)]);
        self.json("GET", &path, request).await
    }

    async fn analyze(&self, patient_id: &str, question: Option<&str>) -> Result<AnalysisResponse, ClientError> {
        let path = format!("/patients/{}/analyze", patient_id);
        let body = AnalyzeRequest {
            question: question.map(str::to_string),
        };
        self.json("POST", &path, self.client.post(self.url(&path)).json(&body)).await
    }

    async fn ask(&self, patient_id: &str, question: &str) -> Result<AnalysisResponse, ClientError> {
        let path = format!("/patients/{}/ask", patient_id);
        let body = AskRequest {
            patient_id: patient_id.to_string(),
            question: question.to_string(),
        };
        self.json("POST", &path, self.client.post(self.url(&path)).json(&body)).await
    }

    async fn probe(&self) -> Result<(), ClientError> {
        let path = "/patients/";
        self.execute("GET", path, self.client.get(self.url(path))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        let message = error_message(StatusCode::NOT_FOUND, r#"{"detail":"Patient not found"}"#);
        assert_eq!(message, "Patient not found");
    }

    #[test]
    fn test_error_message_falls_back_to_status_line() {
        let message = error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(message, "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_error_message_renders_structured_detail() {
        let message = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","heart_beat"],"msg":"field required"}]}"#,
        );
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let repository = HttpPatientRepository::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(repository.base_url(), "http://localhost:8000");
        assert_eq!(repository.url("/patients/"), "http://localhost:8000/patients/");
    }
}
