use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vitals_dashboard_domain::health::{ConnectionState, ConnectionStatus as DomainConnectionStatus};

/// Backend connection status as last observed by the monitor
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionStatus {
    /// "checking", "connected" or "disconnected"
    #[schema(example = "connected")]
    pub state: String,

    /// When the last probe resolved
    pub last_checked: Option<DateTime<Utc>>,

    /// Where probes are sent
    pub target: String,

    /// Why the last probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

pub fn convert_to_public_connection(status: DomainConnectionStatus) -> ConnectionStatus {
    let state = match status.state {
        ConnectionState::Checking => "checking",
        ConnectionState::Connected => "connected",
        ConnectionState::Disconnected => "disconnected",
    };

    ConnectionStatus {
        state: state.to_string(),
        last_checked: status.last_checked,
        target: status.target,
        last_error: status.last_error,
    }
}
