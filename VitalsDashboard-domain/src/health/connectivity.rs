use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use vitals_dashboard_data::repository::PatientRepositoryTrait;

/// Backend reachability as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No probe has resolved yet
    Checking,
    Connected,
    Disconnected,
}

/// Current connection state plus when and against what it was observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub last_checked: Option<DateTime<Utc>>,
    /// Where probes are sent (base URL, or the demonstration dataset)
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Polls the backend's patient listing and publishes a tri-state status.
///
/// The state is not reset to `Checking` while a probe is in flight; it holds the
/// previous outcome until the new probe resolves. Whichever probe resolves last wins.
pub struct ConnectivityMonitor<R: PatientRepositoryTrait + ?Sized> {
    repository: Arc<R>,
    interval: Duration,
    status: watch::Sender<ConnectionStatus>,
}

/// Monitor shared between the poller and request handlers
pub type SharedConnectivityMonitor = Arc<ConnectivityMonitor<dyn PatientRepositoryTrait>>;

impl<R: PatientRepositoryTrait + ?Sized> ConnectivityMonitor<R> {
    pub fn new(repository: Arc<R>, target: impl Into<String>, interval: Duration) -> Self {
        let (status, _) = watch::channel(ConnectionStatus {
            state: ConnectionState::Checking,
            last_checked: None,
            target: target.into(),
            last_error: None,
        });
        Self {
            repository,
            interval,
            status,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe once and publish the outcome. Also serves manual retries.
    pub async fn probe_once(&self) -> ConnectionState {
        let result = self.repository.probe().await;
        let (state, error) = match result {
            Ok(()) => (ConnectionState::Connected, None),
            Err(err) => (ConnectionState::Disconnected, Some(err.to_string())),
        };

        let mut previous = state;
        self.status.send_modify(|status| {
            previous = status.state;
            status.state = state;
            status.last_checked = Some(Utc::now());
            status.last_error = error.clone();
        });

        if previous != state {
            match &error {
                Some(err) => warn!("Backend connection lost: {}", err),
                None => info!("Backend connection established"),
            }
        } else {
            debug!("Backend probe: {:?}", state);
        }
        state
    }
}

impl<R: PatientRepositoryTrait + ?Sized + 'static> ConnectivityMonitor<R> {
    /// Start polling: one probe immediately, then one every interval until stopped.
    pub fn start(self: &Arc<Self>) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let monitor = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(monitor.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Connectivity monitor started (every {:?})", monitor.interval);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = monitor.probe_once() => {}
                }
            }

            info!("Connectivity monitor stopped");
        });

        MonitorHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

/// Owner of a running poller. Dropping the handle also stops polling.
pub struct MonitorHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stop polling and wait for the poller to exit. No probe starts afterwards.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                warn!("Connectivity monitor task failed: {}", e);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
