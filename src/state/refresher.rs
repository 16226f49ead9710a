use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-requests the whole snapshot on a fixed period so edits made in the
/// backend show up without restarting.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, period: Duration) -> Self {
        Self { network_requests, period }
    }

    pub async fn run(self) {
        let mut snapshot_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        snapshot_interval.tick().await;

        loop {
            snapshot_interval.tick().await;
            if self
                .network_requests
                .send(NetworkRequest::RefreshSnapshot)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
