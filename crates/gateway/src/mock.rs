use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};

use super::{FaxClient, FaxRequest, GatewayError, SendStatus, SessionId};

/// Scripted in-memory client. `submit` hands out a random session id;
/// `status` replays the configured sequence in order and reports `Success`
/// once the script is exhausted.
pub struct MockFaxClient {
    statuses: Mutex<VecDeque<SendStatus>>,
    queries: AtomicUsize,
}

impl MockFaxClient {
    pub fn new() -> Self {
        Self::with_statuses([
            SendStatus::Pending,
            SendStatus::Sending,
            SendStatus::Success,
        ])
    }

    pub fn with_statuses(statuses: impl IntoIterator<Item = SendStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of status queries answered so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Default for MockFaxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaxClient for MockFaxClient {
    async fn submit(&self, request: &FaxRequest) -> Result<SessionId, GatewayError> {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        tracing::info!(
            session_id = %id,
            recipient = %request.recipient,
            filename = %request.filename,
            "mock fax accepted"
        );

        Ok(SessionId::new(id))
    }

    async fn status(&self, _session: &SessionId) -> Result<SendStatus, GatewayError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let next = self
            .statuses
            .lock()
            .expect("status script lock")
            .pop_front()
            .unwrap_or(SendStatus::Success);
        Ok(next)
    }
}
