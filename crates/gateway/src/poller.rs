use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{FaxClient, GatewayError, SendStatus, SessionId};

/// Fixed-interval polling controls.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between consecutive status queries. Unconditional: no backoff,
    /// no jitter.
    pub interval: Duration,
    /// Upper bound on status queries. `None` polls until a terminal status
    /// arrives.
    pub max_attempts: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

/// Queries the send status until the gateway reports a terminal value,
/// which is returned unchanged.
///
/// Every observed status, the terminal one included, is passed to `observe`
/// exactly once per query. No delay is incurred before the first query or
/// after the terminal one; the poller only suspends between queries that
/// saw an in-progress status. Cancelling `cancel` aborts the suspension and
/// returns [`GatewayError::Cancelled`].
pub async fn poll_until_terminal<C, F>(
    client: &C,
    session: &SessionId,
    options: &PollOptions,
    cancel: &CancellationToken,
    mut observe: F,
) -> Result<SendStatus, GatewayError>
where
    C: FaxClient + ?Sized,
    F: FnMut(&SendStatus),
{
    let mut attempts = 0u32;
    loop {
        let status = client.status(session).await?;
        observe(&status);
        attempts += 1;

        if status.is_terminal() {
            return Ok(status);
        }
        if let Some(max) = options.max_attempts {
            if attempts >= max {
                return Err(GatewayError::AttemptsExhausted(max));
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            _ = tokio::time::sleep(options.interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFaxClient;
    use crate::SendStatus::{Failed, Pending, Sending, Starting, Success};
    use tokio::time::Instant;

    fn session() -> SessionId {
        SessionId::new("test-session")
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_the_first_terminal_status() {
        let client = MockFaxClient::with_statuses([Starting, Pending, Sending, Success]);
        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        let started = Instant::now();

        let result = poll_until_terminal(
            &client,
            &session(),
            &PollOptions::default(),
            &cancel,
            |status| seen.push(status.clone()),
        )
        .await
        .unwrap();

        assert_eq!(result, Success);
        assert_eq!(seen, vec![Starting, Pending, Sending, Success]);
        assert_eq!(client.queries(), 4);
        // Three in-progress statuses, so exactly three 5 s suspensions.
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_immediately_when_the_first_response_is_terminal() {
        let client = MockFaxClient::with_statuses([Failed]);
        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        let started = Instant::now();

        let result = poll_until_terminal(
            &client,
            &session(),
            &PollOptions::default(),
            &cancel,
            |status| seen.push(status.clone()),
        )
        .await
        .unwrap();

        assert_eq!(result, Failed);
        assert_eq!(seen, vec![Failed]);
        assert_eq!(client.queries(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_terminal_literals_stop_polling_too() {
        let client = MockFaxClient::with_statuses([
            Pending,
            SendStatus::Other("SCHEDULED_CANCELED".to_string()),
        ]);
        let cancel = CancellationToken::new();

        let result = poll_until_terminal(
            &client,
            &session(),
            &PollOptions::default(),
            &cancel,
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(result, SendStatus::Other("SCHEDULED_CANCELED".to_string()));
        assert_eq!(client.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_suspension() {
        let client = MockFaxClient::with_statuses([Pending, Pending, Pending]);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });
        let started = Instant::now();

        let result = poll_until_terminal(
            &client,
            &session(),
            &PollOptions::default(),
            &cancel,
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(GatewayError::Cancelled)));
        assert_eq!(client.queries(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_bound_stops_non_terminal_polling() {
        let client = MockFaxClient::with_statuses([Pending, Pending, Pending, Pending]);
        let cancel = CancellationToken::new();
        let options = PollOptions {
            max_attempts: Some(2),
            ..PollOptions::default()
        };

        let result =
            poll_until_terminal(&client, &session(), &options, &cancel, |_| {}).await;

        assert!(matches!(result, Err(GatewayError::AttemptsExhausted(2))));
        assert_eq!(client.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn query_errors_propagate_without_retry() {
        struct FailingClient;

        #[async_trait::async_trait]
        impl crate::FaxClient for FailingClient {
            async fn submit(
                &self,
                _request: &crate::FaxRequest,
            ) -> Result<SessionId, GatewayError> {
                unreachable!("poller never submits")
            }

            async fn status(&self, _session: &SessionId) -> Result<SendStatus, GatewayError> {
                Err(GatewayError::MissingField("faxStatusType"))
            }
        }

        let cancel = CancellationToken::new();
        let result = poll_until_terminal(
            &FailingClient,
            &session(),
            &PollOptions::default(),
            &cancel,
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(GatewayError::MissingField(_))));
    }
}
