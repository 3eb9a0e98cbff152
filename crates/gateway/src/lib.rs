use std::fmt;

use async_trait::async_trait;

use sendfax_core::{DocumentPayload, Recipient};

mod error;
pub mod http;
pub mod mock;
pub mod poller;

pub use error::GatewayError;
pub use poller::{poll_until_terminal, PollOptions};

/// Basic-auth credential pair for the fax gateway. Built once at the entry
/// point and passed by parameter.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token_id: String,
    pub token: String,
}

/// Opaque server-assigned identifier for one in-flight send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One outbound fax. Built once per invocation, sent exactly once.
#[derive(Debug, Clone)]
pub struct FaxRequest {
    pub faxline_id: String,
    pub recipient: Recipient,
    pub filename: String,
    pub document: Vec<u8>,
}

impl FaxRequest {
    pub fn new(
        faxline_id: impl Into<String>,
        payload: DocumentPayload,
        recipient: Recipient,
    ) -> Self {
        Self {
            faxline_id: faxline_id.into(),
            recipient,
            filename: payload.filename,
            document: payload.bytes,
        }
    }
}

/// Delivery status as reported by the gateway.
///
/// The gateway speaks in uppercase literals. The three in-progress values
/// form a closed set; anything else ends the send, so unrecognized literals
/// are carried verbatim in `Other` and classified as terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Starting,
    Pending,
    Sending,
    Success,
    Failed,
    Other(String),
}

/// Two-way classification driving the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    InProgress,
    Terminal,
}

impl SendStatus {
    pub fn phase(&self) -> SendPhase {
        match self {
            SendStatus::Starting | SendStatus::Pending | SendStatus::Sending => {
                SendPhase::InProgress
            }
            SendStatus::Success | SendStatus::Failed | SendStatus::Other(_) => SendPhase::Terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase() == SendPhase::Terminal
    }
}

impl From<&str> for SendStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "STARTING" => SendStatus::Starting,
            "PENDING" => SendStatus::Pending,
            "SENDING" => SendStatus::Sending,
            "SUCCESS" => SendStatus::Success,
            "FAILED" => SendStatus::Failed,
            other => SendStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStatus::Starting => f.write_str("STARTING"),
            SendStatus::Pending => f.write_str("PENDING"),
            SendStatus::Sending => f.write_str("SENDING"),
            SendStatus::Success => f.write_str("SUCCESS"),
            SendStatus::Failed => f.write_str("FAILED"),
            SendStatus::Other(raw) => f.write_str(raw),
        }
    }
}

#[async_trait]
pub trait FaxClient: Send + Sync {
    /// Submit one fax and return the session identifier assigned by the
    /// gateway.
    async fn submit(&self, request: &FaxRequest) -> Result<SessionId, GatewayError>;

    /// Query the current delivery status for a session.
    async fn status(&self, session: &SessionId) -> Result<SendStatus, GatewayError>;
}
