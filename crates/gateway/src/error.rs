use thiserror::Error;

/// Errors from talking to the fax gateway. None of these are retried; the
/// first failure ends the run.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed: connect failure, timeout, or a body
    /// that could not be read or decoded at the transport layer.
    #[error("request to fax gateway failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status code.
    #[error("fax gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A structurally valid response without the expected field.
    #[error("fax gateway response missing field `{0}`")]
    MissingField(&'static str),

    /// Status polling was cancelled by the caller.
    #[error("status polling cancelled")]
    Cancelled,

    /// The configured attempt bound elapsed without a terminal status.
    #[error("no terminal status after {0} polling attempts")]
    AttemptsExhausted(u32),
}
