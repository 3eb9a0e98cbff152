use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ConfigError;
use gateway::{
    http::HttpFaxClient, mock::MockFaxClient, poll_until_terminal, Credentials, FaxClient,
    FaxRequest, GatewayError, PollOptions, SendStatus,
};
use sendfax_core::{DocumentPayload, Recipient, ValidationError};

mod exit_code {
    pub const USAGE: u8 = 1;
    pub const INVALID_RECIPIENT: u8 = 2;
    pub const FILE_NOT_FOUND: u8 = 3;
    pub const INVALID_FILE_TYPE: u8 = 4;
    pub const SUBMISSION_FAILED: u8 = 5;
    pub const POLLING_FAILED: u8 = 6;
    pub const CONFIG: u8 = 7;
}

#[derive(Parser, Debug)]
#[command(
    name = "sendfax",
    version,
    about = "Submit a PDF to the fax gateway and watch the send to completion"
)]
struct Args {
    /// Recipient fax number: optional leading +, then digits only
    recipient: String,

    /// Path to the PDF document to send
    file: PathBuf,

    /// Faxline to send from, overriding the configured one
    #[arg(short, long)]
    faxline: Option<String>,

    /// Give up after this many status queries instead of polling forever
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("fax submission failed: {0}")]
    Submit(GatewayError),

    #[error("status polling failed: {0}")]
    Poll(GatewayError),
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn create_fax_client(
    cfg: &config::AppConfig,
) -> Result<Box<dyn FaxClient>, RunError> {
    match cfg.gateway.kind.as_str() {
        "http" => {
            let base_url = cfg
                .gateway
                .base_url
                .clone()
                .ok_or(ConfigError::MissingValue("gateway.base_url"))?;
            let token_id = cfg
                .gateway
                .token_id
                .clone()
                .ok_or(ConfigError::MissingValue("gateway.token_id"))?;
            let token = config::resolve_token()?;

            tracing::info!(%base_url, "using http fax gateway");
            let client = HttpFaxClient::new(base_url, Credentials { token_id, token })
                .map_err(RunError::Submit)?;
            Ok(Box::new(client))
        }
        _ => {
            tracing::info!("using mock fax gateway");
            Ok(Box::new(MockFaxClient::new()))
        }
    }
}

async fn run(args: Args) -> Result<SendStatus, RunError> {
    let recipient = Recipient::parse(&args.recipient)?;
    let payload = DocumentPayload::from_pdf_path(&args.file)?;

    let cfg = config::load()?;
    let faxline_id = match args.faxline.or_else(|| cfg.gateway.faxline_id.clone()) {
        Some(id) => id,
        // The mock gateway accepts any line; http needs a real one.
        None if cfg.gateway.kind != "http" => "mock".to_string(),
        None => return Err(ConfigError::MissingValue("gateway.faxline_id").into()),
    };
    let client = create_fax_client(&cfg)?;

    let request = FaxRequest::new(faxline_id, payload, recipient);
    let session = client.submit(&request).await.map_err(RunError::Submit)?;
    tracing::info!(session_id = %session, "fax accepted, polling send status");

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let options = PollOptions {
        max_attempts: args.max_attempts,
        ..PollOptions::default()
    };
    let status = poll_until_terminal(client.as_ref(), &session, &options, &cancel, |status| {
        println!("{status}");
    })
    .await
    .map_err(RunError::Poll)?;

    Ok(status)
}

fn exit_code_for(err: &RunError) -> u8 {
    match err {
        RunError::Validation(ValidationError::InvalidRecipient(_)) => exit_code::INVALID_RECIPIENT,
        RunError::Validation(ValidationError::FileNotFound(_))
        | RunError::Validation(ValidationError::Io { .. }) => exit_code::FILE_NOT_FOUND,
        RunError::Validation(ValidationError::UnsupportedMediaType { .. })
        | RunError::Validation(ValidationError::EmptyDocument(_)) => exit_code::INVALID_FILE_TYPE,
        RunError::Config(_) => exit_code::CONFIG,
        RunError::Submit(_) => exit_code::SUBMISSION_FAILED,
        RunError::Poll(_) => exit_code::POLLING_FAILED,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap renders usage and help itself; --help/--version land here too
            let uses_stderr = err.use_stderr();
            let _ = err.print();
            return if uses_stderr {
                ExitCode::from(exit_code::USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args).await {
        // The terminal status was already printed by the poll observer.
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
