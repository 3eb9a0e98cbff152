use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_NAME: &str = "sendfax";
const KEYCHAIN_SERVICE: &str = "sendfax.gateway";
const KEYCHAIN_TOKEN_KEY: &str = "token";

/// Environment variable consulted before the keychain.
pub const TOKEN_ENV_VAR: &str = "SENDFAX_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_kind")]
    pub kind: String, // "mock" | "http"
    pub base_url: Option<String>,
    pub token_id: Option<String>,
    pub faxline_id: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: default_gateway_kind(),
            base_url: None,
            token_id: None,
            faxline_id: None,
        }
    }
}

fn default_gateway_kind() -> String {
    "mock".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load app config: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("missing configuration value `{0}`")]
    MissingValue(&'static str),

    #[error("keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("gateway token not found in SENDFAX_TOKEN or the OS keychain")]
    TokenNotFound,
}

pub fn load() -> Result<AppConfig, ConfigError> {
    Ok(confy::load(APP_NAME, None)?)
}

pub fn store(cfg: &AppConfig) -> Result<(), ConfigError> {
    confy::store(APP_NAME, None, cfg)?;
    Ok(())
}

/// Resolve the gateway token. The environment wins over the keychain so a
/// shell session can override the stored secret; the token is never written
/// to the config file.
pub fn resolve_token() -> Result<String, ConfigError> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    match token_entry()?.get_password() {
        Ok(token) => Ok(token),
        Err(keyring::Error::NoEntry) => Err(ConfigError::TokenNotFound),
        Err(err) => Err(ConfigError::Keychain(err)),
    }
}

/// Store the gateway token in the OS keychain.
pub fn store_token(value: &str) -> Result<(), ConfigError> {
    token_entry()?.set_password(value)?;
    Ok(())
}

/// Delete the gateway token from the OS keychain.
pub fn delete_token() -> Result<(), ConfigError> {
    token_entry()?.delete_password()?;
    Ok(())
}

fn token_entry() -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_TOKEN_KEY)?)
}
