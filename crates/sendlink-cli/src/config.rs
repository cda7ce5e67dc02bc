//! Runtime context assembled from flags and environment.
//!
//! There is no config file: a Send client holds no local state, so everything
//! comes from `--server` / `--token` (with `SENDLINK_SERVER` / `SENDLINK_TOKEN`
//! fallbacks via clap) and the `SENDLINK_ACCOUNT_KEY` environment variable.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use sendlink_core::crypto::SymmetricKey;
use sendlink_core::{Result, SendApiClient, SendError};

use crate::cli::Cli;

pub const ACCOUNT_KEY_ENV: &str = "SENDLINK_ACCOUNT_KEY";

pub struct AppContext {
    server: Url,
    token: Option<String>,
    pub quiet: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let server = cli.server.as_deref().ok_or_else(|| {
            SendError::InvalidInput("No server provided. Use --server or SENDLINK_SERVER.".to_string())
        })?;
        let server = Url::parse(server)
            .map_err(|_| SendError::InvalidInput(format!("Invalid server URL: {}", server)))?;
        Ok(Self {
            server,
            token: cli.token.clone(),
            quiet: cli.quiet,
        })
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    /// Client for the anonymous access endpoints; no token needed.
    pub fn anonymous_api(&self) -> Result<SendApiClient> {
        SendApiClient::new(&self.server, None)
    }

    /// Client for owner operations; requires a token.
    pub fn owner_api(&self) -> Result<SendApiClient> {
        let token = self.token.as_deref().ok_or_else(|| {
            SendError::InvalidInput("No access token provided. Use --token or SENDLINK_TOKEN.".to_string())
        })?;
        SendApiClient::new(&self.server, Some(token))
    }
}

/// The owner's account key, read from `SENDLINK_ACCOUNT_KEY` (base64).
///
/// Never accepted as a flag: argv is visible to other processes.
pub fn account_key() -> Result<SymmetricKey> {
    let value = std::env::var(ACCOUNT_KEY_ENV).map_err(|_| {
        SendError::InvalidInput(format!("No account key provided. Set {} (base64).", ACCOUNT_KEY_ENV))
    })?;
    let bytes = STANDARD.decode(value.trim()).map_err(|_| {
        SendError::InvalidInput(format!("{} is not valid base64.", ACCOUNT_KEY_ENV))
    })?;
    SymmetricKey::from_slice(&bytes).map_err(|_| {
        SendError::InvalidInput(format!("{} must decode to exactly 32 bytes.", ACCOUNT_KEY_ENV))
    })
}
