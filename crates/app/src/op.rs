use std::path::PathBuf;

use crate::daemon::http_server::api::client::{ApiClient, ApiError};
use crate::state::AppState;

/// One CLI operation, executed against a context.
#[async_trait::async_trait]
pub trait Op {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output: std::fmt::Display;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

/// Context shared by every op: the API client and the config location.
#[derive(Debug, Clone)]
pub struct OpContext {
    pub client: ApiClient,
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    /// Build a context targeting `remote`, or the local daemon on the
    /// configured port (8080 when no config directory exists yet).
    pub fn new(remote: Option<String>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let base_url = match remote {
            Some(url) => url,
            None => {
                let port = AppState::load(config_path.clone())
                    .map(|state| state.config.app_port)
                    .unwrap_or(8080);
                format!("http://localhost:{}", port)
            }
        };
        Ok(Self {
            client: ApiClient::new(&base_url)?,
            config_path,
        })
    }
}
