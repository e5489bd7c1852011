use tokio::sync::watch;

use crate::daemon::http_server::{self, HttpServerError};
use crate::daemon::{ServiceConfig, ServiceState, StateSetupError};
use crate::op::{Op, OpContext};
use crate::state::{AppState, StateError};

/// Run the daemon serving the capsule API.
#[derive(Debug, clap::Args)]
pub struct Daemon {
    /// Port override for the API server
    #[arg(long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Setup(#[from] StateSetupError),
    #[error("server error: {0}")]
    Server(#[from] HttpServerError),
}

#[async_trait::async_trait]
impl Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let app_state = AppState::load(ctx.config_path.clone())?;
        let log_level: tracing::Level = self.log_level.parse().unwrap_or(tracing::Level::INFO);
        let config = ServiceConfig::from_app_state(&app_state, self.port, log_level);

        tracing::info!(account = %config.account, "starting kairos daemon");
        let state = ServiceState::from_config(&config)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        tokio::spawn(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl+c");
            tracing::info!("received shutdown signal");
            let _ = shutdown_tx.send(());
        });

        http_server::run(config, state, shutdown_rx).await?;

        Ok("daemon stopped".to_string())
    }
}
