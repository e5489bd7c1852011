use common::prelude::{Address, AddressError};

use crate::op::{Op, OpContext};
use crate::state::{AppConfig, AppState, LedgerConfig, StateError, StoreConfig};

/// Initialize the kairos config directory.
#[derive(Debug, clap::Args)]
pub struct Init {
    /// Account to submit transactions as
    #[arg(long)]
    account: String,

    /// Base URL of the ledger node
    #[arg(long)]
    ledger_endpoint: String,

    /// Capsule contract address on the ledger
    #[arg(long)]
    contract: String,

    /// Base URL of the pinning API
    #[arg(long, default_value = "https://api.pinata.cloud")]
    pin_api_url: String,

    /// Pinning API key
    #[arg(long)]
    pin_api_key: String,

    /// Pinning API secret
    #[arg(long)]
    pin_api_secret: String,

    /// Base URL of the read gateway
    #[arg(long, default_value = "https://gateway.pinata.cloud/ipfs")]
    gateway_url: String,

    /// Port for the daemon API server
    #[arg(long, default_value = "8080")]
    port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid address: {0}")]
    BadAddress(#[from] AddressError),
    #[error(transparent)]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let account: Address = self.account.parse()?;
        let contract: Address = self.contract.parse()?;

        let config = AppConfig {
            app_port: self.port,
            account,
            ledger: LedgerConfig {
                endpoint: self.ledger_endpoint.clone(),
                contract,
            },
            store: StoreConfig {
                api_url: self.pin_api_url.clone(),
                api_key: self.pin_api_key.clone(),
                api_secret: self.pin_api_secret.clone(),
                gateway_url: self.gateway_url.clone(),
            },
        };

        let state = AppState::init(ctx.config_path.clone(), config)?;
        Ok(format!(
            "Initialized kairos at {} (account {})",
            state.kairos_dir.display(),
            account.short()
        ))
    }
}
