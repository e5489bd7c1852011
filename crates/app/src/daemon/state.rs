use common::capsule::CapsuleManager;
use common::ledger::{LedgerError, RpcLedger};
use common::store::{Gateway, PinningStore, StoreError};

use super::config::Config;

/// The concrete manager the daemon serves requests with.
pub type Manager = CapsuleManager<RpcLedger, PinningStore>;

/// Shared state for the daemon's HTTP handlers.
///
/// Holds the session context (manager) built once at startup; handlers
/// clone the state, never reach for globals.
#[derive(Debug, Clone)]
pub struct State {
    manager: Manager,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let ledger = RpcLedger::new(
            &config.ledger_endpoint,
            config.ledger_contract,
            config.account,
        )?;
        let gateway = Gateway::new(&config.gateway_url)?;
        let store = PinningStore::new(
            &config.pin_api_url,
            &config.pin_api_key,
            &config.pin_api_secret,
            gateway,
        )?;
        let manager = CapsuleManager::new(config.account, ledger, store);
        Ok(Self { manager })
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("ledger setup failed: {0}")]
    Ledger(#[from] LedgerError),
    #[error("content store setup failed: {0}")]
    Store(#[from] StoreError),
}
