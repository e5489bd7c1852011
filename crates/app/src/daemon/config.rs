use std::net::SocketAddr;

use common::prelude::Address;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Config {
    /// address for the API server to listen on
    pub listen_addr: SocketAddr,

    // session configuration
    /// account the daemon submits transactions as
    pub account: Address,

    // ledger configuration
    /// base URL of the ledger node
    pub ledger_endpoint: String,
    /// capsule contract address
    pub ledger_contract: Address,

    // content store configuration
    /// base URL of the pinning API
    pub pin_api_url: String,
    /// pinning API credentials
    pub pin_api_key: String,
    pub pin_api_secret: String,
    /// base URL of the read gateway
    pub gateway_url: String,

    // logging
    pub log_level: tracing::Level,
}

impl Config {
    /// Build the service config from loaded app state, with optional
    /// overrides from the command line.
    pub fn from_app_state(
        state: &AppState,
        port: Option<u16>,
        log_level: tracing::Level,
    ) -> Self {
        let port = port.unwrap_or(state.config.app_port);
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            account: state.config.account,
            ledger_endpoint: state.config.ledger.endpoint.clone(),
            ledger_contract: state.config.ledger.contract,
            pin_api_url: state.config.store.api_url.clone(),
            pin_api_key: state.config.store.api_key.clone(),
            pin_api_secret: state.config.store.api_secret.clone(),
            gateway_url: state.config.store.gateway_url.clone(),
            log_level,
        }
    }
}
