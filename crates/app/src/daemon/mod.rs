mod config;
pub mod http_server;
mod state;

pub use config::Config as ServiceConfig;
pub use state::{State as ServiceState, StateSetupError};
