use std::convert::Infallible;

use crate::op::{Op, OpContext};

/// Print version information.
#[derive(Debug, clap::Args)]
pub struct Version {}

#[async_trait::async_trait]
impl Op for Version {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, _ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        Ok(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
    }
}
