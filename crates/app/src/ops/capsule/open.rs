use crate::daemon::http_server::api::client::ApiError;
use crate::daemon::http_server::api::v0::capsule::open::{OpenRequest, OpenResponse};
use crate::op::{Op, OpContext};

/// Open an unlocked capsule.
#[derive(Debug, clap::Args)]
pub struct Open {
    #[command(flatten)]
    request: OpenRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CapsuleOpenError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Open {
    type Error = CapsuleOpenError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response: OpenResponse = ctx.client.call(self.request.clone()).await?;

        let how = if response.on_behalf {
            " on the owner's behalf"
        } else {
            ""
        };
        Ok(format!(
            "Opened capsule for {}{} (tx: {})",
            self.request.owner, how, response.tx_hash
        ))
    }
}
