use std::path::PathBuf;

use base64::Engine;

use crate::daemon::http_server::api::client::ApiError;
use crate::daemon::http_server::api::v0::capsule::create::{CreateRequest, CreateResponse};
use crate::op::{Op, OpContext};

/// Seal a new capsule.
#[derive(Debug, clap::Args)]
pub struct Create {
    #[command(flatten)]
    request: CreateRequest,

    /// Path to a file to seal into the capsule
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum CapsuleCreateError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = CapsuleCreateError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = self.request.clone();

        if let Some(path) = &self.file {
            let bytes = tokio::fs::read(path).await?;
            if request.file_name.is_none() {
                request.file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.to_string());
            }
            request.file_base64 =
                Some(base64::engine::general_purpose::STANDARD.encode(&bytes));
        }

        let response: CreateResponse = ctx.client.call(request).await?;

        Ok(format!(
            "Sealed capsule (tx: {})\n  envelope: {}\n  unlocks: {}",
            response.tx_hash,
            response.content_ref,
            common::format::date(response.unlock_time)
        ))
    }
}
