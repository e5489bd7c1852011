use chrono::Utc;

use common::capsule::{CapsulePhase, CapsuleView, MetadataState};
use common::format;

use crate::daemon::http_server::api::client::ApiError;
use crate::daemon::http_server::api::v0::capsule::view::{ViewRequest, ViewResponse};
use crate::op::{Op, OpContext};

/// View a capsule's status and content.
#[derive(Debug, clap::Args)]
pub struct View {
    #[command(flatten)]
    request: ViewRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CapsuleViewError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for View {
    type Error = CapsuleViewError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response: ViewResponse = ctx.client.call(self.request.clone()).await?;

        let Some(capsule) = response.capsule else {
            return Ok(format!("No capsule found for {}", self.request.owner));
        };
        Ok(render(&capsule))
    }
}

fn render(capsule: &CapsuleView) -> String {
    let now = Utc::now().timestamp();
    let mut out = Vec::new();

    let whose = if capsule.is_owner { " (yours)" } else { "" };
    out.push(format!("Capsule owned by {}{}", capsule.owner, whose));

    let status = match capsule.phase {
        CapsulePhase::Locked => format!(
            "Locked — unlocks in {} ({})",
            format::time_remaining(capsule.unlock_time, now),
            format::date(capsule.unlock_time)
        ),
        CapsulePhase::Unlockable => "Unlocked — anyone may open it".to_string(),
        CapsulePhase::Opened => "Opened".to_string(),
    };
    out.push(format!("  status: {}", status));

    match &capsule.metadata {
        MetadataState::Unavailable { reason } => {
            out.push(format!("  metadata unavailable: {}", reason));
        }
        MetadataState::Resolved { envelope } => {
            out.push(format!("  title: {}", envelope.title));
            out.push(format!(
                "  created: {} by {}",
                format::date(envelope.created_at.timestamp()),
                envelope.created_by.short()
            ));
            if let Some(recipient) = &envelope.intended_recipient {
                out.push(format!("  intended for: {}", recipient.short()));
            }

            if capsule.can_access_content {
                if let Some(message) = &envelope.message {
                    out.push(format!("  message: {}", message));
                }
                if let Some(file_name) = &envelope.file_name {
                    out.push(format!(
                        "  file: {} ({}, {})",
                        file_name,
                        envelope.file_type.as_deref().unwrap_or("unknown type"),
                        format::file_size(envelope.file_size.unwrap_or(0)),
                    ));
                    if let Some(file_hash) = &envelope.file_hash {
                        out.push(format!("  file ref: {}", file_hash));
                    }
                }
            } else {
                out.push("  content sealed until the capsule is opened".to_string());
            }
        }
    }

    out.join("\n")
}
