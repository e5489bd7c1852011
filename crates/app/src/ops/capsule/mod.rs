mod create;
mod open;
mod view;

pub use create::Create;
pub use open::Open;
pub use view::View;

use crate::op::{Op, OpContext};

/// Capsule operations.
#[derive(Debug, clap::Subcommand)]
pub enum Capsule {
    /// Seal a new capsule with a message and/or file
    Create(Create),
    /// View a capsule's status and (once opened) its content
    View(View),
    /// Open an unlocked capsule, yours or anyone's
    Open(Open),
}

impl Capsule {
    pub async fn execute(&self, ctx: &OpContext) -> anyhow::Result<String> {
        match self {
            Capsule::Create(op) => Ok(op.execute(ctx).await?),
            Capsule::View(op) => Ok(op.execute(ctx).await?),
            Capsule::Open(op) => Ok(op.execute(ctx).await?),
        }
    }
}
